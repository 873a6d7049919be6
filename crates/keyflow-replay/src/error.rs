//! Error handling for the keyflow-replay crate.

use std::{io, result};

use thiserror::Error;

/// Convenient result type for replay operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while replaying a script.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Errors surfaced by the engine (runtime, preferences).
    #[error("Engine error: {0}")]
    Engine(#[from] keyflow_engine::Error),
    /// The script could not be parsed.
    #[error("Failed to parse script {origin}: {message}")]
    ScriptParse {
        /// Script path, or `<inline>` for scripts parsed from a string.
        origin: String,
        /// Parser message.
        message: String,
    },
    /// A detection names a mapping the script does not define.
    #[error("Event at {at_ms}ms detects unknown mapping '{mapping_id}'")]
    UnknownMapping {
        /// Offset of the offending event.
        at_ms: u64,
        /// Mapping id that was not found.
        mapping_id: String,
    },
}
