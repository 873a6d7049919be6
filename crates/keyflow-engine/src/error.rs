use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the keyflow engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The scheduler was constructed outside of a tokio runtime.
    #[error("No tokio runtime available; construct the scheduler inside a runtime")]
    NoRuntime,

    /// The UI feedback channel has been closed by the receiver (or is full).
    #[error("Feedback channel closed")]
    ChannelClosed,

    /// Preferences could not be loaded.
    #[error("Preferences error: {0}")]
    Config(#[from] config::Error),
}
