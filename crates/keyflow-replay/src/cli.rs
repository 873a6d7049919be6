//! Command-line interface definitions for keyflow-replay.

use std::path::PathBuf;

use clap::Parser;
use logging::LogArgs;

/// Command-line interface for the `keyflow-replay` binary.
#[derive(Parser, Debug)]
#[command(
    name = "keyflow-replay",
    about = "Replay timed mapping detections against the keyflow engine",
    version
)]
pub struct Cli {
    /// Logging controls shared across keyflow binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Preferences file (RON). Defaults to ~/.keyflow/preferences.ron when it exists.
    #[arg(long, value_name = "PATH")]
    pub prefs: Option<PathBuf>,

    /// Replay script (RON) with mappings and timed events.
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,
}
