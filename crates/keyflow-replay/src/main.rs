#![warn(missing_docs)]

//! Entry point for the `keyflow-replay` binary.

use std::process;

use clap::Parser;
use keyflow_engine::DefaultsProvider;
use keyflow_replay::{cli::Cli, error::Result, replay, script::Script};
use tokio::runtime::Builder;
use tracing::{error, info};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and replay the script.
fn run() -> Result<()> {
    let Cli { log, prefs, script } = Cli::parse();
    let log_spec = logging::init(&log);
    info!(spec = %log_spec, "logging_ready");

    let script = Script::load(&script)?;
    let (handle, defaults) = DefaultsProvider::load(prefs.as_deref())?;

    let rt = Builder::new_multi_thread().enable_all().build()?;
    let summary = rt.block_on(replay::run(&script, &handle, defaults))?;
    println!(
        "performed={} feedback={} released_on_exit={}",
        summary.performed, summary.feedback, summary.released_on_exit
    );
    Ok(())
}
