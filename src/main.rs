//! algoviz CLI
//!
//! Prints step logs for the data structure visualizers.

use std::process::ExitCode;

use algoviz::cli::{run_cli, Args};
use algoviz::config::{LoggingConfig, VizConfig};

fn main() -> ExitCode {
    let args = Args::parse();

    // Quiet by default so step logs stay readable.
    let logging = args
        .config
        .as_ref()
        .and_then(|path| VizConfig::load(path).ok())
        .map_or_else(
            || LoggingConfig {
                filter: "warn".to_string(),
                file: None,
            },
            |config| config.logging,
        );
    if let Err(e) = algoviz::logging::init(&logging) {
        eprintln!("Warning: {e}");
    }

    run_cli(args)
}
