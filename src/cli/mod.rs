//! Headless command-line surface.
//!
//! Parses arguments, seeds structures from the configuration, runs the
//! requested operations and prints each resulting step log as text or
//! JSON. `run_cli` is the only thing `main.rs` calls.

mod args;
mod commands;
mod output;

pub use args::{Args, Command, HashOp, HeapOp, ListOp, QueueOp, StackOp, TreeOp};
pub use commands::{check_config, execute, run_cli};
pub use output::{print_help, print_version, version_string, write_rejection, write_report, HELP};
