//! CLI output formatting.
//!
//! Everything writes to a caller-supplied `Write` so tests can capture it.

use std::io::Write;

use serde::Serialize;

use crate::engine::StepLog;
use crate::error::{VizError, VizResult};
use crate::render::{Renderer, TextRenderer};

/// Version string, with the source revision when the build knew it.
#[must_use]
pub fn version_string() -> String {
    let version = option_env!("ALGOVIZ_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    match option_env!("ALGOVIZ_GIT_HASH") {
        Some(hash) => format!("algoviz {version} ({hash})"),
        None => format!("algoviz {version}"),
    }
}

/// Print version information.
pub fn print_version() {
    println!("{}", version_string());
}

/// Help text.
pub const HELP: &str = r"algoviz - Step-by-step data structure and algorithm visualizer

USAGE:
    algoviz [--json] [--config <file.yaml>] <COMMAND> [ARGS]

COMMANDS:
    sort <bubble|quick|merge> [values...]
                                Sort an array and print every step
    graph <bfs|dfs> [start]     Traverse the example graph
    tree <ops...>               insert:N remove:N search:N inorder preorder postorder
    heap <ops...>               insert:N extract toggle
    hash [--strategy S] [--hash H] [--size N] <ops...>
                                insert:key=value search:key remove:key
                                S: linear quadratic chaining; H: simple djb2 fnv
    list <ops...>               front:N back:N at:N@P pop-front pop-back search:N
    stack <ops...>              push:N pop
    queue <ops...>              enqueue:N dequeue
    check-config <file.yaml>    Validate a configuration file

    help                        Show this help message
    version                     Show version information

OPTIONS:
    --json                      Print each step log as one JSON line
    --config <file.yaml>        Seed structures from a configuration file

EXAMPLES:
    algoviz sort quick 5 3 8 1
    algoviz graph bfs A
    algoviz tree insert:45 search:45 inorder
    algoviz --json hash --strategy chaining insert:apple=1 insert:melon=2
";

/// Print help message.
pub fn print_help() {
    println!("{HELP}");
}

#[derive(Serialize)]
struct Report<'a, S> {
    operation: &'a str,
    message: &'a str,
    steps: &'a StepLog<S>,
}

#[derive(Serialize)]
struct Rejection<'a> {
    operation: &'a str,
    error: String,
}

/// Write one operation's step log and message.
///
/// # Errors
///
/// Returns an error if writing or JSON encoding fails.
pub fn write_report<S, W>(
    out: &mut W,
    json: bool,
    operation: &str,
    message: &str,
    log: &StepLog<S>,
) -> VizResult<()>
where
    S: Serialize,
    TextRenderer: Renderer<S, Output = String>,
    W: Write,
{
    if json {
        serde_json::to_writer(&mut *out, &Report {
            operation,
            message,
            steps: log,
        })?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "== {operation} ==")?;
    let renderer = TextRenderer::default();
    let width = log.last_index().to_string().len();
    for (i, frame) in renderer.render_log(log).iter().enumerate() {
        let mut lines = frame.lines();
        if let Some(first) = lines.next() {
            writeln!(out, "[{i:0width$}] {first}")?;
        }
        for line in lines {
            writeln!(out, "{:pad$}{line}", "", pad = width + 3)?;
        }
    }
    if !message.is_empty() {
        writeln!(out, "→ {message}")?;
    }
    Ok(())
}

/// Write an operation that was rejected with an advisory error.
///
/// # Errors
///
/// Returns an error if writing or JSON encoding fails.
pub fn write_rejection<W: Write>(
    out: &mut W,
    json: bool,
    operation: &str,
    error: &VizError,
) -> VizResult<()> {
    if json {
        serde_json::to_writer(&mut *out, &Rejection {
            operation,
            error: error.to_string(),
        })?;
        writeln!(out)?;
    } else {
        writeln!(out, "== {operation} ==")?;
        writeln!(out, "✗ {error}")?;
    }
    Ok(())
}
