//! CLI command handlers.
//!
//! Each handler seeds its structure from the configuration, applies the
//! requested operations in order and writes one report per operation.
//! Advisory rejections are reported inline and leave the structure as it
//! was; the run continues with the next operation.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;
use tracing::{info, warn};

use super::args::{HashOp, HeapOp, ListOp, QueueOp, StackOp, TreeOp};
use super::output::{print_help, print_version, write_rejection, write_report};
use super::{Args, Command};
use crate::config::VizConfig;
use crate::engine::StepLog;
use crate::error::{VizError, VizResult};
use crate::render::{Renderer, TextRenderer};
use crate::structures::graph::GraphAlgorithm;
use crate::structures::hash_table::HashTable;
use crate::structures::sorting::{generate_steps, parse_number_list, SortAlgorithm};
use crate::structures::Change;

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    let config = match &args.config {
        Some(path) => match VizConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::from(1);
            }
        },
        None => VizConfig::default(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match execute(&args.command, &config, args.json, &mut out) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(rejected) => {
            info!(rejected, "some operations were rejected");
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Run one command, returning how many operations were rejected.
///
/// # Errors
///
/// Returns non-advisory failures: I/O, serialization, configuration.
pub fn execute<W: Write>(
    command: &Command,
    config: &VizConfig,
    json: bool,
    out: &mut W,
) -> VizResult<usize> {
    let mut session = Session::new(out, json);
    match command {
        Command::Sort { algorithm, input } => {
            let input = input.as_deref().unwrap_or(&config.sorting.input);
            sort(&mut session, *algorithm, input)?;
        }
        Command::Graph { algorithm, start } => {
            let start = start.as_deref().or(config.graph.start.as_deref());
            graph(&mut session, config, *algorithm, start)?;
        }
        Command::Tree { ops } => tree(&mut session, config, ops)?,
        Command::Heap { ops } => heap(&mut session, config, ops)?,
        Command::Hash {
            strategy,
            function,
            size,
            ops,
        } => {
            let table = HashTable::new(
                size.unwrap_or(config.hash_table.size),
                strategy.unwrap_or(config.hash_table.strategy),
                function.unwrap_or(config.hash_table.function),
            )?;
            hash(&mut session, table, ops)?;
        }
        Command::List { ops } => list(&mut session, config, ops)?,
        Command::Stack { ops } => stack(&mut session, config, ops)?,
        Command::Queue { ops } => queue(&mut session, config, ops)?,
        Command::CheckConfig { path } => check_config(&mut *session.out, path)?,
        Command::Help => print_help(),
        Command::Version => print_version(),
    }
    Ok(session.rejected)
}

/// Output sink plus the running count of rejected operations.
struct Session<'a, W> {
    out: &'a mut W,
    json: bool,
    rejected: usize,
}

impl<'a, W: Write> Session<'a, W> {
    fn new(out: &'a mut W, json: bool) -> Self {
        Self {
            out,
            json,
            rejected: 0,
        }
    }

    fn report<S>(&mut self, label: &str, message: &str, log: &StepLog<S>) -> VizResult<()>
    where
        S: Serialize,
        TextRenderer: Renderer<S, Output = String>,
    {
        write_report(&mut *self.out, self.json, label, message, log)
    }

    fn reject(&mut self, label: &str, error: VizError) -> VizResult<()> {
        if !error.is_advisory() {
            return Err(error);
        }
        warn!(operation = label, %error, "operation rejected");
        self.rejected += 1;
        write_rejection(&mut *self.out, self.json, label, &error)
    }

    /// Report a state change and adopt the new state, or report the rejection.
    fn apply<T, S>(
        &mut self,
        label: &str,
        state: &mut T,
        result: VizResult<Change<T, S>>,
    ) -> VizResult<()>
    where
        S: Serialize,
        TextRenderer: Renderer<S, Output = String>,
    {
        match result {
            Ok(change) => {
                self.report(label, &change.message, &change.log)?;
                *state = change.next;
                Ok(())
            }
            Err(e) => self.reject(label, e),
        }
    }
}

fn sort<W: Write>(
    session: &mut Session<'_, W>,
    algorithm: SortAlgorithm,
    input: &str,
) -> VizResult<()> {
    let values = parse_number_list(input);
    let log = generate_steps(algorithm, &values);
    let message = format!(
        "{} finished in {} steps: {:?}",
        algorithm.name(),
        log.len(),
        log.last().values
    );
    session.report(&format!("sort {algorithm:?}").to_lowercase(), &message, &log)
}

fn graph<W: Write>(
    session: &mut Session<'_, W>,
    config: &VizConfig,
    algorithm: GraphAlgorithm,
    start: Option<&str>,
) -> VizResult<()> {
    let label = format!("graph {algorithm:?}").to_lowercase();
    match config.build_graph().traverse(algorithm, start) {
        Ok(run) => {
            let message = format!(
                "{} traversal from node {}: {}",
                algorithm.name(),
                start.unwrap_or_default(),
                run.order.join(" → ")
            );
            session.report(&label, &message, &run.log)
        }
        Err(e) => session.reject(&label, e),
    }
}

fn tree<W: Write>(
    session: &mut Session<'_, W>,
    config: &VizConfig,
    ops: &[TreeOp],
) -> VizResult<()> {
    let mut state = config.build_tree()?;
    for op in ops {
        match *op {
            TreeOp::Insert(v) => {
                let result = state.insert(v);
                session.apply(&format!("insert {v}"), &mut state, result)?;
            }
            TreeOp::Remove(v) => {
                let result = state.remove(v);
                session.apply(&format!("remove {v}"), &mut state, result)?;
            }
            TreeOp::Search(v) => {
                let label = format!("search {v}");
                match state.search(v) {
                    Ok(found) => session.report(&label, &found.message, &found.log)?,
                    Err(e) => session.reject(&label, e)?,
                }
            }
            TreeOp::Traverse(order) => {
                let label = format!("{order:?}").to_lowercase();
                match state.traverse(order) {
                    Ok(t) => {
                        let values: Vec<String> = t.values.iter().map(i64::to_string).collect();
                        let message = format!("{}: {}", t.message, values.join(", "));
                        session.report(&label, &message, &t.log)?;
                    }
                    Err(e) => session.reject(&label, e)?,
                }
            }
        }
    }
    Ok(())
}

fn heap<W: Write>(
    session: &mut Session<'_, W>,
    config: &VizConfig,
    ops: &[HeapOp],
) -> VizResult<()> {
    let mut state = config.build_heap();
    for op in ops {
        match *op {
            HeapOp::Insert(v) => {
                let result = Ok(state.insert(v));
                session.apply(&format!("insert {v}"), &mut state, result)?;
            }
            HeapOp::Extract => {
                let result = state.extract();
                session.apply("extract", &mut state, result)?;
            }
            HeapOp::Toggle => {
                let result = Ok(state.toggle_kind());
                session.apply("toggle", &mut state, result)?;
            }
        }
    }
    Ok(())
}

fn hash<W: Write>(
    session: &mut Session<'_, W>,
    mut state: HashTable,
    ops: &[HashOp],
) -> VizResult<()> {
    for op in ops {
        match op {
            HashOp::Insert(key, value) => {
                let result = state.insert(key, value);
                session.apply(&format!("insert {key}={value}"), &mut state, result)?;
            }
            HashOp::Search(key) => {
                let label = format!("search {key}");
                match state.search(key) {
                    Ok(found) => session.report(&label, &found.message, &found.log)?,
                    Err(e) => session.reject(&label, e)?,
                }
            }
            HashOp::Remove(key) => {
                let result = state.remove(key);
                session.apply(&format!("remove {key}"), &mut state, result)?;
            }
        }
    }
    Ok(())
}

fn list<W: Write>(
    session: &mut Session<'_, W>,
    config: &VizConfig,
    ops: &[ListOp],
) -> VizResult<()> {
    let mut state = config.build_linked_list();
    for op in ops {
        match *op {
            ListOp::PushFront(v) => {
                let result = Ok(state.push_front(v));
                session.apply(&format!("front {v}"), &mut state, result)?;
            }
            ListOp::PushBack(v) => {
                let result = Ok(state.push_back(v));
                session.apply(&format!("back {v}"), &mut state, result)?;
            }
            ListOp::InsertAt(v, p) => {
                let result = Ok(state.insert_at(v, p));
                session.apply(&format!("insert {v} at {p}"), &mut state, result)?;
            }
            ListOp::PopFront => {
                let result = state.pop_front();
                session.apply("pop-front", &mut state, result)?;
            }
            ListOp::PopBack => {
                let result = state.pop_back();
                session.apply("pop-back", &mut state, result)?;
            }
            ListOp::Search(v) => {
                let label = format!("search {v}");
                match state.search(v) {
                    Ok(found) => session.report(&label, &found.message, &found.log)?,
                    Err(e) => session.reject(&label, e)?,
                }
            }
        }
    }
    Ok(())
}

fn stack<W: Write>(
    session: &mut Session<'_, W>,
    config: &VizConfig,
    ops: &[StackOp],
) -> VizResult<()> {
    let mut state = config.build_stack();
    for op in ops {
        match *op {
            StackOp::Push(v) => {
                let result = Ok(state.push(v));
                session.apply(&format!("push {v}"), &mut state, result)?;
            }
            StackOp::Pop => {
                let result = state.pop();
                session.apply("pop", &mut state, result)?;
            }
        }
    }
    Ok(())
}

fn queue<W: Write>(
    session: &mut Session<'_, W>,
    config: &VizConfig,
    ops: &[QueueOp],
) -> VizResult<()> {
    let mut state = config.build_queue();
    for op in ops {
        match *op {
            QueueOp::Enqueue(v) => {
                let result = Ok(state.enqueue(v));
                session.apply(&format!("enqueue {v}"), &mut state, result)?;
            }
            QueueOp::Dequeue => {
                let result = state.dequeue();
                session.apply("dequeue", &mut state, result)?;
            }
        }
    }
    Ok(())
}

/// Validate a configuration file and summarise it.
///
/// # Errors
///
/// Returns the load or validation error.
pub fn check_config<W: Write>(out: &mut W, path: &Path) -> VizResult<()> {
    let config = VizConfig::load(path)?;
    writeln!(out, "✓ {} is valid", path.display())?;
    writeln!(
        out,
        "  replay speed {} ({} ms per step)",
        config.replay.speed,
        crate::engine::step_duration_ms(config.replay.speed)
    )?;
    writeln!(
        out,
        "  graph: {} nodes, {} edges",
        config.graph.nodes.len(),
        config.graph.edges.len()
    )?;
    writeln!(
        out,
        "  hash table: {} slots, {}, {}",
        config.hash_table.size,
        config.hash_table.strategy.name(),
        config.hash_table.function.name()
    )?;
    Ok(())
}
