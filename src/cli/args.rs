//! CLI argument parsing.
//!
//! Hand-rolled so every branch is testable with plain string slices.
//! Global flags (`--json`, `--config <path>`) may appear anywhere.

use std::path::PathBuf;

use crate::config::MAX_HASH_SIZE;
use crate::structures::graph::GraphAlgorithm;
use crate::structures::hash_table::{CollisionStrategy, HashFunction};
use crate::structures::sorting::{parse_int_prefix, SortAlgorithm};
use crate::structures::tree::TraversalOrder;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
    /// Print step logs as JSON.
    pub json: bool,
    /// Configuration file to seed structures from.
    pub config: Option<PathBuf>,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Sort an array and print every step
    Sort {
        /// Algorithm to run.
        algorithm: SortAlgorithm,
        /// Input text; the configured input when absent.
        input: Option<String>,
    },
    /// Traverse the graph
    Graph {
        /// Traversal to run.
        algorithm: GraphAlgorithm,
        /// Start node id.
        start: Option<String>,
    },
    /// Apply operations to the BST
    Tree {
        /// Operations in order.
        ops: Vec<TreeOp>,
    },
    /// Apply operations to the heap
    Heap {
        /// Operations in order.
        ops: Vec<HeapOp>,
    },
    /// Apply operations to a hash table
    Hash {
        /// Strategy override.
        strategy: Option<CollisionStrategy>,
        /// Hash function override.
        function: Option<HashFunction>,
        /// Table size override.
        size: Option<usize>,
        /// Operations in order.
        ops: Vec<HashOp>,
    },
    /// Apply operations to the linked list
    List {
        /// Operations in order.
        ops: Vec<ListOp>,
    },
    /// Apply operations to the stack
    Stack {
        /// Operations in order.
        ops: Vec<StackOp>,
    },
    /// Apply operations to the queue
    Queue {
        /// Operations in order.
        ops: Vec<QueueOp>,
    },
    /// Validate a configuration file
    CheckConfig {
        /// Path to the YAML file.
        path: PathBuf,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

/// One BST operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeOp {
    /// `insert:N`
    Insert(i64),
    /// `remove:N`
    Remove(i64),
    /// `search:N`
    Search(i64),
    /// `inorder`, `preorder` or `postorder`
    Traverse(TraversalOrder),
}

/// One heap operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapOp {
    /// `insert:N`
    Insert(i64),
    /// `extract`
    Extract,
    /// `toggle`
    Toggle,
}

/// One hash table operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashOp {
    /// `insert:key=value`
    Insert(String, String),
    /// `search:key`
    Search(String),
    /// `remove:key`
    Remove(String),
}

/// One linked list operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOp {
    /// `front:N`
    PushFront(i64),
    /// `back:N`
    PushBack(i64),
    /// `at:N@P`
    InsertAt(i64, usize),
    /// `pop-front`
    PopFront,
    /// `pop-back`
    PopBack,
    /// `search:N`
    Search(i64),
}

/// One stack operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOp {
    /// `push:N`
    Push(i64),
    /// `pop`
    Pop,
}

/// One queue operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueOp {
    /// `enqueue:N`
    Enqueue(i64),
    /// `dequeue`
    Dequeue,
}

fn number(token: &str) -> Option<i64> {
    parse_int_prefix(token)
}

impl TreeOp {
    /// Parse one `op[:arg]` token.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.split_once(':') {
            Some(("insert", n)) => number(n).map(Self::Insert),
            Some(("remove" | "delete", n)) => number(n).map(Self::Remove),
            Some(("search", n)) => number(n).map(Self::Search),
            None => TraversalOrder::from_name(token).map(Self::Traverse),
            Some(_) => None,
        }
    }
}

impl HeapOp {
    /// Parse one `op[:arg]` token.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.split_once(':') {
            Some(("insert", n)) => number(n).map(Self::Insert),
            None if token == "extract" => Some(Self::Extract),
            None if token == "toggle" => Some(Self::Toggle),
            _ => None,
        }
    }
}

impl HashOp {
    /// Parse one `op:arg` token.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.split_once(':')? {
            ("insert", pair) => {
                let (key, value) = pair.split_once('=')?;
                Some(Self::Insert(key.to_string(), value.to_string()))
            }
            ("search", key) => Some(Self::Search(key.to_string())),
            ("remove" | "delete", key) => Some(Self::Remove(key.to_string())),
            _ => None,
        }
    }
}

impl ListOp {
    /// Parse one `op[:arg]` token.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.split_once(':') {
            Some(("front", n)) => number(n).map(Self::PushFront),
            Some(("back", n)) => number(n).map(Self::PushBack),
            Some(("at", rest)) => {
                let (n, p) = rest.split_once('@')?;
                let position = usize::try_from(number(p)?).ok()?;
                Some(Self::InsertAt(number(n)?, position))
            }
            Some(("search", n)) => number(n).map(Self::Search),
            None if token == "pop-front" => Some(Self::PopFront),
            None if token == "pop-back" => Some(Self::PopBack),
            _ => None,
        }
    }
}

impl StackOp {
    /// Parse one `op[:arg]` token.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.split_once(':') {
            Some(("push", n)) => number(n).map(Self::Push),
            None if token == "pop" => Some(Self::Pop),
            _ => None,
        }
    }
}

impl QueueOp {
    /// Parse one `op[:arg]` token.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.split_once(':') {
            Some(("enqueue", n)) => number(n).map(Self::Enqueue),
            None if token == "dequeue" => Some(Self::Dequeue),
            _ => None,
        }
    }
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// This method is testable as it accepts any iterator of strings,
    /// not just `std::env::args()`.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    /// Internal parsing from a vector of strings.
    fn parse_from_vec(args: &[String]) -> Self {
        let mut json = false;
        let mut config = None;
        let mut rest = Vec::new();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--json" => json = true,
                "--config" => {
                    if let Some(path) = args.get(i + 1) {
                        config = Some(PathBuf::from(path));
                        i += 1;
                    } else {
                        eprintln!("Error: '--config' requires a path");
                    }
                }
                _ => rest.push(args[i].clone()),
            }
            i += 1;
        }

        let command = match rest.first().map(String::as_str) {
            None | Some("-h" | "--help" | "help") => Command::Help,
            Some("-V" | "--version" | "version") => Command::Version,
            Some("sort") => Self::parse_sort_command(&rest[1..]),
            Some("graph") => Self::parse_graph_command(&rest[1..]),
            Some("tree") => Self::parse_ops("tree", &rest[1..], TreeOp::parse)
                .map_or(Command::Help, |ops| Command::Tree { ops }),
            Some("heap") => Self::parse_ops("heap", &rest[1..], HeapOp::parse)
                .map_or(Command::Help, |ops| Command::Heap { ops }),
            Some("hash") => Self::parse_hash_command(&rest[1..]),
            Some("list") => Self::parse_ops("list", &rest[1..], ListOp::parse)
                .map_or(Command::Help, |ops| Command::List { ops }),
            Some("stack") => Self::parse_ops("stack", &rest[1..], StackOp::parse)
                .map_or(Command::Help, |ops| Command::Stack { ops }),
            Some("queue") => Self::parse_ops("queue", &rest[1..], QueueOp::parse)
                .map_or(Command::Help, |ops| Command::Queue { ops }),
            Some("check-config") => match rest.get(1) {
                Some(path) => Command::CheckConfig {
                    path: PathBuf::from(path),
                },
                None => {
                    eprintln!("Error: 'check-config' command requires a file path");
                    Command::Help
                }
            },
            Some(unknown) => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self {
            command,
            json,
            config,
        }
    }

    /// Parse `sort <algorithm> [values...]`.
    fn parse_sort_command(args: &[String]) -> Command {
        let Some(name) = args.first() else {
            eprintln!("Error: 'sort' command requires an algorithm (bubble, quick, merge)");
            return Command::Help;
        };
        let Some(algorithm) = SortAlgorithm::from_name(name) else {
            eprintln!("Error: unknown sorting algorithm '{name}'");
            return Command::Help;
        };
        let input = (args.len() > 1).then(|| args[1..].join(","));
        Command::Sort { algorithm, input }
    }

    /// Parse `graph <bfs|dfs> [start]`.
    fn parse_graph_command(args: &[String]) -> Command {
        let Some(name) = args.first() else {
            eprintln!("Error: 'graph' command requires an algorithm (bfs, dfs)");
            return Command::Help;
        };
        let Some(algorithm) = GraphAlgorithm::from_name(name) else {
            eprintln!("Error: unknown graph algorithm '{name}'");
            return Command::Help;
        };
        Command::Graph {
            algorithm,
            start: args.get(1).cloned(),
        }
    }

    /// Parse `hash [--strategy S] [--hash H] [--size N] <ops...>`.
    fn parse_hash_command(args: &[String]) -> Command {
        let mut strategy = None;
        let mut function = None;
        let mut size = None;
        let mut tokens = Vec::new();

        let mut i = 0;
        while i < args.len() {
            let value = args.get(i + 1).map(String::as_str);
            match (args[i].as_str(), value) {
                ("--strategy", Some(v)) => {
                    strategy = CollisionStrategy::from_name(v);
                    if strategy.is_none() {
                        eprintln!("Error: unknown collision strategy '{v}'");
                        return Command::Help;
                    }
                    i += 2;
                }
                ("--hash", Some(v)) => {
                    function = HashFunction::from_name(v);
                    if function.is_none() {
                        eprintln!("Error: unknown hash function '{v}'");
                        return Command::Help;
                    }
                    i += 2;
                }
                ("--size", Some(v)) => {
                    size = v
                        .parse()
                        .ok()
                        .filter(|n: &usize| (1..=MAX_HASH_SIZE).contains(n));
                    if size.is_none() {
                        eprintln!("Error: table size must be 1 to {MAX_HASH_SIZE}, got '{v}'");
                        return Command::Help;
                    }
                    i += 2;
                }
                (other, _) => {
                    tokens.push(other.to_string());
                    i += 1;
                }
            }
        }

        Self::parse_ops("hash", &tokens, HashOp::parse).map_or(Command::Help, |ops| {
            Command::Hash {
                strategy,
                function,
                size,
                ops,
            }
        })
    }

    /// Parse every token with `parse`, reporting the first failure.
    fn parse_ops<T>(
        command: &str,
        tokens: &[String],
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<Vec<T>> {
        let mut ops = Vec::with_capacity(tokens.len());
        for token in tokens {
            match parse(token) {
                Some(op) => ops.push(op),
                None => {
                    eprintln!("Error: invalid {command} operation '{token}'");
                    return None;
                }
            }
        }
        Some(ops)
    }
}
