//! Configuration with YAML schema and validation.
//!
//! Loading runs three gates in order:
//! - serde rejects unknown fields and wrong types
//! - `validator` checks field ranges
//! - a semantic pass checks cross-field constraints
//!
//! `VizConfig::default()` is exactly the state every visualizer seeds
//! itself with on first load.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::error::{VizError, VizResult};
use crate::structures::graph::{Graph, GraphAlgorithm, GraphEdge, GraphNode, TRAVERSAL_STEP_MS};
use crate::structures::hash_table::{CollisionStrategy, HashFunction, HashTable, DEFAULT_SIZE};
use crate::structures::heap::{self, Heap, HeapKind};
use crate::structures::linked_list::{self, LinkedList};
use crate::structures::sorting::{SortAlgorithm, DEFAULT_INPUT};
use crate::structures::stack_queue::{self, Queue, Stack};
use crate::structures::tree::{self, Bst};
use crate::structures::CanvasLayout;

/// Largest hash table the configuration accepts.
pub const MAX_HASH_SIZE: usize = 100;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct VizConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Playback settings.
    #[validate(nested)]
    #[serde(default)]
    pub replay: ReplayConfig,

    /// Array tab.
    #[serde(default)]
    pub sorting: SortingConfig,

    /// Graph tab.
    #[validate(nested)]
    #[serde(default)]
    pub graph: GraphConfig,

    /// Tree tab.
    #[serde(default)]
    pub tree: TreeConfig,

    /// Heap tab.
    #[serde(default)]
    pub heap: HeapConfig,

    /// Hash table tab.
    #[validate(nested)]
    #[serde(default)]
    pub hash_table: HashTableConfig,

    /// Linked list tab.
    #[serde(default)]
    pub linked_list: LinkedListConfig,

    /// Stack and queue tab.
    #[serde(default)]
    pub stack_queue: StackQueueConfig,

    /// Transient highlight settings.
    #[validate(nested)]
    #[serde(default)]
    pub highlight: HighlightConfig,

    /// Canvas geometry for tree-shaped layouts.
    #[serde(default)]
    pub layout: CanvasLayout,

    /// Terminal front end.
    #[validate(nested)]
    #[serde(default)]
    pub tui: TuiConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            replay: ReplayConfig::default(),
            sorting: SortingConfig::default(),
            graph: GraphConfig::default(),
            tree: TreeConfig::default(),
            heap: HeapConfig::default(),
            hash_table: HashTableConfig::default(),
            linked_list: LinkedListConfig::default(),
            stack_queue: StackQueueConfig::default(),
            highlight: HighlightConfig::default(),
            layout: CanvasLayout::default(),
            tui: TuiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl VizConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> VizResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> VizResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        config.validate_semantic()?;
        Ok(config)
    }

    /// Serialize back to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> VizResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> VizConfigBuilder {
        VizConfigBuilder::default()
    }

    /// Check constraints that span fields.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error naming the first violated constraint.
    pub fn validate_semantic(&self) -> VizResult<()> {
        let mut ids = HashSet::new();
        for node in &self.graph.nodes {
            if node.id.trim().is_empty() {
                return Err(VizError::config("Graph node ids must not be empty"));
            }
            if !ids.insert(node.id.as_str()) {
                return Err(VizError::config(format!(
                    "Graph node {} is declared twice",
                    node.id
                )));
            }
        }
        for edge in &self.graph.edges {
            for end in [&edge.source, &edge.target] {
                if !ids.contains(end.as_str()) {
                    return Err(VizError::config(format!(
                        "Graph edge {}-{} references unknown node {end}",
                        edge.source, edge.target
                    )));
                }
            }
            if edge.source == edge.target {
                return Err(VizError::config(format!(
                    "Graph edge {0}-{0} is a self-loop",
                    edge.source
                )));
            }
        }
        if let Some(start) = &self.graph.start {
            if !ids.contains(start.as_str()) {
                return Err(VizError::config(format!(
                    "Graph start node {start} is not declared"
                )));
            }
        }

        let mut seen = HashSet::new();
        if let Some(dup) = self.tree.values.iter().find(|v| !seen.insert(**v)) {
            return Err(VizError::config(format!(
                "Tree seed value {dup} appears more than once"
            )));
        }

        let layout = &self.layout;
        if layout.width <= 0.0 || layout.height <= 0.0 || layout.level_height <= 0.0 {
            return Err(VizError::config("Layout dimensions must be positive"));
        }

        Ok(())
    }

    /// Graph built from the `graph` section.
    #[must_use]
    pub fn build_graph(&self) -> Graph {
        Graph::from_parts(self.graph.nodes.clone(), self.graph.edges.clone())
    }

    /// Tree built by inserting the seed values in order.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateValue` if the seed repeats a value.
    pub fn build_tree(&self) -> VizResult<Bst> {
        Bst::from_values(&self.tree.values, self.layout)
    }

    /// Heap built bottom-up from the seed values.
    #[must_use]
    pub fn build_heap(&self) -> Heap {
        Heap::from_values(self.heap.kind, &self.heap.values, self.layout)
    }

    /// Empty hash table with the configured shape.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNumber` for a zero size.
    pub fn build_hash_table(&self) -> VizResult<HashTable> {
        HashTable::new(
            self.hash_table.size,
            self.hash_table.strategy,
            self.hash_table.function,
        )
    }

    /// Seeded linked list.
    #[must_use]
    pub fn build_linked_list(&self) -> LinkedList {
        LinkedList::from_values(&self.linked_list.values)
    }

    /// Seeded stack.
    #[must_use]
    pub fn build_stack(&self) -> Stack {
        Stack::from_values(&self.stack_queue.stack)
    }

    /// Seeded queue.
    #[must_use]
    pub fn build_queue(&self) -> Queue {
        Queue::from_values(&self.stack_queue.queue)
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct VizConfigBuilder {
    speed: Option<f64>,
    sort_input: Option<String>,
    sort_algorithm: Option<SortAlgorithm>,
    graph_algorithm: Option<GraphAlgorithm>,
    graph_start: Option<String>,
    heap_kind: Option<HeapKind>,
    hash_table_size: Option<usize>,
    collision_strategy: Option<CollisionStrategy>,
    hash_function: Option<HashFunction>,
    clear_after_ms: Option<u64>,
}

impl VizConfigBuilder {
    /// Set the playback speed (0 to 100).
    #[must_use]
    pub const fn speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Set the array input text.
    #[must_use]
    pub fn sort_input(mut self, input: impl Into<String>) -> Self {
        self.sort_input = Some(input.into());
        self
    }

    /// Set the sorting algorithm.
    #[must_use]
    pub const fn sort_algorithm(mut self, algorithm: SortAlgorithm) -> Self {
        self.sort_algorithm = Some(algorithm);
        self
    }

    /// Set the graph traversal.
    #[must_use]
    pub const fn graph_algorithm(mut self, algorithm: GraphAlgorithm) -> Self {
        self.graph_algorithm = Some(algorithm);
        self
    }

    /// Set the graph start node.
    #[must_use]
    pub fn graph_start(mut self, start: impl Into<String>) -> Self {
        self.graph_start = Some(start.into());
        self
    }

    /// Set the heap ordering.
    #[must_use]
    pub const fn heap_kind(mut self, kind: HeapKind) -> Self {
        self.heap_kind = Some(kind);
        self
    }

    /// Set the hash table size.
    #[must_use]
    pub const fn hash_table_size(mut self, size: usize) -> Self {
        self.hash_table_size = Some(size);
        self
    }

    /// Set the collision strategy.
    #[must_use]
    pub const fn collision_strategy(mut self, strategy: CollisionStrategy) -> Self {
        self.collision_strategy = Some(strategy);
        self
    }

    /// Set the hash function.
    #[must_use]
    pub const fn hash_function(mut self, function: HashFunction) -> Self {
        self.hash_function = Some(function);
        self
    }

    /// Set how long transient highlights stay up.
    #[must_use]
    pub const fn clear_after_ms(mut self, ms: u64) -> Self {
        self.clear_after_ms = Some(ms);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> VizConfig {
        let mut config = VizConfig::default();

        if let Some(speed) = self.speed {
            config.replay.speed = speed;
        }
        if let Some(input) = self.sort_input {
            config.sorting.input = input;
        }
        if let Some(algorithm) = self.sort_algorithm {
            config.sorting.algorithm = algorithm;
        }
        if let Some(algorithm) = self.graph_algorithm {
            config.graph.algorithm = algorithm;
        }
        if let Some(start) = self.graph_start {
            config.graph.start = Some(start);
        }
        if let Some(kind) = self.heap_kind {
            config.heap.kind = kind;
        }
        if let Some(size) = self.hash_table_size {
            config.hash_table.size = size;
        }
        if let Some(strategy) = self.collision_strategy {
            config.hash_table.strategy = strategy;
        }
        if let Some(function) = self.hash_function {
            config.hash_table.function = function;
        }
        if let Some(ms) = self.clear_after_ms {
            config.highlight.clear_after_ms = ms;
        }

        config
    }
}

/// Playback settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ReplayConfig {
    /// Speed slider position; step interval is `1000 - 9 * speed` ms.
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default = "default_speed")]
    pub speed: f64,
}

const fn default_speed() -> f64 {
    50.0
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
        }
    }
}

/// Array tab settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingConfig {
    /// Comma-separated input text.
    #[serde(default = "default_sort_input")]
    pub input: String,
    /// Algorithm selected on load.
    #[serde(default)]
    pub algorithm: SortAlgorithm,
}

fn default_sort_input() -> String {
    DEFAULT_INPUT.to_string()
}

impl Default for SortingConfig {
    fn default() -> Self {
        Self {
            input: default_sort_input(),
            algorithm: SortAlgorithm::default(),
        }
    }
}

/// Graph tab settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GraphConfig {
    /// Positioned nodes, in declaration order.
    #[serde(default = "default_graph_nodes")]
    pub nodes: Vec<GraphNode>,
    /// Undirected edges, in insertion order.
    #[serde(default = "default_graph_edges")]
    pub edges: Vec<GraphEdge>,
    /// Node a traversal starts from; none until the user picks one.
    #[serde(default)]
    pub start: Option<String>,
    /// Traversal selected on load.
    #[serde(default)]
    pub algorithm: GraphAlgorithm,
    /// Interval between traversal steps.
    #[validate(range(min = 1, max = 60_000))]
    #[serde(default = "default_graph_step_ms")]
    pub step_ms: u64,
}

fn default_graph_nodes() -> Vec<GraphNode> {
    Graph::example().nodes().to_vec()
}

fn default_graph_edges() -> Vec<GraphEdge> {
    Graph::example().edges().to_vec()
}

const fn default_graph_step_ms() -> u64 {
    TRAVERSAL_STEP_MS
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            nodes: default_graph_nodes(),
            edges: default_graph_edges(),
            start: None,
            algorithm: GraphAlgorithm::default(),
            step_ms: default_graph_step_ms(),
        }
    }
}

/// Tree tab settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Values inserted in order on load.
    #[serde(default = "default_tree_values")]
    pub values: Vec<i64>,
}

fn default_tree_values() -> Vec<i64> {
    tree::DEFAULT_VALUES.to_vec()
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            values: default_tree_values(),
        }
    }
}

/// Heap tab settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapConfig {
    /// Ordering on load.
    #[serde(default)]
    pub kind: HeapKind,
    /// Seed values, heapified bottom-up.
    #[serde(default = "default_heap_values")]
    pub values: Vec<i64>,
}

fn default_heap_values() -> Vec<i64> {
    heap::DEFAULT_VALUES.to_vec()
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            kind: HeapKind::default(),
            values: default_heap_values(),
        }
    }
}

/// Hash table tab settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct HashTableConfig {
    /// Number of slots.
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_hash_size")]
    pub size: usize,
    /// Collision strategy.
    #[serde(default)]
    pub strategy: CollisionStrategy,
    /// Hash function.
    #[serde(default)]
    pub function: HashFunction,
}

const fn default_hash_size() -> usize {
    DEFAULT_SIZE
}

impl Default for HashTableConfig {
    fn default() -> Self {
        Self {
            size: default_hash_size(),
            strategy: CollisionStrategy::default(),
            function: HashFunction::default(),
        }
    }
}

/// Linked list tab settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedListConfig {
    /// Values head first.
    #[serde(default = "default_list_values")]
    pub values: Vec<i64>,
}

fn default_list_values() -> Vec<i64> {
    linked_list::DEFAULT_VALUES.to_vec()
}

impl Default for LinkedListConfig {
    fn default() -> Self {
        Self {
            values: default_list_values(),
        }
    }
}

/// Stack and queue tab settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackQueueConfig {
    /// Stack contents, top first.
    #[serde(default = "default_stack")]
    pub stack: Vec<i64>,
    /// Queue contents, front first.
    #[serde(default = "default_queue")]
    pub queue: Vec<i64>,
}

fn default_stack() -> Vec<i64> {
    stack_queue::DEFAULT_STACK.to_vec()
}

fn default_queue() -> Vec<i64> {
    stack_queue::DEFAULT_QUEUE.to_vec()
}

impl Default for StackQueueConfig {
    fn default() -> Self {
        Self {
            stack: default_stack(),
            queue: default_queue(),
        }
    }
}

/// Transient highlight settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct HighlightConfig {
    /// Delay before a finished animation's highlights are cleared.
    #[validate(range(min = 1, max = 60_000))]
    #[serde(default = "default_clear_after_ms")]
    pub clear_after_ms: u64,
}

const fn default_clear_after_ms() -> u64 {
    2000
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            clear_after_ms: default_clear_after_ms(),
        }
    }
}

/// Terminal front end settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TuiConfig {
    /// Event poll interval.
    #[validate(range(min = 10, max = 1000))]
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

const fn default_tick_ms() -> u64 {
    50
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Write logs to this file instead of stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            file: None,
        }
    }
}
