//! Data structure visualizers.
//!
//! Each module owns one primary structure plus the step generators for
//! its operations:
//! - Sorting: bubble, quick and merge sort over an integer array
//! - Graph: BFS/DFS over an undirected graph
//! - Tree: binary search tree insert, remove, search, traversals
//! - Heap: binary max/min heap over a dense array
//! - Hash table: open addressing and chaining, three hash functions
//! - Linked list, stack and queue
//!
//! Mutating operations never touch `self`; they return the next state
//! together with the step log that animates the transition.

pub mod graph;
pub mod hash_table;
pub mod heap;
pub mod linked_list;
pub mod sorting;
pub mod stack_queue;
pub mod tree;

use serde::{Deserialize, Serialize};

pub use graph::{Graph, GraphAlgorithm, GraphSnapshot, GraphVisualizer};
pub use hash_table::{CollisionStrategy, HashFunction, HashSnapshot, HashTable};
pub use heap::{Heap, HeapKind, HeapSnapshot};
pub use linked_list::{LinkedList, ListSnapshot};
pub use sorting::{ArraySnapshot, ArrayVisualizer, SortAlgorithm};
pub use stack_queue::{Queue, SequenceSnapshot, Stack};
pub use tree::{Bst, TraversalOrder, TreeSnapshot};

/// Canvas geometry used to place tree-shaped structures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasLayout {
    /// Canvas width.
    pub width: f64,
    /// Canvas height.
    pub height: f64,
    /// Vertical distance between tree levels.
    pub level_height: f64,
}

impl Default for CanvasLayout {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            level_height: 80.0,
        }
    }
}

/// Result of a mutating operation: the next state plus its animation.
#[derive(Debug, Clone)]
pub struct Change<T, S> {
    /// State after the operation.
    pub next: T,
    /// Steps animating the transition.
    pub log: crate::engine::StepLog<S>,
    /// Confirmation message for the user.
    pub message: String,
}
