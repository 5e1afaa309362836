//! # algoviz
//!
//! Step-log replay engine for classic data structure and algorithm
//! visualizations.
//!
//! Every visualizer follows the same three-stage pipeline:
//! - **Step generation**: a pure function runs the algorithm on a copy of
//!   its input and records a [`StepLog`](engine::StepLog) of snapshots
//! - **Replay**: a [`ReplayController`](replay::ReplayController) moves a
//!   cursor through the log on ticks or explicit user steps
//! - **Rendering**: a [`Renderer`](render::Renderer) maps one snapshot to
//!   output and never mutates it
//!
//! ## Example
//!
//! ```rust
//! use algoviz::prelude::*;
//!
//! let log = sorting::generate_steps(SortAlgorithm::Bubble, &[3, 1, 2]);
//! assert_eq!(log.last().values, vec![1, 2, 3]);
//!
//! let mut replay = ReplayController::new(log, 100.0);
//! replay.toggle_play();
//! assert!(replay.is_playing());
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,
    clippy::needless_range_loop,   // Index loops mirror the textbook algorithms
)]

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod render;
pub mod replay;
pub mod structures;

#[cfg(feature = "tui")]
pub mod tui;

pub mod cli;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{VizConfig, VizConfigBuilder};
    pub use crate::engine::{Highlight, StepLog, StepLogBuilder, StepTimer, TickScheduler};
    pub use crate::error::{VizError, VizResult};
    pub use crate::render::{Renderer, TextRenderer};
    pub use crate::replay::{PlaybackState, ReplayController};
    pub use crate::structures::graph::{self, Graph, GraphAlgorithm};
    pub use crate::structures::hash_table::{self, CollisionStrategy, HashFunction, HashTable};
    pub use crate::structures::heap::{self, Heap, HeapKind};
    pub use crate::structures::linked_list::{self, LinkedList};
    pub use crate::structures::sorting::{self, SortAlgorithm};
    pub use crate::structures::stack_queue::{self, Queue, Stack};
    pub use crate::structures::tree::{self, Bst, TraversalOrder};
}

/// Re-export for public API
pub use error::{VizError, VizResult};
