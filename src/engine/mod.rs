//! Step-log engine shared by every visualizer.
//!
//! A run of an algorithm is captured once, up front, as an ordered
//! [`StepLog`] of self-contained snapshots. Replay code only ever moves a
//! cursor through that log, so rendering can never feed back into the
//! algorithm and any cursor position can be re-rendered at will.
//!
//! - [`clock`]: converts the speed slider into a step interval
//! - [`scheduler`]: cancellable timed events (highlight expiry)
//! - [`guard`]: structural invariant checks run after operations

pub mod clock;
pub mod guard;
pub mod scheduler;

use serde::{Deserialize, Serialize};

pub use clock::{step_duration_ms, StepTimer};
pub use scheduler::{TickHandle, TickScheduler};

/// Transient visual marker attached to one element of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    /// Element takes part in a comparison.
    Comparing,
    /// Element is being swapped or written.
    Swapping,
    /// Element is being processed right now.
    Active,
    /// Element was just inserted.
    New,
    /// Element is about to be removed.
    Removed,
    /// Element matched a search.
    Search,
    /// Element has been fully processed.
    Visited,
    /// Element lies on a highlighted path.
    Path,
    /// Element is the root of a tree-shaped structure.
    Root,
    /// Slot was occupied when probed.
    Collision,
    /// Node was just reached by a traversal.
    Current,
}

impl Highlight {
    /// Lowercase tag, as used in text output.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Comparing => "comparing",
            Self::Swapping => "swapping",
            Self::Active => "active",
            Self::New => "new",
            Self::Removed => "removed",
            Self::Search => "search",
            Self::Visited => "visited",
            Self::Path => "path",
            Self::Root => "root",
            Self::Collision => "collision",
            Self::Current => "current",
        }
    }
}

/// Ordered, immutable, non-empty sequence of snapshots from one run.
///
/// Index 0 is always the state before the algorithm touched anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StepLog<S> {
    steps: Vec<S>,
}

impl<S> StepLog<S> {
    /// Log holding only the initial snapshot.
    #[must_use]
    pub fn single(initial: S) -> Self {
        Self {
            steps: vec![initial],
        }
    }

    /// Start recording a log from its initial snapshot.
    #[must_use]
    pub fn builder(initial: S) -> StepLogBuilder<S> {
        StepLogBuilder::new(initial)
    }

    /// Number of steps (always at least 1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// A step log is never empty; provided for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the final snapshot.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    /// Snapshot at `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&S> {
        self.steps.get(index)
    }

    /// Initial snapshot.
    #[must_use]
    pub fn first(&self) -> &S {
        &self.steps[0]
    }

    /// Final snapshot.
    #[must_use]
    pub fn last(&self) -> &S {
        &self.steps[self.steps.len() - 1]
    }

    /// All snapshots in generation order.
    #[must_use]
    pub fn steps(&self) -> &[S] {
        &self.steps
    }

    /// Iterate snapshots in generation order.
    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.steps.iter()
    }
}

impl<'a, S> IntoIterator for &'a StepLog<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Append-only recorder used by step generators.
#[derive(Debug, Clone)]
pub struct StepLogBuilder<S> {
    steps: Vec<S>,
}

impl<S> StepLogBuilder<S> {
    /// Create a recorder seeded with the initial snapshot.
    #[must_use]
    pub fn new(initial: S) -> Self {
        Self {
            steps: vec![initial],
        }
    }

    /// Record one more snapshot.
    pub fn push(&mut self, snapshot: S) {
        self.steps.push(snapshot);
    }

    /// Number of snapshots recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false: the initial snapshot is recorded on construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Most recently recorded snapshot.
    #[must_use]
    pub fn last(&self) -> &S {
        &self.steps[self.steps.len() - 1]
    }

    /// Freeze the recording.
    #[must_use]
    pub fn finish(self) -> StepLog<S> {
        StepLog { steps: self.steps }
    }
}
