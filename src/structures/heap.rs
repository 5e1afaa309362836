//! Binary heap over a dense array.
//!
//! The tree is implicit: node `i` has parent `(i - 1) / 2` and children
//! `2i + 1`, `2i + 2`. Every sift swap is recorded as its own step with
//! the moving element marked `active`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CanvasLayout, Change};
use crate::engine::{guard, Highlight, StepLog, StepLogBuilder};
use crate::error::{VizError, VizResult};

/// Values the heap is seeded with on first load.
pub const DEFAULT_VALUES: [i64; 7] = [100, 80, 70, 50, 60, 30, 20];

/// Heap ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeapKind {
    /// Parent ≥ children.
    #[default]
    Max,
    /// Parent ≤ children.
    Min,
}

impl HeapKind {
    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Max => "max",
            Self::Min => "min",
        }
    }

    /// The other ordering.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Max => Self::Min,
            Self::Min => Self::Max,
        }
    }

    /// True if `parent` may sit above `child`.
    #[must_use]
    pub const fn in_order(self, parent: i64, child: i64) -> bool {
        match self {
            Self::Max => parent >= child,
            Self::Min => parent <= child,
        }
    }

    /// Parse `max` / `min`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "max" => Some(Self::Max),
            "min" => Some(Self::Min),
            _ => None,
        }
    }
}

/// Parent index.
#[must_use]
pub const fn parent(i: usize) -> usize {
    (i - 1) / 2
}

/// Left child index.
#[must_use]
pub const fn left(i: usize) -> usize {
    2 * i + 1
}

/// Right child index.
#[must_use]
pub const fn right(i: usize) -> usize {
    2 * i + 2
}

/// One heap node as drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeapNodeView {
    /// Stored value.
    pub value: i64,
    /// Highlight tag, if any.
    pub highlight: Option<Highlight>,
    /// Canvas x.
    pub x: f64,
    /// Canvas y.
    pub y: f64,
}

/// Heap array at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeapSnapshot {
    /// Ordering in force.
    pub kind: HeapKind,
    /// Nodes in array order.
    pub nodes: Vec<HeapNodeView>,
}

impl HeapSnapshot {
    /// Plain values in array order.
    #[must_use]
    pub fn values(&self) -> Vec<i64> {
        self.nodes.iter().map(|n| n.value).collect()
    }

    /// Indices carrying `highlight`.
    #[must_use]
    pub fn indices_with(&self, highlight: Highlight) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.highlight == Some(highlight))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Binary heap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heap {
    kind: HeapKind,
    values: Vec<i64>,
    #[serde(default)]
    layout: CanvasLayout,
}

impl Default for Heap {
    fn default() -> Self {
        Self::example()
    }
}

impl Heap {
    /// Heap of `kind` built bottom-up from `values`.
    #[must_use]
    pub fn from_values(kind: HeapKind, values: &[i64], layout: CanvasLayout) -> Self {
        let mut heap = Self {
            kind,
            values: values.to_vec(),
            layout,
        };
        heap.rebuild(None);
        heap
    }

    /// The seeded max heap.
    #[must_use]
    pub fn example() -> Self {
        Self {
            kind: HeapKind::Max,
            values: DEFAULT_VALUES.to_vec(),
            layout: CanvasLayout::default(),
        }
    }

    /// Empty heap of `kind`.
    #[must_use]
    pub fn empty(kind: HeapKind, layout: CanvasLayout) -> Self {
        Self {
            kind,
            values: Vec::new(),
            layout,
        }
    }

    /// Ordering in force.
    #[must_use]
    pub const fn kind(&self) -> HeapKind {
        self.kind
    }

    /// Values in array order.
    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Root value.
    #[must_use]
    pub fn peek(&self) -> Option<i64> {
        self.values.first().copied()
    }

    /// True if every parent is in order with its children.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check the heap property.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` naming the first bad pair.
    pub fn validate(&self) -> VizResult<()> {
        let kind = self.kind;
        guard::check_implicit_heap(&self.values, |&p, &c| kind.in_order(p, c))
    }

    /// Canvas position of index `i` among `n` elements.
    fn position(&self, i: usize) -> (f64, f64) {
        let level = (usize::BITS - 1 - (i + 1).leading_zeros()) as usize;
        let in_level = (1usize << level) as f64;
        let offset = (i + 1 - (1usize << level)) as f64;
        let width = self.layout.width;
        let x = (offset - in_level / 2.0 + 0.5).mul_add(width / (in_level + 1.0), width / 2.0);
        let y = (level as f64 + 1.0) * self.layout.level_height;
        (x, y)
    }

    /// Lay out the array and tag nodes.
    #[must_use]
    pub fn snapshot(&self, highlight: impl Fn(usize) -> Option<Highlight>) -> HeapSnapshot {
        HeapSnapshot {
            kind: self.kind,
            nodes: self
                .values
                .iter()
                .enumerate()
                .map(|(i, &value)| {
                    let (x, y) = self.position(i);
                    HeapNodeView {
                        value,
                        highlight: highlight(i),
                        x,
                        y,
                    }
                })
                .collect(),
        }
    }

    /// Snapshot with only the root marked.
    #[must_use]
    pub fn settled_snapshot(&self) -> HeapSnapshot {
        self.snapshot(|i| (i == 0).then_some(Highlight::Root))
    }

    /// Append `value` and sift it up.
    #[must_use]
    pub fn insert(&self, value: i64) -> Change<Self, HeapSnapshot> {
        let mut next = self.clone();
        let mut steps = StepLog::builder(self.settled_snapshot());
        next.values.push(value);
        let mut i = next.values.len() - 1;
        steps.push(next.snapshot(|n| (n == i).then_some(Highlight::New)));

        while i > 0 && !next.kind.in_order(next.values[parent(i)], next.values[i]) {
            next.values.swap(i, parent(i));
            i = parent(i);
            steps.push(next.snapshot(|n| (n == i).then_some(Highlight::Active)));
        }

        debug!(value, kind = next.kind.name(), len = next.len(), "heap insert");
        Change {
            next,
            log: steps.finish(),
            message: format!("Inserted {value}"),
        }
    }

    /// Remove the root: move the last element up and sift it down.
    ///
    /// # Errors
    ///
    /// `EmptyStructure` on an empty heap.
    pub fn extract(&self) -> VizResult<Change<Self, HeapSnapshot>> {
        let Some(root) = self.peek() else {
            return Err(VizError::EmptyStructure("Heap"));
        };
        let mut steps = StepLog::builder(self.settled_snapshot());
        steps.push(self.snapshot(|n| (n == 0).then_some(Highlight::Removed)));

        let mut next = self.clone();
        let last = next.values.len() - 1;
        next.values.swap(0, last);
        next.values.pop();
        if next.values.is_empty() {
            steps.push(next.snapshot(|_| None));
        } else {
            steps.push(next.snapshot(|n| (n == 0).then_some(Highlight::Active)));
            next.sift_down(0, Some(&mut steps));
        }

        debug!(root, kind = next.kind.name(), len = next.len(), "heap extract");
        Ok(Change {
            next,
            log: steps.finish(),
            message: format!("Extracted {root}"),
        })
    }

    /// Switch between max and min ordering and re-heapify bottom-up.
    #[must_use]
    pub fn toggle_kind(&self) -> Change<Self, HeapSnapshot> {
        let mut next = self.clone();
        next.kind = self.kind.toggled();
        let mut steps = StepLog::builder(self.settled_snapshot());
        next.rebuild(Some(&mut steps));
        steps.push(next.settled_snapshot());
        Change {
            message: format!("Switched to {} heap", next.kind.name()),
            next,
            log: steps.finish(),
        }
    }

    /// Floyd's bottom-up heap construction.
    fn rebuild(&mut self, mut steps: Option<&mut StepLogBuilder<HeapSnapshot>>) {
        for i in (0..self.values.len() / 2).rev() {
            self.sift_down(i, steps.as_deref_mut());
        }
    }

    fn sift_down(&mut self, mut i: usize, mut steps: Option<&mut StepLogBuilder<HeapSnapshot>>) {
        let n = self.values.len();
        loop {
            let mut pick = i;
            for child in [left(i), right(i)] {
                if child < n && !self.kind.in_order(self.values[pick], self.values[child]) {
                    pick = child;
                }
            }
            if pick == i {
                return;
            }
            self.values.swap(i, pick);
            i = pick;
            if let Some(steps) = steps.as_deref_mut() {
                steps.push(self.snapshot(|k| (k == i).then_some(Highlight::Active)));
            }
        }
    }
}
