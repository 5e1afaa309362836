//! Singly linked list on an index arena.
//!
//! Same copy-on-write discipline as the tree: operations return the next
//! list in a [`Change`] and leave the receiver alone. Inserts append the
//! node to the arena and splice it in through `next` links, so arena order
//! and list order drift apart. Removals unlink the node and then compact the
//! arena in list order so no slot is ever dead.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Change;
use crate::engine::{Highlight, StepLog, StepLogBuilder};
use crate::error::{VizError, VizResult};

/// Values the list is seeded with on first load.
pub const DEFAULT_VALUES: [i64; 4] = [10, 20, 30, 40];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ListNode {
    value: i64,
    next: Option<usize>,
}

/// One node as drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListNodeView {
    /// Stored value.
    pub value: i64,
    /// Highlight tag, if any.
    pub highlight: Option<Highlight>,
}

/// List contents in head-to-tail order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListSnapshot {
    /// Nodes from head to tail.
    pub nodes: Vec<ListNodeView>,
}

impl ListSnapshot {
    /// Positions carrying `highlight`.
    #[must_use]
    pub fn positions_with(&self, highlight: Highlight) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.highlight == Some(highlight))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Outcome of a search.
#[derive(Debug, Clone)]
pub struct ListSearch {
    /// One step per visited node.
    pub log: StepLog<ListSnapshot>,
    /// Position of the first match.
    pub position: Option<usize>,
    /// "Found N at position P" or "Value N not found".
    pub message: String,
}

/// Parse the position field of a positional insert.
///
/// # Errors
///
/// `InvalidPosition` for non-numeric or negative input.
pub fn parse_position(input: &str) -> VizResult<usize> {
    super::sorting::parse_int_prefix(input)
        .and_then(|p| usize::try_from(p).ok())
        .ok_or(VizError::InvalidPosition)
}

/// Singly linked list of integers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LinkedList {
    nodes: Vec<ListNode>,
    head: Option<usize>,
}

impl LinkedList {
    /// List holding `values` head first.
    #[must_use]
    pub fn from_values(values: &[i64]) -> Self {
        let nodes = values
            .iter()
            .enumerate()
            .map(|(i, &value)| ListNode {
                value,
                next: (i + 1 < values.len()).then_some(i + 1),
            })
            .collect();
        Self {
            nodes,
            head: (!values.is_empty()).then_some(0),
        }
    }

    /// The seeded list 10 → 20 → 30 → 40.
    #[must_use]
    pub fn example() -> Self {
        Self::from_values(&DEFAULT_VALUES)
    }

    /// Arena indices from head to tail.
    fn order(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut cursor = self.head;
        while let Some(id) = cursor {
            out.push(id);
            cursor = self.nodes[id].next;
        }
        out
    }

    /// Values from head to tail.
    #[must_use]
    pub fn values(&self) -> Vec<i64> {
        self.order().into_iter().map(|id| self.nodes[id].value).collect()
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Draw the list, tagging by position.
    #[must_use]
    pub fn snapshot(&self, highlight: impl Fn(usize) -> Option<Highlight>) -> ListSnapshot {
        ListSnapshot {
            nodes: self
                .order()
                .into_iter()
                .enumerate()
                .map(|(pos, id)| ListNodeView {
                    value: self.nodes[id].value,
                    highlight: highlight(pos),
                })
                .collect(),
        }
    }

    /// Snapshot with no highlights.
    #[must_use]
    pub fn plain_snapshot(&self) -> ListSnapshot {
        self.snapshot(|_| None)
    }

    fn mark(&self, steps: &mut StepLogBuilder<ListSnapshot>, position: usize, highlight: Highlight) {
        steps.push(self.snapshot(|p| (p == position).then_some(highlight)));
    }

    /// Arena index of the node at `position`.
    fn node_at(&self, position: usize) -> Option<usize> {
        let mut cursor = self.head;
        for _ in 0..position {
            cursor = self.nodes[cursor?].next;
        }
        cursor
    }

    /// Insert `value` so it ends up at `position`, clamped to the length.
    fn spliced(&self, value: i64, position: usize) -> Self {
        let mut next = self.clone();
        let id = next.nodes.len();
        let successor = match position.checked_sub(1).and_then(|p| self.node_at(p)) {
            Some(prev) => next.nodes[prev].next.replace(id),
            None if position == 0 || self.is_empty() => next.head.replace(id),
            // Past the tail: link after the last node.
            None => {
                let tail = self.node_at(self.len() - 1);
                tail.and_then(|t| next.nodes[t].next.replace(id))
            }
        };
        next.nodes.push(ListNode {
            value,
            next: successor,
        });
        next
    }

    /// Unlink the node at `position` (which must exist) and compact.
    fn unlinked(&self, position: usize) -> Self {
        let mut next = self.clone();
        let Some(target) = self.node_at(position) else {
            return next;
        };
        let after = self.nodes[target].next;
        match position.checked_sub(1).and_then(|p| self.node_at(p)) {
            Some(prev) => next.nodes[prev].next = after,
            None => next.head = after,
        }
        next.compacted()
    }

    /// Copy of the list with the arena laid out in list order.
    fn compacted(&self) -> Self {
        Self::from_values(&self.values())
    }

    /// Insert at the head.
    #[must_use]
    pub fn push_front(&self, value: i64) -> Change<Self, ListSnapshot> {
        let next = self.spliced(value, 0);
        let mut steps = StepLog::builder(self.plain_snapshot());
        next.mark(&mut steps, 0, Highlight::New);
        Change {
            next,
            log: steps.finish(),
            message: format!("Inserted {value} at the beginning"),
        }
    }

    /// Walk to the tail and append.
    #[must_use]
    pub fn push_back(&self, value: i64) -> Change<Self, ListSnapshot> {
        let len = self.len();
        let mut steps = StepLog::builder(self.plain_snapshot());
        for pos in 0..len {
            self.mark(&mut steps, pos, Highlight::Active);
        }
        let next = self.spliced(value, len);
        next.mark(&mut steps, len, Highlight::New);
        Change {
            next,
            log: steps.finish(),
            message: format!("Inserted {value} at the end"),
        }
    }

    /// Insert at `position`. Positions past the end append; the message
    /// reports where the node actually landed.
    #[must_use]
    pub fn insert_at(&self, value: i64, position: usize) -> Change<Self, ListSnapshot> {
        let landed = position.min(self.len());
        let mut steps = StepLog::builder(self.plain_snapshot());
        for pos in 0..landed {
            self.mark(&mut steps, pos, Highlight::Active);
        }
        let next = self.spliced(value, landed);
        next.mark(&mut steps, landed, Highlight::New);
        debug!(value, requested = position, landed, "list insert");
        Change {
            next,
            log: steps.finish(),
            message: format!("Inserted {value} at position {landed}"),
        }
    }

    /// Remove the head.
    ///
    /// # Errors
    ///
    /// `EmptyStructure` on an empty list.
    pub fn pop_front(&self) -> VizResult<Change<Self, ListSnapshot>> {
        if self.is_empty() {
            return Err(VizError::EmptyStructure("List"));
        }
        let mut steps = StepLog::builder(self.plain_snapshot());
        self.mark(&mut steps, 0, Highlight::Removed);
        let next = self.unlinked(0);
        steps.push(next.plain_snapshot());
        Ok(Change {
            next,
            log: steps.finish(),
            message: "Deleted node from the beginning".to_string(),
        })
    }

    /// Walk to the tail and remove it.
    ///
    /// # Errors
    ///
    /// `EmptyStructure` on an empty list.
    pub fn pop_back(&self) -> VizResult<Change<Self, ListSnapshot>> {
        let Some(last) = self.len().checked_sub(1) else {
            return Err(VizError::EmptyStructure("List"));
        };
        let mut steps = StepLog::builder(self.plain_snapshot());
        for pos in 0..last {
            self.mark(&mut steps, pos, Highlight::Active);
        }
        self.mark(&mut steps, last, Highlight::Removed);
        let next = self.unlinked(last);
        steps.push(next.plain_snapshot());
        let message = if last == 0 {
            "Deleted the only node"
        } else {
            "Deleted node from the end"
        };
        Ok(Change {
            next,
            log: steps.finish(),
            message: message.to_string(),
        })
    }

    /// Visit nodes from the head until `value` is found.
    ///
    /// # Errors
    ///
    /// `EmptyStructure` on an empty list.
    pub fn search(&self, value: i64) -> VizResult<ListSearch> {
        if self.is_empty() {
            return Err(VizError::EmptyStructure("List"));
        }
        let mut steps = StepLog::builder(self.plain_snapshot());
        let mut position = None;
        for (pos, v) in self.values().into_iter().enumerate() {
            self.mark(&mut steps, pos, Highlight::Search);
            if v == value {
                position = Some(pos);
                break;
            }
        }
        let message = match position {
            Some(pos) => format!("Found {value} at position {pos}"),
            None => format!("Value {value} not found"),
        };
        Ok(ListSearch {
            log: steps.finish(),
            position,
            message,
        })
    }
}
