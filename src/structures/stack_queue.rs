//! Stack and queue over a `VecDeque`.
//!
//! Both draw as a row of values. The stack keeps its top at index 0; the
//! queue keeps its front at index 0 and enqueues at the back.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::Change;
use crate::engine::{Highlight, StepLog};
use crate::error::{VizError, VizResult};

/// Stack contents on first load, top first.
pub const DEFAULT_STACK: [i64; 4] = [40, 30, 20, 10];

/// Queue contents on first load, front first.
pub const DEFAULT_QUEUE: [i64; 4] = [10, 20, 30, 40];

/// One value as drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceItem {
    /// Stored value.
    pub value: i64,
    /// Highlight tag, if any.
    pub highlight: Option<Highlight>,
}

/// Row of values at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SequenceSnapshot {
    /// Values from index 0 (top or front).
    pub items: Vec<SequenceItem>,
}

impl SequenceSnapshot {
    fn of(values: &VecDeque<i64>, marked: Option<(usize, Highlight)>) -> Self {
        Self {
            items: values
                .iter()
                .enumerate()
                .map(|(i, &value)| SequenceItem {
                    value,
                    highlight: marked.and_then(|(m, h)| (m == i).then_some(h)),
                })
                .collect(),
        }
    }

    /// Plain values.
    #[must_use]
    pub fn values(&self) -> Vec<i64> {
        self.items.iter().map(|i| i.value).collect()
    }

    /// Index carrying a highlight, if any.
    #[must_use]
    pub fn marked(&self) -> Option<(usize, Highlight)> {
        self.items
            .iter()
            .enumerate()
            .find_map(|(i, item)| item.highlight.map(|h| (i, h)))
    }
}

/// LIFO stack, top at index 0.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stack {
    values: VecDeque<i64>,
}

impl Stack {
    /// Stack holding `values`, top first.
    #[must_use]
    pub fn from_values(values: &[i64]) -> Self {
        Self {
            values: values.iter().copied().collect(),
        }
    }

    /// The seeded stack.
    #[must_use]
    pub fn example() -> Self {
        Self::from_values(&DEFAULT_STACK)
    }

    /// Values, top first.
    #[must_use]
    pub fn values(&self) -> Vec<i64> {
        self.values.iter().copied().collect()
    }

    /// Top value.
    #[must_use]
    pub fn peek(&self) -> Option<i64> {
        self.values.front().copied()
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Snapshot with no highlights.
    #[must_use]
    pub fn plain_snapshot(&self) -> SequenceSnapshot {
        SequenceSnapshot::of(&self.values, None)
    }

    /// Push onto the top.
    #[must_use]
    pub fn push(&self, value: i64) -> Change<Self, SequenceSnapshot> {
        let mut next = self.clone();
        next.values.push_front(value);
        let mut steps = StepLog::builder(self.plain_snapshot());
        steps.push(SequenceSnapshot::of(&next.values, Some((0, Highlight::New))));
        Change {
            next,
            log: steps.finish(),
            message: format!("Pushed {value} to stack"),
        }
    }

    /// Pop the top.
    ///
    /// # Errors
    ///
    /// `EmptyStructure` on an empty stack.
    pub fn pop(&self) -> VizResult<Change<Self, SequenceSnapshot>> {
        let mut next = self.clone();
        let value = next
            .values
            .pop_front()
            .ok_or(VizError::EmptyStructure("Stack"))?;
        let mut steps = StepLog::builder(self.plain_snapshot());
        steps.push(SequenceSnapshot::of(&self.values, Some((0, Highlight::Removed))));
        steps.push(next.plain_snapshot());
        Ok(Change {
            next,
            log: steps.finish(),
            message: format!("Popped {value} from stack"),
        })
    }
}

/// FIFO queue, front at index 0.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Queue {
    values: VecDeque<i64>,
}

impl Queue {
    /// Queue holding `values`, front first.
    #[must_use]
    pub fn from_values(values: &[i64]) -> Self {
        Self {
            values: values.iter().copied().collect(),
        }
    }

    /// The seeded queue.
    #[must_use]
    pub fn example() -> Self {
        Self::from_values(&DEFAULT_QUEUE)
    }

    /// Values, front first.
    #[must_use]
    pub fn values(&self) -> Vec<i64> {
        self.values.iter().copied().collect()
    }

    /// Front value.
    #[must_use]
    pub fn peek(&self) -> Option<i64> {
        self.values.front().copied()
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Snapshot with no highlights.
    #[must_use]
    pub fn plain_snapshot(&self) -> SequenceSnapshot {
        SequenceSnapshot::of(&self.values, None)
    }

    /// Add at the back.
    #[must_use]
    pub fn enqueue(&self, value: i64) -> Change<Self, SequenceSnapshot> {
        let mut next = self.clone();
        next.values.push_back(value);
        let mut steps = StepLog::builder(self.plain_snapshot());
        steps.push(SequenceSnapshot::of(
            &next.values,
            Some((next.values.len() - 1, Highlight::New)),
        ));
        Change {
            next,
            log: steps.finish(),
            message: format!("Enqueued {value}"),
        }
    }

    /// Remove from the front.
    ///
    /// # Errors
    ///
    /// `EmptyStructure` on an empty queue.
    pub fn dequeue(&self) -> VizResult<Change<Self, SequenceSnapshot>> {
        let mut next = self.clone();
        let value = next
            .values
            .pop_front()
            .ok_or(VizError::EmptyStructure("Queue"))?;
        let mut steps = StepLog::builder(self.plain_snapshot());
        steps.push(SequenceSnapshot::of(&self.values, Some((0, Highlight::Removed))));
        steps.push(next.plain_snapshot());
        Ok(Change {
            next,
            log: steps.finish(),
            message: format!("Dequeued {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_lifo() {
        let stack = Stack::example();
        assert_eq!(stack.peek(), Some(40));
        let pushed = stack.push(50);
        assert_eq!(pushed.next.values(), vec![50, 40, 30, 20, 10]);
        assert_eq!(pushed.message, "Pushed 50 to stack");
        assert_eq!(pushed.log.last().marked(), Some((0, Highlight::New)));

        let popped = pushed.next.pop().unwrap();
        assert_eq!(popped.message, "Popped 50 from stack");
        assert_eq!(popped.next, stack);
        assert_eq!(popped.log.get(1).unwrap().marked(), Some((0, Highlight::Removed)));
    }

    #[test]
    fn test_queue_fifo() {
        let queue = Queue::example();
        let q = queue.enqueue(50);
        assert_eq!(q.next.values(), vec![10, 20, 30, 40, 50]);
        assert_eq!(q.log.last().marked(), Some((4, Highlight::New)));
        assert_eq!(q.message, "Enqueued 50");

        let d = q.next.dequeue().unwrap();
        assert_eq!(d.message, "Dequeued 10");
        assert_eq!(d.next.values(), vec![20, 30, 40, 50]);
    }

    #[test]
    fn test_empty_rejections() {
        assert_eq!(Stack::default().pop().unwrap_err().to_string(), "Stack is empty");
        assert_eq!(Queue::default().dequeue().unwrap_err().to_string(), "Queue is empty");
    }
}
