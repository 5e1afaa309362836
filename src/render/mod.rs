//! Snapshot renderers.
//!
//! A renderer turns one snapshot into something displayable. It knows how
//! each structure is laid out but nothing about the algorithm that produced
//! the snapshot, and it only ever borrows what it draws.
//!
//! ```text
//! StepLog<S> ──cursor──▶ &S ──Renderer<S>──▶ Output
//! ```

use std::fmt::Write as _;

use crate::engine::{Highlight, StepLog};
use crate::structures::graph::GraphSnapshot;
use crate::structures::hash_table::HashSnapshot;
use crate::structures::heap::HeapSnapshot;
use crate::structures::linked_list::ListSnapshot;
use crate::structures::sorting::ArraySnapshot;
use crate::structures::stack_queue::SequenceSnapshot;
use crate::structures::tree::TreeSnapshot;

/// Maps one snapshot to a displayable output.
pub trait Renderer<S> {
    /// What the renderer produces.
    type Output;

    /// Render a single snapshot.
    fn render(&self, snapshot: &S) -> Self::Output;

    /// Render every step of a log, in order.
    fn render_log(&self, log: &StepLog<S>) -> Vec<Self::Output> {
        log.iter().map(|s| self.render(s)).collect()
    }
}

/// Plain-text renderer used by the CLI and tests.
///
/// Highlighted elements are suffixed with their tag in parentheses, e.g.
/// `25(comparing)`. Output is deterministic for a given snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRenderer {
    /// Append highlight tags.
    pub show_highlights: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            show_highlights: true,
        }
    }
}

impl TextRenderer {
    /// Renderer that omits highlight tags.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            show_highlights: false,
        }
    }

    fn cell(self, label: impl std::fmt::Display, highlight: Option<Highlight>) -> String {
        match highlight {
            Some(h) if self.show_highlights => format!("{label}({})", h.tag()),
            _ => label.to_string(),
        }
    }
}

impl Renderer<ArraySnapshot> for TextRenderer {
    type Output = String;

    fn render(&self, snapshot: &ArraySnapshot) -> String {
        snapshot
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let highlight = if snapshot.swapping.contains(&i) {
                    Some(Highlight::Swapping)
                } else if snapshot.comparing.contains(&i) {
                    Some(Highlight::Comparing)
                } else {
                    None
                };
                self.cell(v, highlight)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Renderer<ListSnapshot> for TextRenderer {
    type Output = String;

    fn render(&self, snapshot: &ListSnapshot) -> String {
        let mut out = String::new();
        for node in &snapshot.nodes {
            out.push_str(&self.cell(node.value, node.highlight));
            out.push_str(" → ");
        }
        out.push_str("null");
        out
    }
}

impl Renderer<SequenceSnapshot> for TextRenderer {
    type Output = String;

    fn render(&self, snapshot: &SequenceSnapshot) -> String {
        let items = snapshot
            .items
            .iter()
            .map(|i| self.cell(i.value, i.highlight))
            .collect::<Vec<_>>()
            .join(", ");
        format!("[{items}]")
    }
}

impl Renderer<TreeSnapshot> for TextRenderer {
    type Output = String;

    fn render(&self, snapshot: &TreeSnapshot) -> String {
        let Some(root) = snapshot.root else {
            return "(empty)".to_string();
        };
        let mut out = String::new();
        // (node, depth, side)
        let mut stack = vec![(root, 0_usize, "")];
        while let Some((id, depth, side)) = stack.pop() {
            let Some(node) = snapshot.nodes.get(id) else {
                continue;
            };
            let _ = writeln!(
                out,
                "{}{side}{}",
                "  ".repeat(depth),
                self.cell(node.value, node.highlight)
            );
            if let Some(r) = node.right {
                stack.push((r, depth + 1, "R: "));
            }
            if let Some(l) = node.left {
                stack.push((l, depth + 1, "L: "));
            }
        }
        out.pop();
        out
    }
}

impl Renderer<HeapSnapshot> for TextRenderer {
    type Output = String;

    fn render(&self, snapshot: &HeapSnapshot) -> String {
        let values = snapshot
            .nodes
            .iter()
            .map(|n| self.cell(n.value, n.highlight))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{} heap: [{values}]", snapshot.kind.name())
    }
}

impl Renderer<HashSnapshot> for TextRenderer {
    type Output = String;

    fn render(&self, snapshot: &HashSnapshot) -> String {
        let width = snapshot.slots.len().saturating_sub(1).to_string().len();
        let mut out = String::new();
        for (i, slot) in snapshot.slots.iter().enumerate() {
            let body = if slot.entries.is_empty() {
                if slot.tombstone { "<deleted>" } else { "-" }.to_string()
            } else {
                slot.entries
                    .iter()
                    .map(|e| format!("{}:{}", e.key, e.value))
                    .collect::<Vec<_>>()
                    .join(crate::structures::hash_table::CHAIN_SEPARATOR)
            };
            let _ = writeln!(out, "{i:>width$} | {}", self.cell(body, slot.highlight));
        }
        out.pop();
        out
    }
}

impl Renderer<GraphSnapshot> for TextRenderer {
    type Output = String;

    fn render(&self, snapshot: &GraphSnapshot) -> String {
        let nodes = snapshot
            .nodes
            .iter()
            .map(|n| self.cell(&n.id, n.highlight))
            .collect::<Vec<_>>()
            .join(" ");
        let edges = snapshot
            .edges
            .iter()
            .map(|e| {
                let marker = if e.highlighted && self.show_highlights { "*" } else { "" };
                format!("{}-{}{marker}", e.source, e.target)
            })
            .collect::<Vec<_>>()
            .join(" ");
        format!("nodes: {nodes}\nedges: {edges}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::graph::Graph;
    use crate::structures::hash_table::{CollisionStrategy, HashFunction, HashTable};
    use crate::structures::heap::Heap;
    use crate::structures::linked_list::LinkedList;
    use crate::structures::sorting::{generate_steps, SortAlgorithm};
    use crate::structures::stack_queue::Stack;
    use crate::structures::tree::Bst;

    #[test]
    fn test_array_tags() {
        let snap = ArraySnapshot {
            values: vec![3, 1, 2],
            comparing: vec![0, 1],
            swapping: vec![1],
        };
        assert_eq!(TextRenderer::default().render(&snap), "3(comparing) 1(swapping) 2");
        assert_eq!(TextRenderer::plain().render(&snap), "3 1 2");
    }

    #[test]
    fn test_render_log_matches_length() {
        let log = generate_steps(SortAlgorithm::Bubble, &[3, 1, 2]);
        let frames = TextRenderer::default().render_log(&log);
        assert_eq!(frames.len(), log.len());
        assert_eq!(frames.last().unwrap(), "1(comparing) 2(comparing) 3");
        assert_eq!(TextRenderer::plain().render(log.last()), "1 2 3");
    }

    #[test]
    fn test_list_and_stack() {
        let r = TextRenderer::default();
        assert_eq!(
            r.render(&LinkedList::example().plain_snapshot()),
            "10 → 20 → 30 → 40 → null"
        );
        let pushed = Stack::example().push(5);
        assert_eq!(r.render(pushed.log.last()), "[5(new), 40, 30, 20, 10]");
    }

    #[test]
    fn test_tree_outline() {
        let tree = Bst::from_values(&[50, 30, 70], crate::structures::CanvasLayout::default())
            .unwrap();
        assert_eq!(
            TextRenderer::default().render(&tree.plain_snapshot()),
            "50\n  L: 30\n  R: 70"
        );
        assert_eq!(TextRenderer::default().render(&Bst::default().plain_snapshot()), "(empty)");
    }

    #[test]
    fn test_heap_and_hash() {
        let r = TextRenderer::default();
        assert!(r
            .render(&Heap::example().settled_snapshot())
            .starts_with("max heap: [100(root) 80"));

        let table = HashTable::new(5, CollisionStrategy::Linear, HashFunction::Simple).unwrap();
        let table = table.insert("a", "1").unwrap().next;
        let text = r.render(&table.plain_snapshot());
        assert_eq!(text.lines().count(), 5);
        assert!(text.contains("a:1"));
    }

    #[test]
    fn test_graph_lines() {
        let text = TextRenderer::default().render(&Graph::example().plain_snapshot());
        assert!(text.starts_with("nodes: A B C D E F"));
        assert!(text.ends_with("edges: A-B A-D B-C B-E C-F D-E E-F"));
    }

    #[test]
    fn test_rendering_does_not_mutate() {
        let log = generate_steps(SortAlgorithm::Quick, &[5, 4, 3]);
        let before = log.clone();
        let _ = TextRenderer::default().render_log(&log);
        assert_eq!(log, before);
    }
}
