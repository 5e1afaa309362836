//! Binary search tree on an index arena.
//!
//! Nodes live in a `Vec` and refer to each other by [`NodeId`]. Mutating
//! operations clone the arena, edit the clone and hand it back inside a
//! [`Change`]; the receiver is left as it was, so a renderer still holding
//! the previous tree never sees it change. The arena is kept compact:
//! every slot is reachable from the root.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CanvasLayout, Change};
use crate::engine::{guard, Highlight, StepLog, StepLogBuilder};
use crate::error::{VizError, VizResult};

/// Values the tree is seeded with on first load.
pub const DEFAULT_VALUES: [i64; 7] = [50, 30, 70, 20, 40, 60, 80];

/// Index of a node in the arena.
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TreeNode {
    value: i64,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

/// Depth-first visit orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalOrder {
    /// Left, root, right.
    #[default]
    Inorder,
    /// Root, left, right.
    Preorder,
    /// Left, right, root.
    Postorder,
}

impl TraversalOrder {
    /// All orders in menu order.
    pub const ALL: [Self; 3] = [Self::Inorder, Self::Preorder, Self::Postorder];

    /// Heading shown with the result.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Inorder => "Inorder Traversal (Left-Root-Right)",
            Self::Preorder => "Preorder Traversal (Root-Left-Right)",
            Self::Postorder => "Postorder Traversal (Left-Right-Root)",
        }
    }

    /// Next order, wrapping.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Inorder => Self::Preorder,
            Self::Preorder => Self::Postorder,
            Self::Postorder => Self::Inorder,
        }
    }

    /// Parse `inorder` / `preorder` / `postorder`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "inorder" => Some(Self::Inorder),
            "preorder" => Some(Self::Preorder),
            "postorder" => Some(Self::Postorder),
            _ => None,
        }
    }
}

/// One node as drawn, with its layout position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNodeView {
    /// Stored value.
    pub value: i64,
    /// Index of the left child in [`TreeSnapshot::nodes`].
    pub left: Option<usize>,
    /// Index of the right child in [`TreeSnapshot::nodes`].
    pub right: Option<usize>,
    /// Highlight tag, if any.
    pub highlight: Option<Highlight>,
    /// Canvas x.
    pub x: f64,
    /// Canvas y.
    pub y: f64,
}

/// Whole tree at one instant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TreeSnapshot {
    /// Nodes in arena order.
    pub nodes: Vec<TreeNodeView>,
    /// Index of the root.
    pub root: Option<usize>,
}

impl TreeSnapshot {
    /// Values carrying `highlight`, in arena order.
    #[must_use]
    pub fn values_with(&self, highlight: Highlight) -> Vec<i64> {
        self.nodes
            .iter()
            .filter(|n| n.highlight == Some(highlight))
            .map(|n| n.value)
            .collect()
    }
}

/// Outcome of a search.
#[derive(Debug, Clone)]
pub struct TreeSearch {
    /// Path animation.
    pub log: StepLog<TreeSnapshot>,
    /// True if the value is present.
    pub found: bool,
    /// "Found N" or "Value N not found".
    pub message: String,
}

/// Outcome of a traversal.
#[derive(Debug, Clone)]
pub struct TreeTraversal {
    /// Values in visit order.
    pub values: Vec<i64>,
    /// One step per visit.
    pub log: StepLog<TreeSnapshot>,
    /// Heading for the result.
    pub message: String,
}

/// Binary search tree with distinct values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Bst {
    nodes: Vec<TreeNode>,
    root: Option<NodeId>,
    #[serde(default)]
    layout: CanvasLayout,
}

impl Bst {
    /// Empty tree.
    #[must_use]
    pub fn new(layout: CanvasLayout) -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            layout,
        }
    }

    /// Tree built by inserting `values` in order.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateValue` on the first repeated value.
    pub fn from_values(values: &[i64], layout: CanvasLayout) -> VizResult<Self> {
        let mut tree = Self::new(layout);
        for &value in values {
            let (path, found) = tree.walk(value);
            if found.is_some() {
                return Err(VizError::DuplicateValue(value));
            }
            tree.attach(path.last().copied(), value);
        }
        Ok(tree)
    }

    /// The seven-node example tree.
    #[must_use]
    pub fn example() -> Self {
        let mut tree = Self::default();
        for value in DEFAULT_VALUES {
            let (path, _) = tree.walk(value);
            tree.attach(path.last().copied(), value);
        }
        tree
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Root value.
    #[must_use]
    pub fn root_value(&self) -> Option<i64> {
        self.root.map(|id| self.nodes[id].value)
    }

    /// True if `value` is stored.
    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        self.walk(value).1.is_some()
    }

    /// Decision path for `value` and the matching node, if any.
    fn walk(&self, value: i64) -> (Vec<NodeId>, Option<NodeId>) {
        let mut path = Vec::new();
        let mut cursor = self.root;
        while let Some(id) = cursor {
            path.push(id);
            let node = &self.nodes[id];
            cursor = match value.cmp(&node.value) {
                std::cmp::Ordering::Equal => return (path, Some(id)),
                std::cmp::Ordering::Less => node.left,
                std::cmp::Ordering::Greater => node.right,
            };
        }
        (path, None)
    }

    /// Hang a new leaf under `parent` (or make it the root).
    fn attach(&mut self, parent: Option<NodeId>, value: i64) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            value,
            left: None,
            right: None,
        });
        match parent {
            None => self.root = Some(id),
            Some(p) if value < self.nodes[p].value => self.nodes[p].left = Some(id),
            Some(p) => self.nodes[p].right = Some(id),
        }
        id
    }

    /// Values in visit order.
    #[must_use]
    pub fn values(&self, order: TraversalOrder) -> Vec<i64> {
        self.visit_order(order)
            .into_iter()
            .map(|id| self.nodes[id].value)
            .collect()
    }

    fn visit_order(&self, order: TraversalOrder) -> Vec<NodeId> {
        fn recurse(tree: &Bst, id: Option<NodeId>, order: TraversalOrder, out: &mut Vec<NodeId>) {
            let Some(id) = id else { return };
            let node = &tree.nodes[id];
            if order == TraversalOrder::Preorder {
                out.push(id);
            }
            recurse(tree, node.left, order, out);
            if order == TraversalOrder::Inorder {
                out.push(id);
            }
            recurse(tree, node.right, order, out);
            if order == TraversalOrder::Postorder {
                out.push(id);
            }
        }
        let mut out = Vec::with_capacity(self.nodes.len());
        recurse(self, self.root, order, &mut out);
        out
    }

    /// Check the ordering invariant.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` if an in-order walk is not strictly increasing
    /// or the arena holds unreachable slots.
    pub fn validate(&self) -> VizResult<()> {
        let inorder = self.values(TraversalOrder::Inorder);
        if inorder.len() != self.nodes.len() {
            return Err(VizError::invariant(format!(
                "{} of {} arena slots reachable",
                inorder.len(),
                self.nodes.len()
            )));
        }
        guard::check_strictly_increasing(&inorder)
    }

    /// Lay the tree out and tag nodes.
    #[must_use]
    pub fn snapshot(&self, highlight: impl Fn(NodeId) -> Option<Highlight>) -> TreeSnapshot {
        let mut nodes: Vec<TreeNodeView> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(id, n)| TreeNodeView {
                value: n.value,
                left: n.left,
                right: n.right,
                highlight: highlight(id),
                x: 0.0,
                y: 0.0,
            })
            .collect();

        let mut stack: Vec<(NodeId, usize, f64, f64)> = self
            .root
            .map(|r| (r, 0, 0.0, self.layout.width))
            .into_iter()
            .collect();
        while let Some((id, depth, lower, upper)) = stack.pop() {
            let x = (lower + upper) / 2.0;
            nodes[id].x = x;
            nodes[id].y = (depth as f64).mul_add(self.layout.level_height, 50.0);
            if let Some(left) = self.nodes[id].left {
                stack.push((left, depth + 1, lower, x));
            }
            if let Some(right) = self.nodes[id].right {
                stack.push((right, depth + 1, x, upper));
            }
        }

        TreeSnapshot {
            nodes,
            root: self.root,
        }
    }

    /// Snapshot with no highlights.
    #[must_use]
    pub fn plain_snapshot(&self) -> TreeSnapshot {
        self.snapshot(|_| None)
    }

    /// Insert `value`, animating the decision path.
    ///
    /// # Errors
    ///
    /// `DuplicateValue` if `value` is already stored.
    pub fn insert(&self, value: i64) -> VizResult<Change<Self, TreeSnapshot>> {
        let (path, found) = self.walk(value);
        if found.is_some() {
            return Err(VizError::DuplicateValue(value));
        }

        let mut steps = StepLog::builder(self.plain_snapshot());
        self.push_path(&mut steps, &path);

        let mut next = self.clone();
        let id = next.attach(path.last().copied(), value);
        steps.push(next.snapshot(|n| (n == id).then_some(Highlight::New)));
        next.validate()?;

        debug!(value, depth = path.len(), "bst insert");
        Ok(Change {
            next,
            log: steps.finish(),
            message: format!("Inserted {value}"),
        })
    }

    /// Remove `value`. A node with two children takes its in-order
    /// successor's value and the successor is unlinked instead.
    ///
    /// # Errors
    ///
    /// `EmptyStructure` on an empty tree, `ValueNotFound` on a miss.
    pub fn remove(&self, value: i64) -> VizResult<Change<Self, TreeSnapshot>> {
        if self.is_empty() {
            return Err(VizError::EmptyStructure("Tree"));
        }
        let (path, found) = self.walk(value);
        let Some(target) = found else {
            return Err(VizError::ValueNotFound(value));
        };

        let mut steps = StepLog::builder(self.plain_snapshot());
        self.push_path(&mut steps, &path[..path.len() - 1]);

        let successor = self.nodes[target]
            .right
            .filter(|_| self.nodes[target].left.is_some())
            .map(|right| self.leftmost(right));
        steps.push(self.snapshot(|n| {
            if n == target {
                Some(Highlight::Removed)
            } else if Some(n) == successor {
                Some(Highlight::Active)
            } else {
                None
            }
        }));

        let mut next = self.clone();
        let parent = path.len().checked_sub(2).map(|i| path[i]);
        match successor {
            Some(succ) => {
                next.nodes[target].value = next.nodes[succ].value;
                let succ_parent = next.parent_of(succ);
                let succ_right = next.nodes[succ].right;
                next.relink(succ_parent, succ, succ_right);
            }
            None => {
                let node = &next.nodes[target];
                let child = node.left.or(node.right);
                next.relink(parent, target, child);
            }
        }
        let next = next.compacted();
        next.validate()?;
        steps.push(next.plain_snapshot());

        debug!(value, remaining = next.len(), "bst remove");
        Ok(Change {
            next,
            log: steps.finish(),
            message: format!("Removed {value}"),
        })
    }

    /// Walk the decision path for `value`.
    ///
    /// A miss is a normal outcome carrying the "not found" message.
    ///
    /// # Errors
    ///
    /// `EmptyStructure` on an empty tree.
    pub fn search(&self, value: i64) -> VizResult<TreeSearch> {
        if self.is_empty() {
            return Err(VizError::EmptyStructure("Tree"));
        }
        let (path, found) = self.walk(value);
        let mut steps = StepLog::builder(self.plain_snapshot());
        self.push_path(&mut steps, &path);
        let message = if let Some(hit) = found {
            steps.push(self.snapshot(|n| (n == hit).then_some(Highlight::Search)));
            format!("Found {value}")
        } else {
            steps.push(self.plain_snapshot());
            format!("Value {value} not found")
        };
        Ok(TreeSearch {
            log: steps.finish(),
            found: found.is_some(),
            message,
        })
    }

    /// Visit every node in `order`.
    ///
    /// Each step marks the node being visited `active` and earlier visits
    /// `visited`.
    ///
    /// # Errors
    ///
    /// `EmptyStructure` on an empty tree.
    pub fn traverse(&self, order: TraversalOrder) -> VizResult<TreeTraversal> {
        if self.is_empty() {
            return Err(VizError::EmptyStructure("Tree"));
        }
        let visits = self.visit_order(order);
        let mut steps = StepLog::builder(self.plain_snapshot());
        for (k, &id) in visits.iter().enumerate() {
            let done = &visits[..k];
            steps.push(self.snapshot(|n| {
                if n == id {
                    Some(Highlight::Active)
                } else if done.contains(&n) {
                    Some(Highlight::Visited)
                } else {
                    None
                }
            }));
        }
        Ok(TreeTraversal {
            values: visits.iter().map(|&id| self.nodes[id].value).collect(),
            log: steps.finish(),
            message: order.title().to_string(),
        })
    }

    fn push_path(&self, steps: &mut StepLogBuilder<TreeSnapshot>, path: &[NodeId]) {
        for &id in path {
            steps.push(self.snapshot(|n| (n == id).then_some(Highlight::Active)));
        }
    }

    fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.nodes[id].left {
            id = left;
        }
        id
    }

    fn parent_of(&self, child: NodeId) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.left == Some(child) || n.right == Some(child))
    }

    /// Point whatever referenced `old` under `parent` at `new` instead.
    fn relink(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(p) if self.nodes[p].left == Some(old) => self.nodes[p].left = new,
            Some(p) => self.nodes[p].right = new,
        }
    }

    /// Rebuild the arena with only reachable nodes, in pre-order.
    fn compacted(&self) -> Self {
        let mut out = Self::new(self.layout);
        for id in self.visit_order(TraversalOrder::Preorder) {
            let value = self.nodes[id].value;
            let (path, _) = out.walk(value);
            out.attach(path.last().copied(), value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_shape() {
        let tree = Bst::example();
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.root_value(), Some(50));
        assert_eq!(tree.values(TraversalOrder::Inorder), vec![20, 30, 40, 50, 60, 70, 80]);
        assert_eq!(tree.values(TraversalOrder::Preorder), vec![50, 30, 20, 40, 70, 60, 80]);
        assert_eq!(tree.values(TraversalOrder::Postorder), vec![20, 40, 30, 60, 80, 70, 50]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_layout() {
        let snapshot = Bst::example().plain_snapshot();
        let root = &snapshot.nodes[snapshot.root.unwrap()];
        assert!((root.x - 400.0).abs() < f64::EPSILON);
        assert!((root.y - 50.0).abs() < f64::EPSILON);
        let left = &snapshot.nodes[root.left.unwrap()];
        assert_eq!(left.value, 30);
        assert!((left.x - 200.0).abs() < f64::EPSILON);
        assert!((left.y - 130.0).abs() < f64::EPSILON);
        let left_right = &snapshot.nodes[left.right.unwrap()];
        assert!((left_right.x - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_insert_is_copy_on_write() {
        let tree = Bst::example();
        let change = tree.insert(45).unwrap();
        assert_eq!(tree.len(), 7);
        assert!(!tree.contains(45));
        assert_eq!(change.next.len(), 8);
        assert_eq!(change.message, "Inserted 45");
        // 50 -> 30 -> 40 then the new leaf
        assert_eq!(change.log.len(), 5);
        assert_eq!(change.log.get(3).unwrap().values_with(Highlight::Active), vec![40]);
        assert_eq!(change.log.last().values_with(Highlight::New), vec![45]);
    }

    #[test]
    fn test_insert_duplicate_rejected() {
        let tree = Bst::example();
        let err = tree.insert(50).unwrap_err();
        assert_eq!(err.to_string(), "Value 50 already exists");
    }

    #[test]
    fn test_insert_into_empty() {
        let change = Bst::default().insert(5).unwrap();
        assert_eq!(change.next.root_value(), Some(5));
        assert_eq!(change.log.len(), 2);
    }

    #[test]
    fn test_search_hit_and_miss() {
        let tree = Bst::example();
        let hit = tree.search(60).unwrap();
        assert!(hit.found);
        assert_eq!(hit.message, "Found 60");
        assert_eq!(hit.log.last().values_with(Highlight::Search), vec![60]);

        let miss = tree.search(65).unwrap();
        assert!(!miss.found);
        assert_eq!(miss.message, "Value 65 not found");
        // 50, 70, 60 then the plain closing step
        assert_eq!(miss.log.len(), 5);

        assert!(matches!(Bst::default().search(1), Err(VizError::EmptyStructure("Tree"))));
    }

    #[test]
    fn test_remove_leaf_and_inner() {
        let tree = Bst::example();
        let leaf = tree.remove(20).unwrap();
        assert_eq!(leaf.next.values(TraversalOrder::Inorder), vec![30, 40, 50, 60, 70, 80]);

        let root = tree.remove(50).unwrap();
        assert_eq!(root.next.root_value(), Some(60));
        assert_eq!(root.next.len(), 6);
        assert!(root.next.validate().is_ok());
        let marked = root.log.get(root.log.len() - 2).unwrap();
        assert_eq!(marked.values_with(Highlight::Removed), vec![50]);
        assert_eq!(marked.values_with(Highlight::Active), vec![60]);
    }

    #[test]
    fn test_remove_single_child() {
        let tree = Bst::from_values(&[10, 5, 3], CanvasLayout::default()).unwrap();
        let change = tree.remove(5).unwrap();
        assert_eq!(change.next.values(TraversalOrder::Preorder), vec![10, 3]);
    }

    #[test]
    fn test_remove_errors() {
        assert!(matches!(Bst::example().remove(99), Err(VizError::ValueNotFound(99))));
        assert!(matches!(Bst::default().remove(1), Err(VizError::EmptyStructure(_))));
    }

    #[test]
    fn test_traverse_steps() {
        let traversal = Bst::example().traverse(TraversalOrder::Inorder).unwrap();
        assert_eq!(traversal.values, vec![20, 30, 40, 50, 60, 70, 80]);
        assert_eq!(traversal.log.len(), 8);
        let third = traversal.log.get(3).unwrap();
        assert_eq!(third.values_with(Highlight::Active), vec![40]);
        assert_eq!(third.values_with(Highlight::Visited).len(), 2);
        assert_eq!(traversal.message, "Inorder Traversal (Left-Root-Right)");
    }

    #[test]
    fn test_from_values_rejects_duplicates() {
        assert!(Bst::from_values(&[1, 2, 1], CanvasLayout::default()).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Ordering holds after every insert and every remove.
        #[test]
        fn prop_bst_invariant(inserts in proptest::collection::vec(-200i64..200, 0..40), removes in proptest::collection::vec(-200i64..200, 0..20)) {
            let mut tree = Bst::default();
            for value in inserts {
                if let Ok(change) = tree.insert(value) {
                    tree = change.next;
                }
                prop_assert!(tree.validate().is_ok());
            }
            for value in removes {
                if let Ok(change) = tree.remove(value) {
                    prop_assert!(!change.next.contains(value));
                    tree = change.next;
                }
                prop_assert!(tree.validate().is_ok());
            }
        }
    }
}
