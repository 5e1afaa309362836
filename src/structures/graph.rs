//! Undirected graph with BFS/DFS step generation.
//!
//! Neighbor order is the edge insertion order: the adjacency list is
//! built by walking nodes in declaration order, then pushing every edge
//! onto both endpoints' lists. Given a fixed edge list, each traversal
//! has exactly one possible visit order.

use std::collections::VecDeque;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::{Highlight, StepLog, StepLogBuilder};
use crate::error::{VizError, VizResult};
use crate::replay::ReplayController;

/// Interval between traversal steps during playback.
pub const TRAVERSAL_STEP_MS: u64 = 1000;

/// A positioned graph vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique id, also the label.
    pub id: String,
    /// Canvas x.
    pub x: f64,
    /// Canvas y.
    pub y: f64,
}

impl GraphNode {
    /// Node at `(x, y)`.
    #[must_use]
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
        }
    }
}

/// Undirected edge between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// One endpoint.
    pub source: String,
    /// Other endpoint.
    pub target: String,
}

impl GraphEdge {
    /// Edge between `source` and `target`.
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// True if the edge joins `a` and `b` in either direction.
    #[must_use]
    pub fn joins(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// Traversal algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphAlgorithm {
    /// Breadth-first, visited-on-enqueue.
    #[default]
    Bfs,
    /// Depth-first, recursive pre-order.
    Dfs,
}

impl GraphAlgorithm {
    /// Short uppercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bfs => "BFS",
            Self::Dfs => "DFS",
        }
    }

    /// (time, space) complexity.
    #[must_use]
    pub const fn complexity(self) -> (&'static str, &'static str) {
        ("O(V + E)", "O(V)")
    }

    /// The other algorithm.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Bfs => Self::Dfs,
            Self::Dfs => Self::Bfs,
        }
    }

    /// Parse `bfs` / `dfs`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "bfs" => Some(Self::Bfs),
            "dfs" => Some(Self::Dfs),
            _ => None,
        }
    }
}

/// Node as drawn in one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    /// Node id.
    pub id: String,
    /// Canvas x.
    pub x: f64,
    /// Canvas y.
    pub y: f64,
    /// Highlight tag, if any.
    pub highlight: Option<Highlight>,
}

/// Edge as drawn in one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeView {
    /// One endpoint.
    pub source: String,
    /// Other endpoint.
    pub target: String,
    /// True for the edge just traversed.
    pub highlighted: bool,
}

/// Full node list and edge list at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Nodes in declaration order.
    pub nodes: Vec<NodeView>,
    /// Edges in insertion order.
    pub edges: Vec<EdgeView>,
}

impl GraphSnapshot {
    /// Highlight of node `id`, if present.
    #[must_use]
    pub fn highlight_of(&self, id: &str) -> Option<Highlight> {
        self.nodes.iter().find(|n| n.id == id).and_then(|n| n.highlight)
    }

    /// Ids of nodes carrying `highlight`, in declaration order.
    #[must_use]
    pub fn nodes_with(&self, highlight: Highlight) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| n.highlight == Some(highlight))
            .map(|n| n.id.as_str())
            .collect()
    }
}

/// Result of one traversal run.
#[derive(Debug, Clone)]
pub struct TraversalRun {
    /// Steps to replay.
    pub log: StepLog<GraphSnapshot>,
    /// Node ids in discovery order.
    pub order: Vec<String>,
}

/// Undirected graph with positioned nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

impl Graph {
    /// Graph from parts. Edges are not checked; see [`crate::config`].
    #[must_use]
    pub fn from_parts(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self { nodes, edges }
    }

    /// The six-node example graph shown on first load.
    #[must_use]
    pub fn example() -> Self {
        let nodes = vec![
            GraphNode::new("A", 100.0, 100.0),
            GraphNode::new("B", 250.0, 50.0),
            GraphNode::new("C", 400.0, 100.0),
            GraphNode::new("D", 100.0, 250.0),
            GraphNode::new("E", 250.0, 300.0),
            GraphNode::new("F", 400.0, 250.0),
        ];
        let edges = [
            ("A", "B"),
            ("A", "D"),
            ("B", "C"),
            ("B", "E"),
            ("C", "F"),
            ("D", "E"),
            ("E", "F"),
        ]
        .into_iter()
        .map(|(s, t)| GraphEdge::new(s, t))
        .collect();
        Self { nodes, edges }
    }

    /// Nodes in declaration order.
    #[must_use]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// True if a node with `id` exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    /// Add a node.
    ///
    /// # Errors
    ///
    /// `MissingInput` for an empty id, `DuplicateNode` if the id exists.
    pub fn add_node(&mut self, id: &str, x: f64, y: f64) -> VizResult<()> {
        let id = id.trim();
        if id.is_empty() {
            return Err(VizError::MissingInput("a node id"));
        }
        if self.contains(id) {
            return Err(VizError::DuplicateNode(id.to_string()));
        }
        self.nodes.push(GraphNode::new(id, x, y));
        Ok(())
    }

    /// Add an undirected edge between the two selected nodes.
    ///
    /// Returns the confirmation message.
    ///
    /// # Errors
    ///
    /// `MissingEndpoints` unless both are selected, `SameEndpoints`,
    /// `UnknownNode`, or `DuplicateEdge` (either direction).
    pub fn add_edge(&mut self, source: Option<&str>, target: Option<&str>) -> VizResult<String> {
        let (Some(source), Some(target)) = (
            source.filter(|s| !s.is_empty()),
            target.filter(|t| !t.is_empty()),
        ) else {
            return Err(VizError::MissingEndpoints);
        };
        if source == target {
            return Err(VizError::SameEndpoints);
        }
        for id in [source, target] {
            if !self.contains(id) {
                return Err(VizError::UnknownNode(id.to_string()));
            }
        }
        if self.edges.iter().any(|e| e.joins(source, target)) {
            return Err(VizError::DuplicateEdge);
        }
        self.edges.push(GraphEdge::new(source, target));
        Ok(format!("Added edge from {source} to {target}"))
    }

    /// Adjacency lists keyed by node id, in node order then edge order.
    #[must_use]
    pub fn adjacency(&self) -> IndexMap<&str, Vec<&str>> {
        let mut adjacency: IndexMap<&str, Vec<&str>> = self
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), Vec::new()))
            .collect();
        for edge in &self.edges {
            if let Some(list) = adjacency.get_mut(edge.source.as_str()) {
                list.push(edge.target.as_str());
            }
            if let Some(list) = adjacency.get_mut(edge.target.as_str()) {
                list.push(edge.source.as_str());
            }
        }
        adjacency
    }

    /// Same lists as [`adjacency`](Self::adjacency), by node index.
    fn adjacency_indices(&self) -> Vec<Vec<usize>> {
        self.adjacency()
            .values()
            .map(|ids| ids.iter().filter_map(|id| self.position(id)).collect())
            .collect()
    }

    fn snapshot(
        &self,
        highlight: impl Fn(usize) -> Option<Highlight>,
        traversed: Option<(usize, usize)>,
    ) -> GraphSnapshot {
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| NodeView {
                id: n.id.clone(),
                x: n.x,
                y: n.y,
                highlight: highlight(i),
            })
            .collect();
        let edges = self
            .edges
            .iter()
            .map(|e| EdgeView {
                source: e.source.clone(),
                target: e.target.clone(),
                highlighted: traversed.is_some_and(|(a, b)| {
                    e.joins(&self.nodes[a].id, &self.nodes[b].id)
                }),
            })
            .collect();
        GraphSnapshot { nodes, edges }
    }

    /// Snapshot with no highlights.
    #[must_use]
    pub fn plain_snapshot(&self) -> GraphSnapshot {
        self.snapshot(|_| None, None)
    }

    fn start_index(&self, start: &str) -> VizResult<usize> {
        self.position(start)
            .ok_or_else(|| VizError::UnknownNode(start.to_string()))
    }

    /// Breadth-first traversal from `start`.
    ///
    /// # Errors
    ///
    /// `UnknownNode` if `start` is not in the graph.
    pub fn bfs_steps(&self, start: &str) -> VizResult<TraversalRun> {
        let start = self.start_index(start)?;
        let adjacency = self.adjacency_indices();
        let mut visited = vec![false; self.nodes.len()];
        let mut queue = VecDeque::from([start]);
        let mut order = vec![start];
        visited[start] = true;

        let mut steps = StepLogBuilder::new(
            self.snapshot(|i| (i == start).then_some(Highlight::Current), None),
        );

        while let Some(node) = queue.pop_front() {
            for &neighbor in &adjacency[node] {
                if visited[neighbor] {
                    continue;
                }
                queue.push_back(neighbor);
                visited[neighbor] = true;
                order.push(neighbor);
                steps.push(self.snapshot(
                    |i| discovery_highlight(i, neighbor, node, &visited),
                    Some((node, neighbor)),
                ));
            }
            steps.push(self.snapshot(
                |i| {
                    if queue.contains(&i) {
                        Some(Highlight::Current)
                    } else if i == node {
                        Some(Highlight::Active)
                    } else {
                        visited[i].then_some(Highlight::Visited)
                    }
                },
                None,
            ));
        }

        Ok(self.finish_run(GraphAlgorithm::Bfs, steps, &order))
    }

    /// Depth-first traversal from `start`.
    ///
    /// # Errors
    ///
    /// `UnknownNode` if `start` is not in the graph.
    pub fn dfs_steps(&self, start: &str) -> VizResult<TraversalRun> {
        let start = self.start_index(start)?;
        let adjacency = self.adjacency_indices();
        let mut visited = vec![false; self.nodes.len()];
        let mut order = Vec::new();
        let mut steps = StepLogBuilder::new(
            self.snapshot(|i| (i == start).then_some(Highlight::Current), None),
        );
        self.dfs_visit(start, &adjacency, &mut visited, &mut order, &mut steps);
        Ok(self.finish_run(GraphAlgorithm::Dfs, steps, &order))
    }

    fn dfs_visit(
        &self,
        node: usize,
        adjacency: &[Vec<usize>],
        visited: &mut [bool],
        order: &mut Vec<usize>,
        steps: &mut StepLogBuilder<GraphSnapshot>,
    ) {
        visited[node] = true;
        order.push(node);
        steps.push(self.snapshot(
            |i| {
                if i == node {
                    Some(Highlight::Current)
                } else {
                    visited[i].then_some(Highlight::Visited)
                }
            },
            None,
        ));
        for &neighbor in &adjacency[node] {
            if visited[neighbor] {
                continue;
            }
            steps.push(self.snapshot(
                |i| discovery_highlight(i, neighbor, node, &*visited),
                Some((node, neighbor)),
            ));
            self.dfs_visit(neighbor, adjacency, visited, order, steps);
        }
    }

    fn finish_run(
        &self,
        algorithm: GraphAlgorithm,
        steps: StepLogBuilder<GraphSnapshot>,
        order: &[usize],
    ) -> TraversalRun {
        let log = steps.finish();
        let order: Vec<String> = order.iter().map(|&i| self.nodes[i].id.clone()).collect();
        debug!(
            algorithm = algorithm.name(),
            steps = log.len(),
            order = ?order,
            "generated traversal steps"
        );
        TraversalRun { log, order }
    }

    /// Run `algorithm` from the selected start node.
    ///
    /// # Errors
    ///
    /// `NoStartNode` if nothing is selected, `UnknownNode` if the
    /// selection is not in the graph.
    pub fn traverse(&self, algorithm: GraphAlgorithm, start: Option<&str>) -> VizResult<TraversalRun> {
        let start = start.filter(|s| !s.is_empty()).ok_or(VizError::NoStartNode)?;
        match algorithm {
            GraphAlgorithm::Bfs => self.bfs_steps(start),
            GraphAlgorithm::Dfs => self.dfs_steps(start),
        }
    }
}

/// Highlight for a step that just reached `neighbor` from `from`.
fn discovery_highlight(i: usize, neighbor: usize, from: usize, visited: &[bool]) -> Option<Highlight> {
    if i == neighbor {
        Some(Highlight::Current)
    } else if i == from {
        Some(Highlight::Active)
    } else {
        visited[i].then_some(Highlight::Visited)
    }
}

/// Graph tab state.
#[derive(Debug, Clone)]
pub struct GraphVisualizer {
    initial: Graph,
    graph: Graph,
    algorithm: GraphAlgorithm,
    start: Option<String>,
    replay: ReplayController<GraphSnapshot>,
    message: Option<String>,
}

impl GraphVisualizer {
    /// Visualizer over `graph`, replaying at `step_ms` per step.
    #[must_use]
    pub fn new(graph: Graph, algorithm: GraphAlgorithm, start: Option<String>, step_ms: u64) -> Self {
        let replay = ReplayController::with_fixed_interval(StepLog::single(graph.plain_snapshot()), step_ms);
        Self {
            initial: graph.clone(),
            graph,
            algorithm,
            start,
            replay,
            message: None,
        }
    }

    /// Restore the seeded graph and clear the run.
    pub fn reset(&mut self) {
        self.graph = self.initial.clone();
        self.replay.load(StepLog::single(self.graph.plain_snapshot()));
        self.message = None;
    }

    /// Generate a traversal and start playing it.
    ///
    /// # Errors
    ///
    /// Propagates [`Graph::traverse`] rejections; nothing changes then.
    pub fn start(&mut self) -> VizResult<()> {
        match self.graph.traverse(self.algorithm, self.start.as_deref()) {
            Ok(run) => {
                self.message = Some(format!(
                    "{} traversal from node {}",
                    self.algorithm.name(),
                    self.start.as_deref().unwrap_or_default()
                ));
                self.replay.start(run.log);
                Ok(())
            }
            Err(err) => {
                warn!(%err, "traversal rejected");
                self.message = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Add an edge and show the plain graph.
    ///
    /// # Errors
    ///
    /// Propagates [`Graph::add_edge`] rejections.
    pub fn add_edge(&mut self, source: Option<&str>, target: Option<&str>) -> VizResult<()> {
        match self.graph.add_edge(source, target) {
            Ok(message) => {
                self.message = Some(message);
                self.replay.load(StepLog::single(self.graph.plain_snapshot()));
                Ok(())
            }
            Err(err) => {
                self.message = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Select the start node.
    pub fn set_start(&mut self, start: Option<String>) {
        self.start = start;
    }

    /// Select the algorithm.
    pub fn set_algorithm(&mut self, algorithm: GraphAlgorithm) {
        self.algorithm = algorithm;
    }

    /// Selected start node.
    #[must_use]
    pub fn start_node(&self) -> Option<&str> {
        self.start.as_deref()
    }

    /// Selected algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> GraphAlgorithm {
        self.algorithm
    }

    /// Primary graph.
    #[must_use]
    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Last advisory or confirmation message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Replay controller.
    #[must_use]
    pub const fn replay(&self) -> &ReplayController<GraphSnapshot> {
        &self.replay
    }

    /// Mutable replay controller.
    pub fn replay_mut(&mut self) -> &mut ReplayController<GraphSnapshot> {
        &mut self.replay
    }
}

impl Default for GraphVisualizer {
    fn default() -> Self {
        Self::new(Graph::example(), GraphAlgorithm::Bfs, None, TRAVERSAL_STEP_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_order() {
        let graph = Graph::example();
        let adjacency = graph.adjacency();
        assert_eq!(adjacency["A"], vec!["B", "D"]);
        assert_eq!(adjacency["B"], vec!["A", "C", "E"]);
        assert_eq!(adjacency["E"], vec!["B", "D", "F"]);
        assert_eq!(adjacency.keys().copied().collect::<Vec<_>>(), vec!["A", "B", "C", "D", "E", "F"]);
    }

    #[test]
    fn test_bfs_order() {
        let run = Graph::example().bfs_steps("A").unwrap();
        assert_eq!(run.order, vec!["A", "B", "D", "C", "E", "F"]);
        assert_eq!(run.log.first().nodes_with(Highlight::Current), vec!["A"]);
    }

    #[test]
    fn test_bfs_enqueue_step() {
        let run = Graph::example().bfs_steps("A").unwrap();
        let step = run.log.get(1).unwrap();
        assert_eq!(step.highlight_of("B"), Some(Highlight::Current));
        assert_eq!(step.highlight_of("A"), Some(Highlight::Active));
        assert_eq!(step.highlight_of("C"), None);
        let lit: Vec<_> = step.edges.iter().filter(|e| e.highlighted).collect();
        assert_eq!(lit.len(), 1);
        assert!(GraphEdge::new(&lit[0].source, &lit[0].target).joins("A", "B"));
    }

    #[test]
    fn test_bfs_post_processing_step() {
        let run = Graph::example().bfs_steps("A").unwrap();
        // initial, B, D, then the step after A is processed
        let step = run.log.get(3).unwrap();
        assert_eq!(step.nodes_with(Highlight::Current), vec!["B", "D"]);
        assert_eq!(step.highlight_of("A"), Some(Highlight::Active));
        assert!(step.edges.iter().all(|e| !e.highlighted));
    }

    #[test]
    fn test_bfs_ends_all_visited() {
        let run = Graph::example().bfs_steps("A").unwrap();
        let last = run.log.last();
        assert_eq!(last.highlight_of("F"), Some(Highlight::Active));
        assert_eq!(last.nodes_with(Highlight::Visited).len(), 5);
    }

    #[test]
    fn test_dfs_order() {
        let run = Graph::example().dfs_steps("A").unwrap();
        assert_eq!(run.order, vec!["A", "B", "C", "F", "E", "D"]);
        // initial, visit A, edge A-B, visit B
        assert_eq!(run.log.get(1).unwrap().nodes_with(Highlight::Current), vec!["A"]);
        let edge_step = run.log.get(2).unwrap();
        assert_eq!(edge_step.highlight_of("B"), Some(Highlight::Current));
        assert_eq!(edge_step.highlight_of("A"), Some(Highlight::Active));
    }

    #[test]
    fn test_traverse_requires_start() {
        let graph = Graph::example();
        assert!(matches!(graph.traverse(GraphAlgorithm::Bfs, None), Err(VizError::NoStartNode)));
        assert!(matches!(graph.traverse(GraphAlgorithm::Dfs, Some("")), Err(VizError::NoStartNode)));
        assert!(matches!(graph.traverse(GraphAlgorithm::Dfs, Some("Z")), Err(VizError::UnknownNode(_))));
    }

    #[test]
    fn test_add_edge_validation() {
        let mut graph = Graph::example();
        assert!(matches!(graph.add_edge(Some("A"), None), Err(VizError::MissingEndpoints)));
        assert!(matches!(graph.add_edge(Some("A"), Some("A")), Err(VizError::SameEndpoints)));
        assert!(matches!(graph.add_edge(Some("B"), Some("A")), Err(VizError::DuplicateEdge)));
        assert!(matches!(graph.add_edge(Some("A"), Some("Q")), Err(VizError::UnknownNode(_))));
        assert_eq!(graph.edges().len(), 7);

        let message = graph.add_edge(Some("A"), Some("F")).unwrap();
        assert_eq!(message, "Added edge from A to F");
        assert_eq!(graph.adjacency()["F"], vec!["C", "E", "A"]);
    }

    #[test]
    fn test_add_node() {
        let mut graph = Graph::example();
        graph.add_node("G", 500.0, 300.0).unwrap();
        assert!(graph.contains("G"));
        assert!(matches!(graph.add_node("G", 0.0, 0.0), Err(VizError::DuplicateNode(_))));
        assert!(matches!(graph.add_node("  ", 0.0, 0.0), Err(VizError::MissingInput(_))));
    }

    #[test]
    fn test_isolated_start() {
        let mut graph = Graph::example();
        graph.add_node("G", 500.0, 300.0).unwrap();
        let run = graph.bfs_steps("G").unwrap();
        assert_eq!(run.order, vec!["G"]);
        assert_eq!(run.log.len(), 2);
    }

    #[test]
    fn test_visualizer_start_and_messages() {
        let mut viz = GraphVisualizer::default();
        assert!(viz.start().is_err());
        assert_eq!(viz.message(), Some("Please select a start node"));

        viz.set_start(Some("A".to_string()));
        viz.start().unwrap();
        assert_eq!(viz.message(), Some("BFS traversal from node A"));
        assert!(viz.replay().is_playing());
        assert_eq!(viz.replay().step_duration_ms(), TRAVERSAL_STEP_MS);
    }
}
