//! Waypoint Graph
//!
//! Node placement, edge generation, and reachability queries for one round.
//! The graph is created once per round and never mutated afterwards; a new
//! round builds a fresh graph.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::rng::{DeterministicRng, IndexSource};
use crate::core::vec2::Vec2;

/// Stable node identifier: position in the round's node sequence.
pub type NodeIndex = usize;

/// Role of a node on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Route origin, placed on the left world edge.
    Start,
    /// Intermediate waypoint in the interior.
    Mid,
    /// Route goal, placed on the right world edge.
    End,
}

/// A waypoint on the map.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Position in the map plane
    pub pos: Vec2,
    /// Node role
    pub kind: NodeKind,
}

/// Undirected connection between two nodes.
///
/// Endpoints are normalized so `a < b`, which makes the no-duplicate
/// invariant a plain equality check regardless of orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    a: NodeIndex,
    b: NodeIndex,
}

impl Edge {
    /// Create a normalized edge. Returns `None` for self-loops.
    pub fn new(a: NodeIndex, b: NodeIndex) -> Option<Self> {
        if a == b {
            return None;
        }
        Some(if a < b { Self { a, b } } else { Self { a: b, b: a } })
    }

    /// Lower endpoint.
    pub fn a(&self) -> NodeIndex {
        self.a
    }

    /// Upper endpoint.
    pub fn b(&self) -> NodeIndex {
        self.b
    }

    /// The endpoint opposite to `idx`, if `idx` is an endpoint.
    #[inline]
    pub fn other(&self, idx: NodeIndex) -> Option<NodeIndex> {
        if self.a == idx {
            Some(self.b)
        } else if self.b == idx {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Configuration for graph generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Number of intermediate (Mid) nodes
    pub mid_count: usize,
    /// World side length; nodes live in `[-extent/2, extent/2]` per axis
    pub extent: f32,
    /// Target edge draws per node (actual degree varies with collisions)
    pub avg_degree: usize,
    /// Interior inset from each world edge for Mid node placement
    pub margin: f32,
    /// Edge-set regenerations to try before bridging Start and End directly
    pub connect_attempts: u32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            mid_count: 8,
            extent: 10.0,
            avg_degree: 3,
            margin: 1.0,
            connect_attempts: 16,
        }
    }
}

/// The waypoint graph for one round.
///
/// Immutable after generation. Node 0 is always the Start node and the last
/// node is always the End node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Generate a graph for a new round.
    ///
    /// Start lands on the left world edge, End on the right, each at a
    /// uniformly random offset. Mid nodes are uniform in the interior inset
    /// by `config.margin`. Every node draws `avg_degree` distinct targets;
    /// an edge is added only if the unordered pair is not already present.
    ///
    /// The returned graph always contains a Start-to-End path: if the random
    /// edge set leaves End unreachable, the edge set is regenerated up to
    /// `connect_attempts` times and, failing that, a direct Start-End bridge
    /// edge is inserted.
    pub fn generate(config: &GraphConfig, rng: &mut DeterministicRng) -> Self {
        let half = config.extent / 2.0;
        let inner = half - config.margin;

        let mut nodes = Vec::with_capacity(config.mid_count + 2);
        nodes.push(Node {
            pos: Vec2::new(-half, rng.next_f32_range(-half, half)),
            kind: NodeKind::Start,
        });
        for _ in 0..config.mid_count {
            nodes.push(Node {
                pos: Vec2::new(
                    rng.next_f32_range(-inner, inner),
                    rng.next_f32_range(-inner, inner),
                ),
                kind: NodeKind::Mid,
            });
        }
        nodes.push(Node {
            pos: Vec2::new(half, rng.next_f32_range(-half, half)),
            kind: NodeKind::End,
        });

        let mut graph = Self {
            nodes,
            edges: Vec::new(),
        };

        for attempt in 0..=config.connect_attempts {
            graph.edges = generate_edges(graph.nodes.len(), config.avg_degree, rng);
            if graph.can_reach(graph.start(), graph.end()) {
                return graph;
            }
            debug!(attempt, "end unreachable from start, regenerating edges");
        }

        // All regenerations left End stranded: bridge it so planners never
        // face a graph with no Start-to-End path.
        debug!("bridging start and end directly");
        if let Some(bridge) = Edge::new(graph.start(), graph.end()) {
            if !graph.edges.contains(&bridge) {
                graph.edges.push(bridge);
            }
        }
        graph
    }

    /// Build a graph from explicit parts.
    ///
    /// Self-loops and duplicate pairs are dropped so the edge-set invariants
    /// hold for hand-built graphs too. No connectivity guarantee is applied;
    /// callers own that for fixed layouts.
    pub fn from_parts(nodes: Vec<Node>, edges: impl IntoIterator<Item = (NodeIndex, NodeIndex)>) -> Self {
        let mut deduped: Vec<Edge> = Vec::new();
        for (a, b) in edges {
            if let Some(edge) = Edge::new(a, b) {
                if !deduped.contains(&edge) {
                    deduped.push(edge);
                }
            }
        }
        Self { nodes, edges: deduped }
    }

    /// All nodes, in identity order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges, in generation order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Node lookup by index.
    pub fn node(&self, idx: NodeIndex) -> Option<&Node> {
        self.nodes.get(idx)
    }

    /// Index of the Start node.
    pub fn start(&self) -> NodeIndex {
        0
    }

    /// Index of the End node.
    pub fn end(&self) -> NodeIndex {
        self.nodes.len() - 1
    }

    /// Is there an edge between `a` and `b` (either orientation)?
    pub fn has_edge(&self, a: NodeIndex, b: NodeIndex) -> bool {
        match Edge::new(a, b) {
            Some(edge) => self.edges.contains(&edge),
            None => false,
        }
    }

    /// Nodes connected to `current` by an edge and not already visited.
    ///
    /// Pure and O(edges). The result order follows the edge ordering, so a
    /// fixed graph yields a fixed candidate order for planners.
    pub fn reachable(&self, current: NodeIndex, visited: &[NodeIndex]) -> Vec<NodeIndex> {
        self.edges
            .iter()
            .filter_map(|edge| edge.other(current))
            .filter(|idx| !visited.contains(idx))
            .collect()
    }

    /// Is `to` reachable from `from` through any edge sequence?
    ///
    /// Breadth-first flood fill; used to guarantee path existence before any
    /// planner runs.
    pub fn can_reach(&self, from: NodeIndex, to: NodeIndex) -> bool {
        if from == to {
            return true;
        }
        let mut seen = vec![false; self.nodes.len()];
        let mut queue = VecDeque::new();
        seen[from] = true;
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            for edge in &self.edges {
                if let Some(next) = edge.other(current) {
                    if next == to {
                        return true;
                    }
                    if !seen[next] {
                        seen[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        false
    }
}

/// Draw `avg_degree` distinct targets per node and keep the unordered pairs
/// not already present.
fn generate_edges(
    node_count: usize,
    avg_degree: usize,
    rng: &mut DeterministicRng,
) -> Vec<Edge> {
    // A node cannot have more distinct targets than there are other nodes.
    let degree = avg_degree.min(node_count.saturating_sub(1));
    let mut edges: Vec<Edge> = Vec::new();

    for i in 0..node_count {
        let mut targets: Vec<NodeIndex> = Vec::with_capacity(degree);
        while targets.len() < degree {
            let j = rng.next_index(node_count);
            if j != i && !targets.contains(&j) {
                targets.push(j);
            }
        }
        for j in targets {
            if let Some(edge) = Edge::new(i, j) {
                if !edges.contains(&edge) {
                    edges.push(edge);
                }
            }
        }
    }
    edges
}

// =============================================================================
// TESTS
// =============================================================================
