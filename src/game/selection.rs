//! Player Path Selection
//!
//! State machine for the player's in-progress route. Picks arrive as plain
//! node indices (the renderer resolves pointer hits to indices before the
//! core sees anything), and illegal picks are no-ops.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::game::graph::{Graph, NodeIndex};

/// Selection phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionState {
    /// Player is still extending the route.
    #[default]
    Selecting,
    /// Route reaches the End node; terminal until the round resets.
    Complete,
}

/// What a pick did to the selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickResult {
    /// Pick was not in the reachable set (or selection already complete);
    /// nothing changed.
    Ignored,
    /// Route extended; these nodes are now selectable.
    Advanced {
        /// Reachable set from the new tail, for highlighting.
        selectable: Vec<NodeIndex>,
    },
    /// Route extended but no further legal move exists. The selection stays
    /// in `Selecting`; recovery is a round reset.
    Stuck,
    /// Route reached the End node.
    Completed,
}

/// The player's route under construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PathSelection {
    path: Vec<NodeIndex>,
    state: SelectionState,
}

impl PathSelection {
    /// Start a fresh selection at the graph's Start node.
    pub fn new(graph: &Graph) -> Self {
        Self {
            path: vec![graph.start()],
            state: SelectionState::Selecting,
        }
    }

    /// The route so far. Never empty; `path()[0]` is the Start node.
    pub fn path(&self) -> &[NodeIndex] {
        &self.path
    }

    /// Tail of the route: where the next pick must connect.
    pub fn current(&self) -> NodeIndex {
        self.path[self.path.len() - 1]
    }

    /// Current selection phase.
    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Has the route reached the End node?
    pub fn is_complete(&self) -> bool {
        self.state == SelectionState::Complete
    }

    /// Nodes the player may legally pick next.
    pub fn selectable(&self, graph: &Graph) -> Vec<NodeIndex> {
        if self.is_complete() {
            return Vec::new();
        }
        graph.reachable(self.current(), &self.path)
    }

    /// Apply a "node picked" event.
    ///
    /// Legal only while `Selecting` and only for members of the reachable
    /// set of the current tail; everything else is ignored without a state
    /// change. A legal pick of the End node completes the selection.
    pub fn pick(&mut self, graph: &Graph, idx: NodeIndex) -> PickResult {
        if self.state == SelectionState::Complete {
            return PickResult::Ignored;
        }
        if !self.selectable(graph).contains(&idx) {
            return PickResult::Ignored;
        }

        self.path.push(idx);

        if idx == graph.end() {
            self.state = SelectionState::Complete;
            debug!(len = self.path.len(), "player route complete");
            return PickResult::Completed;
        }

        let selectable = self.selectable(graph);
        if selectable.is_empty() {
            debug!(len = self.path.len(), "player route stuck");
            PickResult::Stuck
        } else {
            PickResult::Advanced { selectable }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::Vec2;
    use crate::game::graph::{Node, NodeKind};

    fn diamond_graph() -> Graph {
        // Start 0, two interior routes (1 and 2), a trap node 3 hanging off
        // node 1, End 4 (the End node is always last).
        let nodes = vec![
            Node { pos: Vec2::new(0.0, 0.0), kind: NodeKind::Start },
            Node { pos: Vec2::new(1.0, 1.0), kind: NodeKind::Mid },
            Node { pos: Vec2::new(1.0, -1.0), kind: NodeKind::Mid },
            Node { pos: Vec2::new(1.0, 2.0), kind: NodeKind::Mid },
            Node { pos: Vec2::new(2.0, 0.0), kind: NodeKind::End },
        ];
        Graph::from_parts(nodes, [(0, 1), (0, 2), (1, 4), (2, 4), (1, 3)])
    }

    #[test]
    fn test_starts_at_start_node() {
        let graph = diamond_graph();
        let selection = PathSelection::new(&graph);

        assert_eq!(selection.path(), &[0]);
        assert_eq!(selection.current(), 0);
        assert_eq!(selection.state(), SelectionState::Selecting);
        assert_eq!(selection.selectable(&graph), vec![1, 2]);
    }

    #[test]
    fn test_legal_pick_advances() {
        let graph = diamond_graph();
        let mut selection = PathSelection::new(&graph);

        let result = selection.pick(&graph, 1);
        assert_eq!(result, PickResult::Advanced { selectable: vec![4, 3] });
        assert_eq!(selection.path(), &[0, 1]);
        assert_eq!(selection.current(), 1);
    }

    #[test]
    fn test_illegal_pick_is_noop() {
        let graph = diamond_graph();
        let mut selection = PathSelection::new(&graph);

        // Node 4 (the End) is not adjacent to the start.
        assert_eq!(selection.pick(&graph, 4), PickResult::Ignored);
        // Neither is the trap node 3.
        assert_eq!(selection.pick(&graph, 3), PickResult::Ignored);
        // Re-picking the current node is also illegal.
        assert_eq!(selection.pick(&graph, 0), PickResult::Ignored);
        // Out-of-range index.
        assert_eq!(selection.pick(&graph, 99), PickResult::Ignored);

        assert_eq!(selection.path(), &[0]);
        assert_eq!(selection.state(), SelectionState::Selecting);
    }

    #[test]
    fn test_revisit_is_illegal() {
        let graph = diamond_graph();
        let mut selection = PathSelection::new(&graph);

        selection.pick(&graph, 1);
        // 0 is visited: picking it back is ignored.
        assert_eq!(selection.pick(&graph, 0), PickResult::Ignored);
        assert_eq!(selection.path(), &[0, 1]);
    }

    #[test]
    fn test_reaching_end_completes() {
        let graph = diamond_graph();
        let mut selection = PathSelection::new(&graph);

        assert!(matches!(selection.pick(&graph, 2), PickResult::Advanced { .. }));
        assert_eq!(selection.pick(&graph, 4), PickResult::Completed);

        assert!(selection.is_complete());
        assert_eq!(selection.path(), &[0, 2, 4]);
        assert!(selection.selectable(&graph).is_empty());
    }

    #[test]
    fn test_picks_after_complete_ignored() {
        let graph = diamond_graph();
        let mut selection = PathSelection::new(&graph);

        selection.pick(&graph, 2);
        selection.pick(&graph, 4);
        assert!(selection.is_complete());

        assert_eq!(selection.pick(&graph, 1), PickResult::Ignored);
        assert_eq!(selection.path(), &[0, 2, 4]);
    }

    #[test]
    fn test_dead_end_reports_stuck() {
        let graph = diamond_graph();
        let mut selection = PathSelection::new(&graph);

        selection.pick(&graph, 1);
        // Node 3 only connects back to 1, which is visited.
        assert_eq!(selection.pick(&graph, 3), PickResult::Stuck);

        // Stuck is not terminal: state stays Selecting, path keeps the pick.
        assert_eq!(selection.state(), SelectionState::Selecting);
        assert_eq!(selection.path(), &[0, 1, 3]);
        assert!(selection.selectable(&graph).is_empty());
    }
}
