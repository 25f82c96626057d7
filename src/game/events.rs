//! Round Events
//!
//! Signals the UI layer consumes: status-text moments and highlighting
//! updates. Events are produced by round transitions and drained by the
//! caller each time it drives the core.

use serde::{Deserialize, Serialize};

use crate::game::graph::NodeIndex;
use crate::game::race::RaceOutcome;

/// An event emitted by the current round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// A fresh round began under this generation.
    RoundStarted {
        /// Round generation token.
        generation: u64,
        /// Nodes selectable from the Start node.
        selectable: Vec<NodeIndex>,
    },

    /// The legal pick set changed; re-highlight these nodes.
    SelectableChanged {
        /// Nodes selectable from the new route tail.
        selectable: Vec<NodeIndex>,
    },

    /// Player route reached the End node; the race may start.
    PathReady,

    /// No legal move remains from the route tail; only a reset recovers.
    Stuck,

    /// Opponent planned its route and the race animation began.
    RaceStarted {
        /// The opponent's full route, for drawing.
        opponent_path: Vec<NodeIndex>,
    },

    /// The race clock reached the end.
    RaceFinished {
        /// Final comparator result.
        outcome: RaceOutcome,
    },
}

impl RoundEvent {
    /// Status line for events that carry one.
    pub fn status_text(&self) -> Option<&'static str> {
        match self {
            RoundEvent::RoundStarted { .. } => Some("Pick a route to the goal."),
            RoundEvent::SelectableChanged { .. } => None,
            RoundEvent::PathReady => Some("Ready! Press Start Race."),
            RoundEvent::Stuck => Some("No further paths!"),
            RoundEvent::RaceStarted { .. } => Some("Racing!"),
            RoundEvent::RaceFinished { outcome } => Some(outcome.status_text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        assert_eq!(
            RoundEvent::PathReady.status_text(),
            Some("Ready! Press Start Race.")
        );
        assert_eq!(
            RoundEvent::RaceFinished { outcome: RaceOutcome::Tie }.status_text(),
            Some("It's a tie!")
        );
        assert_eq!(
            RoundEvent::SelectableChanged { selectable: vec![1] }.status_text(),
            None
        );
    }
}
