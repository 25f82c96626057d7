//! Game Logic Module
//!
//! The round's core: graph generation, path selection, opponent planning,
//! and race resolution. Everything here is deterministic given a seed; no
//! rendering types appear anywhere.
//!
//! ## Module Structure
//!
//! - `graph`: node placement, edge generation, reachability
//! - `planner`: opponent route planning with retry-on-dead-end
//! - `selection`: player route state machine
//! - `race`: progress interpolation and outcome comparison
//! - `round`: round lifecycle and the session facade
//! - `events`: status signals for the UI layer

pub mod events;
pub mod graph;
pub mod planner;
pub mod race;
pub mod round;
pub mod selection;

// Re-export key types
pub use events::RoundEvent;
pub use graph::{Edge, Graph, GraphConfig, Node, NodeIndex, NodeKind};
pub use planner::{plan_opponent_path, PlanConfig, PlanError};
pub use race::{interpolate, resolve, FrameUpdate, Race, RaceOutcome, TICKS_PER_NODE};
pub use round::{Game, GameConfig, Round, RoundError, RoundPhase};
pub use selection::{PathSelection, PickResult, SelectionState};
