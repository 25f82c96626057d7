//! # Waypoint Rally Core
//!
//! Deterministic logic for a small waypoint-racing minigame: a sparse graph
//! of waypoints is generated for each round, the player clicks out a route
//! from Start to End, a random opponent plans its own route, and animated
//! markers race both routes. Fewer segments wins.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    WAYPOINT RALLY CORE                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── vec2.rs     - Map-plane 2D vector                       │
//! │  └── rng.rs      - Deterministic xoroshiro128+ PRNG          │
//! │                                                              │
//! │  game/           - Round logic (deterministic)               │
//! │  ├── graph.rs    - Node placement, edges, reachability       │
//! │  ├── planner.rs  - Opponent route planning                   │
//! │  ├── selection.rs- Player route state machine                │
//! │  ├── race.rs     - Progress interpolation, outcome           │
//! │  ├── round.rs    - Round lifecycle, session facade           │
//! │  └── events.rs   - Status signals for the UI layer           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Renderer Boundary
//!
//! Rendering (terrain mesh, lighting, camera, raycast picking) is an
//! external collaborator. It reads node and edge coordinates from
//! [`game::Graph`], feeds pick events into [`game::Game::on_node_picked`],
//! and drives [`game::Game::on_frame`] once per rendered frame. Nothing in
//! this crate touches a scene graph.
//!
//! ## Determinism Guarantee
//!
//! Given the same seed, a session produces the identical graph, opponent
//! route, and frame-by-frame marker positions on any platform. All
//! randomness flows from the seeded [`core::DeterministicRng`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use crate::core::rng::{DeterministicRng, IndexSource};
pub use crate::core::vec2::Vec2;
pub use crate::game::graph::{Graph, GraphConfig, NodeIndex, NodeKind};
pub use crate::game::race::{RaceOutcome, TICKS_PER_NODE};
pub use crate::game::round::{Game, GameConfig, RoundPhase};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
