//! Core deterministic primitives.
//!
//! Everything the game logic builds on: plain 2D vectors and a seeded PRNG.
//! Given the same seed, a round is reproducible end to end.

pub mod rng;
pub mod vec2;

// Re-export core types
pub use rng::{DeterministicRng, IndexSource};
pub use vec2::Vec2;
