//! Opponent Path Planner
//!
//! Random walk from Start toward End with full restart on dead ends.
//! The walk itself mirrors what a player does by hand: step to any
//! not-yet-visited neighbor until the goal is hit.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::core::rng::IndexSource;
use crate::game::graph::{Graph, NodeIndex};

/// Configuration for opponent planning.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Hard cap on nodes per attempt; exceeding it counts as a dead end
    pub max_path_len: usize,
    /// Attempts before giving up with `PlanError::GenerationFailed`
    pub max_attempts: u32,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            max_path_len: 20,
            max_attempts: 1000,
        }
    }
}

/// Planning errors.
#[derive(Debug, Clone, Error)]
pub enum PlanError {
    /// Every attempt dead-ended. With the generation-time connectivity
    /// guarantee in place this indicates a broken graph, not bad luck.
    #[error("no start-to-end path found in {attempts} attempts")]
    GenerationFailed {
        /// Attempts made before giving up.
        attempts: u32,
    },
}

/// Plan a random Start-to-End path.
///
/// Each attempt grows a path from Start, choosing uniformly among the
/// reachable (unvisited, edge-connected) neighbors of the tail. An empty
/// reachable set or an over-long path abandons the attempt entirely; there
/// is no backtracking. Attempts are bounded by `config.max_attempts`.
///
/// The chooser is any [`IndexSource`], so tests can substitute a fixed
/// picker and get a reproducible path.
pub fn plan_opponent_path<C: IndexSource>(
    graph: &Graph,
    chooser: &mut C,
    config: &PlanConfig,
) -> Result<Vec<NodeIndex>, PlanError> {
    let start = graph.start();
    let end = graph.end();

    for attempt in 0..config.max_attempts {
        let mut path = vec![start];
        let mut current = start;

        loop {
            let options = graph.reachable(current, &path);
            if options.is_empty() {
                trace!(attempt, len = path.len(), "attempt dead-ended");
                break;
            }

            current = options[chooser.next_index(options.len())];
            path.push(current);

            if current == end {
                debug!(attempt, len = path.len(), "opponent path planned");
                return Ok(path);
            }
            if path.len() >= config.max_path_len {
                trace!(attempt, "attempt exceeded max path length");
                break;
            }
        }
    }

    Err(PlanError::GenerationFailed {
        attempts: config.max_attempts,
    })
}

// =============================================================================
// TESTS
// =============================================================================
