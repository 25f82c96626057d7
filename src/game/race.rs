//! Race Resolution
//!
//! Progress interpolation for the marker animation and the outcome
//! comparator. Both racers share one time signal spanning the whole race,
//! so they finish the animation together; the outcome is decided purely by
//! segment count.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::vec2::Vec2;
use crate::game::graph::{Graph, NodeIndex};

/// Ticks of race animation per node of the longer path.
pub const TICKS_PER_NODE: u32 = 70;

/// Final race outcome. Fewer segments wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaceOutcome {
    /// Player's path has fewer segments.
    PlayerWins,
    /// Opponent's path has fewer segments.
    OpponentWins,
    /// Equal segment counts.
    Tie,
}

impl RaceOutcome {
    /// User-facing result string.
    pub fn status_text(&self) -> &'static str {
        match self {
            RaceOutcome::PlayerWins => "Player wins!",
            RaceOutcome::OpponentWins => "Opponent wins!",
            RaceOutcome::Tie => "It's a tie!",
        }
    }
}

/// Compare two complete paths by segment count.
///
/// Decided once when the race clock reaches 1; independent of the animation.
pub fn resolve(player_path: &[NodeIndex], opponent_path: &[NodeIndex]) -> RaceOutcome {
    match player_path.len().cmp(&opponent_path.len()) {
        std::cmp::Ordering::Less => RaceOutcome::PlayerWins,
        std::cmp::Ordering::Greater => RaceOutcome::OpponentWins,
        std::cmp::Ordering::Equal => RaceOutcome::Tie,
    }
}

/// Interpolated marker position along `path` at time fraction `t`.
///
/// `t` maps onto the path's segments as `u = t * segments`; the segment
/// index is `floor(u)` clamped to the valid range and the fractional part
/// drives a linear interpolation between the segment's endpoints. At
/// `t >= 1` the position clamps to the final node, and a single-node path
/// sits on its one node for all `t`.
///
/// Returns `None` when a path index has no node in the graph; callers treat
/// that as a skipped frame.
pub fn interpolate(graph: &Graph, path: &[NodeIndex], t: f32) -> Option<Vec2> {
    let first = *path.first()?;
    let segments = path.len() - 1;
    if segments == 0 {
        return Some(graph.node(first)?.pos);
    }

    let u = t * segments as f32;
    let mut seg_idx = u.floor() as isize;
    let mut frac = u - seg_idx as f32;
    if seg_idx >= segments as isize {
        seg_idx = segments as isize - 1;
        frac = 1.0;
    }
    if seg_idx < 0 {
        seg_idx = 0;
        frac = 0.0;
    }
    let seg_idx = seg_idx as usize;

    let a = graph.node(*path.get(seg_idx)?)?.pos;
    let b = graph.node(*path.get(seg_idx + 1)?)?.pos;
    Some(a.lerp(b, frac))
}

/// Marker positions for one animation frame.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FrameUpdate {
    /// Player marker position
    pub player_marker: Vec2,
    /// Opponent marker position
    pub opponent_marker: Vec2,
    /// Elapsed fraction of the race, in `[0, 1]`
    pub progress: f32,
}

/// An in-flight race between two complete paths.
///
/// Advances one tick per rendered frame. Total duration is proportional to
/// the longer path, so the shorter path's marker moves slower per segment
/// and both markers arrive at `t = 1` together.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Race {
    player_path: Vec<NodeIndex>,
    opponent_path: Vec<NodeIndex>,
    tick: u32,
    total_ticks: u32,
}

impl Race {
    /// Start a race between two complete paths.
    pub fn new(player_path: Vec<NodeIndex>, opponent_path: Vec<NodeIndex>) -> Self {
        let longest = player_path.len().max(opponent_path.len()) as u32;
        let total_ticks = (longest * TICKS_PER_NODE).max(1);
        debug!(
            player_len = player_path.len(),
            opponent_len = opponent_path.len(),
            total_ticks,
            "race started"
        );
        Self {
            player_path,
            opponent_path,
            tick: 0,
            total_ticks,
        }
    }

    /// The player's path.
    pub fn player_path(&self) -> &[NodeIndex] {
        &self.player_path
    }

    /// The opponent's path.
    pub fn opponent_path(&self) -> &[NodeIndex] {
        &self.opponent_path
    }

    /// Elapsed fraction of the race.
    pub fn progress(&self) -> f32 {
        self.tick as f32 / self.total_ticks as f32
    }

    /// Has the race clock reached the end?
    pub fn finished(&self) -> bool {
        self.tick >= self.total_ticks
    }

    /// Advance one tick and produce marker positions.
    ///
    /// Returns `None` once finished, or when a position lookup fails (a
    /// skipped frame; the clock still advances so a bad index cannot stall
    /// the race).
    pub fn advance(&mut self, graph: &Graph) -> Option<FrameUpdate> {
        if self.finished() {
            return None;
        }
        self.tick += 1;
        let t = self.progress();

        let player_marker = interpolate(graph, &self.player_path, t)?;
        let opponent_marker = interpolate(graph, &self.opponent_path, t)?;
        Some(FrameUpdate {
            player_marker,
            opponent_marker,
            progress: t,
        })
    }

    /// Final outcome, available once the clock reaches the end.
    pub fn outcome(&self) -> Option<RaceOutcome> {
        if self.finished() {
            Some(resolve(&self.player_path, &self.opponent_path))
        } else {
            None
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
