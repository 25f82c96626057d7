//! Round Lifecycle
//!
//! One round owns a graph, the player's selection, the opponent's route,
//! and the race. Resets never mutate a round in place: the whole record is
//! replaced and the generation counter bumps, so frame callbacks scheduled
//! against an old round identify themselves as stale and do nothing.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::core::rng::DeterministicRng;
use crate::game::events::RoundEvent;
use crate::game::graph::{Graph, GraphConfig, NodeIndex};
use crate::game::planner::{plan_opponent_path, PlanConfig, PlanError};
use crate::game::race::{resolve, FrameUpdate, Race, RaceOutcome};
use crate::game::selection::{PathSelection, PickResult};

/// Phase of the current round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Player is picking a route.
    Selecting,
    /// Player route complete; waiting for the start-race press.
    Ready,
    /// Race animation running.
    Racing,
    /// Race over; outcome available.
    Finished,
}

/// Errors from driving a round out of order.
#[derive(Debug, Clone, Error)]
pub enum RoundError {
    /// Start-race pressed before the player route reached the End node.
    #[error("player route is not complete")]
    RouteNotReady,

    /// Start-race pressed while a race is already running or finished.
    #[error("race already started")]
    RaceAlreadyStarted,

    /// Opponent planning failed.
    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// State of a single round. Replaced wholesale on reset.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Round {
    generation: u64,
    graph: Graph,
    selection: PathSelection,
    race: Option<Race>,
    phase: RoundPhase,
    outcome: Option<RaceOutcome>,
}

impl Round {
    /// Generate a fresh round under the given generation token.
    pub fn begin(config: &GraphConfig, generation: u64, rng: &mut DeterministicRng) -> Self {
        let graph = Graph::generate(config, rng);
        let selection = PathSelection::new(&graph);
        info!(
            generation,
            nodes = graph.nodes().len(),
            edges = graph.edges().len(),
            "round started"
        );
        Self {
            generation,
            graph,
            selection,
            race: None,
            phase: RoundPhase::Selecting,
            outcome: None,
        }
    }

    /// Generation token this round was created under.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The round's graph, for drawing nodes and edges.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The player's selection.
    pub fn selection(&self) -> &PathSelection {
        &self.selection
    }

    /// The race, once started.
    pub fn race(&self) -> Option<&Race> {
        self.race.as_ref()
    }

    /// Current phase.
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Final outcome, once the race finished.
    pub fn outcome(&self) -> Option<RaceOutcome> {
        self.outcome
    }
}

/// Top-level configuration for a game session.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GameConfig {
    /// Graph generation parameters
    pub graph: GraphConfig,
    /// Opponent planning parameters
    pub plan: PlanConfig,
}

/// The game session: current round plus the machinery to replace it.
///
/// All external input arrives through the `on_*` methods as plain values;
/// resulting status signals are queued and drained with [`Game::take_events`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game {
    config: GameConfig,
    rng: DeterministicRng,
    generation: u64,
    round: Round,
    /// Events queued since the last drain
    #[serde(skip)]
    pending_events: Vec<RoundEvent>,
}

impl Game {
    /// Create a session and start its first round.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut rng = DeterministicRng::new(seed);
        let generation = 1;
        let round = Round::begin(&config.graph, generation, &mut rng);
        let mut game = Self {
            config,
            rng,
            generation,
            round,
            pending_events: Vec::new(),
        };
        game.push_round_started();
        game
    }

    /// Discard the current round entirely and start a new one.
    ///
    /// Bumps the generation token so in-flight frame callbacks for the old
    /// round become no-ops.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.round = Round::begin(&self.config.graph, self.generation, &mut self.rng);
        self.pending_events.clear();
        self.push_round_started();
    }

    /// Current generation token. Frame callbacks must carry this back into
    /// [`Game::on_frame`].
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The current round.
    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Apply a "node picked" event from the pick/raycast layer.
    ///
    /// Outside the selection phase, and for picks not in the reachable set,
    /// this is a no-op.
    pub fn on_node_picked(&mut self, idx: NodeIndex) {
        if self.round.phase != RoundPhase::Selecting {
            return;
        }

        match self.round.selection.pick(&self.round.graph, idx) {
            PickResult::Ignored => {
                trace!(idx, "pick ignored");
            }
            PickResult::Advanced { selectable } => {
                self.pending_events
                    .push(RoundEvent::SelectableChanged { selectable });
            }
            PickResult::Stuck => {
                self.pending_events
                    .push(RoundEvent::SelectableChanged { selectable: Vec::new() });
                self.pending_events.push(RoundEvent::Stuck);
            }
            PickResult::Completed => {
                self.round.phase = RoundPhase::Ready;
                self.pending_events
                    .push(RoundEvent::SelectableChanged { selectable: Vec::new() });
                self.pending_events.push(RoundEvent::PathReady);
            }
        }
    }

    /// Apply the "start race" press.
    ///
    /// Plans the opponent's route and starts the race clock. Only legal once
    /// the player's route is complete and before any race has started.
    pub fn on_start_race(&mut self) -> Result<(), RoundError> {
        match self.round.phase {
            RoundPhase::Selecting => return Err(RoundError::RouteNotReady),
            RoundPhase::Racing | RoundPhase::Finished => {
                return Err(RoundError::RaceAlreadyStarted)
            }
            RoundPhase::Ready => {}
        }

        let opponent_path =
            plan_opponent_path(&self.round.graph, &mut self.rng, &self.config.plan)?;
        debug!(generation = self.generation, ?opponent_path, "race starting");

        self.round.race = Some(Race::new(
            self.round.selection.path().to_vec(),
            opponent_path.clone(),
        ));
        self.round.phase = RoundPhase::Racing;
        self.pending_events
            .push(RoundEvent::RaceStarted { opponent_path });
        Ok(())
    }

    /// Advance the race by one frame.
    ///
    /// `generation` is the token the caller captured when scheduling this
    /// frame; a mismatch means the round was reset underneath the callback
    /// and the tick is dropped. Returns marker positions for the frame, or
    /// `None` for stale, out-of-phase, or skipped frames.
    pub fn on_frame(&mut self, generation: u64) -> Option<FrameUpdate> {
        if generation != self.generation {
            trace!(generation, current = self.generation, "stale frame dropped");
            return None;
        }
        if self.round.phase != RoundPhase::Racing {
            return None;
        }

        let race = self.round.race.as_mut()?;
        let frame = race.advance(&self.round.graph);

        if race.finished() {
            let outcome = resolve(race.player_path(), race.opponent_path());
            self.round.outcome = Some(outcome);
            self.round.phase = RoundPhase::Finished;
            info!(generation, ?outcome, "race finished");
            self.pending_events.push(RoundEvent::RaceFinished { outcome });
        }

        frame
    }

    /// Drain queued events.
    pub fn take_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn push_round_started(&mut self) {
        let selectable = self.round.selection.selectable(&self.round.graph);
        self.pending_events.push(RoundEvent::RoundStarted {
            generation: self.generation,
            selectable,
        });
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
    use crate::game::race::TICKS_PER_NODE;

    fn line_nodes() -> Vec<Node> {
        vec![
            Node { pos: Vec2::new(0.0, 0.0), kind: NodeKind::Start },
            Node { pos: Vec2::new(1.0, 0.0), kind: NodeKind::Mid },
            Node { pos: Vec2::new(2.0, 0.0), kind: NodeKind::End },
        ]
    }

    /// Build a game, then swap in a hand-made graph so tests control the
    /// topology exactly.
    fn game_with_graph(graph: Graph, seed: u64) -> Game {
        let mut game = Game::new(GameConfig::default(), seed);
        game.rng = DeterministicRng::new(seed);
        game.round = Round {
            generation: game.generation,
            selection: PathSelection::new(&graph),
            graph,
            race: None,
            phase: RoundPhase::Selecting,
            outcome: None,
        };
        game.pending_events.clear();
        game
    }

    fn run_race_to_end(game: &mut Game) {
        let generation = game.generation();
        for _ in 0..10_000 {
            game.on_frame(generation);
            if game.round().phase() == RoundPhase::Finished {
                return;
            }
        }
        panic!("race never finished");
    }

    #[test]
    fn test_new_game_emits_round_started() {
        let mut game = Game::new(GameConfig::default(), 1);
        let events = game.take_events();

        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            RoundEvent::RoundStarted { generation: 1, selectable } if !selectable.is_empty()
        ));
        assert_eq!(game.round().phase(), RoundPhase::Selecting);
    }

    #[test]
    fn test_start_race_requires_complete_route() {
        let mut game = Game::new(GameConfig::default(), 2);
        assert!(matches!(
            game.on_start_race(),
            Err(RoundError::RouteNotReady)
        ));
    }

    #[test]
    fn test_tie_on_identical_routes() {
        // Only one route exists, so the opponent must mirror the player.
        let graph = Graph::from_parts(line_nodes(), [(0, 1), (1, 2)]);
        let mut game = game_with_graph(graph, 5);

        game.on_node_picked(1);
        game.on_node_picked(2);
        assert_eq!(game.round().phase(), RoundPhase::Ready);

        let events = game.take_events();
        assert!(events.contains(&RoundEvent::PathReady));

        game.on_start_race().unwrap();
        run_race_to_end(&mut game);

        assert_eq!(game.round().outcome(), Some(RaceOutcome::Tie));
        let events = game.take_events();
        assert!(events.contains(&RoundEvent::RaceFinished { outcome: RaceOutcome::Tie }));
    }

    #[test]
    fn test_opponent_wins_via_shortcut() {
        // Shortcut edge listed first, so the opponent's first candidate at
        // the start node is the End node itself. Seed 42's first draw is
        // even, which selects candidate 0.
        let graph = Graph::from_parts(line_nodes(), [(0, 2), (0, 1), (1, 2)]);
        let mut game = game_with_graph(graph, 42);

        game.on_node_picked(1);
        game.on_node_picked(2);
        game.on_start_race().unwrap();

        let race = game.round().race().unwrap();
        assert_eq!(race.opponent_path(), &[0, 2]);
        assert_eq!(race.player_path(), &[0, 1, 2]);

        run_race_to_end(&mut game);
        assert_eq!(game.round().outcome(), Some(RaceOutcome::OpponentWins));
    }

    #[test]
    fn test_double_start_race_rejected() {
        let graph = Graph::from_parts(line_nodes(), [(0, 1), (1, 2)]);
        let mut game = game_with_graph(graph, 5);

        game.on_node_picked(1);
        game.on_node_picked(2);
        game.on_start_race().unwrap();

        assert!(matches!(
            game.on_start_race(),
            Err(RoundError::RaceAlreadyStarted)
        ));
    }

    #[test]
    fn test_picks_ignored_outside_selection() {
        let graph = Graph::from_parts(line_nodes(), [(0, 1), (1, 2)]);
        let mut game = game_with_graph(graph, 5);

        game.on_node_picked(1);
        game.on_node_picked(2);
        game.on_start_race().unwrap();
        game.take_events();

        // Racing: picks must not touch the selection.
        game.on_node_picked(1);
        assert!(game.take_events().is_empty());
        assert_eq!(game.round().selection().path(), &[0, 1, 2]);
    }

    #[test]
    fn test_frame_progress_and_finish_event() {
        let graph = Graph::from_parts(line_nodes(), [(0, 1), (1, 2)]);
        let mut game = game_with_graph(graph, 5);

        game.on_node_picked(1);
        game.on_node_picked(2);
        game.on_start_race().unwrap();
        game.take_events();

        let generation = game.generation();
        let first = game.on_frame(generation).unwrap();
        assert!(first.progress > 0.0);
        assert_eq!(first.player_marker, first.opponent_marker);

        // 3 nodes on both paths: race lasts 3 * TICKS_PER_NODE ticks total.
        for _ in 1..(3 * TICKS_PER_NODE) {
            game.on_frame(generation);
        }
        assert_eq!(game.round().phase(), RoundPhase::Finished);

        // Further frames are no-ops.
        assert!(game.on_frame(generation).is_none());
    }

    #[test]
    fn test_stale_frame_dropped() {
        let graph = Graph::from_parts(line_nodes(), [(0, 1), (1, 2)]);
        let mut game = game_with_graph(graph, 5);

        game.on_node_picked(1);
        game.on_node_picked(2);
        game.on_start_race().unwrap();

        let old_generation = game.generation();
        game.reset();

        // The old round's animation callback fires after the reset: dropped.
        assert!(game.on_frame(old_generation).is_none());
        assert_eq!(game.round().phase(), RoundPhase::Selecting);
        assert!(game.round().race().is_none());
    }

    #[test]
    fn test_reset_replaces_round_wholesale() {
        let mut game = Game::new(GameConfig::default(), 9);
        let first_generation = game.generation();

        game.reset();

        assert_eq!(game.generation(), first_generation + 1);
        assert_eq!(game.round().generation(), game.generation());
        assert_eq!(game.round().phase(), RoundPhase::Selecting);
        assert_eq!(game.round().selection().path().len(), 1);
        assert!(game.round().race().is_none());
        assert!(game.round().outcome().is_none());

        let events = game.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], RoundEvent::RoundStarted { .. }));
    }

    #[test]
    fn test_session_determinism() {
        let mut game1 = Game::new(GameConfig::default(), 777);
        let mut game2 = Game::new(GameConfig::default(), 777);

        assert_eq!(game1.round().graph().nodes(), game2.round().graph().nodes());
        assert_eq!(game1.round().graph().edges(), game2.round().graph().edges());

        game1.reset();
        game2.reset();
        assert_eq!(game1.round().graph().edges(), game2.round().graph().edges());
    }
}
