//! Waypoint Rally Demo
//!
//! Runs one scripted round end to end: generate a graph, click out a player
//! route, plan the opponent, and race the markers to the outcome.

use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use waypoint_rally::{
    game::{
        plan_opponent_path, Game, GameConfig, NodeIndex, PlanConfig, RaceOutcome, RoundPhase,
    },
    DeterministicRng, TICKS_PER_NODE, VERSION,
};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Waypoint Rally v{}", VERSION);
    info!("Race speed: {} ticks per node", TICKS_PER_NODE);

    demo_round(12345)?;
    Ok(())
}

/// Round summary for the final dump.
#[derive(Serialize)]
struct RoundSummary {
    seed: u64,
    player_path: Vec<NodeIndex>,
    opponent_path: Vec<NodeIndex>,
    outcome: RaceOutcome,
}

/// Play one full round with a scripted player.
fn demo_round(seed: u64) -> anyhow::Result<()> {
    info!("=== Starting Demo Round ===");
    info!("Seed: {}", seed);

    let mut game = Game::new(GameConfig::default(), seed);
    log_events(&mut game);

    let graph = game.round().graph();
    info!(
        "Graph: {} nodes, {} edges",
        graph.nodes().len(),
        graph.edges().len()
    );
    for (idx, node) in graph.nodes().iter().enumerate() {
        info!("  node {}: {:?} at {}", idx, node.kind, node.pos);
    }

    // Script the player: walk a valid route found with a scratch RNG, fed
    // in pick by pick the way a pointer would deliver it.
    let route = plan_opponent_path(
        game.round().graph(),
        &mut DeterministicRng::new(seed ^ 0x5157),
        &PlanConfig::default(),
    )?;
    info!("Player route: {:?}", route);
    for &idx in &route[1..] {
        game.on_node_picked(idx);
        log_events(&mut game);
    }

    game.on_start_race()?;
    log_events(&mut game);

    // Drive the animation one frame at a time, reporting once per node.
    let generation = game.generation();
    let mut frames = 0u32;
    while game.round().phase() == RoundPhase::Racing {
        if let Some(frame) = game.on_frame(generation) {
            frames += 1;
            if frames % TICKS_PER_NODE == 0 {
                info!(
                    "t={:.2}: player at {}, opponent at {}",
                    frame.progress, frame.player_marker, frame.opponent_marker
                );
            }
        }
    }
    log_events(&mut game);

    let race = game
        .round()
        .race()
        .ok_or_else(|| anyhow::anyhow!("race state missing after finish"))?;
    let outcome = game
        .round()
        .outcome()
        .ok_or_else(|| anyhow::anyhow!("outcome missing after finish"))?;

    let summary = RoundSummary {
        seed,
        player_path: race.player_path().to_vec(),
        opponent_path: race.opponent_path().to_vec(),
        outcome,
    };
    info!("=== Round Summary ===");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Drain pending events and log their status lines.
fn log_events(game: &mut Game) {
    for event in game.take_events() {
        if let Some(text) = event.status_text() {
            info!("status: {}", text);
        }
    }
}
