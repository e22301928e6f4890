//! Horde Arena headless driver
//!
//! Runs a scripted session against the built-in level ladder: a simple bot
//! kites away from the horde while firing at the nearest agent. Useful for
//! profiling, balance tuning and eyeballing the event stream without a
//! renderer attached.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec3;
use horde_arena::consts::*;
use horde_arena::sim::{tick, GameEvent, GameState, TickInput};
use horde_arena::HighScores;

/// Frames before the driver gives up on a session
const MAX_FRAMES: u64 = 60 * 60 * 10;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(now_ms);
    log::info!("starting session with seed {seed}");

    let mut state = GameState::new(seed);
    state.start_level();

    let mut frames = 0u64;
    while !state.game_over && frames < MAX_FRAMES {
        let input = bot_input(&state);
        tick(&mut state, &input, SIM_DT);
        frames += 1;

        let mut finished = false;
        for event in state.drain_events() {
            match event {
                GameEvent::LevelCompleted { level, bonus } => {
                    println!(
                        "level {level} cleared (+{bonus}), score {}",
                        state.score
                    );
                    if state.advance_level() {
                        state.start_level();
                    }
                }
                GameEvent::AllLevelsCompleted => {
                    println!("all levels survived");
                    finished = true;
                }
                GameEvent::LevelFailed { level } => {
                    println!("overrun on level {level}");
                }
                GameEvent::ItemPickedUp { kind } => {
                    log::debug!("picked up {kind:?}");
                }
                _ => {}
            }
        }
        if finished {
            break;
        }

        if frames % 600 == 0 {
            let snap = state.snapshot();
            log::info!(
                "frame {}: level {} ({:.0}s left), hp {}, score {}, {} agents",
                snap.frame,
                snap.level,
                snap.level_secs_remaining,
                snap.player_health,
                snap.score,
                snap.agents.len()
            );
        }
    }

    println!(
        "session over: score {}, reached level {}",
        state.score, state.level.current
    );

    let path = Path::new("highscores.json");
    let mut scores = HighScores::load(path);
    if let Some(rank) = scores.add_score(state.score, state.level.current, now_ms() as f64) {
        println!("new high score, rank {rank}");
        if let Err(err) = scores.save(path) {
            log::warn!("failed to save high scores: {err}");
        }
    }
}

/// Kite-and-shoot bot: back away from the nearest agent, aim at it, hold fire
fn bot_input(state: &GameState) -> TickInput {
    let nearest = state
        .agents
        .iter()
        .min_by(|a, b| {
            a.pos
                .distance(state.player.pos)
                .total_cmp(&b.pos.distance(state.player.pos))
        })
        .map(|a| a.pos);

    match nearest {
        Some(target) => {
            let away = (state.player.pos - target).normalize_or_zero();
            // Drift back toward the center so kiting never pins us to a wall
            let homeward = (-state.player.pos).normalize_or_zero() * 0.3;
            TickInput {
                move_dir: Vec3::new(away.x + homeward.x, 0.0, away.z + homeward.z),
                aim_target: Some(target),
                fire: true,
                restart: false,
            }
        }
        None => TickInput::default(),
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
