//! Per-frame simulation step
//!
//! One call to [`tick`] advances the whole simulation by a fixed timestep in
//! a strict phase order: input/player, weapons, steering, projectiles,
//! collisions, spawning, level clock, invincibility. Running the same inputs
//! against the same seed reproduces the session exactly.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision;
use super::spawn;
use super::state::{GameEvent, GameState, ItemKind, Projectile};
use super::steering;
use crate::consts::*;
use crate::yaw_of;

/// Fixed-timestep driver for embedders running on a variable display rate.
///
/// Accumulates real frame deltas and converts them into whole [`SIM_DT`]
/// steps, at most [`MAX_SUBSTEPS`] per call so a long stall cannot snowball
/// into an ever-growing catch-up backlog.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FrameDriver {
    accumulator: f32,
}

impl FrameDriver {
    /// Feed one display frame's delta; returns the number of sim steps run
    pub fn advance(&mut self, state: &mut GameState, input: &TickInput, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.min(0.1);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }
}

/// Frame input sampled by the embedding layer
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Desired movement direction on the xz-plane (clamped to unit length)
    pub move_dir: Vec3,
    /// World-space aim point, if the player is aiming
    pub aim_target: Option<Vec3>,
    /// Trigger held this frame
    pub fire: bool,
    /// Restart the session from level 1
    pub restart: bool,
}

/// Advance the simulation by one fixed step.
///
/// `dt_secs` is the fixed timestep; frame-denominated timers (cooldowns,
/// projectile TTL, spawn intervals) assume it stays at [`SIM_DT`], while the
/// level clock and invincibility accumulate it directly.
pub fn tick(state: &mut GameState, input: &TickInput, dt_secs: f32) {
    if input.restart {
        log::info!("session restart requested");
        state.reset();
        state.start_level();
        return;
    }
    if state.game_over || !state.level.in_progress() {
        return;
    }

    state.frame += 1;
    state.time_ms += dt_secs as f64 * 1000.0;

    step_player(state, input);
    step_weapon(state, input);

    let params = state.steering;
    let player_pos = state.player.pos;
    steering::step_agents(&mut state.agents, player_pos, &params);

    step_projectiles(state);

    let outcome = collision::resolve(state);
    for id in &outcome.killed_agents {
        state.push_event(GameEvent::AgentKilled { id: *id });
    }
    apply_pickups(state, &outcome.picked_items);
    if outcome.player_contact {
        apply_contact_damage(state);
    }
    collision::apply(state, &outcome);

    // Expired projectiles were excluded from collision; drop them now
    state.projectiles.retain(|p| p.alive);

    if !state.game_over {
        spawn::update(state);
        step_level_clock(state, dt_secs);
    }

    state.invincibility.update(dt_secs as f64 * 1000.0);
    state.normalize_order();
}

/// Move and aim the player, clamped to the arena bounds
fn step_player(state: &mut GameState, input: &TickInput) {
    let move_dir =
        Vec3::new(input.move_dir.x, 0.0, input.move_dir.z).clamp_length_max(1.0);
    state.player.vel = move_dir * PLAYER_SPEED;
    state.player.pos += state.player.vel;
    state.player.pos.x = state.player.pos.x.clamp(-WORLD_LIMIT, WORLD_LIMIT);
    state.player.pos.z = state.player.pos.z.clamp(-WORLD_LIMIT, WORLD_LIMIT);

    if let Some(target) = input.aim_target {
        let to_target = target - state.player.pos;
        if to_target.length_squared() > 1e-6 {
            state.player.yaw = yaw_of(to_target);
        }
    }
}

/// Tick the weapon timers and emit projectiles on an accepted fire request
fn step_weapon(state: &mut GameState, input: &TickInput) {
    state.player.weapon.update();
    if !input.fire {
        return;
    }
    let Some(target) = input.aim_target else {
        return;
    };
    let aim = target - state.player.pos;
    let Some(dirs) = state.player.weapon.trigger(aim) else {
        return;
    };
    let kind = state.player.weapon.kind;
    let origin = state.player.pos;
    let frame = state.frame;
    for dir in dirs {
        let id = state.next_entity_id();
        state
            .projectiles
            .push(Projectile::new(id, origin, dir, kind, frame));
    }
}

/// Advance projectiles and decay their TTL; expiry clears the alive flag.
/// Projectiles fired this frame sit out until the next one, matching the
/// collision pass's spawn-frame exclusion.
fn step_projectiles(state: &mut GameState) {
    for proj in &mut state.projectiles {
        if proj.spawned_frame == state.frame {
            continue;
        }
        proj.pos += proj.vel;
        proj.remaining_life = proj.remaining_life.saturating_sub(1);
        if proj.remaining_life == 0 {
            proj.alive = false;
        }
    }
}

/// Heal or weapon-switch for every item collected this frame
fn apply_pickups(state: &mut GameState, picked: &[(u32, ItemKind)]) {
    for (_, kind) in picked {
        state.push_event(GameEvent::ItemPickedUp { kind: *kind });
        match kind {
            ItemKind::Heal => {
                state.player.health =
                    (state.player.health + HEAL_AMOUNT).min(PLAYER_MAX_HEALTH);
                log::debug!("healed to {}", state.player.health);
            }
            ItemKind::RapidAmmo | ItemKind::SpreadAmmo => {
                state.player.weapon.pick_up(*kind);
                log::debug!("weapon switched to {}", state.player.weapon.kind.as_str());
            }
        }
    }
}

/// One flat contact hit: damage, then either death or an invincibility window
fn apply_contact_damage(state: &mut GameState) {
    state.player.health = (state.player.health - CONTACT_DAMAGE).max(0);
    state.push_event(GameEvent::PlayerDamaged {
        amount: CONTACT_DAMAGE,
    });
    if state.player.health == 0 {
        state.level.fail();
        state.game_over = true;
        state.push_event(GameEvent::LevelFailed {
            level: state.level.current,
        });
        state.push_event(GameEvent::GameOver { score: state.score });
        log::info!(
            "player died on level {} with score {}",
            state.level.current,
            state.score
        );
    } else {
        state.invincibility.activate(INVINCIBLE_TIME_MS);
    }
}

/// Advance the level clock; completion banks the bonus and emits the event
fn step_level_clock(state: &mut GameState, dt_secs: f32) {
    let Some(cfg) = state.levels.get(state.level.current).cloned() else {
        return;
    };
    if let Some(bonus) = state.level.update(&cfg, dt_secs) {
        state.score += bonus;
        state.push_event(GameEvent::LevelCompleted {
            level: cfg.id,
            bonus,
        });
        log::info!("level {} completed, bonus {bonus}", cfg.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Agent;

    fn started(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.start_level();
        state
    }

    fn fire_at(target: Vec3) -> TickInput {
        TickInput {
            aim_target: Some(target),
            fire: true,
            ..TickInput::default()
        }
    }

    #[test]
    fn test_player_motion_is_clamped_to_arena() {
        let mut state = started(1);
        let input = TickInput {
            move_dir: Vec3::new(1.0, 0.0, 0.0),
            ..TickInput::default()
        };
        for _ in 0..500 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.player.pos.x, WORLD_LIMIT);
    }

    #[test]
    fn test_diagonal_movement_is_not_faster() {
        let mut state = started(1);
        let input = TickInput {
            move_dir: Vec3::new(1.0, 0.0, 1.0),
            ..TickInput::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert!((state.player.vel.length() - PLAYER_SPEED).abs() < 1e-5);
    }

    #[test]
    fn test_projectile_expires_after_ttl() {
        let mut state = started(1);
        tick(&mut state, &fire_at(Vec3::new(100.0, 0.0, 0.0)), SIM_DT);
        assert_eq!(state.projectiles.len(), 1);
        let idle = TickInput::default();
        for _ in 0..(BULLET_LIFE_FRAMES - 1) {
            tick(&mut state, &idle, SIM_DT);
        }
        assert_eq!(state.projectiles.len(), 1);
        tick(&mut state, &idle, SIM_DT);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_shot_kills_agent_and_scores() {
        let mut state = started(1);
        // Park an agent down the +x axis, just outside contact range
        let id = state.next_entity_id();
        state.agents.push(Agent::new(id, Vec3::new(20.0, 0.0, 0.0), 1));
        // Freeze it so the shot's travel time stays predictable
        state.steering.max_speed = 0.0;

        tick(&mut state, &fire_at(Vec3::new(20.0, 0.0, 0.0)), SIM_DT);
        let idle = TickInput::default();
        let mut killed = false;
        for _ in 0..40 {
            tick(&mut state, &idle, SIM_DT);
            if state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::AgentKilled { .. }))
            {
                killed = true;
                break;
            }
        }
        assert!(killed);
        assert_eq!(state.score, KILL_SCORE);
        assert!(state.agents.is_empty());
    }

    #[test]
    fn test_contact_damages_then_grants_invincibility() {
        let mut state = started(1);
        let id = state.next_entity_id();
        state.agents.push(Agent::new(id, Vec3::new(0.5, 0.0, 0.0), 5));
        state.steering.max_speed = 0.0;

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH - CONTACT_DAMAGE);
        assert!(state.invincibility.is_active());

        // While invincible, further contact is free
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH - CONTACT_DAMAGE);
    }

    #[test]
    fn test_lethal_contact_ends_game() {
        let mut state = started(1);
        state.player.health = CONTACT_DAMAGE;
        let id = state.next_entity_id();
        state.agents.push(Agent::new(id, Vec3::new(0.5, 0.0, 0.0), 5));
        state.steering.max_speed = 0.0;

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.game_over);
        assert_eq!(state.player.health, 0);
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::LevelFailed { level: 1 })));
        assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));

        // Game over freezes the simulation
        let frame = state.frame;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.frame, frame);
    }

    #[test]
    fn test_level_completes_and_banks_bonus() {
        let mut state = started(1);
        let cfg = state.levels.get(1).unwrap().clone();
        // Jump the clock to just shy of the duration
        state.level.elapsed_secs = cfg.duration_secs - SIM_DT / 2.0;

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.score >= cfg.completion_bonus);
        let events = state.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::LevelCompleted { level: 1, .. })));
        // Completed level no longer ticks
        let frame = state.frame;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.frame, frame);
    }

    #[test]
    fn test_heal_pickup_clamps_at_max() {
        let mut state = started(1);
        state.player.health = 90;
        let id = state.next_entity_id();
        state.items.push(crate::sim::state::Item {
            id,
            kind: ItemKind::Heal,
            pos: Vec3::new(1.0, 0.0, 0.0),
        });
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
        assert!(state.items.is_empty());
    }

    #[test]
    fn test_restart_resets_and_starts_level_one() {
        let mut state = started(1);
        state.score = 777;
        state.level.current = 3;
        let input = TickInput {
            restart: true,
            ..TickInput::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.score, 0);
        assert_eq!(state.level.current, 1);
        assert!(state.level.in_progress());
    }

    #[test]
    fn test_frame_driver_converts_deltas_to_fixed_steps() {
        let mut state = started(1);
        let mut driver = FrameDriver::default();
        let idle = TickInput::default();

        // Half a step accumulates, a full step runs
        assert_eq!(driver.advance(&mut state, &idle, SIM_DT / 2.0), 0);
        assert_eq!(driver.advance(&mut state, &idle, SIM_DT / 2.0), 1);
        assert_eq!(state.frame, 1);

        // A stall is clamped: never more than MAX_SUBSTEPS catch-up steps
        assert_eq!(driver.advance(&mut state, &idle, 5.0), MAX_SUBSTEPS);
        assert_eq!(state.frame, 1 + MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_identical_seeds_and_inputs_replay_identically() {
        let mut a = started(1234);
        let mut b = started(1234);
        let inputs = [
            TickInput {
                move_dir: Vec3::new(1.0, 0.0, 0.0),
                ..TickInput::default()
            },
            fire_at(Vec3::new(50.0, 0.0, 50.0)),
            TickInput::default(),
        ];
        for i in 0..2000 {
            let input = &inputs[i % inputs.len()];
            tick(&mut a, input, SIM_DT);
            tick(&mut b, input, SIM_DT);
        }
        assert_eq!(a.frame, b.frame);
        assert_eq!(a.score, b.score);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.agents.len(), b.agents.len());
        for (x, y) in a.agents.iter().zip(&b.agents) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.pos, y.pos);
        }
    }

    #[test]
    fn test_serialized_state_resumes_identically() {
        let mut live = started(77);
        let idle = TickInput::default();
        for _ in 0..300 {
            tick(&mut live, &idle, SIM_DT);
        }
        let json = serde_json::to_string(&live).unwrap();
        let mut restored: GameState = serde_json::from_str(&json).unwrap();
        for _ in 0..300 {
            tick(&mut live, &idle, SIM_DT);
            tick(&mut restored, &idle, SIM_DT);
        }
        assert_eq!(live.frame, restored.frame);
        assert_eq!(live.agents.len(), restored.agents.len());
        for (x, y) in live.agents.iter().zip(&restored.agents) {
            assert_eq!(x.pos, y.pos);
        }
    }
}
