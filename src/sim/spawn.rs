//! Time-gated agent/item creation with difficulty escalation
//!
//! Both spawn streams run on modulo frame counters against per-level
//! intervals. Within a level, the agent interval shrinks every
//! `ESCALATION_PERIOD_FRAMES` down to a floor, so pressure rises over time.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::level::{ItemWeights, LevelConfig};
use super::state::{Agent, GameState, Item, ItemKind};
use crate::consts::*;

/// Agent spawn interval shrinks every this many frames...
pub const ESCALATION_PERIOD_FRAMES: u64 = 600;
/// ...by this many frames...
pub const ESCALATION_STEP: u32 = 5;
/// ...down to this floor
pub const SPAWN_INTERVAL_FLOOR: u32 = 10;

/// Spawn counters plus the level parameters they run against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnState {
    /// Frames since the level started
    pub frames: u64,
    pub spawn_interval: u32,
    pub item_interval: u32,
    pub max_agents: usize,
    pub agent_health: i32,
    pub item_weights: ItemWeights,
}

impl Default for SpawnState {
    fn default() -> Self {
        Self {
            frames: 0,
            spawn_interval: 120,
            item_interval: 300,
            max_agents: 5,
            agent_health: 1,
            item_weights: ItemWeights::default(),
        }
    }
}

impl SpawnState {
    /// Reapply a level config and reset the frame counter.
    ///
    /// Intervals are clamped to at least 1 frame so a degenerate external
    /// config cannot zero a modulo divisor.
    pub fn configure(&mut self, cfg: &LevelConfig) {
        self.frames = 0;
        self.spawn_interval = cfg.spawn_interval.max(1);
        self.item_interval = cfg.item_interval.max(1);
        self.max_agents = cfg.max_agents;
        self.agent_health = cfg.agent_health;
        self.item_weights = cfg.item_weights;
    }
}

/// Weighted item-type draw; degenerate weights fall back to Heal
pub fn draw_item_kind<R: Rng>(rng: &mut R, weights: &ItemWeights) -> ItemKind {
    let total = weights.heal + weights.rapid + weights.spread;
    if total <= 0.0 {
        return ItemKind::Heal;
    }
    let roll = rng.random_range(0.0..total);
    if roll < weights.heal {
        ItemKind::Heal
    } else if roll < weights.heal + weights.rapid {
        ItemKind::RapidAmmo
    } else {
        ItemKind::SpreadAmmo
    }
}

/// Random point on the spawn ring around the arena
pub fn ring_position<R: Rng>(rng: &mut R) -> Vec3 {
    let angle = rng.random_range(0.0..TAU);
    let radius = rng.random_range(SPAWN_RING_MIN..SPAWN_RING_MAX);
    Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
}

/// Per-frame spawn pass: escalate, then conditionally create one agent and
/// one item.
pub fn update(state: &mut GameState) {
    state.spawn.frames += 1;
    let frames = state.spawn.frames;

    if frames % ESCALATION_PERIOD_FRAMES == 0 && state.spawn.spawn_interval > SPAWN_INTERVAL_FLOOR {
        state.spawn.spawn_interval =
            (state.spawn.spawn_interval - ESCALATION_STEP).max(SPAWN_INTERVAL_FLOOR);
        log::debug!(
            "spawn escalation: interval now {} frames",
            state.spawn.spawn_interval
        );
    }

    if frames % state.spawn.spawn_interval as u64 == 0 && state.agents.len() < state.spawn.max_agents
    {
        let pos = ring_position(&mut state.rng);
        let id = state.next_entity_id();
        state
            .agents
            .push(Agent::new(id, pos, state.spawn.agent_health));
        log::debug!("agent {id} spawned at ({:.1}, {:.1})", pos.x, pos.z);
    }

    if frames % state.spawn.item_interval as u64 == 0 {
        let kind = draw_item_kind(&mut state.rng, &state.spawn.item_weights);
        let x = state.rng.random_range(-ITEM_FIELD_HALF..ITEM_FIELD_HALF);
        let z = state.rng.random_range(-ITEM_FIELD_HALF..ITEM_FIELD_HALF);
        let id = state.next_entity_id();
        state.items.push(Item {
            id,
            kind,
            pos: Vec3::new(x, 0.0, z),
        });
    }
}
