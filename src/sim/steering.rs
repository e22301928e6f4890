//! Agent steering behaviors
//!
//! Force-based local rules: pursuit toward the player plus separation from
//! nearby agents. Forces accumulate into each agent's acceleration and are
//! integrated once per frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::Agent;
use crate::consts::*;

/// Separation is weighted above pursuit to keep agents from overlapping
pub const SEPARATION_WEIGHT: f32 = 2.5;
pub const PURSUIT_WEIGHT: f32 = 1.0;

/// Per-level steering parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SteeringParams {
    /// Agent speed ceiling (units per frame)
    pub max_speed: f32,
    /// Steering force ceiling per frame
    pub max_force: f32,
    /// Neighbors within this distance contribute to separation
    pub separation_distance: f32,
}

impl Default for SteeringParams {
    fn default() -> Self {
        Self {
            max_speed: AGENT_BASE_SPEED,
            max_force: AGENT_MAX_FORCE,
            separation_distance: SEPARATION_DISTANCE,
        }
    }
}

/// Pursuit force toward the target: desired velocity at full speed, steering
/// is the clamped difference from the current velocity.
pub fn seek(agent: &Agent, target: Vec3, params: &SteeringParams) -> Vec3 {
    let desired = (target - agent.pos).normalize_or_zero() * params.max_speed;
    (desired - agent.vel).clamp_length_max(params.max_force)
}

/// Separation force away from neighbors within `separation_distance`.
///
/// Closer neighbors repel harder (inverse distance). Neighbors are excluded
/// by id, not by reference, so storage strategy doesn't matter. Returns zero
/// when no neighbor is in range.
pub fn separate(agent: &Agent, all: &[Agent], params: &SteeringParams) -> Vec3 {
    let mut sum = Vec3::ZERO;
    let mut count = 0u32;
    for other in all {
        if other.id == agent.id {
            continue;
        }
        let d = agent.pos.distance(other.pos);
        if d > 0.0 && d < params.separation_distance {
            sum += (agent.pos - other.pos).normalize_or_zero() / d;
            count += 1;
        }
    }
    if count == 0 {
        return Vec3::ZERO;
    }
    let desired = (sum / count as f32).normalize_or_zero() * params.max_speed;
    (desired - agent.vel).clamp_length_max(params.max_force)
}

/// Accumulated steering delta for one agent (separation weighted higher)
pub fn compute_forces(agent: &Agent, all: &[Agent], player_pos: Vec3, params: &SteeringParams) -> Vec3 {
    separate(agent, all, params) * SEPARATION_WEIGHT + seek(agent, player_pos, params) * PURSUIT_WEIGHT
}

/// Integrate one agent's motion and reset its acceleration
pub fn integrate(agent: &mut Agent, max_speed: f32) {
    agent.vel = (agent.vel + agent.accel).clamp_length_max(max_speed);
    agent.pos += agent.vel;
    agent.accel = Vec3::ZERO;
}

/// Advance all agents by one frame: accumulate forces in a read-only pass,
/// then integrate. The two-pass split keeps separation reads consistent
/// while positions mutate.
pub fn step_agents(agents: &mut [Agent], player_pos: Vec3, params: &SteeringParams) {
    let deltas: Vec<Vec3> = agents
        .iter()
        .map(|a| compute_forces(a, agents, player_pos, params))
        .collect();
    for (agent, delta) in agents.iter_mut().zip(deltas) {
        agent.accel += delta;
        integrate(agent, params.max_speed);
    }
}
