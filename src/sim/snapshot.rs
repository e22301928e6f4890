//! Read-only view of the state for renderers and HUDs
//!
//! A snapshot is a plain-data copy taken between ticks, so a presentation
//! layer never needs mutable access to the simulation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::{GameState, ItemKind, WeaponKind};

/// Agent view: position plus a health fraction for tint/health-bar use
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AgentView {
    pub pos: Vec3,
    pub health_frac: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ItemView {
    pub kind: ItemKind,
    pub pos: Vec3,
}

/// Everything a frame of presentation needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub frame: u64,
    pub player_pos: Vec3,
    pub player_yaw: f32,
    pub player_health: i32,
    pub player_visible: bool,
    pub score: u64,
    pub weapon: WeaponKind,
    /// Seconds of special weapon remaining (0 for the pistol)
    pub weapon_secs_remaining: f32,
    pub level: u32,
    pub level_name: String,
    /// Seconds left on the level clock
    pub level_secs_remaining: f32,
    pub game_over: bool,
    pub agents: Vec<AgentView>,
    pub projectiles: Vec<Vec3>,
    pub items: Vec<ItemView>,
}

impl GameState {
    /// Capture a presentation snapshot of the current frame
    pub fn snapshot(&self) -> RenderSnapshot {
        let cfg = self.levels.get(self.level.current);
        RenderSnapshot {
            frame: self.frame,
            player_pos: self.player.pos,
            player_yaw: self.player.yaw,
            player_health: self.player.health,
            player_visible: self.invincibility.is_visible(),
            score: self.score,
            weapon: self.player.weapon.kind,
            weapon_secs_remaining: self.player.weapon.time_remaining_secs(),
            level: self.level.current,
            level_name: cfg.map(|c| c.name.clone()).unwrap_or_default(),
            level_secs_remaining: cfg.map(|c| self.level.remaining_secs(c)).unwrap_or(0.0),
            game_over: self.game_over,
            agents: self
                .agents
                .iter()
                .map(|a| AgentView {
                    pos: a.pos,
                    health_frac: a.health as f32 / a.max_health.max(1) as f32,
                })
                .collect(),
            projectiles: self.projectiles.iter().map(|p| p.pos).collect(),
            items: self
                .items
                .iter()
                .map(|i| ItemView {
                    kind: i.kind,
                    pos: i.pos,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Agent;

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = GameState::new(3);
        state.start_level();
        state.score = 120;
        state.agents.push(Agent::new(1, Vec3::new(4.0, 0.0, 4.0), 2));
        state.agents[0].health = 1;

        let snap = state.snapshot();
        assert_eq!(snap.score, 120);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.level_name, "Training Ground");
        assert_eq!(snap.agents.len(), 1);
        assert!((snap.agents[0].health_frac - 0.5).abs() < 1e-6);
        assert!(snap.player_visible);
        assert!(!snap.game_over);
        assert!(snap.level_secs_remaining > 59.0);
    }

    #[test]
    fn test_snapshot_without_config_is_safe() {
        let mut state = GameState::new(3);
        state.level.current = 99;
        let snap = state.snapshot();
        assert_eq!(snap.level_name, "");
        assert_eq!(snap.level_secs_remaining, 0.0);
    }
}
