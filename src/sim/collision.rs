//! Sphere-distance collision detection and resolution
//!
//! Three pair classes: projectile/agent, agent/player, player/item. Hits
//! mutate health and alive flags in place; entity removal is deferred into a
//! [`CollisionOutcome`] so the caller controls when the collections shrink
//! and which side effects (events, invincibility, pickups) follow.

use super::state::{GameState, ItemKind};
use crate::consts::*;

/// Deferred results of one collision pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    /// Agents whose health reached zero this frame
    pub killed_agents: Vec<u32>,
    /// Projectiles consumed by a hit (expiry is handled by the TTL pass)
    pub spent_projectiles: Vec<u32>,
    /// Items inside the pickup radius, with their kinds
    pub picked_items: Vec<(u32, ItemKind)>,
    /// True when any agent touched a vulnerable player this frame
    pub player_contact: bool,
    /// Score earned from kills
    pub score_delta: u64,
}

impl CollisionOutcome {
    pub fn is_empty(&self) -> bool {
        self.killed_agents.is_empty()
            && self.spent_projectiles.is_empty()
            && self.picked_items.is_empty()
            && !self.player_contact
    }
}

/// One collision pass over the current state.
///
/// Projectiles spawned this frame are skipped so a shot cannot connect on
/// its creation frame. Each projectile hits at most one agent; each agent
/// absorbs at most one point of damage per projectile. Agent contact with
/// the player collapses to a single flag however many agents are touching.
pub fn resolve(state: &mut GameState) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();

    for proj in &mut state.projectiles {
        if !proj.alive || proj.spawned_frame == state.frame {
            continue;
        }
        for agent in &mut state.agents {
            if agent.health <= 0 {
                continue;
            }
            if proj.pos.distance(agent.pos) < HIT_RADIUS {
                agent.health -= 1;
                proj.alive = false;
                outcome.spent_projectiles.push(proj.id);
                if agent.health <= 0 {
                    outcome.killed_agents.push(agent.id);
                    outcome.score_delta += KILL_SCORE;
                }
                break;
            }
        }
    }

    if !state.invincibility.is_active() {
        outcome.player_contact = state
            .agents
            .iter()
            .filter(|a| a.health > 0)
            .any(|a| a.pos.distance(state.player.pos) < CONTACT_RADIUS);
    }

    for item in &state.items {
        if item.pos.distance(state.player.pos) < PICKUP_RADIUS {
            outcome.picked_items.push((item.id, item.kind));
        }
    }

    outcome
}

/// Remove the entities an outcome marked and bank the kill score.
///
/// Player damage and pickup effects are the caller's responsibility; this
/// only shrinks the collections.
pub fn apply(state: &mut GameState, outcome: &CollisionOutcome) {
    if outcome.score_delta > 0 {
        state.score += outcome.score_delta;
    }
    if !outcome.killed_agents.is_empty() {
        state.agents.retain(|a| !outcome.killed_agents.contains(&a.id));
    }
    if !outcome.spent_projectiles.is_empty() {
        state
            .projectiles
            .retain(|p| !outcome.spent_projectiles.contains(&p.id));
    }
    if !outcome.picked_items.is_empty() {
        state
            .items
            .retain(|i| !outcome.picked_items.iter().any(|(id, _)| *id == i.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Agent, Item, Projectile, WeaponKind};
    use glam::Vec3;

    fn state_with_frame(frame: u64) -> GameState {
        let mut state = GameState::new(1);
        state.frame = frame;
        state
    }

    #[test]
    fn test_projectile_kills_one_hit_agent() {
        let mut state = state_with_frame(10);
        state.agents.push(Agent::new(1, Vec3::new(1.0, 0.0, 0.0), 1));
        state.projectiles.push(Projectile::new(
            2,
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            WeaponKind::Primary,
            5,
        ));
        let outcome = resolve(&mut state);
        assert_eq!(outcome.killed_agents, vec![1]);
        assert_eq!(outcome.spent_projectiles, vec![2]);
        assert_eq!(outcome.score_delta, KILL_SCORE);
        apply(&mut state, &outcome);
        assert!(state.agents.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.score, KILL_SCORE);
    }

    #[test]
    fn test_tough_agent_survives_with_damage() {
        let mut state = state_with_frame(10);
        state.agents.push(Agent::new(1, Vec3::new(1.0, 0.0, 0.0), 3));
        state.projectiles.push(Projectile::new(
            2,
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            WeaponKind::Primary,
            5,
        ));
        let outcome = resolve(&mut state);
        assert!(outcome.killed_agents.is_empty());
        assert_eq!(outcome.score_delta, 0);
        assert_eq!(state.agents[0].health, 2);
        // Projectile is still consumed by the hit
        assert_eq!(outcome.spent_projectiles, vec![2]);
    }

    #[test]
    fn test_projectile_cannot_hit_on_spawn_frame() {
        let mut state = state_with_frame(10);
        state.agents.push(Agent::new(1, Vec3::new(1.0, 0.0, 0.0), 1));
        state.projectiles.push(Projectile::new(
            2,
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            WeaponKind::Primary,
            10,
        ));
        let outcome = resolve(&mut state);
        assert!(outcome.is_empty());
        assert_eq!(state.agents[0].health, 1);
    }

    #[test]
    fn test_projectile_hits_at_most_one_agent() {
        let mut state = state_with_frame(10);
        state.agents.push(Agent::new(1, Vec3::new(0.5, 0.0, 0.0), 1));
        state.agents.push(Agent::new(2, Vec3::new(-0.5, 0.0, 0.0), 1));
        state.projectiles.push(Projectile::new(
            3,
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            WeaponKind::Primary,
            5,
        ));
        let outcome = resolve(&mut state);
        assert_eq!(outcome.killed_agents.len(), 1);
        assert_eq!(outcome.score_delta, KILL_SCORE);
    }

    #[test]
    fn test_contact_flag_set_once_for_many_agents() {
        let mut state = state_with_frame(1);
        state.agents.push(Agent::new(1, Vec3::new(0.5, 0.0, 0.0), 1));
        state.agents.push(Agent::new(2, Vec3::new(0.0, 0.0, 0.5), 1));
        let outcome = resolve(&mut state);
        assert!(outcome.player_contact);
    }

    #[test]
    fn test_invincible_player_takes_no_contact() {
        let mut state = state_with_frame(1);
        state.agents.push(Agent::new(1, Vec3::new(0.5, 0.0, 0.0), 1));
        state.invincibility.activate(INVINCIBLE_TIME_MS);
        let outcome = resolve(&mut state);
        assert!(!outcome.player_contact);
    }

    #[test]
    fn test_item_pickup_detected_and_removed() {
        let mut state = state_with_frame(1);
        state.items.push(Item {
            id: 4,
            kind: ItemKind::Heal,
            pos: Vec3::new(2.0, 0.0, 0.0),
        });
        state.items.push(Item {
            id: 5,
            kind: ItemKind::RapidAmmo,
            pos: Vec3::new(50.0, 0.0, 0.0),
        });
        let outcome = resolve(&mut state);
        assert_eq!(outcome.picked_items, vec![(4, ItemKind::Heal)]);
        apply(&mut state, &outcome);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].id, 5);
    }

    #[test]
    fn test_resolve_after_apply_is_empty() {
        let mut state = state_with_frame(10);
        state.agents.push(Agent::new(1, Vec3::new(1.0, 0.0, 0.0), 1));
        state.projectiles.push(Projectile::new(
            2,
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            WeaponKind::Primary,
            5,
        ));
        state.items.push(Item {
            id: 3,
            kind: ItemKind::SpreadAmmo,
            pos: Vec3::new(1.0, 0.0, 1.0),
        });
        let outcome = resolve(&mut state);
        apply(&mut state, &outcome);
        // Second pass over the shrunk collections finds nothing new
        let second = resolve(&mut state);
        assert!(second.is_empty());
        assert!(second.killed_agents.is_empty());
        assert!(second.spent_projectiles.is_empty());
        assert!(second.picked_items.is_empty());
    }
}
