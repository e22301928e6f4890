//! Game state and core simulation types
//!
//! Everything needed to save a session and replay it deterministically
//! lives here, including the RNG stream position.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::invincibility::InvincibilityTimer;
use super::level::{LevelRuntime, LevelSet};
use super::spawn::SpawnState;
use super::steering::SteeringParams;
use super::weapon::WeaponState;
use crate::consts::*;

/// Weapon types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Pistol: single shot, no duration limit
    #[default]
    Primary,
    /// Machine gun: single shot, short cooldown, timed
    Rapid,
    /// Shotgun: five-projectile horizontal fan, timed
    Spread,
}

impl WeaponKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Primary => "Pistol",
            WeaponKind::Rapid => "Minigun",
            WeaponKind::Spread => "Shotgun",
        }
    }
}

/// Power-up item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Heal,
    RapidAmmo,
    SpreadAmmo,
}

/// A pursuing agent ("zombie")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: u32,
    pub pos: Vec3,
    pub vel: Vec3,
    /// Transient, reset to zero every frame after integration
    pub accel: Vec3,
    pub health: i32,
    /// Set at spawn from level config; health never exceeds this
    pub max_health: i32,
}

impl Agent {
    pub fn new(id: u32, pos: Vec3, health: i32) -> Self {
        Self {
            id,
            pos,
            vel: Vec3::ZERO,
            accel: Vec3::ZERO,
            health,
            max_health: health,
        }
    }
}

/// A projectile ("bullet")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec3,
    /// Fixed magnitude (bullet speed), direction set at creation
    pub vel: Vec3,
    pub kind: WeaponKind,
    /// Frames until natural expiry; entity removed at 0
    pub remaining_life: u32,
    /// Same-frame "already consumed" guard; cleared on hit or expiry
    pub alive: bool,
    /// Frame the projectile was created; it cannot hit until the next frame
    pub spawned_frame: u64,
}

impl Projectile {
    pub fn new(id: u32, origin: Vec3, dir: Vec3, kind: WeaponKind, spawned_frame: u64) -> Self {
        Self {
            id,
            pos: origin,
            vel: dir.normalize_or_zero() * BULLET_SPEED,
            kind,
            remaining_life: BULLET_LIFE_FRAMES,
            alive: true,
            spawned_frame,
        }
    }
}

/// A power-up item; removed on pickup, never expires otherwise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub kind: ItemKind,
    pub pos: Vec3,
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Clamped to [0, PLAYER_MAX_HEALTH]
    pub health: i32,
    /// Yaw about +Y, derived from the aim target
    pub yaw: f32,
    pub weapon: WeaponState,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            health: PLAYER_MAX_HEALTH,
            yaw: 0.0,
            weapon: WeaponState::default(),
        }
    }
}

/// Domain events emitted during a tick, drained once per frame by the caller.
///
/// Replaces the pub/sub bus the UI layer would otherwise hang off of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    AgentKilled { id: u32 },
    PlayerDamaged { amount: i32 },
    ItemPickedUp { kind: ItemKind },
    LevelCompleted { level: u32, bonus: u64 },
    LevelFailed { level: u32 },
    AllLevelsCompleted,
    GameOver { score: u64 },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    /// RNG stream; serialized so a restored save continues identically
    pub rng: Pcg32,
    /// Simulation frame counter
    pub frame: u64,
    /// Accumulated simulation time (ms), advanced only by the frame driver
    pub time_ms: f64,
    /// Monotonically non-decreasing score
    pub score: u64,
    /// Once set, the per-frame sequence is short-circuited entirely
    pub game_over: bool,
    pub player: PlayerState,
    /// Active agents (sorted by id for determinism)
    pub agents: Vec<Agent>,
    /// Active projectiles (sorted by id for determinism)
    pub projectiles: Vec<Projectile>,
    /// Active items (sorted by id for determinism)
    pub items: Vec<Item>,
    /// Ordered level configs supplied at startup
    pub levels: LevelSet,
    /// Level clock and phase, mutated only by the level state machine
    pub level: LevelRuntime,
    /// Spawn counters and per-level spawn parameters
    pub spawn: SpawnState,
    /// Per-level steering parameters
    pub steering: SteeringParams,
    pub invincibility: InvincibilityTimer,
    /// Event outbox for this frame
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new session with the built-in level ladder
    pub fn new(seed: u64) -> Self {
        Self::with_levels(seed, LevelSet::builtin())
    }

    /// Create a new session against an externally supplied level set
    pub fn with_levels(seed: u64, levels: LevelSet) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            frame: 0,
            time_ms: 0.0,
            score: 0,
            game_over: false,
            player: PlayerState::default(),
            agents: Vec::new(),
            projectiles: Vec::new(),
            items: Vec::new(),
            levels,
            level: LevelRuntime::default(),
            spawn: SpawnState::default(),
            steering: SteeringParams::default(),
            invincibility: InvincibilityTimer::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Begin the current level: reset the clock and reapply its config to the
    /// spawn and steering parameters.
    pub fn start_level(&mut self) {
        let Some(cfg) = self.levels.get(self.level.current).cloned() else {
            log::warn!("no config for level {}", self.level.current);
            return;
        };
        self.spawn.configure(&cfg);
        self.steering.max_speed = AGENT_BASE_SPEED * cfg.speed_multiplier;
        self.level.start();
        log::info!("level {} started: {}", cfg.id, cfg.name);
    }

    /// Advance to the next level config, if one exists.
    ///
    /// Returns false when the ladder is exhausted (all levels completed, a
    /// terminal condition distinct from a single level's Completed state).
    pub fn advance_level(&mut self) -> bool {
        if self.level.advance(&self.levels) {
            true
        } else {
            self.push_event(GameEvent::AllLevelsCompleted);
            log::info!("all levels completed");
            false
        }
    }

    /// Reset the session to level 1 for a restart (score, health, collections)
    pub fn reset(&mut self) {
        let levels = std::mem::take(&mut self.levels);
        *self = Self::with_levels(self.seed, levels);
    }

    /// Current agent max speed (per-frame units, after the level multiplier)
    pub fn agent_max_speed(&self) -> f32 {
        self.steering.max_speed
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take this frame's events, leaving the outbox empty
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.agents.sort_by_key(|a| a.id);
        self.projectiles.sort_by_key(|p| p.id);
        self.items.sort_by_key(|i| i.id);
    }
}
