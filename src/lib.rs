//! Horde Arena - top-down survival shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (steering, weapons, collisions, levels)
//! - `highscores`: Top-10 leaderboard with JSON round-trip
//!
//! Rendering, audio and input capture are external collaborators: the sim
//! consumes a [`sim::TickInput`] each frame and exposes a
//! [`sim::RenderSnapshot`] for whatever draws it.

pub mod highscores;
pub mod sim;

pub use highscores::HighScores;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz; all frame-denominated timers assume this)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per display frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Player movement speed (world units per frame)
    pub const PLAYER_SPEED: f32 = 0.9;
    /// Player stays within ±WORLD_LIMIT on the xz-plane
    pub const WORLD_LIMIT: f32 = 95.0;
    /// Player health ceiling
    pub const PLAYER_MAX_HEALTH: i32 = 100;

    /// Agent base speed before the level multiplier (units per frame)
    pub const AGENT_BASE_SPEED: f32 = 0.15;
    /// Maximum steering force per frame
    pub const AGENT_MAX_FORCE: f32 = 0.05;
    /// Neighbors closer than this repel each other
    pub const SEPARATION_DISTANCE: f32 = 3.0;
    /// Agents spawn on a ring at radius [SPAWN_RING_MIN, SPAWN_RING_MAX]
    pub const SPAWN_RING_MIN: f32 = 90.0;
    pub const SPAWN_RING_MAX: f32 = 120.0;

    /// Projectile speed (units per frame, fixed at creation)
    pub const BULLET_SPEED: f32 = 2.2;
    /// Projectile time-to-live in frames
    pub const BULLET_LIFE_FRAMES: u32 = 80;

    /// Projectile-agent hit radius
    pub const HIT_RADIUS: f32 = 2.0;
    /// Agent-player contact radius
    pub const CONTACT_RADIUS: f32 = 2.0;
    /// Player-item pickup radius
    pub const PICKUP_RADIUS: f32 = 3.0;
    /// Flat damage per agent contact event
    pub const CONTACT_DAMAGE: i32 = 10;
    /// Score per agent kill
    pub const KILL_SCORE: u64 = 10;
    /// Health restored by a heal item (clamped to PLAYER_MAX_HEALTH)
    pub const HEAL_AMOUNT: i32 = 30;
    /// Items spawn uniformly in [-ITEM_FIELD_HALF, ITEM_FIELD_HALF]^2
    pub const ITEM_FIELD_HALF: f32 = 80.0;

    /// Invincibility window after taking a hit (milliseconds)
    pub const INVINCIBLE_TIME_MS: f64 = 2000.0;
    /// Blink cadence while invincible (milliseconds)
    pub const BLINK_INTERVAL_MS: f64 = 100.0;

    /// Special weapon duration in frames (10 seconds at 60 fps)
    pub const SPECIAL_WEAPON_FRAMES: u32 = 600;
}

/// Rotate a vector about the +Y (vertical) axis by `angle` radians.
///
/// Used for the horizontal spread fan; the y component passes through.
#[inline]
pub fn rotate_y(v: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(v.x * cos - v.z * sin, v.y, v.x * sin + v.z * cos)
}

/// Distance between two points ignoring the y component
#[inline]
pub fn distance_xz(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// Yaw angle (radians about +Y) of a direction on the xz-plane
#[inline]
pub fn yaw_of(dir: Vec3) -> f32 {
    dir.x.atan2(dir.z)
}
