//! Deterministic fixed-timestep simulation
//!
//! The embedding layer drives [`tick`] with a [`TickInput`] per frame and
//! reads back a [`RenderSnapshot`]; everything in between is pure state
//! transformation with a seeded RNG.

pub mod collision;
pub mod invincibility;
pub mod level;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod steering;
pub mod tick;
pub mod weapon;

pub use collision::CollisionOutcome;
pub use invincibility::InvincibilityTimer;
pub use level::{LevelConfig, LevelPhase, LevelRuntime, LevelSet};
pub use snapshot::RenderSnapshot;
pub use spawn::SpawnState;
pub use state::{Agent, GameEvent, GameState, Item, ItemKind, PlayerState, Projectile, WeaponKind};
pub use steering::SteeringParams;
pub use tick::{tick, FrameDriver, TickInput};
pub use weapon::WeaponState;
