//! Weapon cooldown state machine and projectile patterns
//!
//! A fire request is accepted only when the trigger is held, an aim
//! direction exists, and the cooldown has elapsed. Special weapons run on a
//! frame-denominated timer and revert to the pistol when it expires.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::{ItemKind, WeaponKind};
use crate::consts::*;
use crate::rotate_y;

/// Spread fan half-pattern; full fan is i * SPREAD_STEP for i in -2..=2
const SPREAD_STEP: f32 = 0.15;
const SPREAD_COUNT: i32 = 2;

/// Current weapon, cooldown counter, and special-weapon time remaining
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponState {
    pub kind: WeaponKind,
    /// Frames until the next shot is allowed
    pub cooldown_frames: u32,
    /// Frames of special weapon remaining (unused for Primary)
    pub special_frames: u32,
}

impl Default for WeaponState {
    fn default() -> Self {
        Self {
            kind: WeaponKind::Primary,
            cooldown_frames: 0,
            special_frames: 0,
        }
    }
}

/// Cooldown applied after firing, per weapon
pub fn cooldown_for(kind: WeaponKind) -> u32 {
    match kind {
        WeaponKind::Primary => 15,
        WeaponKind::Rapid => 4,
        WeaponKind::Spread => 45,
    }
}

impl WeaponState {
    /// Per-frame timer decay. Special weapons tick down and revert to
    /// Primary at zero; the pistol has no duration limit.
    pub fn update(&mut self) {
        if self.cooldown_frames > 0 {
            self.cooldown_frames -= 1;
        }
        if self.kind != WeaponKind::Primary {
            self.special_frames = self.special_frames.saturating_sub(1);
            if self.special_frames == 0 {
                log::debug!("{} expired, reverting to pistol", self.kind.as_str());
                self.kind = WeaponKind::Primary;
            }
        }
    }

    pub fn ready(&self) -> bool {
        self.cooldown_frames == 0
    }

    /// Attempt to fire along `aim_dir`. On acceptance, returns the emitted
    /// projectile directions and starts the cooldown; otherwise None.
    pub fn trigger(&mut self, aim_dir: Vec3) -> Option<Vec<Vec3>> {
        if !self.ready() {
            return None;
        }
        let dir = Vec3::new(aim_dir.x, 0.0, aim_dir.z).normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }
        self.cooldown_frames = cooldown_for(self.kind);
        let dirs = match self.kind {
            WeaponKind::Spread => (-SPREAD_COUNT..=SPREAD_COUNT)
                .map(|i| rotate_y(dir, i as f32 * SPREAD_STEP))
                .collect(),
            _ => vec![dir],
        };
        Some(dirs)
    }

    /// Weapon item pickup: switch kind and arm the duration timer
    pub fn pick_up(&mut self, item: ItemKind) {
        match item {
            ItemKind::RapidAmmo => {
                self.kind = WeaponKind::Rapid;
                self.special_frames = SPECIAL_WEAPON_FRAMES;
            }
            ItemKind::SpreadAmmo => {
                self.kind = WeaponKind::Spread;
                self.special_frames = SPECIAL_WEAPON_FRAMES;
            }
            ItemKind::Heal => {}
        }
    }

    /// Remaining special-weapon time in seconds (0 for the pistol)
    pub fn time_remaining_secs(&self) -> f32 {
        if self.kind == WeaponKind::Primary {
            0.0
        } else {
            self.special_frames as f32 * SIM_DT
        }
    }
}
