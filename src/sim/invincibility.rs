//! Post-damage invincibility window with blink phase
//!
//! Runs on accumulated millisecond deltas from the frame driver. While
//! active the player ignores contact damage and a visibility flag toggles at
//! a fixed blink interval for the renderer. Expiry always leaves the player
//! visible.

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvincibilityTimer {
    active: bool,
    remaining_ms: f64,
    /// Milliseconds accumulated toward the next visibility toggle
    blink_phase_ms: f64,
    visible: bool,
}

impl Default for InvincibilityTimer {
    fn default() -> Self {
        Self {
            active: false,
            remaining_ms: 0.0,
            blink_phase_ms: 0.0,
            visible: true,
        }
    }
}

impl InvincibilityTimer {
    /// Arm the timer. Re-activation restarts both the window and the blink.
    pub fn activate(&mut self, duration_ms: f64) {
        self.active = true;
        self.remaining_ms = duration_ms;
        self.blink_phase_ms = 0.0;
        self.visible = true;
    }

    /// Advance by one frame's delta. No-op while inactive.
    pub fn update(&mut self, dt_ms: f64) {
        if !self.active {
            return;
        }
        self.remaining_ms -= dt_ms;
        if self.remaining_ms <= 0.0 {
            self.active = false;
            self.remaining_ms = 0.0;
            self.blink_phase_ms = 0.0;
            self.visible = true;
            return;
        }
        self.blink_phase_ms += dt_ms;
        while self.blink_phase_ms >= BLINK_INTERVAL_MS {
            self.blink_phase_ms -= BLINK_INTERVAL_MS;
            self.visible = !self.visible;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Renderer visibility; always true outside the window
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn remaining_secs(&self) -> f64 {
        self.remaining_ms / 1000.0
    }
}
