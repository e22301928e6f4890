//! Level configuration and the level state machine
//!
//! A session runs an ordered ladder of level configs. The runtime clock is
//! advanced only by the frame driver's delta-time, never the wall clock, so
//! level timing is deterministic and replayable.

use serde::{Deserialize, Serialize};

/// Weighted item-type draw, tunable per level
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ItemWeights {
    pub heal: f32,
    pub rapid: f32,
    pub spread: f32,
}

impl Default for ItemWeights {
    fn default() -> Self {
        Self {
            heal: 0.4,
            rapid: 0.3,
            spread: 0.3,
        }
    }
}

/// Per-level tuning; immutable once loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: u32,
    pub name: String,
    pub description: String,
    /// Level duration in seconds
    pub duration_secs: f32,
    /// Agent spawn interval in frames
    pub spawn_interval: u32,
    /// Concurrent agent cap
    pub max_agents: usize,
    /// Multiplier on the base agent speed
    pub speed_multiplier: f32,
    /// Agent health at spawn
    pub agent_health: i32,
    /// Item spawn interval in frames
    pub item_interval: u32,
    /// Flat score awarded on completion
    pub completion_bonus: u64,
    /// Score per unclaimed second at completion
    pub time_bonus_multiplier: f32,
    #[serde(default)]
    pub item_weights: ItemWeights,
}

/// Ordered level configs; the sim only needs lookup-by-id and next-by-id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelSet {
    pub configs: Vec<LevelConfig>,
}

impl LevelSet {
    /// The built-in four-level ladder
    pub fn builtin() -> Self {
        fn level(
            id: u32,
            name: &str,
            description: &str,
            spawn_interval: u32,
            max_agents: usize,
            speed_multiplier: f32,
            agent_health: i32,
            item_interval: u32,
            completion_bonus: u64,
            time_bonus_multiplier: f32,
        ) -> LevelConfig {
            LevelConfig {
                id,
                name: name.to_string(),
                description: description.to_string(),
                duration_secs: 60.0,
                spawn_interval,
                max_agents,
                speed_multiplier,
                agent_health,
                item_interval,
                completion_bonus,
                time_bonus_multiplier,
                item_weights: ItemWeights::default(),
            }
        }

        Self {
            configs: vec![
                level(1, "Training Ground", "Survive for 60 seconds", 120, 5, 0.8, 1, 300, 100, 2.0),
                level(2, "Street Fight", "The horde grows", 90, 8, 1.0, 2, 250, 200, 1.5),
                level(3, "Dusk Falls", "Face the wave", 60, 12, 1.2, 3, 200, 300, 1.2),
                level(4, "Endless Night", "The final stand", 45, 15, 1.5, 5, 150, 500, 1.0),
            ],
        }
    }

    pub fn get(&self, id: u32) -> Option<&LevelConfig> {
        self.configs.iter().find(|c| c.id == id)
    }

    /// Next config in the ladder (id + 1), if any
    pub fn next_after(&self, id: u32) -> Option<&LevelConfig> {
        self.get(id + 1)
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Load an externally supplied ladder (ordered JSON array)
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let configs: Vec<LevelConfig> = serde_json::from_str(json)?;
        Ok(Self { configs })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.configs)
    }
}

/// Level lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelPhase {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Failed,
}

/// Level clock and phase; transitions are one-directional except for the
/// explicit reset-to-level-1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelRuntime {
    pub current: u32,
    pub phase: LevelPhase,
    /// Accumulated simulation time since start() (seconds)
    pub elapsed_secs: f32,
}

impl Default for LevelRuntime {
    fn default() -> Self {
        Self {
            current: 1,
            phase: LevelPhase::NotStarted,
            elapsed_secs: 0.0,
        }
    }
}

impl LevelRuntime {
    pub fn start(&mut self) {
        self.phase = LevelPhase::InProgress;
        self.elapsed_secs = 0.0;
    }

    /// Advance the clock; on reaching the duration, transition to Completed
    /// and return the bonus: `completion_bonus + floor(remaining * multiplier)`.
    pub fn update(&mut self, cfg: &LevelConfig, dt_secs: f32) -> Option<u64> {
        if self.phase != LevelPhase::InProgress {
            return None;
        }
        self.elapsed_secs += dt_secs;
        if self.elapsed_secs >= cfg.duration_secs {
            self.phase = LevelPhase::Completed;
            let remaining = (cfg.duration_secs - self.elapsed_secs).max(0.0);
            let bonus = cfg.completion_bonus
                + (remaining * cfg.time_bonus_multiplier).floor() as u64;
            return Some(bonus);
        }
        None
    }

    /// Explicit failure (player death), independent of the timer
    pub fn fail(&mut self) {
        self.phase = LevelPhase::Failed;
    }

    /// Move to the next config if one exists; caller must start() again.
    /// Returns false when the ladder is exhausted.
    pub fn advance(&mut self, levels: &LevelSet) -> bool {
        if levels.next_after(self.current).is_none() {
            return false;
        }
        self.current += 1;
        self.phase = LevelPhase::NotStarted;
        self.elapsed_secs = 0.0;
        true
    }

    pub fn in_progress(&self) -> bool {
        self.phase == LevelPhase::InProgress
    }

    /// Seconds left on the level clock (0 outside InProgress)
    pub fn remaining_secs(&self, cfg: &LevelConfig) -> f32 {
        if self.phase != LevelPhase::InProgress {
            return 0.0;
        }
        (cfg.duration_secs - self.elapsed_secs).max(0.0)
    }
}
