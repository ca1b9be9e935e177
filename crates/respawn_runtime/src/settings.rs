//! Runtime settings

use respawn_core::{PoolSettings, SettingsError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    pub pool: PoolSettings,
    pub simulation: SimulationSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub frames: u32,
    /// Fire one projectile every N frames.
    pub fire_interval: u32,
    pub projectile_lifetime_ms: u64,
    pub spark_lifetime_ms: u64,
    pub projectile_speed: f32,
    pub arena_half_width: f32,
    /// Destroy one live projectile behind the pool's back every N frames (0 = never).
    pub sabotage_interval: u32,
    pub warmup: WarmupSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WarmupSettings {
    pub projectiles: usize,
    pub sparks: usize,
    pub per_tick: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            frames: 600,
            fire_interval: 3,
            projectile_lifetime_ms: 1_500,
            spark_lifetime_ms: 250,
            projectile_speed: 40.0,
            arena_half_width: 25.0,
            sabotage_interval: 97,
            warmup: WarmupSettings::default(),
        }
    }
}

impl Default for WarmupSettings {
    fn default() -> Self {
        Self {
            projectiles: 32,
            sparks: 16,
            per_tick: 4,
        }
    }
}

impl RuntimeSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
