//! Data-driven game balance
//!
//! Loaded once at startup (JSON, every field optional) and validated before a
//! run is created. Fixed geometry that never changes lives in `crate::consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::EnemyKind;

/// Configuration validation failures
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("spawn weights sum to zero")]
    ZeroSpawnWeights,
    #[error("tunable `{field}` must be finite and positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("malformed tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not read tuning file: {0}")]
    Io(#[from] std::io::Error),
}

/// Stat template for one enemy archetype
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeStats {
    /// RGB color (0xRRGGBB)
    pub color: u32,
    /// Visual scale
    pub scale: f32,
    /// Hitbox radius
    pub radius: f32,
    pub speed: f32,
    pub health: f32,
    pub contact_damage: f32,
    pub xp_value: u32,
    pub spawn_weight: u32,
}

/// Archetype table, one entry per enemy kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTable {
    pub normal: ArchetypeStats,
    pub runner: ArchetypeStats,
    pub tank: ArchetypeStats,
}

impl Default for EnemyTable {
    fn default() -> Self {
        Self {
            normal: ArchetypeStats {
                color: 0xff4444,
                scale: 1.0,
                radius: 0.5,
                speed: 3.0,
                health: 3.0,
                contact_damage: 10.0,
                xp_value: 10,
                spawn_weight: 70,
            },
            runner: ArchetypeStats {
                color: 0x44ff44,
                scale: 0.7,
                radius: 0.35,
                speed: 5.5,
                health: 2.0,
                contact_damage: 5.0,
                xp_value: 15,
                spawn_weight: 20,
            },
            tank: ArchetypeStats {
                color: 0x8844ff,
                scale: 1.6,
                radius: 0.8,
                speed: 1.8,
                health: 10.0,
                contact_damage: 20.0,
                xp_value: 30,
                spawn_weight: 10,
            },
        }
    }
}

impl EnemyTable {
    pub fn stats(&self, kind: EnemyKind) -> &ArchetypeStats {
        match kind {
            EnemyKind::Normal => &self.normal,
            EnemyKind::Runner => &self.runner,
            EnemyKind::Tank => &self.tank,
        }
    }

    /// Spawn weights in `EnemyKind::ALL` order
    pub fn weights(&self) -> [u32; 3] {
        EnemyKind::ALL.map(|kind| self.stats(kind).spawn_weight)
    }
}

/// Player starting stats
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: f32,
    pub speed: f32,
    /// Health regenerated per second
    pub regen: f32,
    /// XP needed for the first level-up
    pub initial_xp_threshold: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            speed: 8.0,
            regen: 1.0,
            initial_xp_threshold: 20,
        }
    }
}

/// Boss encounter tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    /// Survival time (seconds) that triggers the encounter
    pub trigger_time: f32,
    pub health: f32,
    pub speed: f32,
    pub contact_damage: f32,
    pub xp_value: u32,
    pub radius: f32,
    pub spawn_radius: f32,
    /// Clear the arena and throttle spawns while the boss is alive
    pub clears_arena: bool,
    /// Spawn interval (seconds) while throttled
    pub throttled_spawn_interval: f32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            trigger_time: 60.0,
            health: 5000.0,
            speed: 2.5,
            contact_damage: 30.0,
            xp_value: 500,
            radius: 2.5,
            spawn_radius: 35.0,
            clears_arena: false,
            throttled_spawn_interval: 4.0,
        }
    }
}

/// Complete balance configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Seed for the run RNG
    pub seed: u64,
    /// Largest frame delta fed to the simulation (seconds)
    pub max_frame_dt: f32,
    /// Base seconds between spawns before the wave multiplier
    pub spawn_interval: f32,
    /// Distance from the player at which enemies appear
    pub spawn_radius: f32,
    pub player: PlayerTuning,
    pub enemies: EnemyTable,
    pub boss: BossTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            max_frame_dt: crate::consts::MAX_FRAME_DT,
            spawn_interval: 0.8,
            spawn_radius: 20.0,
            player: PlayerTuning::default(),
            enemies: EnemyTable::default(),
            boss: BossTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.enemies.weights().iter().map(|&w| w as u64).sum::<u64>() == 0 {
            return Err(TuningError::ZeroSpawnWeights);
        }

        let mut checks = vec![
            ("max_frame_dt", self.max_frame_dt),
            ("spawn_interval", self.spawn_interval),
            ("spawn_radius", self.spawn_radius),
            ("player.max_health", self.player.max_health),
            ("player.speed", self.player.speed),
            ("boss.trigger_time", self.boss.trigger_time),
            ("boss.health", self.boss.health),
            ("boss.radius", self.boss.radius),
            ("boss.spawn_radius", self.boss.spawn_radius),
            ("boss.throttled_spawn_interval", self.boss.throttled_spawn_interval),
        ];
        for kind in EnemyKind::ALL {
            let stats = self.enemies.stats(kind);
            checks.push((kind.health_field(), stats.health));
            checks.push((kind.radius_field(), stats.radius));
        }

        for (field, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::NonPositive { field, value });
            }
        }

        if self.player.initial_xp_threshold == 0 {
            return Err(TuningError::NonPositive {
                field: "player.initial_xp_threshold",
                value: 0.0,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json_str(r#"{ "boss": { "clears_arena": true } }"#).unwrap();
        assert!(tuning.boss.clears_arena);
        assert_eq!(tuning.boss.health, 5000.0);
        assert_eq!(tuning.enemies.weights(), [70, 20, 10]);
    }

    #[test]
    fn test_zero_weights_rejected() {
        let mut tuning = Tuning::default();
        tuning.enemies.normal.spawn_weight = 0;
        tuning.enemies.runner.spawn_weight = 0;
        tuning.enemies.tank.spawn_weight = 0;
        assert!(matches!(tuning.validate(), Err(TuningError::ZeroSpawnWeights)));
    }

    #[test]
    fn test_non_positive_rejected() {
        let mut tuning = Tuning::default();
        tuning.enemies.tank.health = 0.0;
        match tuning.validate() {
            Err(TuningError::NonPositive { field, .. }) => assert_eq!(field, "enemies.tank.health"),
            other => panic!("expected NonPositive, got {other:?}"),
        }

        let mut tuning = Tuning::default();
        tuning.spawn_interval = f32::NAN;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Tuning::from_json_str("{ not json"),
            Err(TuningError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Tuning::load("/nonexistent/cube-arena-tuning.json"),
            Err(TuningError::Io(_))
        ));
    }
}
