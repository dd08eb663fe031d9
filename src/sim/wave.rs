//! Difficulty curve, enemy spawner and the boss encounter script

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand_pcg::Pcg32;

use super::enemy::EnemyKind;
use crate::consts::*;
use crate::polar_to_cartesian;
use crate::tuning::{BossTuning, EnemyTable, TuningError};

/// Time-derived difficulty
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WaveState {
    /// Seconds survived this run
    pub elapsed: f32,
}

impl WaveState {
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// +50% enemy health per full minute survived
    pub fn health_multiplier(&self) -> f32 {
        1.0 + (self.elapsed / 60.0).floor() * 0.5
    }

    /// -10% spawn interval per 30 seconds, floored at 0.3
    pub fn spawn_multiplier(&self) -> f32 {
        (1.0 - (self.elapsed / 30.0).floor() * 0.1).max(0.3)
    }
}

/// Weighted-random enemy spawner
#[derive(Debug, Clone)]
pub struct Spawner {
    base_interval: f32,
    spawn_radius: f32,
    weights: WeightedIndex<u32>,
    timer: f32,
    /// Interval override while the boss throttles spawning
    throttle: Option<f32>,
}

impl Spawner {
    /// Build a spawner; zero total weight is rejected here, never per spawn
    pub fn new(table: &EnemyTable, base_interval: f32, spawn_radius: f32) -> Result<Self, TuningError> {
        let weights =
            WeightedIndex::new(table.weights()).map_err(|_| TuningError::ZeroSpawnWeights)?;
        Ok(Self {
            base_interval,
            spawn_radius,
            weights,
            timer: 0.0,
            throttle: None,
        })
    }

    /// Current seconds between spawns
    pub fn interval(&self, wave: &WaveState) -> f32 {
        self.throttle
            .unwrap_or(self.base_interval * wave.spawn_multiplier())
    }

    pub fn set_throttle(&mut self, interval: Option<f32>) {
        self.throttle = interval;
    }

    pub fn is_throttled(&self) -> bool {
        self.throttle.is_some()
    }

    /// Clear the cadence timer and any throttle for a fresh run
    pub fn reset(&mut self) {
        self.timer = 0.0;
        self.throttle = None;
    }

    /// Draw an archetype by weight
    pub fn pick_kind(&self, rng: &mut Pcg32) -> EnemyKind {
        EnemyKind::ALL[self.weights.sample(rng)]
    }

    /// Random point on the spawn ring around `center`
    pub fn spawn_point(&self, center: Vec2, rng: &mut Pcg32) -> Vec2 {
        let theta = rng.random_range(0.0..TAU);
        center + polar_to_cartesian(self.spawn_radius, theta)
    }

    /// Advance the timer; returns the archetype and position to spawn, if due
    pub fn update(
        &mut self,
        dt: f32,
        wave: &WaveState,
        player_pos: Vec2,
        rng: &mut Pcg32,
    ) -> Option<(EnemyKind, Vec2)> {
        self.timer += dt;
        if self.timer < self.interval(wave) {
            return None;
        }
        self.timer = 0.0;
        let kind = self.pick_kind(rng);
        let pos = self.spawn_point(player_pos, rng);
        Some((kind, pos))
    }
}

/// What the boss script wants done this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossCue {
    /// Show the approach warning
    Warn,
    /// Spawn the boss at this position
    Spawn(Vec2),
}

/// One-shot boss encounter script
#[derive(Debug, Clone, Default)]
pub struct BossController {
    pub warned: bool,
    pub spawned: bool,
    pub defeated: bool,
}

impl BossController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the trigger; returns at most one cue per frame
    pub fn update(
        &mut self,
        wave: &WaveState,
        tuning: &BossTuning,
        player_pos: Vec2,
        rng: &mut Pcg32,
    ) -> Option<BossCue> {
        if self.spawned {
            return None;
        }
        if wave.elapsed >= tuning.trigger_time {
            self.spawned = true;
            self.warned = true;
            let theta = rng.random_range(0.0..TAU);
            return Some(BossCue::Spawn(
                player_pos + polar_to_cartesian(tuning.spawn_radius, theta),
            ));
        }
        if !self.warned && wave.elapsed >= tuning.trigger_time - BOSS_WARNING_LEAD {
            self.warned = true;
            return Some(BossCue::Warn);
        }
        None
    }
}
