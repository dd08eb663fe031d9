//! Cube Arena - real-time simulation core for a top-down arena survival game
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, progression, phase machine)
//! - `tuning`: Data-driven game balance
//! - `audio`: Sound cue sink (fire-and-forget, safe to mute)

pub mod audio;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Fixed render heights above the ground plane
    pub const PLAYER_HEIGHT: f32 = 0.5;
    pub const ENEMY_HEIGHT: f32 = 0.5;
    pub const BOSS_HEIGHT: f32 = 2.5;
    pub const PROJECTILE_HEIGHT: f32 = 0.5;
    pub const GEM_HEIGHT: f32 = 0.3;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 25.0;
    pub const PROJECTILE_LIFETIME: f32 = 2.0;

    /// Experience gem defaults
    pub const GEM_DEFAULT_XP: u32 = 10;
    pub const GEM_MAGNET_RADIUS: f32 = 3.0;
    pub const GEM_MAGNET_SPEED: f32 = 15.0;
    /// Magnet speed multiplier when the gem is touching the player
    pub const GEM_MAGNET_MAX_BOOST: f32 = 3.0;

    /// Collision radii
    pub const CONTACT_RADIUS: f32 = 1.2;
    pub const BOSS_CONTACT_RADIUS: f32 = 3.0;
    pub const PROJECTILE_HIT_RADIUS: f32 = 1.0;
    pub const BOSS_HIT_RADIUS: f32 = 3.0;
    pub const GEM_COLLECT_RADIUS: f32 = 0.8;
    /// Seconds between contact damage applications
    pub const CONTACT_INTERVAL: f32 = 0.5;

    /// Flash durations (visual only)
    pub const ENEMY_FLASH_DURATION: f32 = 0.1;
    pub const BOSS_FLASH_DURATION: f32 = 0.15;

    /// Rewards
    pub const KILL_SCORE: u64 = 10;
    pub const BOSS_KILL_SCORE: u64 = 1000;

    /// Progression
    pub const XP_GROWTH: f32 = 1.5;
    pub const UPGRADE_CHOICES: usize = 4;
    pub const HEAL_FRACTION: f32 = 0.5;

    /// Victory slow motion
    pub const VICTORY_TIME_SCALE: f32 = 0.2;
    pub const VICTORY_DELAY: f32 = 3.0;

    /// Boss
    pub const BOSS_NAME: &str = "The Cube King";
    pub const BOSS_WARNING_LEAD: f32 = 5.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Clamp a movement intent to unit length (shorter vectors pass through)
#[inline]
pub fn clamp_unit(v: Vec2) -> Vec2 {
    if !v.is_finite() {
        Vec2::ZERO
    } else if v.length_squared() > 1.0 {
        v.normalize_or_zero()
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(20.0, PI / 2.0);
        assert!(p.x.abs() < 0.001);
        assert!((p.y - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_clamp_unit() {
        // Diagonal keyboard input is longer than 1
        let diag = clamp_unit(Vec2::new(1.0, 1.0));
        assert!((diag.length() - 1.0).abs() < 0.0001);

        // Analog input below 1 is preserved
        let soft = clamp_unit(Vec2::new(0.3, 0.0));
        assert!((soft.x - 0.3).abs() < 0.0001);

        assert_eq!(clamp_unit(Vec2::new(f32::NAN, 0.0)), Vec2::ZERO);
        assert_eq!(clamp_unit(Vec2::new(f32::INFINITY, 0.0)), Vec2::ZERO);
        assert_eq!(clamp_unit(Vec2::new(0.0, f32::NEG_INFINITY)), Vec2::ZERO);
    }
}
