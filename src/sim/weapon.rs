//! Weapon stats, upgrades and the firing algorithm

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::entity::Entity;

/// Weapon kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Pistol,
    Shotgun,
}

impl WeaponKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Pistol => "Pistol",
            WeaponKind::Shotgun => "Shotgun",
        }
    }
}

/// A weapon owned by the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub level: u32,
    pub damage: f32,
    /// Seconds between volleys
    pub fire_interval: f32,
    pub range: f32,
    pub projectile_count: u32,
    /// Total fan angle between the outermost projectiles (radians)
    pub spread: f32,
    pub pierce: u32,
    pub color: u32,
    /// Time accumulated since the last volley
    #[serde(default)]
    pub fire_timer: f32,
}

impl Weapon {
    pub fn pistol() -> Self {
        Self {
            kind: WeaponKind::Pistol,
            level: 1,
            damage: 1.0,
            fire_interval: 0.5,
            range: 15.0,
            projectile_count: 1,
            spread: 0.0,
            pierce: 1,
            color: 0xffff00,
            fire_timer: 0.0,
        }
    }

    pub fn shotgun() -> Self {
        Self {
            kind: WeaponKind::Shotgun,
            level: 1,
            damage: 1.5,
            fire_interval: 1.2,
            range: 8.0,
            projectile_count: 3,
            spread: std::f32::consts::PI / 8.0,
            pierce: 0,
            color: 0xff8800,
            fire_timer: 0.0,
        }
    }

    pub fn new(kind: WeaponKind) -> Self {
        match kind {
            WeaponKind::Pistol => Self::pistol(),
            WeaponKind::Shotgun => Self::shotgun(),
        }
    }

    /// Apply one upgrade level
    pub fn upgrade(&mut self) {
        self.level += 1;
        match self.kind {
            WeaponKind::Pistol => {
                self.fire_interval *= 0.85;
                self.damage *= 1.1;
            }
            WeaponKind::Shotgun => {
                if self.level % 2 == 0 {
                    self.projectile_count += 1;
                } else {
                    self.damage *= 1.2;
                }
            }
        }
        log::info!(
            "{} upgraded to level {} (damage {:.2}, interval {:.3}s, shots {})",
            self.kind.as_str(),
            self.level,
            self.damage,
            self.fire_interval,
            self.projectile_count
        );
    }

    /// Advance the fire timer and fire at most one volley
    ///
    /// Returns the projectile directions when the interval has elapsed and the
    /// target is within range. Without a target the timer keeps counting.
    pub fn fire(&mut self, dt: f32, origin: Vec2, target: Option<Vec2>) -> Option<Vec<Vec2>> {
        self.fire_timer += dt;
        if self.fire_timer < self.fire_interval {
            return None;
        }
        let target = target?;
        let to_target = target - origin;
        if to_target.length() > self.range {
            return None;
        }
        self.fire_timer = 0.0;

        let base_angle = if to_target.length_squared() > 0.0 {
            to_target.to_angle()
        } else {
            0.0
        };
        Some(fan_directions(base_angle, self.projectile_count, self.spread))
    }
}

/// Directions evenly spread across `spread` radians, centered on `base_angle`
pub fn fan_directions(base_angle: f32, count: u32, spread: f32) -> Vec<Vec2> {
    if count <= 1 {
        return vec![Vec2::from_angle(base_angle)];
    }
    let step = spread / (count - 1) as f32;
    let start = base_angle - spread / 2.0;
    (0..count)
        .map(|i| Vec2::from_angle(start + step * i as f32))
        .collect()
}

/// Nearest alive enemy by raw distance (first encountered wins ties)
pub fn nearest_enemy<'a>(
    origin: Vec2,
    enemies: impl IntoIterator<Item = &'a Enemy>,
) -> Option<&'a Enemy> {
    let mut best: Option<(&Enemy, f32)> = None;
    for enemy in enemies {
        if !enemy.is_alive() {
            continue;
        }
        let dist = origin.distance(enemy.pos);
        if best.is_none_or(|(_, best_dist)| dist < best_dist) {
            best = Some((enemy, dist));
        }
    }
    best.map(|(enemy, _)| enemy)
}
