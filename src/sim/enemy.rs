//! Enemy archetypes and the boss

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{DamageOutcome, Damageable, Entity, EntityId, apply_damage};
use crate::consts::*;
use crate::tuning::{ArchetypeStats, BossTuning};

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Normal,
    Runner,
    Tank,
}

impl EnemyKind {
    /// Every archetype, in spawn-weight order
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Normal, EnemyKind::Runner, EnemyKind::Tank];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Normal => "normal",
            EnemyKind::Runner => "runner",
            EnemyKind::Tank => "tank",
        }
    }

    pub(crate) fn health_field(&self) -> &'static str {
        match self {
            EnemyKind::Normal => "enemies.normal.health",
            EnemyKind::Runner => "enemies.runner.health",
            EnemyKind::Tank => "enemies.tank.health",
        }
    }

    pub(crate) fn radius_field(&self) -> &'static str {
        match self {
            EnemyKind::Normal => "enemies.normal.radius",
            EnemyKind::Runner => "enemies.runner.radius",
            EnemyKind::Tank => "enemies.tank.radius",
        }
    }
}

/// An enemy chasing the player
#[derive(Debug, Clone, Serialize)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub radius: f32,
    pub scale: f32,
    pub color: u32,
    pub contact_damage: f32,
    pub xp_value: u32,
    pub alive: bool,
    /// Hit flash timer (visual only)
    #[serde(skip)]
    pub flash: f32,
}

impl Enemy {
    /// Create an enemy from its archetype, scaling health by the wave multiplier
    pub fn new(
        id: EntityId,
        kind: EnemyKind,
        stats: &ArchetypeStats,
        pos: Vec2,
        health_multiplier: f32,
    ) -> Self {
        let health = (stats.health * health_multiplier).floor().max(1.0);
        Self {
            id,
            kind,
            pos,
            health,
            max_health: health,
            speed: stats.speed,
            radius: stats.radius,
            scale: stats.scale,
            color: stats.color,
            contact_damage: stats.contact_damage,
            xp_value: stats.xp_value,
            alive: true,
            flash: 0.0,
        }
    }

    /// Flash intensity for rendering (1 = just hit)
    pub fn flash_intensity(&self) -> f32 {
        (self.flash / ENEMY_FLASH_DURATION).clamp(0.0, 1.0)
    }

    /// Push the enemy directly away from `from`
    pub fn knock_back(&mut self, from: Vec2, distance: f32) {
        let away = (self.pos - from).normalize_or_zero();
        self.pos += away * distance;
    }
}

impl Entity for Enemy {
    fn id(&self) -> EntityId {
        self.id
    }

    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn height(&self) -> f32 {
        ENEMY_HEIGHT * self.scale
    }

    fn radius(&self) -> f32 {
        self.radius
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn update(&mut self, dt: f32, player_pos: Vec2) {
        if !self.alive {
            return;
        }
        let to_player = (player_pos - self.pos).normalize_or_zero();
        self.pos += to_player * self.speed * dt;
        self.flash = (self.flash - dt).max(0.0);
    }
}

impl Damageable for Enemy {
    fn health(&self) -> f32 {
        self.health
    }

    fn max_health(&self) -> f32 {
        self.max_health
    }

    fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        let outcome = apply_damage(self.id, &mut self.health, &mut self.alive, amount);
        if outcome != DamageOutcome::Ignored {
            self.flash = ENEMY_FLASH_DURATION;
        }
        outcome
    }
}

/// The scripted boss
#[derive(Debug, Clone, Serialize)]
pub struct Boss {
    pub id: EntityId,
    pub name: &'static str,
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub radius: f32,
    pub contact_damage: f32,
    pub xp_value: u32,
    pub alive: bool,
    #[serde(skip)]
    pub flash: f32,
}

impl Boss {
    pub fn new(id: EntityId, tuning: &BossTuning, pos: Vec2) -> Self {
        Self {
            id,
            name: BOSS_NAME,
            pos,
            health: tuning.health,
            max_health: tuning.health,
            speed: tuning.speed,
            radius: tuning.radius,
            contact_damage: tuning.contact_damage,
            xp_value: tuning.xp_value,
            alive: true,
            flash: 0.0,
        }
    }

    /// Remaining health as a percentage (0-100) for the health bar
    pub fn health_percent(&self) -> f32 {
        (self.health.max(0.0) / self.max_health * 100.0).clamp(0.0, 100.0)
    }

    pub fn flash_intensity(&self) -> f32 {
        (self.flash / BOSS_FLASH_DURATION).clamp(0.0, 1.0)
    }
}

impl Entity for Boss {
    fn id(&self) -> EntityId {
        self.id
    }

    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn height(&self) -> f32 {
        BOSS_HEIGHT
    }

    fn radius(&self) -> f32 {
        self.radius
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn update(&mut self, dt: f32, player_pos: Vec2) {
        if !self.alive {
            return;
        }
        let to_player = (player_pos - self.pos).normalize_or_zero();
        self.pos += to_player * self.speed * dt;
        self.flash = (self.flash - dt).max(0.0);
    }
}

impl Damageable for Boss {
    fn health(&self) -> f32 {
        self.health
    }

    fn max_health(&self) -> f32 {
        self.max_health
    }

    fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        let outcome = apply_damage(self.id, &mut self.health, &mut self.alive, amount);
        if outcome != DamageOutcome::Ignored {
            self.flash = BOSS_FLASH_DURATION;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn normal(health_multiplier: f32) -> Enemy {
        let tuning = Tuning::default();
        Enemy::new(
            1,
            EnemyKind::Normal,
            tuning.enemies.stats(EnemyKind::Normal),
            Vec2::new(10.0, 0.0),
            health_multiplier,
        )
    }

    #[test]
    fn test_health_scaled_and_floored() {
        // 3 * 1.5 = 4.5 -> 4
        let enemy = normal(1.5);
        assert_eq!(enemy.health, 4.0);
        assert_eq!(enemy.max_health, 4.0);
    }

    #[test]
    fn test_moves_toward_player() {
        let mut enemy = normal(1.0);
        enemy.update(1.0, Vec2::ZERO);
        assert!((enemy.pos.x - 7.0).abs() < 0.0001);
    }

    #[test]
    fn test_flash_on_hit() {
        let mut enemy = normal(1.0);
        enemy.take_damage(1.0);
        assert_eq!(enemy.flash_intensity(), 1.0);
        enemy.update(0.05, Vec2::ZERO);
        assert!((enemy.flash_intensity() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_knock_back() {
        let mut enemy = normal(1.0);
        enemy.knock_back(Vec2::ZERO, 0.5);
        assert!((enemy.pos.x - 10.5).abs() < 0.0001);
    }

    #[test]
    fn test_boss_health_percent() {
        let mut boss = Boss::new(7, &BossTuning::default(), Vec2::ZERO);
        assert_eq!(boss.name, "The Cube King");
        assert_eq!(boss.health_percent(), 100.0);
        boss.take_damage(1250.0);
        assert_eq!(boss.health_percent(), 75.0);
        assert_eq!(boss.take_damage(10_000.0), DamageOutcome::Killed);
        assert_eq!(boss.health_percent(), 0.0);
        assert_eq!(boss.take_damage(1.0), DamageOutcome::Ignored);
    }

    proptest! {
        #[test]
        fn prop_damage_strictly_decreases(damage in 0.01f32..20.0) {
            let mut enemy = normal(1.0);
            let before = enemy.health;
            let outcome = enemy.take_damage(damage);
            prop_assert!(enemy.health < before);
            prop_assert_eq!(outcome == DamageOutcome::Killed, enemy.health <= 0.0);
            prop_assert_eq!(enemy.alive, enemy.health > 0.0);
        }
    }
}
