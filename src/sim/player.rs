//! The player: movement, health, experience, weapons and skills

use glam::{Vec2, Vec3};

use super::skill::SkillManager;
use super::weapon::{Weapon, WeaponKind};
use crate::consts::*;
use crate::tuning::PlayerTuning;
use crate::clamp_unit;

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    /// Health regenerated per second
    pub regen: f32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub level: u32,
    /// Level-ups earned but not yet resolved through the menu
    pub pending_level_ups: u32,
    pub pistol: Weapon,
    pub shotgun: Option<Weapon>,
    pub active_weapon: WeaponKind,
    pub skills: SkillManager,
    /// Contact damage timers (enemy, boss)
    pub enemy_contact_timer: f32,
    pub boss_contact_timer: f32,
}

impl Player {
    pub fn new(tuning: &PlayerTuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            speed: tuning.speed,
            health: tuning.max_health,
            max_health: tuning.max_health,
            regen: tuning.regen,
            xp: 0,
            xp_to_next_level: tuning.initial_xp_threshold,
            level: 1,
            pending_level_ups: 0,
            pistol: Weapon::pistol(),
            shotgun: None,
            active_weapon: WeaponKind::Pistol,
            skills: SkillManager::new(),
            enemy_contact_timer: 0.0,
            boss_contact_timer: 0.0,
        }
    }

    pub fn world_pos(&self) -> Vec3 {
        Vec3::new(self.pos.x, PLAYER_HEIGHT, self.pos.y)
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Move by the (normalized) intent and regenerate health
    pub fn update(&mut self, dt: f32, move_dir: Vec2) {
        self.pos += clamp_unit(move_dir) * self.speed * dt;
        if !self.is_dead() {
            self.heal(self.regen * dt);
        }
    }

    /// Apply damage, clamping health at zero
    pub fn take_damage(&mut self, amount: f32) {
        if amount <= 0.0 || !amount.is_finite() {
            return;
        }
        self.health = (self.health - amount).clamp(0.0, self.max_health);
    }

    /// Restore health, capped at max
    pub fn heal(&mut self, amount: f32) {
        if amount <= 0.0 || !amount.is_finite() {
            return;
        }
        self.health = (self.health + amount).clamp(0.0, self.max_health);
    }

    /// The weapon currently firing
    pub fn weapon_mut(&mut self) -> &mut Weapon {
        match (self.active_weapon, self.shotgun.as_mut()) {
            (WeaponKind::Shotgun, Some(shotgun)) => shotgun,
            _ => &mut self.pistol,
        }
    }

    pub fn weapon(&self) -> &Weapon {
        match (self.active_weapon, self.shotgun.as_ref()) {
            (WeaponKind::Shotgun, Some(shotgun)) => shotgun,
            _ => &self.pistol,
        }
    }

    /// Add experience, resolving every level crossed.
    /// Returns the number of new levels gained.
    pub fn gain_xp(&mut self, amount: u32) -> u32 {
        self.xp = self.xp.saturating_add(amount);
        let mut gained = 0;
        while self.xp >= self.xp_to_next_level {
            self.xp -= self.xp_to_next_level;
            self.xp_to_next_level =
                ((self.xp_to_next_level as f32 * XP_GROWTH).floor() as u32).max(1);
            self.level += 1;
            gained += 1;
        }
        self.pending_level_ups += gained;
        gained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player() -> Player {
        Player::new(&PlayerTuning::default())
    }

    #[test]
    fn test_xp_rollover() {
        let mut p = player();
        assert_eq!(p.xp_to_next_level, 20);
        assert_eq!(p.gain_xp(25), 1);
        assert_eq!(p.level, 2);
        assert_eq!(p.xp, 5);
        assert_eq!(p.xp_to_next_level, 30);
        assert_eq!(p.pending_level_ups, 1);
    }

    #[test]
    fn test_multi_level_gain() {
        let mut p = player();
        // 20 + 30 + 45 = 95
        assert_eq!(p.gain_xp(100), 3);
        assert_eq!(p.level, 4);
        assert_eq!(p.xp, 5);
        assert_eq!(p.xp_to_next_level, 67);
    }

    #[test]
    fn test_health_clamped() {
        let mut p = player();
        p.take_damage(250.0);
        assert_eq!(p.health, 0.0);
        assert!(p.is_dead());

        // No regen once dead
        p.update(1.0, Vec2::ZERO);
        assert_eq!(p.health, 0.0);

        let mut p = player();
        p.take_damage(10.0);
        p.heal(1000.0);
        assert_eq!(p.health, p.max_health);
    }

    #[test]
    fn test_movement_normalized() {
        let mut p = player();
        p.update(1.0, Vec2::new(1.0, 1.0));
        assert!((p.pos.length() - p.speed).abs() < 0.001);
    }

    #[test]
    fn test_non_finite_move_ignored() {
        let mut p = player();
        p.update(0.1, Vec2::new(f32::INFINITY, 0.0));
        assert_eq!(p.pos, Vec2::ZERO);
        p.update(0.1, Vec2::X);
        assert!(p.pos.is_finite());
    }

    #[test]
    fn test_active_weapon_falls_back_to_pistol() {
        let mut p = player();
        p.active_weapon = WeaponKind::Shotgun;
        assert_eq!(p.weapon().kind, WeaponKind::Pistol);
        p.shotgun = Some(Weapon::shotgun());
        assert_eq!(p.weapon_mut().kind, WeaponKind::Shotgun);
    }

    proptest! {
        #[test]
        fn prop_xp_below_threshold_after_gain(gains in proptest::collection::vec(0u32..500, 1..20)) {
            let mut p = player();
            for g in gains {
                p.gain_xp(g);
                prop_assert!(p.xp < p.xp_to_next_level);
            }
        }

        #[test]
        fn prop_health_in_bounds(hits in proptest::collection::vec(-50.0f32..80.0, 1..30)) {
            let mut p = player();
            for h in hits {
                if h >= 0.0 { p.take_damage(h) } else { p.heal(-h) }
                prop_assert!(p.health >= 0.0 && p.health <= p.max_health);
            }
        }
    }
}
