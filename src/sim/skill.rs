//! Passive skills: orbital shield and thunder strike
//!
//! Skills run once per frame after enemy motion and report kills back to the
//! tick so the shared reward pipeline runs exactly once per death.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::f32::consts::TAU;

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::entity::{DamageOutcome, Damageable, EntityId, EntityPool};
use super::events::GameEvent;
use crate::polar_to_cartesian;

/// Orbit radius around the player
pub const ORBIT_RADIUS: f32 = 2.0;
/// Hit radius of a single orb
pub const ORB_RADIUS: f32 = 0.6;
/// Per-orb, per-enemy re-hit delay (seconds)
pub const ORB_HIT_COOLDOWN: f32 = 0.5;
/// Distance an orb hit pushes an enemy away from the player
pub const ORB_KNOCKBACK: f32 = 0.5;

/// Skill kinds (at most one instance each)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkillKind {
    OrbitalShield,
    ThunderStrike,
}

impl SkillKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillKind::OrbitalShield => "Orbital Shield",
            SkillKind::ThunderStrike => "Thunder Strike",
        }
    }
}

/// World access a skill needs for one frame
pub struct SkillContext<'a> {
    pub dt: f32,
    pub player_pos: Vec2,
    pub enemies: &'a mut EntityPool<Enemy>,
    pub rng: &'a mut Pcg32,
    pub events: &'a mut Vec<GameEvent>,
}

/// Orbs circling the player that damage whatever they touch
#[derive(Debug, Clone)]
pub struct OrbitalShield {
    pub level: u32,
    /// Current rotation of the first orb (radians)
    pub angle: f32,
    /// Per orb: enemy id -> seconds since that orb last hit it
    cooldowns: Vec<HashMap<EntityId, f32>>,
}

impl Default for OrbitalShield {
    fn default() -> Self {
        let mut shield = Self {
            level: 1,
            angle: 0.0,
            cooldowns: Vec::new(),
        };
        shield.resize_orbs();
        shield
    }
}

impl OrbitalShield {
    /// 2 orbs, one more every even level
    pub fn orb_count(&self) -> u32 {
        2 + self.level / 2
    }

    pub fn angular_speed(&self) -> f32 {
        3.0 + 0.5 * (self.level - 1) as f32
    }

    pub fn damage(&self) -> f32 {
        10.0 + 5.0 * (self.level - 1) as f32
    }

    fn resize_orbs(&mut self) {
        self.cooldowns.resize_with(self.orb_count() as usize, HashMap::new);
    }

    /// Orb centers around the player
    pub fn orb_positions(&self, player_pos: Vec2) -> Vec<Vec2> {
        let count = self.orb_count();
        (0..count)
            .map(|i| {
                let theta = self.angle + TAU * i as f32 / count as f32;
                player_pos + polar_to_cartesian(ORBIT_RADIUS, theta)
            })
            .collect()
    }

    pub fn upgrade(&mut self) {
        self.level += 1;
        self.resize_orbs();
    }

    pub fn start(&mut self) {
        self.angle = 0.0;
        self.destroy();
        self.resize_orbs();
    }

    pub fn destroy(&mut self) {
        for orb in &mut self.cooldowns {
            orb.clear();
        }
    }

    pub fn update(&mut self, ctx: &mut SkillContext<'_>, kills: &mut Vec<EntityId>) {
        self.angle = (self.angle + self.angular_speed() * ctx.dt) % TAU;

        for orb in &mut self.cooldowns {
            orb.retain(|_, since_hit| {
                *since_hit += ctx.dt;
                *since_hit < ORB_HIT_COOLDOWN
            });
        }

        let damage = self.damage();
        let positions = self.orb_positions(ctx.player_pos);
        for (orb_pos, cooldowns) in positions.iter().zip(self.cooldowns.iter_mut()) {
            for enemy in ctx.enemies.iter_alive_mut() {
                if cooldowns.contains_key(&enemy.id) {
                    continue;
                }
                if orb_pos.distance(enemy.pos) >= ORB_RADIUS + enemy.radius {
                    continue;
                }
                let outcome = enemy.take_damage(damage);
                cooldowns.insert(enemy.id, 0.0);
                ctx.events.push(GameEvent::DamageNumber {
                    pos: enemy.pos,
                    amount: damage,
                });
                if outcome == DamageOutcome::Killed {
                    kills.push(enemy.id);
                } else {
                    enemy.knock_back(ctx.player_pos, ORB_KNOCKBACK);
                }
            }
        }
    }
}

/// Periodic lightning bolt on a random enemy
#[derive(Debug, Clone)]
pub struct ThunderStrike {
    pub level: u32,
    pub timer: f32,
}

impl Default for ThunderStrike {
    fn default() -> Self {
        Self { level: 1, timer: 0.0 }
    }
}

impl ThunderStrike {
    pub fn cooldown(&self) -> f32 {
        (3.0 - 0.3 * (self.level - 1) as f32).max(1.0)
    }

    pub fn damage(&self) -> f32 {
        50.0 + 15.0 * (self.level - 1) as f32
    }

    pub fn upgrade(&mut self) {
        self.level += 1;
    }

    pub fn start(&mut self) {
        self.timer = 0.0;
    }

    pub fn destroy(&mut self) {
        self.timer = 0.0;
    }

    /// Strike when the cooldown has elapsed; with nobody to hit the timer
    /// keeps running so the next enemy to appear is struck at once
    pub fn update(&mut self, ctx: &mut SkillContext<'_>, kills: &mut Vec<EntityId>) {
        self.timer += ctx.dt;
        if self.timer < self.cooldown() {
            return;
        }

        let candidates: Vec<EntityId> = ctx.enemies.iter_alive().map(|e| e.id).collect();
        let Some(&target_id) = candidates.choose(&mut *ctx.rng) else {
            return;
        };
        let Some(enemy) = ctx.enemies.get_mut(target_id) else {
            return;
        };

        self.timer = 0.0;
        let damage = self.damage();
        let outcome = enemy.take_damage(damage);
        ctx.events.push(GameEvent::Lightning { pos: enemy.pos });
        ctx.events.push(GameEvent::DamageNumber {
            pos: enemy.pos,
            amount: damage,
        });
        if outcome == DamageOutcome::Killed {
            kills.push(target_id);
        }
    }
}

/// A skill instance
#[derive(Debug, Clone)]
pub enum Skill {
    OrbitalShield(OrbitalShield),
    ThunderStrike(ThunderStrike),
}

impl Skill {
    pub fn new(kind: SkillKind) -> Self {
        match kind {
            SkillKind::OrbitalShield => Skill::OrbitalShield(OrbitalShield::default()),
            SkillKind::ThunderStrike => Skill::ThunderStrike(ThunderStrike::default()),
        }
    }

    pub fn kind(&self) -> SkillKind {
        match self {
            Skill::OrbitalShield(_) => SkillKind::OrbitalShield,
            Skill::ThunderStrike(_) => SkillKind::ThunderStrike,
        }
    }

    pub fn level(&self) -> u32 {
        match self {
            Skill::OrbitalShield(s) => s.level,
            Skill::ThunderStrike(s) => s.level,
        }
    }

    pub fn upgrade(&mut self) {
        match self {
            Skill::OrbitalShield(s) => s.upgrade(),
            Skill::ThunderStrike(s) => s.upgrade(),
        }
    }

    pub fn start(&mut self) {
        match self {
            Skill::OrbitalShield(s) => s.start(),
            Skill::ThunderStrike(s) => s.start(),
        }
    }

    pub fn destroy(&mut self) {
        match self {
            Skill::OrbitalShield(s) => s.destroy(),
            Skill::ThunderStrike(s) => s.destroy(),
        }
    }

    pub fn update(&mut self, ctx: &mut SkillContext<'_>, kills: &mut Vec<EntityId>) {
        match self {
            Skill::OrbitalShield(s) => s.update(ctx, kills),
            Skill::ThunderStrike(s) => s.update(ctx, kills),
        }
    }
}

/// Registry of owned skills, one per kind
#[derive(Debug, Clone, Default)]
pub struct SkillManager {
    skills: BTreeMap<SkillKind, Skill>,
}

impl SkillManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a skill, or upgrade it in place if already owned.
    /// Returns the skill's resulting level.
    pub fn add_skill(&mut self, kind: SkillKind) -> u32 {
        match self.skills.entry(kind) {
            Entry::Occupied(mut entry) => {
                let skill = entry.get_mut();
                skill.upgrade();
                log::info!("{} upgraded to level {}", kind.as_str(), skill.level());
                skill.level()
            }
            Entry::Vacant(entry) => {
                let mut skill = Skill::new(kind);
                skill.start();
                log::info!("Acquired {}", kind.as_str());
                entry.insert(skill).level()
            }
        }
    }

    pub fn get(&self, kind: SkillKind) -> Option<&Skill> {
        self.skills.get(&kind)
    }

    pub fn has(&self, kind: SkillKind) -> bool {
        self.skills.contains_key(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Run every skill for one frame, in kind order
    pub fn update(&mut self, ctx: &mut SkillContext<'_>, kills: &mut Vec<EntityId>) {
        for skill in self.skills.values_mut() {
            skill.update(ctx, kills);
        }
    }

    /// Destroy and drop every skill
    pub fn clear(&mut self) {
        for skill in self.skills.values_mut() {
            skill.destroy();
        }
        self.skills.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::EnemyKind;
    use crate::tuning::Tuning;
    use rand::SeedableRng;

    struct World {
        enemies: EntityPool<Enemy>,
        rng: Pcg32,
        events: Vec<GameEvent>,
    }

    impl World {
        fn new() -> Self {
            Self {
                enemies: EntityPool::new(),
                rng: Pcg32::seed_from_u64(7),
                events: Vec::new(),
            }
        }

        fn spawn(&mut self, id: EntityId, kind: EnemyKind, pos: Vec2) {
            let tuning = Tuning::default();
            self.enemies
                .insert(Enemy::new(id, kind, tuning.enemies.stats(kind), pos, 1.0));
        }

        fn run(&mut self, skill: &mut Skill, dt: f32) -> Vec<EntityId> {
            let mut kills = Vec::new();
            let mut ctx = SkillContext {
                dt,
                player_pos: Vec2::ZERO,
                enemies: &mut self.enemies,
                rng: &mut self.rng,
                events: &mut self.events,
            };
            skill.update(&mut ctx, &mut kills);
            kills
        }
    }

    #[test]
    fn test_orbital_scaling() {
        let mut shield = OrbitalShield::default();
        assert_eq!(shield.orb_count(), 2);
        assert_eq!(shield.damage(), 10.0);
        shield.upgrade();
        assert_eq!(shield.orb_count(), 3);
        assert_eq!(shield.angular_speed(), 3.5);
        assert_eq!(shield.damage(), 15.0);
        shield.upgrade();
        assert_eq!(shield.orb_count(), 3);
        shield.upgrade();
        assert_eq!(shield.orb_count(), 4);
        assert_eq!(shield.orb_positions(Vec2::ZERO).len(), 4);
    }

    #[test]
    fn test_orbital_per_enemy_cooldown() {
        let mut world = World::new();
        // Tanks survive several orb hits. Both sit on the first orb's path
        // at angle 0 so the same orb overlaps them every frame.
        world.spawn(1, EnemyKind::Tank, Vec2::new(ORBIT_RADIUS, 0.0));
        world.spawn(2, EnemyKind::Tank, Vec2::new(ORBIT_RADIUS + 0.3, 0.0));
        world.enemies.get_mut(1).unwrap().health = 1000.0;
        world.enemies.get_mut(2).unwrap().health = 1000.0;

        let mut skill = Skill::OrbitalShield(OrbitalShield::default());
        world.run(&mut skill, 0.0);
        let hp1 = world.enemies.get(1).unwrap().health;
        let hp2 = world.enemies.get(2).unwrap().health;
        assert_eq!(hp1, 990.0, "first enemy struck");
        assert_eq!(hp2, 990.0, "second enemy struck independently");

        // Pin the enemies back onto the orb path every frame (knockback moves them)
        for _ in 0..4 {
            world.enemies.get_mut(1).unwrap().pos = Vec2::new(ORBIT_RADIUS, 0.0);
            if let Skill::OrbitalShield(s) = &mut skill {
                s.angle = 0.0;
            }
            world.run(&mut skill, 0.1);
        }
        // 0.4s elapsed: still cooling down
        assert_eq!(world.enemies.get(1).unwrap().health, 990.0);

        world.enemies.get_mut(1).unwrap().pos = Vec2::new(ORBIT_RADIUS, 0.0);
        if let Skill::OrbitalShield(s) = &mut skill {
            s.angle = 0.0;
        }
        world.run(&mut skill, 0.1);
        assert_eq!(
            world.enemies.get(1).unwrap().health,
            980.0,
            "struck again once 0.5s have passed"
        );
    }

    #[test]
    fn test_orbital_rehit_frames() {
        let mut world = World::new();
        world.spawn(1, EnemyKind::Tank, Vec2::new(ORBIT_RADIUS, 0.0));
        world.enemies.get_mut(1).unwrap().health = 1000.0;

        let mut skill = Skill::new(SkillKind::OrbitalShield);
        let mut hit_frames = Vec::new();
        for frame in 0..11 {
            world.enemies.get_mut(1).unwrap().pos = Vec2::new(ORBIT_RADIUS, 0.0);
            if let Skill::OrbitalShield(s) = &mut skill {
                s.angle = 0.0;
            }
            let before = world.enemies.get(1).unwrap().health;
            world.run(&mut skill, 0.1);
            if world.enemies.get(1).unwrap().health < before {
                hit_frames.push(frame);
            }
        }
        assert_eq!(hit_frames, vec![0, 5, 10]);
    }

    #[test]
    fn test_orbital_knockback_and_kill() {
        let mut world = World::new();
        world.spawn(1, EnemyKind::Normal, Vec2::new(ORBIT_RADIUS, 0.0));
        world.spawn(2, EnemyKind::Tank, Vec2::new(0.0, -ORBIT_RADIUS));
        world.enemies.get_mut(2).unwrap().health = 100.0;

        let mut skill = Skill::new(SkillKind::OrbitalShield);
        let kills = world.run(&mut skill, 0.0);
        assert_eq!(kills, vec![1]);

        // Second orb sits at angle PI, not over the tank; move the tank there
        world.enemies.get_mut(2).unwrap().pos = Vec2::new(-ORBIT_RADIUS, 0.0);
        world.run(&mut skill, 0.0);
        let tank = world.enemies.get(2).unwrap();
        assert_eq!(tank.health, 90.0);
        assert!((tank.pos.x + ORBIT_RADIUS + ORB_KNOCKBACK).abs() < 0.0001);
    }

    #[test]
    fn test_thunder_cooldown_scaling() {
        let mut thunder = ThunderStrike::default();
        assert_eq!(thunder.cooldown(), 3.0);
        assert_eq!(thunder.damage(), 50.0);
        for _ in 0..10 {
            thunder.upgrade();
        }
        assert_eq!(thunder.cooldown(), 1.0);
        assert_eq!(thunder.damage(), 50.0 + 15.0 * 10.0);
    }

    #[test]
    fn test_thunder_waits_for_target_then_fires() {
        let mut world = World::new();
        let mut skill = Skill::new(SkillKind::ThunderStrike);

        // Cooldown expires with nobody around: nothing happens, timer keeps going
        assert!(world.run(&mut skill, 3.5).is_empty());
        assert!(world.events.is_empty());

        // First enemy to appear is struck on the very next frame
        world.spawn(1, EnemyKind::Normal, Vec2::new(10.0, 0.0));
        let kills = world.run(&mut skill, 0.016);
        assert_eq!(kills, vec![1]);
        assert!(world
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::Lightning { .. })));
        if let Skill::ThunderStrike(t) = &skill {
            assert_eq!(t.timer, 0.0);
        }
    }

    #[test]
    fn test_thunder_picks_only_alive() {
        let mut world = World::new();
        world.spawn(1, EnemyKind::Tank, Vec2::new(5.0, 0.0));
        world.spawn(2, EnemyKind::Tank, Vec2::new(-5.0, 0.0));
        world.enemies.get_mut(1).unwrap().alive = false;
        world.enemies.get_mut(2).unwrap().health = 500.0;

        let mut skill = Skill::new(SkillKind::ThunderStrike);
        world.run(&mut skill, 3.0);
        assert_eq!(world.enemies.get(2).unwrap().health, 450.0);
    }

    #[test]
    fn test_manager_acquire_then_upgrade() {
        let mut manager = SkillManager::new();
        assert_eq!(manager.add_skill(SkillKind::ThunderStrike), 1);
        assert_eq!(manager.add_skill(SkillKind::ThunderStrike), 2);
        assert_eq!(manager.add_skill(SkillKind::OrbitalShield), 1);
        assert_eq!(manager.iter().count(), 2);
        assert!(manager.has(SkillKind::OrbitalShield));

        manager.clear();
        assert!(manager.is_empty());
    }
}
