//! Weapon projectiles

use glam::Vec2;
use serde::Serialize;

use super::entity::{Entity, EntityId};
use crate::consts::*;

/// A projectile fired by the player's active weapon
#[derive(Debug, Clone, Serialize)]
pub struct Projectile {
    pub id: EntityId,
    pub pos: Vec2,
    /// Unit direction on the ground plane
    pub dir: Vec2,
    pub speed: f32,
    pub damage: f32,
    pub color: u32,
    pub age: f32,
    pub lifetime: f32,
    /// Extra enemies this projectile may damage after the first
    pub pierce: u32,
    /// Enemies already damaged (never hit twice)
    pub hit_ids: Vec<EntityId>,
    /// Resolved a hit this frame (one hit per projectile per frame)
    #[serde(skip)]
    pub struck_this_frame: bool,
    pub alive: bool,
}

impl Projectile {
    pub fn new(id: EntityId, pos: Vec2, dir: Vec2, damage: f32, color: u32, pierce: u32) -> Self {
        Self {
            id,
            pos,
            dir: dir.normalize_or_zero(),
            speed: PROJECTILE_SPEED,
            damage,
            color,
            age: 0.0,
            lifetime: PROJECTILE_LIFETIME,
            pierce,
            hit_ids: Vec::with_capacity(pierce as usize + 1),
            struck_this_frame: false,
            alive: true,
        }
    }

    /// Whether this projectile may still damage `target`
    pub fn can_hit(&self, target: EntityId) -> bool {
        self.alive && !self.struck_this_frame && !self.hit_ids.contains(&target)
    }

    /// Record a hit; destroys the projectile once it has used up its pierce
    pub fn register_hit(&mut self, target: EntityId) {
        self.hit_ids.push(target);
        self.struck_this_frame = true;
        if self.hit_ids.len() as u32 > self.pierce {
            self.alive = false;
        }
    }
}

impl Entity for Projectile {
    fn id(&self) -> EntityId {
        self.id
    }

    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn height(&self) -> f32 {
        PROJECTILE_HEIGHT
    }

    fn radius(&self) -> f32 {
        PROJECTILE_HIT_RADIUS
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn update(&mut self, dt: f32, _player_pos: Vec2) {
        if !self.alive {
            return;
        }
        self.struck_this_frame = false;
        self.pos += self.dir * self.speed * dt;
        self.age += dt;
        if self.age >= self.lifetime {
            self.alive = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_and_expires() {
        let mut p = Projectile::new(1, Vec2::ZERO, Vec2::new(2.0, 0.0), 1.0, 0xffffff, 0);
        p.update(1.0, Vec2::ZERO);
        assert!((p.pos.x - 25.0).abs() < 0.001);
        assert!(p.alive);
        p.update(1.0, Vec2::ZERO);
        assert!(!p.alive);
    }

    #[test]
    fn test_pierce_zero_stops_after_first_hit() {
        let mut p = Projectile::new(1, Vec2::ZERO, Vec2::X, 1.0, 0, 0);
        p.register_hit(10);
        assert!(!p.alive);
    }

    #[test]
    fn test_pierce_one_hits_two_distinct_enemies() {
        let mut p = Projectile::new(1, Vec2::ZERO, Vec2::X, 1.0, 0, 1);
        p.register_hit(10);
        assert!(p.alive);
        // Same frame: no second hit
        assert!(!p.can_hit(11));

        p.update(0.016, Vec2::ZERO);
        assert!(!p.can_hit(10), "already hit enemy is skipped");
        assert!(p.can_hit(11));
        p.register_hit(11);
        assert!(!p.alive);
    }
}
