//! Shared entity capabilities and pooled storage
//!
//! Every simulated thing (enemy, boss, projectile, gem) implements [`Entity`].
//! Pools keep entities dense and sorted by id; destruction only flips the
//! alive flag and [`EntityPool::sweep`] drops tombstones between passes.

use glam::{Vec2, Vec3};

/// Stable entity handle, allocated monotonically per run
pub type EntityId = u32;

/// Common capability set of every simulated entity
pub trait Entity {
    fn id(&self) -> EntityId;
    /// Position on the ground plane
    fn pos(&self) -> Vec2;
    /// Fixed render height above the ground plane
    fn height(&self) -> f32;
    /// Hitbox radius
    fn radius(&self) -> f32;
    fn is_alive(&self) -> bool;
    /// Advance one frame; `player_pos` is the only world input entities steer by
    fn update(&mut self, dt: f32, player_pos: Vec2);

    /// Position for the render collaborator (ground plane is XZ)
    fn world_pos(&self) -> Vec3 {
        let p = self.pos();
        Vec3::new(p.x, self.height(), p.y)
    }
}

/// Result of applying damage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target was already destroyed or damage was not positive
    Ignored,
    Hurt,
    Killed,
}

/// Entities with health
pub trait Damageable: Entity {
    fn health(&self) -> f32;
    fn max_health(&self) -> f32;
    /// Apply damage; destroying an already destroyed entity is a no-op
    fn take_damage(&mut self, amount: f32) -> DamageOutcome;
}

/// Shared health bookkeeping for damageable entities
pub(crate) fn apply_damage(
    id: EntityId,
    health: &mut f32,
    alive: &mut bool,
    amount: f32,
) -> DamageOutcome {
    if !*alive {
        log::warn!("Entity {} damaged after destruction, ignoring", id);
        return DamageOutcome::Ignored;
    }
    if amount <= 0.0 || !amount.is_finite() {
        return DamageOutcome::Ignored;
    }
    *health -= amount;
    if *health <= 0.0 {
        *alive = false;
        DamageOutcome::Killed
    } else {
        DamageOutcome::Hurt
    }
}

/// Dense entity storage sorted by id
#[derive(Debug, Clone)]
pub struct EntityPool<T: Entity> {
    items: Vec<T>,
}

impl<T: Entity> Default for EntityPool<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> EntityPool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity; ids must be allocated in increasing order
    pub fn insert(&mut self, entity: T) {
        debug_assert!(
            self.items.last().is_none_or(|last| last.id() < entity.id()),
            "entity ids must be inserted in increasing order"
        );
        self.items.push(entity);
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.index_of(id).map(|i| &self.items[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.index_of(id).map(|i| &mut self.items[i])
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.items.binary_search_by_key(&id, |e| e.id()).ok()
    }

    /// All stored entities, including tombstones not yet swept
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn iter_alive(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter(|e| e.is_alive())
    }

    pub fn iter_alive_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut().filter(|e| e.is_alive())
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    pub fn alive_count(&self) -> usize {
        self.iter_alive().count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop destroyed entities, returning how many were removed
    pub fn sweep(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|e| e.is_alive());
        before - self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Dummy {
        id: EntityId,
        alive: bool,
        health: f32,
    }

    impl Entity for Dummy {
        fn id(&self) -> EntityId {
            self.id
        }
        fn pos(&self) -> Vec2 {
            Vec2::ZERO
        }
        fn height(&self) -> f32 {
            1.0
        }
        fn radius(&self) -> f32 {
            0.5
        }
        fn is_alive(&self) -> bool {
            self.alive
        }
        fn update(&mut self, _dt: f32, _player_pos: Vec2) {}
    }

    fn dummy(id: EntityId) -> Dummy {
        Dummy {
            id,
            alive: true,
            health: 3.0,
        }
    }

    #[test]
    fn test_pool_lookup_and_sweep() {
        let mut pool = EntityPool::new();
        for id in [2, 5, 9] {
            pool.insert(dummy(id));
        }
        assert_eq!(pool.get(5).map(|d| d.id), Some(5));
        assert!(pool.get(4).is_none());

        pool.get_mut(5).unwrap().alive = false;
        assert_eq!(pool.alive_count(), 2);
        assert_eq!(pool.len(), 3);

        assert_eq!(pool.sweep(), 1);
        assert_eq!(pool.len(), 2);
        assert!(pool.get(5).is_none());
        assert_eq!(pool.get(9).map(|d| d.id), Some(9));
    }

    #[test]
    fn test_world_pos_maps_ground_plane() {
        let d = dummy(1);
        assert_eq!(d.world_pos(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_apply_damage() {
        let mut d = dummy(1);
        assert_eq!(
            apply_damage(d.id, &mut d.health, &mut d.alive, 1.0),
            DamageOutcome::Hurt
        );
        assert_eq!(d.health, 2.0);
        assert_eq!(
            apply_damage(d.id, &mut d.health, &mut d.alive, 0.0),
            DamageOutcome::Ignored
        );
        assert_eq!(
            apply_damage(d.id, &mut d.health, &mut d.alive, 5.0),
            DamageOutcome::Killed
        );
        assert!(!d.alive);

        // Second destruction is a no-op
        let health = d.health;
        assert_eq!(
            apply_damage(d.id, &mut d.health, &mut d.alive, 5.0),
            DamageOutcome::Ignored
        );
        assert_eq!(d.health, health);
    }
}
