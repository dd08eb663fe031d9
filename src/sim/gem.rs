//! Experience gems dropped by defeated enemies

use glam::Vec2;
use serde::Serialize;

use super::entity::{Entity, EntityId};
use crate::consts::*;

/// An experience pickup
#[derive(Debug, Clone, Serialize)]
pub struct ExperienceGem {
    pub id: EntityId,
    pub pos: Vec2,
    pub xp: u32,
    pub alive: bool,
}

impl ExperienceGem {
    pub fn new(id: EntityId, pos: Vec2, xp: u32) -> Self {
        Self {
            id,
            pos,
            xp,
            alive: true,
        }
    }

    /// Gem with the default payload
    pub fn with_default_xp(id: EntityId, pos: Vec2) -> Self {
        Self::new(id, pos, GEM_DEFAULT_XP)
    }

    /// Magnet pull speed at a given distance from the player
    ///
    /// Base speed at the edge of the magnet radius, ramping linearly to
    /// `GEM_MAGNET_MAX_BOOST` times faster at zero distance.
    pub fn magnet_speed(dist: f32) -> f32 {
        let closeness = (1.0 - dist / GEM_MAGNET_RADIUS).clamp(0.0, 1.0);
        GEM_MAGNET_SPEED * (1.0 + (GEM_MAGNET_MAX_BOOST - 1.0) * closeness)
    }

    /// Mark collected; returns the payload the first time only
    pub fn collect(&mut self) -> Option<u32> {
        if !self.alive {
            return None;
        }
        self.alive = false;
        Some(self.xp)
    }
}

impl Entity for ExperienceGem {
    fn id(&self) -> EntityId {
        self.id
    }

    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn height(&self) -> f32 {
        GEM_HEIGHT
    }

    fn radius(&self) -> f32 {
        GEM_COLLECT_RADIUS
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn update(&mut self, dt: f32, player_pos: Vec2) {
        if !self.alive {
            return;
        }
        let to_player = player_pos - self.pos;
        let dist = to_player.length();
        if dist < GEM_MAGNET_RADIUS && dist > 0.0 {
            // Never overshoot the player
            let step = (Self::magnet_speed(dist) * dt).min(dist);
            self.pos += to_player / dist * step;
        }
    }
}
