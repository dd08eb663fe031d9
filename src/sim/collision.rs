//! Distance-based collision and damage resolution
//!
//! Five passes run in a fixed order after all motion. Anything destroyed in a
//! pass is swept from its pool before the next pass reads that pool.

use super::entity::{DamageOutcome, Damageable, EntityId};
use super::events::GameEvent;
use super::state::GameState;
use crate::audio::SoundEffect;
use crate::consts::*;

/// Run every pass for one frame
pub fn resolve(state: &mut GameState, dt: f32) {
    debug_assert!(state.enemies.iter().all(|e| e.alive), "unswept enemy");
    debug_assert!(state.projectiles.iter().all(|p| p.alive), "unswept projectile");

    player_enemy_contact(state, dt);
    player_boss_contact(state, dt);

    projectile_enemy_hits(state);
    state.enemies.sweep();
    state.projectiles.sweep();

    projectile_boss_hits(state);
    state.projectiles.sweep();

    player_gem_pickup(state);
    state.gems.sweep();
}

/// Advance a contact timer and decide whether touching damage lands now.
///
/// Idle timers saturate at the interval, so a fresh touch hits at once.
fn contact_damage_due(timer: &mut f32, dt: f32, touching_damage: f32) -> Option<f32> {
    *timer = (*timer + dt).min(CONTACT_INTERVAL);
    if touching_damage > 0.0 && *timer >= CONTACT_INTERVAL {
        *timer = 0.0;
        Some(touching_damage)
    } else {
        None
    }
}

/// Pass 1: summed contact damage from every enemy touching the player
pub fn player_enemy_contact(state: &mut GameState, dt: f32) {
    let player_pos = state.player.pos;
    let touching: f32 = state
        .enemies
        .iter_alive()
        .filter(|e| e.pos.distance(player_pos) < CONTACT_RADIUS)
        .map(|e| e.contact_damage)
        .sum();
    if let Some(damage) = contact_damage_due(&mut state.player.enemy_contact_timer, dt, touching) {
        state.player.take_damage(damage);
    }
}

/// Pass 2: boss contact on its own timer
pub fn player_boss_contact(state: &mut GameState, dt: f32) {
    let player_pos = state.player.pos;
    let touching = state
        .boss
        .as_ref()
        .filter(|b| b.alive && b.pos.distance(player_pos) < BOSS_CONTACT_RADIUS)
        .map_or(0.0, |b| b.contact_damage);
    if let Some(damage) = contact_damage_due(&mut state.player.boss_contact_timer, dt, touching) {
        state.player.take_damage(damage);
    }
}

/// Pass 3: projectiles against enemies, at most one hit per projectile
pub fn projectile_enemy_hits(state: &mut GameState) {
    let mut killed: Vec<EntityId> = Vec::new();

    for projectile in state.projectiles.iter_alive_mut() {
        for enemy in state.enemies.iter_alive_mut() {
            if !projectile.can_hit(enemy.id) {
                continue;
            }
            if projectile.pos.distance(enemy.pos) >= PROJECTILE_HIT_RADIUS + enemy.radius {
                continue;
            }
            let outcome = enemy.take_damage(projectile.damage);
            projectile.register_hit(enemy.id);
            state.events.push(GameEvent::DamageNumber {
                pos: enemy.pos,
                amount: projectile.damage,
            });
            state.events.push(GameEvent::Sound(SoundEffect::Hit));
            if outcome == DamageOutcome::Killed {
                killed.push(enemy.id);
            }
            break;
        }
    }

    for id in killed {
        state.reward_enemy_kill(id);
    }
}

/// Pass 4: projectiles against the boss
pub fn projectile_boss_hits(state: &mut GameState) {
    let Some(boss) = state.boss.as_mut().filter(|b| b.alive) else {
        return;
    };

    let mut boss_killed = false;
    for projectile in state.projectiles.iter_alive_mut() {
        if !projectile.can_hit(boss.id) {
            continue;
        }
        if projectile.pos.distance(boss.pos) >= BOSS_HIT_RADIUS {
            continue;
        }
        let outcome = boss.take_damage(projectile.damage);
        projectile.register_hit(boss.id);
        state.events.push(GameEvent::DamageNumber {
            pos: boss.pos,
            amount: projectile.damage,
        });
        state.events.push(GameEvent::Sound(SoundEffect::Hit));
        if outcome == DamageOutcome::Killed {
            boss_killed = true;
            break;
        }
    }

    if boss_killed {
        state.reward_boss_kill();
    }
}

/// Pass 5: gem pickup
pub fn player_gem_pickup(state: &mut GameState) {
    let player_pos = state.player.pos;
    let collected: u32 = state
        .gems
        .iter_alive_mut()
        .filter(|g| g.pos.distance(player_pos) < GEM_COLLECT_RADIUS)
        .filter_map(|g| g.collect())
        .sum();
    if collected > 0 {
        state.player.gain_xp(collected);
    }
}
