//! Per-frame simulation tick
//!
//! Advances the world by one variable frame delta and drives the phase
//! machine. Commands queued by the UI are applied first.

use glam::Vec2;

use super::collision;
use super::entity::{Entity, EntityId};
use super::events::{Command, GameEvent};
use super::skill::SkillContext;
use super::state::{GamePhase, GameState};
use super::wave::BossCue;
use super::weapon::nearest_enemy;
use crate::audio::SoundEffect;
use crate::consts::*;

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Desired movement on the ground plane; normalized when longer than 1
    pub move_dir: Vec2,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    process_commands(state);

    if !state.phase.is_simulating() {
        return;
    }

    let wall_dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let dt = wall_dt.min(state.tuning.max_frame_dt);

    // The victory window runs on wall time; only the world delta is clamped
    let winding_down = state.phase == GamePhase::VictoryPending;
    let dt = if winding_down {
        state.victory_timer += wall_dt;
        dt * VICTORY_TIME_SCALE
    } else {
        dt
    };

    state.wave.advance(dt);

    state.player.update(dt, input.move_dir);
    fire_weapon(state, dt);

    update_spawning(state, dt);
    update_boss_script(state);
    let player_pos = state.player.pos;
    for enemy in state.enemies.iter_mut() {
        enemy.update(dt, player_pos);
    }
    if let Some(boss) = state.boss.as_mut() {
        boss.update(dt, player_pos);
    }

    update_skills(state, dt);

    for projectile in state.projectiles.iter_mut() {
        projectile.update(dt, player_pos);
    }
    for gem in state.gems.iter_mut() {
        gem.update(dt, player_pos);
    }

    state.enemies.sweep();
    state.projectiles.sweep();
    state.gems.sweep();

    collision::resolve(state, dt);

    if winding_down {
        if state.victory_timer >= VICTORY_DELAY {
            finish_victory(state);
        }
        return;
    }

    // Death wins over a boss kill landing in the same frame
    if state.player.is_dead() {
        game_over(state);
        return;
    }

    if state.phase == GamePhase::Playing && state.player.pending_level_ups > 0 {
        state.open_level_up_menu();
    }
}

fn process_commands(state: &mut GameState) {
    while let Some(command) = state.commands.pop_front() {
        match (command, state.phase) {
            (Command::SelectUpgrade(option), GamePhase::PausedForLevelUp)
                if state.offered.contains(&option) =>
            {
                state.select_upgrade(option);
            }
            (Command::Restart, GamePhase::GameOver | GamePhase::Victory) => state.restart(),
            (command, phase) => {
                log::warn!("Ignoring {:?} during {:?}", command, phase);
            }
        }
    }
}

/// Aim at the nearest enemy in range, falling back to the boss
fn fire_weapon(state: &mut GameState, dt: f32) {
    let origin = state.player.pos;
    let range = state.player.weapon().range;
    let target = nearest_enemy(origin, state.enemies.iter())
        .map(|e| e.pos)
        .filter(|pos| pos.distance(origin) <= range)
        .or_else(|| state.boss.as_ref().filter(|b| b.alive).map(|b| b.pos));

    let weapon = state.player.weapon_mut();
    let Some(directions) = weapon.fire(dt, origin, target) else {
        return;
    };
    let (damage, color, pierce) = (weapon.damage, weapon.color, weapon.pierce);
    for dir in directions {
        state.spawn_projectile(origin, dir, damage, color, pierce);
    }
    state.play(SoundEffect::Shoot);
}

fn update_spawning(state: &mut GameState, dt: f32) {
    if let Some((kind, pos)) =
        state
            .spawner
            .update(dt, &state.wave, state.player.pos, &mut state.rng)
    {
        state.spawn_enemy(kind, pos);
    }
}

fn update_boss_script(state: &mut GameState) {
    let cue = state.boss_controller.update(
        &state.wave,
        &state.tuning.boss,
        state.player.pos,
        &mut state.rng,
    );
    match cue {
        Some(BossCue::Warn) => {
            let text = format!("{} approaches!", BOSS_NAME);
            log::info!("{}", text);
            state.emit(GameEvent::BossWarning { text });
        }
        Some(BossCue::Spawn(pos)) => {
            state.spawn_boss(pos);
            log::info!("{} spawned at ({:.1}, {:.1})", BOSS_NAME, pos.x, pos.y);
            state.play(SoundEffect::BossAlert);
            state.emit(GameEvent::BossSpawned {
                name: BOSS_NAME.to_string(),
            });
            if state.tuning.boss.clears_arena {
                let cleared = state.enemies.len();
                state.enemies.clear();
                state
                    .spawner
                    .set_throttle(Some(state.tuning.boss.throttled_spawn_interval));
                log::info!("Arena cleared ({} enemies), spawns throttled", cleared);
            }
        }
        None => {}
    }
}

fn update_skills(state: &mut GameState, dt: f32) {
    if state.player.skills.is_empty() {
        return;
    }
    let mut kills: Vec<EntityId> = Vec::new();
    let mut ctx = SkillContext {
        dt,
        player_pos: state.player.pos,
        enemies: &mut state.enemies,
        rng: &mut state.rng,
        events: &mut state.events,
    };
    state.player.skills.update(&mut ctx, &mut kills);
    for id in kills {
        state.reward_enemy_kill(id);
    }
}

fn game_over(state: &mut GameState) {
    let stats = state.run_stats();
    log::info!(
        "Game over at {:.1}s: level {}, {} kills, score {}",
        stats.survival_time,
        stats.level,
        stats.kills,
        stats.score
    );
    state.offered.clear();
    state.play(SoundEffect::GameOver);
    state.emit(GameEvent::GameOver(stats));
    state.set_phase(GamePhase::GameOver);
}

fn finish_victory(state: &mut GameState) {
    let stats = state.run_stats();
    log::info!("Victory! Score {}", stats.score);
    state.emit(GameEvent::Victory(stats));
    state.set_phase(GamePhase::Victory);
}

/// Simple steering for demo and headless runs: flee nearby threats,
/// otherwise drift toward the closest gem, otherwise circle.
pub fn autopilot(state: &GameState) -> TickInput {
    const DANGER_RADIUS: f32 = 6.0;

    let pos = state.player.pos;
    let mut flee = Vec2::ZERO;
    for enemy in state.enemies.iter_alive() {
        let away = pos - enemy.pos;
        let dist = away.length();
        if dist < DANGER_RADIUS && dist > 0.0 {
            flee += away / (dist * dist);
        }
    }
    if let Some(boss) = state.boss.as_ref().filter(|b| b.alive) {
        let away = pos - boss.pos;
        let dist = away.length();
        if dist < DANGER_RADIUS * 2.0 && dist > 0.0 {
            flee += away / dist;
        }
    }

    let move_dir = if flee.length_squared() > 0.0 {
        flee.normalize_or_zero()
    } else if let Some(gem) = state
        .gems
        .iter_alive()
        .min_by(|a, b| pos.distance(a.pos).total_cmp(&pos.distance(b.pos)))
    {
        (gem.pos - pos).normalize_or_zero()
    } else {
        Vec2::from_angle(state.wave.elapsed * 0.5)
    };

    TickInput { move_dir }
}
