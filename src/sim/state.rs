//! Game state and run bookkeeping
//!
//! `GameState` exclusively owns every entity pool. Collaborators read it,
//! push [`Command`]s in and drain [`GameEvent`]s out.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::{Boss, Enemy, EnemyKind};
use super::entity::{EntityId, EntityPool};
use super::events::{Command, GameEvent, HudSnapshot, RunStats};
use super::gem::ExperienceGem;
use super::player::Player;
use super::progression::{self, UpgradeOption};
use super::projectile::Projectile;
use super::wave::{BossController, Spawner, WaveState};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::tuning::{Tuning, TuningError};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation frozen until an upgrade is chosen
    PausedForLevelUp,
    /// Player died; waiting for restart
    GameOver,
    /// Boss down; slow-motion wind-down before the victory screen
    VictoryPending,
    /// Run won; waiting for restart
    Victory,
}

impl GamePhase {
    /// Whether the world advances in this phase
    pub fn is_simulating(&self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::VictoryPending)
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub player: Player,
    pub wave: WaveState,
    pub spawner: Spawner,
    pub boss_controller: BossController,
    /// Active enemies (sorted by id)
    pub enemies: EntityPool<Enemy>,
    pub boss: Option<Boss>,
    pub projectiles: EntityPool<Projectile>,
    pub gems: EntityPool<ExperienceGem>,
    pub score: u64,
    pub kills: u32,
    /// Unscaled seconds spent in VictoryPending
    pub victory_timer: f32,
    /// Options on the open level-up menu
    pub offered: Vec<UpgradeOption>,
    pub(crate) commands: VecDeque<Command>,
    pub(crate) events: Vec<GameEvent>,
    next_id: EntityId,
}

impl GameState {
    /// Validate the tuning and start a run
    pub fn new(tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        let spawner = Spawner::new(&tuning.enemies, tuning.spawn_interval, tuning.spawn_radius)?;
        log::info!("New run with seed {:#x}", tuning.seed);
        Ok(Self {
            rng: Pcg32::seed_from_u64(tuning.seed),
            phase: GamePhase::Playing,
            player: Player::new(&tuning.player),
            wave: WaveState::default(),
            spawner,
            boss_controller: BossController::new(),
            enemies: EntityPool::new(),
            boss: None,
            projectiles: EntityPool::new(),
            gems: EntityPool::new(),
            score: 0,
            kills: 0,
            victory_timer: 0.0,
            offered: Vec::new(),
            commands: VecDeque::new(),
            events: Vec::new(),
            next_id: 1,
            tuning,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Queue a command for the start of the next tick
    pub fn push_command(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn play(&mut self, effect: SoundEffect) {
        self.events.push(GameEvent::Sound(effect));
    }

    pub(crate) fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {:?} -> {:?}", from, to);
        self.phase = to;
        self.emit(GameEvent::PhaseChanged { from, to });
    }

    pub fn run_stats(&self) -> RunStats {
        RunStats {
            survival_time: self.wave.elapsed,
            level: self.player.level,
            kills: self.kills,
            score: self.score,
        }
    }

    /// Values for the per-frame HUD
    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            phase: self.phase,
            health: self.player.health,
            max_health: self.player.max_health,
            xp: self.player.xp,
            xp_to_next_level: self.player.xp_to_next_level,
            level: self.player.level,
            timer_seconds: self.wave.elapsed.max(0.0).floor() as u32,
            score: self.score,
            kills: self.kills,
            boss_health_percent: self
                .boss
                .as_ref()
                .filter(|b| b.alive)
                .map(|b| b.health_percent()),
            active_weapon: self.player.active_weapon,
            skills: self
                .player
                .skills
                .iter()
                .map(|s| (s.kind(), s.level()))
                .collect(),
        }
    }

    /// Start a fresh run in place
    pub fn restart(&mut self) {
        self.player.skills.clear();
        self.player = Player::new(&self.tuning.player);
        self.wave = WaveState::default();
        self.spawner.reset();
        self.boss_controller = BossController::new();
        self.enemies.clear();
        self.boss = None;
        self.projectiles.clear();
        self.gems.clear();
        self.score = 0;
        self.kills = 0;
        self.victory_timer = 0.0;
        self.offered.clear();
        self.next_id = 1;
        log::info!("Run restarted");
        self.set_phase(GamePhase::Playing);
    }

    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2) -> EntityId {
        let id = self.next_entity_id();
        let enemy = Enemy::new(
            id,
            kind,
            self.tuning.enemies.stats(kind),
            pos,
            self.wave.health_multiplier(),
        );
        log::debug!("Spawned {} #{} with {} hp", kind.as_str(), id, enemy.health);
        self.enemies.insert(enemy);
        id
    }

    pub fn spawn_boss(&mut self, pos: Vec2) -> EntityId {
        let id = self.next_entity_id();
        self.boss = Some(Boss::new(id, &self.tuning.boss, pos));
        id
    }

    pub fn spawn_gem(&mut self, pos: Vec2, xp: u32) -> EntityId {
        let id = self.next_entity_id();
        self.gems.insert(ExperienceGem::new(id, pos, xp));
        id
    }

    pub fn spawn_projectile(
        &mut self,
        pos: Vec2,
        dir: Vec2,
        damage: f32,
        color: u32,
        pierce: u32,
    ) -> EntityId {
        let id = self.next_entity_id();
        self.projectiles
            .insert(Projectile::new(id, pos, dir, damage, color, pierce));
        id
    }

    /// Rewards for a destroyed enemy; every kill source funnels through here once
    pub(crate) fn reward_enemy_kill(&mut self, id: EntityId) {
        let Some(enemy) = self.enemies.get(id) else {
            log::warn!("Kill reward for unknown enemy {}", id);
            return;
        };
        let (pos, color, xp) = (enemy.pos, enemy.color, enemy.xp_value);
        self.score += KILL_SCORE;
        self.kills += 1;
        self.emit(GameEvent::Explosion { pos, color });
        self.spawn_gem(pos, xp);
        self.play(SoundEffect::Explosion);
    }

    /// Boss death: bonus, XP and the start of the victory wind-down.
    /// The boss is removed; a player already dead this frame gets nothing.
    pub(crate) fn reward_boss_kill(&mut self) {
        if self.boss_controller.defeated {
            return;
        }
        self.boss_controller.defeated = true;
        let xp = self
            .boss
            .take()
            .map_or(self.tuning.boss.xp_value, |b| b.xp_value);
        if self.player.is_dead() {
            log::info!("{} fell with the player, no reward", BOSS_NAME);
            return;
        }
        self.score += BOSS_KILL_SCORE;
        self.player.gain_xp(xp);
        self.spawner.set_throttle(None);
        log::info!("{} defeated at {:.1}s", BOSS_NAME, self.wave.elapsed);
        self.play(SoundEffect::Victory);
        self.emit(GameEvent::BossDefeated);
        self.victory_timer = 0.0;
        self.set_phase(GamePhase::VictoryPending);
    }

    /// Show the next level-up menu
    pub(crate) fn open_level_up_menu(&mut self) {
        let choices = progression::roll_choices(&self.player, &mut self.rng);
        self.offered = choices.iter().map(|c| c.option).collect();
        log::info!("Level {} reached", self.player.level);
        self.play(SoundEffect::LevelUp);
        self.emit(GameEvent::LevelUpMenu {
            level: self.player.level,
            choices,
        });
        self.set_phase(GamePhase::PausedForLevelUp);
    }

    /// Apply an offered upgrade and resume, or offer the next queued menu
    pub(crate) fn select_upgrade(&mut self, option: UpgradeOption) {
        progression::apply_upgrade(&mut self.player, option);
        self.player.pending_level_ups = self.player.pending_level_ups.saturating_sub(1);
        self.offered.clear();
        self.emit(GameEvent::UpgradeApplied { option });
        if self.player.pending_level_ups > 0 {
            self.open_level_up_menu();
        } else {
            self.set_phase(GamePhase::Playing);
        }
    }
}
