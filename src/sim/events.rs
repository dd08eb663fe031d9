//! Messages crossing the simulation boundary
//!
//! The simulation emits [`GameEvent`]s for render, audio and UI collaborators
//! and receives [`Command`]s from the UI. Commands are queued and applied at
//! the start of the next tick, never in the middle of one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::progression::UpgradeOption;
use super::skill::SkillKind;
use super::state::GamePhase;
use super::weapon::WeaponKind;
use crate::audio::SoundEffect;

/// Final statistics shown on the game over and victory screens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Seconds survived
    pub survival_time: f32,
    pub level: u32,
    pub kills: u32,
    pub score: u64,
}

/// Menu entry offered on level-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeChoice {
    pub option: UpgradeOption,
    pub label: String,
}

/// Discrete events produced during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Audio cue (fire-and-forget)
    Sound(SoundEffect),
    /// Enemy destroyed; particle burst at `pos`
    Explosion { pos: Vec2, color: u32 },
    /// Floating damage number
    DamageNumber { pos: Vec2, amount: f32 },
    /// Thunder strike bolt (cosmetic)
    Lightning { pos: Vec2 },
    /// Phase transition
    PhaseChanged { from: GamePhase, to: GamePhase },
    /// Boss approaching banner
    BossWarning { text: String },
    /// Boss entered the arena; show the health bar
    BossSpawned { name: String },
    /// Boss destroyed; hide the health bar
    BossDefeated,
    /// Level-up menu to display
    LevelUpMenu { level: u32, choices: Vec<UpgradeChoice> },
    /// Upgrade applied after a menu selection
    UpgradeApplied { option: UpgradeOption },
    /// Player died
    GameOver(RunStats),
    /// Victory sequence finished
    Victory(RunStats),
}

/// Commands from the UI collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Apply one of the currently offered upgrades
    SelectUpgrade(UpgradeOption),
    /// Start a fresh run from the game over or victory screen
    Restart,
}

/// Per-frame HUD values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    pub health: f32,
    pub max_health: f32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub level: u32,
    /// Whole seconds survived
    pub timer_seconds: u32,
    pub score: u64,
    pub kills: u32,
    /// Present while the boss is alive
    pub boss_health_percent: Option<f32>,
    pub active_weapon: WeaponKind,
    pub skills: Vec<(SkillKind, u32)>,
}
