//! Arena simulation module
//!
//! All gameplay logic lives here:
//! - Variable frame delta, clamped per tick
//! - One seeded RNG owned by the game state
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod entity;
pub mod events;
pub mod gem;
pub mod player;
pub mod progression;
pub mod projectile;
pub mod skill;
pub mod state;
pub mod tick;
pub mod wave;
pub mod weapon;

pub use enemy::{Boss, Enemy, EnemyKind};
pub use entity::{DamageOutcome, Damageable, Entity, EntityId, EntityPool};
pub use events::{Command, GameEvent, HudSnapshot, RunStats, UpgradeChoice};
pub use gem::ExperienceGem;
pub use player::Player;
pub use progression::{UpgradeOption, apply_upgrade, roll_choices};
pub use projectile::Projectile;
pub use skill::{OrbitalShield, Skill, SkillKind, SkillManager, ThunderStrike};
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, autopilot, tick};
pub use wave::{BossController, BossCue, Spawner, WaveState};
pub use weapon::{Weapon, WeaponKind};
