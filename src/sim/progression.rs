//! Level-up menu generation and upgrade application

use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::UpgradeChoice;
use super::player::Player;
use super::skill::SkillKind;
use super::weapon::{Weapon, WeaponKind};
use crate::consts::*;

/// Entries of the upgrade catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeOption {
    Pistol,
    Shotgun,
    OrbitalShield,
    ThunderStrike,
    Heal,
}

impl UpgradeOption {
    /// Full catalog in display order
    pub const CATALOG: [UpgradeOption; 5] = [
        UpgradeOption::Pistol,
        UpgradeOption::Shotgun,
        UpgradeOption::OrbitalShield,
        UpgradeOption::ThunderStrike,
        UpgradeOption::Heal,
    ];

    /// Menu text for this option given what the player already owns
    pub fn label(&self, player: &Player) -> String {
        match self {
            UpgradeOption::Pistol => format!("Pistol Lv {}", player.pistol.level + 1),
            UpgradeOption::Shotgun => match &player.shotgun {
                Some(shotgun) => format!("Shotgun Lv {}", shotgun.level + 1),
                None => "New Weapon: Shotgun".to_string(),
            },
            UpgradeOption::OrbitalShield | UpgradeOption::ThunderStrike => {
                let kind = self.skill_kind().unwrap_or(SkillKind::OrbitalShield);
                match player.skills.get(kind) {
                    Some(skill) => format!("{} Lv {}", kind.as_str(), skill.level() + 1),
                    None => format!("New Skill: {}", kind.as_str()),
                }
            }
            UpgradeOption::Heal => "Heal 50%".to_string(),
        }
    }

    fn skill_kind(&self) -> Option<SkillKind> {
        match self {
            UpgradeOption::OrbitalShield => Some(SkillKind::OrbitalShield),
            UpgradeOption::ThunderStrike => Some(SkillKind::ThunderStrike),
            _ => None,
        }
    }
}

/// Sample distinct menu options from the catalog
pub fn roll_choices(player: &Player, rng: &mut Pcg32) -> Vec<UpgradeChoice> {
    UpgradeOption::CATALOG
        .choose_multiple(rng, UPGRADE_CHOICES)
        .map(|&option| UpgradeChoice {
            option,
            label: option.label(player),
        })
        .collect()
}

/// Apply one upgrade to the player
pub fn apply_upgrade(player: &mut Player, option: UpgradeOption) {
    match option {
        UpgradeOption::Pistol => {
            player.pistol.upgrade();
            player.active_weapon = WeaponKind::Pistol;
        }
        UpgradeOption::Shotgun => {
            match player.shotgun.as_mut() {
                Some(shotgun) => shotgun.upgrade(),
                None => {
                    log::info!("Acquired Shotgun");
                    player.shotgun = Some(Weapon::shotgun());
                }
            }
            player.active_weapon = WeaponKind::Shotgun;
        }
        UpgradeOption::OrbitalShield => {
            player.skills.add_skill(SkillKind::OrbitalShield);
        }
        UpgradeOption::ThunderStrike => {
            player.skills.add_skill(SkillKind::ThunderStrike);
        }
        UpgradeOption::Heal => {
            let amount = player.max_health * HEAL_FRACTION;
            player.heal(amount);
        }
    }
}
