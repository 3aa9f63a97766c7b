//! Ability table: the fixed, dense enumeration of charm effects.
//!
//! Every per-ability array in the crate (`Charm::abilities`, `Weights`) is
//! indexed by [`Ability::index`]. The cap of an ability is the value at which
//! its contribution saturates; negative caps mark abilities where "more
//! negative" is the desirable direction (cooldowns, damage taken).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Number of abilities known to the engine.
pub const ABILITY_COUNT: usize = 14;

/// A single charm effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    AbilityCooldown,
    AbilityDamage,
    MeleeDamage,
    ProjectileDamage,
    MagicDamage,
    AttackSpeed,
    MaxHealth,
    Armor,
    Speed,
    HealingReceived,
    DamageTaken,
    KnockbackResistance,
    CriticalChance,
    EffectDuration,
}

/// Static description of one ability.
#[derive(Debug, Clone, Copy)]
pub struct AbilityInfo {
    /// Identifier used in config and catalog files
    pub id: &'static str,
    /// Name shown in reports
    pub display_name: &'static str,
    /// Saturation value; never zero
    pub cap: f64,
    /// Report with a `%` suffix
    pub is_percent: bool,
    /// Report rounded to an integer instead of two decimals
    pub round_to_integer: bool,
}

const fn info(
    id: &'static str,
    display_name: &'static str,
    cap: f64,
    is_percent: bool,
    round_to_integer: bool,
) -> AbilityInfo {
    AbilityInfo {
        id,
        display_name,
        cap,
        is_percent,
        round_to_integer,
    }
}

static ABILITY_TABLE: [AbilityInfo; ABILITY_COUNT] = [
    info("ability_cooldown", "Ability Cooldown", -40.0, true, false),
    info("ability_damage", "Ability Damage", 30.0, true, false),
    info("melee_damage", "Melee Damage", 30.0, true, false),
    info("projectile_damage", "Projectile Damage", 30.0, true, false),
    info("magic_damage", "Magic Damage", 30.0, true, false),
    info("attack_speed", "Attack Speed", 20.0, true, false),
    info("max_health", "Max Health", 20.0, true, false),
    info("armor", "Armor", 10.0, false, true),
    info("speed", "Speed", 15.0, true, false),
    info("healing_received", "Healing Received", 25.0, true, false),
    info("damage_taken", "Damage Taken", -20.0, true, false),
    info("knockback_resistance", "Knockback Resistance", 5.0, false, true),
    info("critical_chance", "Critical Chance", 15.0, true, false),
    info("effect_duration", "Effect Duration", 40.0, true, false),
];

impl Ability {
    /// All abilities in index order.
    pub const ALL: [Ability; ABILITY_COUNT] = [
        Ability::AbilityCooldown,
        Ability::AbilityDamage,
        Ability::MeleeDamage,
        Ability::ProjectileDamage,
        Ability::MagicDamage,
        Ability::AttackSpeed,
        Ability::MaxHealth,
        Ability::Armor,
        Ability::Speed,
        Ability::HealingReceived,
        Ability::DamageTaken,
        Ability::KnockbackResistance,
        Ability::CriticalChance,
        Ability::EffectDuration,
    ];

    /// Dense index of this ability.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Ability> {
        Self::ALL.get(index).copied()
    }

    /// Look up an ability by its file identifier (e.g. `"melee_damage"`).
    pub fn from_id(id: &str) -> Option<Ability> {
        static BY_ID: OnceLock<HashMap<&'static str, Ability>> = OnceLock::new();
        BY_ID
            .get_or_init(|| Self::ALL.iter().map(|a| (a.id(), *a)).collect())
            .get(id)
            .copied()
    }

    #[inline]
    pub fn info(self) -> &'static AbilityInfo {
        &ABILITY_TABLE[self.index()]
    }

    pub fn id(self) -> &'static str {
        self.info().id
    }

    pub fn display_name(self) -> &'static str {
        self.info().display_name
    }

    pub fn cap(self) -> f64 {
        self.info().cap
    }

    pub fn is_percent(self) -> bool {
        self.info().is_percent
    }

    pub fn round_to_integer(self) -> bool {
        self.info().round_to_integer
    }

    /// True when the desirable direction for this ability is negative.
    pub fn is_negative(self) -> bool {
        self.cap() < 0.0
    }
}

impl std::fmt::Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_dense() {
        for (i, ability) in Ability::ALL.iter().enumerate() {
            assert_eq!(ability.index(), i);
            assert_eq!(Ability::from_index(i), Some(*ability));
        }
        assert_eq!(Ability::from_index(ABILITY_COUNT), None);
    }

    #[test]
    fn test_caps_are_nonzero() {
        for ability in Ability::ALL {
            assert!(ability.cap() != 0.0, "{} has a zero cap", ability);
        }
    }

    #[test]
    fn test_lookup_by_id() {
        assert_eq!(Ability::from_id("melee_damage"), Some(Ability::MeleeDamage));
        assert_eq!(Ability::from_id("ability_cooldown"), Some(Ability::AbilityCooldown));
        assert_eq!(Ability::from_id("Melee Damage"), None);
        assert_eq!(Ability::from_id(""), None);
    }

    #[test]
    fn test_ids_unique() {
        let mut ids: Vec<_> = Ability::ALL.iter().map(|a| a.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ABILITY_COUNT);
    }

    #[test]
    fn test_serde_uses_ids() {
        let json = serde_json::to_string(&Ability::KnockbackResistance).unwrap();
        assert_eq!(json, "\"knockback_resistance\"");
    }
}
