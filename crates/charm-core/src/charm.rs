use crate::ability::{Ability, ABILITY_COUNT};
use serde::{Deserialize, Serialize};

/// Maximum number of charms in a set
pub const CHARM_COUNT_MAX: usize = 7;

/// Largest power budget accepted from configuration
pub const CHARM_POWER_MAX: u32 = 15;

/// Index of a charm in a catalog
pub type CharmId = u32;

/// Sentinel for an unused selection slot
pub const MISSING_ID: CharmId = CharmId::MAX;

/// Signed weight per ability; zero means "ignore"
pub type Weights = [i32; ABILITY_COUNT];

/// Rarity tier of a charm (also decides its display color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn from_index(index: usize) -> Option<Rarity> {
        match index {
            0 => Some(Rarity::Common),
            1 => Some(Rarity::Uncommon),
            2 => Some(Rarity::Rare),
            3 => Some(Rarity::Epic),
            4 => Some(Rarity::Legendary),
            _ => None,
        }
    }

    /// The next tier up, if any. Upgraded charms sit one tier above their base.
    pub fn upgraded(&self) -> Option<Rarity> {
        Self::from_index(*self as usize + 1)
    }

    /// 24-bit RGB display color
    pub fn color(&self) -> u32 {
        match self {
            Rarity::Common => 0x9f929c,
            Rarity::Uncommon => 0x70bc6d,
            Rarity::Rare => 0x705eca,
            Rarity::Epic => 0xcd5eca,
            Rarity::Legendary => 0xe49b20,
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rarity::Common => write!(f, "Common"),
            Rarity::Uncommon => write!(f, "Uncommon"),
            Rarity::Rare => write!(f, "Rare"),
            Rarity::Epic => write!(f, "Epic"),
            Rarity::Legendary => write!(f, "Legendary"),
        }
    }
}

/// A catalog entry.
///
/// A charm with `has_upgrade` set is always directly followed in its catalog
/// by its upgraded twin; the two are never selected together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charm {
    pub name: String,
    pub power: u32,
    pub rarity: Rarity,
    pub has_upgrade: bool,
    /// Raw ability magnitudes, indexed by `Ability::index`
    pub abilities: [f64; ABILITY_COUNT],
}

impl Charm {
    /// A common charm with no abilities and no upgrade.
    pub fn new(name: impl Into<String>, power: u32) -> Self {
        Self {
            name: name.into(),
            power,
            rarity: Rarity::Common,
            has_upgrade: false,
            abilities: [0.0; ABILITY_COUNT],
        }
    }

    /// Builder-style setter for a single ability value.
    pub fn with(mut self, ability: Ability, value: f64) -> Self {
        self.abilities[ability.index()] = value;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn value(&self, ability: Ability) -> f64 {
        self.abilities[ability.index()]
    }

    /// Abilities with a nonzero value on this charm
    pub fn effects(&self) -> impl Iterator<Item = (Ability, f64)> + '_ {
        Ability::ALL
            .into_iter()
            .map(|a| (a, self.value(a)))
            .filter(|(_, v)| *v != 0.0)
    }

    pub fn color(&self) -> u32 {
        self.rarity.color()
    }
}

/// Build a dense weight vector from (ability, weight) pairs.
pub fn weights_from(pairs: &[(Ability, i32)]) -> Weights {
    let mut weights = [0; ABILITY_COUNT];
    for (ability, weight) in pairs {
        weights[ability.index()] = *weight;
    }
    weights
}
