//! Dimensionality reduction: the bridge from catalog data to search data.
//!
//! Only "important" abilities are tracked by the search: nonzero weight and
//! at least one charm carrying a nonzero value. Charms without any value in
//! an important ability are dropped, since they can only cost power.

use super::codec::encode;
use crate::ability::{Ability, ABILITY_COUNT};
use crate::charm::{Charm, CharmId, Weights};

/// A charm restricted to the important abilities, values encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactCharm {
    /// Index into the catalog the reduction was built from
    pub original_index: CharmId,
    pub power: u32,
    /// Index step past this charm: 2 when its upgraded twin is the next compact
    /// charm, 1 otherwise
    pub offset: u32,
    /// Encoded values, parallel to `Reduction::abilities`
    pub stats: Vec<i32>,
}

/// Output of [`reduce`].
#[derive(Debug, Clone, Default)]
pub struct Reduction {
    /// Important abilities in ascending index order
    pub abilities: Vec<Ability>,
    /// Surviving charms in catalog order
    pub charms: Vec<CompactCharm>,
    /// Weights projected onto `abilities`
    pub weights: Vec<i32>,
}

impl Reduction {
    /// True when nothing can contribute to the utility; the answer is then
    /// the empty set with utility 0.
    pub fn is_trivial(&self) -> bool {
        self.abilities.is_empty() || self.charms.is_empty()
    }
}

/// Select important abilities, encode and filter the charms.
pub fn reduce(charms: &[Charm], weights: &Weights) -> Reduction {
    let abilities: Vec<Ability> = (0..ABILITY_COUNT)
        .filter(|&id| weights[id] != 0)
        .filter(|&id| charms.iter().any(|c| c.abilities[id] != 0.0))
        .filter_map(Ability::from_index)
        .collect();

    let mut compact: Vec<CompactCharm> = Vec::with_capacity(charms.len());
    // has_upgrade flag of each kept charm, parallel to `compact`
    let mut upgradable: Vec<bool> = Vec::with_capacity(charms.len());

    for (i, charm) in charms.iter().enumerate() {
        let mut has_nonzero = false;
        let stats: Vec<i32> = abilities
            .iter()
            .map(|ability| {
                let raw = charm.abilities[ability.index()];
                has_nonzero |= raw != 0.0;
                encode(raw, ability.cap())
            })
            .collect();

        if has_nonzero {
            compact.push(CompactCharm {
                original_index: i as CharmId,
                power: charm.power,
                offset: 1,
                stats,
            });
            upgradable.push(charm.has_upgrade);
        }
    }

    // The twin may have been dropped above; only skip it when it survived.
    for i in 0..compact.len().saturating_sub(1) {
        if upgradable[i] && compact[i + 1].original_index == compact[i].original_index + 1 {
            compact[i].offset = 2;
        }
    }

    let weights = abilities.iter().map(|a| weights[a.index()]).collect();

    tracing::debug!(
        abilities = abilities.len(),
        charms_kept = compact.len(),
        charms_dropped = charms.len() - compact.len(),
        "reduced search space"
    );

    Reduction {
        abilities,
        charms: compact,
        weights,
    }
}
