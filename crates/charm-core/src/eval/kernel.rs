//! Width-specialized branch-and-bound search.
//!
//! `N` is the number of tracked ability lanes. Fixing it at compile time keeps
//! the per-charm accumulation and the utility evaluation as fixed-length loops
//! over contiguous, aligned `i32` arrays, which the compiler unrolls and
//! vectorizes. Lanes past the important-ability count are zero in both the
//! charm tables and the weights, so they never affect the result.

use super::codec::ENCODED_STAT_SCALE;
use super::reduce::Reduction;
use crate::charm::{CharmId, CHARM_COUNT_MAX, MISSING_ID};

/// Encoded ability lanes of one charm (or of a running sum of charms).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C, align(64))]
pub(crate) struct StatTable<const N: usize>(pub(crate) [i32; N]);

impl<const N: usize> StatTable<N> {
    pub(crate) const ZERO: Self = Self([0; N]);

    fn from_slice(values: &[i32]) -> Self {
        debug_assert!(values.len() <= N);
        let mut table = Self::ZERO;
        table.0[..values.len()].copy_from_slice(values);
        table
    }

    #[inline(always)]
    fn plus(&self, other: &Self) -> Self {
        let mut out = *self;
        for i in 0..N {
            out.0[i] += other.0[i];
        }
        out
    }
}

/// Fixed-capacity set of compact charm indices; unused slots hold `MISSING_ID`.
///
/// Eight slots for at most seven charms keeps the buffer a power of two wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C, align(32))]
pub(crate) struct SelectionBuffer([CharmId; CHARM_COUNT_MAX + 1]);

impl SelectionBuffer {
    pub(crate) const EMPTY: Self = Self([MISSING_ID; CHARM_COUNT_MAX + 1]);

    /// Filled slots, in selection order.
    pub(crate) fn ids(&self) -> impl Iterator<Item = CharmId> + '_ {
        self.0.iter().copied().filter(|id| *id != MISSING_ID)
    }

    #[cfg(test)]
    pub(crate) fn from_ids(ids: &[CharmId]) -> Self {
        ids.iter()
            .enumerate()
            .fold(Self::EMPTY, |set, (slot, id)| set.with(slot, *id))
    }

    #[inline(always)]
    fn with(&self, slot: usize, id: CharmId) -> Self {
        let mut out = *self;
        out.0[slot] = id;
        out
    }
}

/// Best set found so far by one searcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Best {
    pub(crate) utility: i64,
    pub(crate) set: SelectionBuffer,
}

impl Best {
    /// Below every reachable utility of a search that visits the empty set.
    pub(crate) const UNSET: Self = Self {
        utility: -1,
        set: SelectionBuffer::EMPTY,
    };

    /// The empty set, utility 0.
    pub(crate) const BASELINE: Self = Self {
        utility: 0,
        set: SelectionBuffer::EMPTY,
    };
}

/// Read-only search input, shared by every worker.
pub(crate) struct SearchTables<const N: usize> {
    charms: Vec<StatTable<N>>,
    power: Vec<u32>,
    offsets: Vec<u32>,
    weights: StatTable<N>,
    max_power: u32,
}

impl<const N: usize> SearchTables<N> {
    pub(crate) fn from_reduction(reduction: &Reduction, max_power: u32) -> Self {
        let charms = reduction
            .charms
            .iter()
            .map(|c| StatTable::from_slice(&c.stats))
            .collect();
        let power = reduction.charms.iter().map(|c| c.power).collect();
        let offsets = reduction.charms.iter().map(|c| c.offset).collect();

        Self {
            charms,
            power,
            offsets,
            weights: StatTable::from_slice(&reduction.weights),
            max_power,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.charms.len()
    }

    /// Weighted sum of the lanes. Each lane is clamped to the cap after
    /// summation, so stacking past the cap earns nothing extra.
    #[inline(always)]
    pub(crate) fn utility(&self, stats: &StatTable<N>) -> i64 {
        let mut total = 0i64;
        for i in 0..N {
            total += stats.0[i].min(ENCODED_STAT_SCALE) as i64 * self.weights.0[i] as i64;
        }
        total
    }
}

/// One depth-first walk over charm combinations, with a private best.
pub(crate) struct Searcher<'a, const N: usize> {
    tables: &'a SearchTables<N>,
    best: Best,
}

impl<'a, const N: usize> Searcher<'a, N> {
    pub(crate) fn new(tables: &'a SearchTables<N>) -> Self {
        Self {
            tables,
            best: Best::UNSET,
        }
    }

    pub(crate) fn best(&self) -> Best {
        self.best
    }

    /// Search every combination, starting from the empty set.
    pub(crate) fn search_all(&mut self) {
        self.descend(&StatTable::ZERO, 0, &SelectionBuffer::EMPTY, 0, CHARM_COUNT_MAX);
    }

    /// Search every combination whose first (lowest) charm is `first`.
    pub(crate) fn search_from(&mut self, first: usize) {
        let tables = self.tables;
        let set = SelectionBuffer::EMPTY.with(0, first as CharmId);
        self.descend(
            &tables.charms[first],
            tables.power[first],
            &set,
            first + tables.offsets[first] as usize,
            CHARM_COUNT_MAX - 1,
        );
    }

    fn descend(
        &mut self,
        stats: &StatTable<N>,
        power: u32,
        set: &SelectionBuffer,
        lower: usize,
        slots_left: usize,
    ) {
        let tables = self.tables;

        // Power only grows downward, nothing below can fit either.
        if power > tables.max_power {
            return;
        }

        let utility = tables.utility(stats);
        if utility > self.best.utility {
            self.best = Best { utility, set: *set };
        }

        if slots_left == 0 {
            return;
        }

        let slot = CHARM_COUNT_MAX - slots_left;
        for i in lower..tables.len() {
            self.descend(
                &stats.plus(&tables.charms[i]),
                power.saturating_add(tables.power[i]),
                &set.with(slot, i as CharmId),
                i + tables.offsets[i] as usize,
                slots_left - 1,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::Ability;
    use crate::charm::{weights_from, Charm};
    use crate::eval::reduce::reduce;

    fn tables<const N: usize>(
        charms: &[Charm],
        weights: &[(Ability, i32)],
        max_power: u32,
    ) -> SearchTables<N> {
        SearchTables::from_reduction(&reduce(charms, &weights_from(weights)), max_power)
    }

    #[test]
    fn test_utility_clamps_summed_lane() {
        let charms = vec![Charm::new("a", 1).with(Ability::Armor, 10.0)];
        let t: SearchTables<4> = tables(&charms, &[(Ability::Armor, 2)], 15);

        let one = t.charms[0];
        let two = one.plus(&one);
        assert_eq!(t.utility(&one), ENCODED_STAT_SCALE as i64 * 2);
        // two charms at cap still score as one
        assert_eq!(t.utility(&two), ENCODED_STAT_SCALE as i64 * 2);
    }

    #[test]
    fn test_padding_lanes_are_inert() {
        let charms = vec![Charm::new("a", 1).with(Ability::Armor, 5.0)];
        let narrow: SearchTables<1> = tables(&charms, &[(Ability::Armor, 3)], 15);
        let wide: SearchTables<8> = tables(&charms, &[(Ability::Armor, 3)], 15);

        let mut a = Searcher::new(&narrow);
        a.search_all();
        let mut b = Searcher::new(&wide);
        b.search_all();
        assert_eq!(a.best(), b.best());
    }

    #[test]
    fn test_power_budget_prunes() {
        let charms = vec![
            Charm::new("big", 5).with(Ability::Armor, 10.0),
            Charm::new("small", 1).with(Ability::Armor, 2.0),
        ];
        let t: SearchTables<4> = tables(&charms, &[(Ability::Armor, 1)], 4);
        let mut s = Searcher::new(&t);
        s.search_all();

        let ids: Vec<_> = s.best().set.ids().collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_upgrade_twins_exclusive() {
        let mut base = Charm::new("x", 1).with(Ability::Armor, 3.0);
        base.has_upgrade = true;
        let twin = Charm::new("x (u)", 1).with(Ability::Armor, 4.0);
        let t: SearchTables<4> = tables(&[base, twin], &[(Ability::Armor, 1)], 15);
        let mut s = Searcher::new(&t);
        s.search_all();

        let ids: Vec<_> = s.best().set.ids().collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_empty_set_recorded_when_everything_hurts() {
        let charms = vec![Charm::new("bad", 1).with(Ability::Armor, -3.0)];
        let t: SearchTables<4> = tables(&charms, &[(Ability::Armor, 1)], 15);
        let mut s = Searcher::new(&t);
        s.search_all();

        assert_eq!(s.best(), Best::BASELINE);
    }

    #[test]
    fn test_search_from_seeds_first_charm() {
        let charms = vec![
            Charm::new("a", 1).with(Ability::Armor, 1.0),
            Charm::new("b", 1).with(Ability::Armor, 2.0),
            Charm::new("c", 1).with(Ability::Armor, 3.0),
        ];
        let t: SearchTables<4> = tables(&charms, &[(Ability::Armor, 1)], 15);
        let mut s = Searcher::new(&t);
        s.search_from(1);

        let ids: Vec<_> = s.best().set.ids().collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_at_most_seven() {
        let charms: Vec<Charm> = (0..10)
            .map(|i| Charm::new(format!("c{}", i), 0).with(Ability::Speed, 1.0))
            .collect();
        let t: SearchTables<4> = tables(&charms, &[(Ability::Speed, 1)], 15);
        let mut s = Searcher::new(&t);
        s.search_all();

        let ids: Vec<_> = s.best().set.ids().collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5, 6]);
    }
}
