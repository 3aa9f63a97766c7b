//! Maps a runtime important-ability count to a compile-time kernel width.

use super::kernel::Best;
use super::parallel::search_with_width;
use super::reduce::Reduction;
use crate::ability::ABILITY_COUNT;

/// Kernel widths are rounded up to a multiple of this many `i32` lanes
/// (16 bytes, one SSE/NEON register).
pub const LANE_ALIGN: usize = 4;

/// Width of the kernel used for `n` important abilities.
pub const fn lane_width(n: usize) -> usize {
    n.div_ceil(LANE_ALIGN) * LANE_ALIGN
}

type SearchFn = fn(&Reduction, u32, usize) -> Best;

macro_rules! dispatch_table {
    ($($n:literal),* $(,)?) => {
        [$(search_with_width::<{ lane_width($n) }> as SearchFn),*]
    };
}

/// Indexed by important-ability count.
static DISPATCH: [SearchFn; ABILITY_COUNT + 1] =
    dispatch_table![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14];

/// Run the search with the kernel sized for `reduction`.
pub(crate) fn dispatch(reduction: &Reduction, max_power: u32, threads: usize) -> Best {
    let n = reduction.abilities.len();
    tracing::debug!(abilities = n, width = lane_width(n), "dispatching search kernel");
    DISPATCH[n](reduction, max_power, threads)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_width_rounds_up() {
        assert_eq!(lane_width(0), 0);
        assert_eq!(lane_width(1), 4);
        assert_eq!(lane_width(4), 4);
        assert_eq!(lane_width(5), 8);
        assert_eq!(lane_width(ABILITY_COUNT), 16);
    }

    #[test]
    fn test_width_covers_every_count() {
        for n in 0..=ABILITY_COUNT {
            let w = lane_width(n);
            assert!(w >= n);
            assert!(w < n + LANE_ALIGN);
            assert_eq!(w % LANE_ALIGN, 0);
        }
    }

    #[test]
    fn test_empty_reduction_dispatches() {
        let best = dispatch(&Reduction::default(), 15, 1);
        assert_eq!(best, Best::BASELINE);
    }
}
