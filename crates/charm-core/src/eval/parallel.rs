//! Work distribution over the first search level.
//!
//! Each job is "every set whose lowest charm is `j`". Workers claim jobs from a
//! shared atomic cursor until it runs past the last charm, accumulating into a
//! private best; the bests are reduced after all workers have joined.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use super::kernel::{Best, SearchTables, Searcher};
use super::reduce::Reduction;

/// Build the width-`N` tables and run the search on `threads` workers
/// (`threads <= 1` runs serially on the calling thread).
pub(crate) fn search_with_width<const N: usize>(
    reduction: &Reduction,
    max_power: u32,
    threads: usize,
) -> Best {
    let tables = SearchTables::<N>::from_reduction(reduction, max_power);
    if threads <= 1 {
        search_serial(&tables)
    } else {
        search_parallel(&tables, threads)
    }
}

fn search_serial<const N: usize>(tables: &SearchTables<N>) -> Best {
    let mut searcher = Searcher::new(tables);
    searcher.search_all();
    searcher.best()
}

fn search_parallel<const N: usize>(tables: &SearchTables<N>, threads: usize) -> Best {
    let cursor = AtomicUsize::new(0);

    let bests: Vec<Best> = thread::scope(|s| {
        let workers: Vec<_> = (0..threads)
            .map(|worker| {
                let cursor = &cursor;
                s.spawn(move || {
                    let mut searcher = Searcher::new(tables);
                    let mut jobs = 0usize;
                    loop {
                        let job = cursor.fetch_add(1, Ordering::Relaxed);
                        if job >= tables.len() {
                            break;
                        }
                        searcher.search_from(job);
                        jobs += 1;
                    }
                    tracing::trace!(worker, jobs, "search worker finished");
                    searcher.best()
                })
            })
            .collect();

        workers
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(best) => best,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    reduce_bests(&bests)
}

/// Strictly greatest utility wins; on ties the lower worker index wins.
///
/// Workers never visit the empty set, so the reduction starts from it.
fn reduce_bests(bests: &[Best]) -> Best {
    bests.iter().fold(Best::BASELINE, |acc, best| {
        if best.utility > acc.utility {
            *best
        } else {
            acc
        }
    })
}
