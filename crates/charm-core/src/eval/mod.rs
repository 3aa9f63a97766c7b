//! Charm set evaluation.
//!
//! Pipeline: [`reduce`] drops abilities and charms that cannot matter and
//! encodes the rest to fixed point, the dispatcher picks a kernel width for the
//! number of surviving abilities, and the kernel enumerates every set of at most
//! [`CHARM_COUNT_MAX`] charms within the power budget, serially or across a
//! pool of scoped worker threads.

pub mod codec;
mod dispatch;
mod kernel;
mod parallel;
pub mod reduce;

use serde::{Deserialize, Serialize};

use crate::ability::ABILITY_COUNT;
use crate::charm::{Charm, CharmId, Weights, CHARM_COUNT_MAX};
use crate::error::CoreError;

pub use codec::{encode, ENCODED_STAT_BITS, ENCODED_STAT_SCALE};
pub use dispatch::{lane_width, LANE_ALIGN};
pub use reduce::{reduce, CompactCharm, Reduction};

/// Input of [`search`].
#[derive(Debug, Clone)]
pub struct EvalConfig<'a> {
    pub charms: &'a [Charm],
    pub max_power: u32,
    pub weights: Weights,
    /// Worker count; 0 or 1 searches on the calling thread
    pub threads: usize,
}

/// Best charm set found.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EvalResult {
    pub utility: i64,
    /// Catalog indices, ascending
    pub charms: Vec<CharmId>,
}

impl EvalResult {
    /// Total power of the selected charms.
    pub fn power_used(&self, catalog: &[Charm]) -> u32 {
        self.charms.iter().map(|&id| catalog[id as usize].power).sum()
    }

    /// Raw ability totals of the selected charms.
    pub fn totals(&self, catalog: &[Charm]) -> [f64; ABILITY_COUNT] {
        let mut totals = [0.0; ABILITY_COUNT];
        for &id in &self.charms {
            for (total, value) in totals.iter_mut().zip(catalog[id as usize].abilities) {
                *total += value;
            }
        }
        totals
    }
}

/// What the reducer kept, handed to a prune tracer before the search starts.
#[derive(Debug, Clone)]
pub struct PruneReport<'a> {
    pub abilities: Vec<&'static str>,
    pub charms: Vec<&'a str>,
}

/// Observer for [`PruneReport`]; has no influence on the result.
pub type PruneTracer<'t> = &'t dyn Fn(&PruneReport<'_>);

/// Find the highest-utility set of at most seven charms whose total power is
/// within `config.max_power`, never holding a charm and its upgraded twin.
pub fn search(config: &EvalConfig<'_>, tracer: Option<PruneTracer<'_>>) -> EvalResult {
    let reduction = reduce(config.charms, &config.weights);

    if let Some(trace) = tracer {
        trace(&PruneReport {
            abilities: reduction.abilities.iter().map(|a| a.id()).collect(),
            charms: reduction
                .charms
                .iter()
                .map(|c| config.charms[c.original_index as usize].name.as_str())
                .collect(),
        });
    }

    if reduction.is_trivial() {
        tracing::debug!("no weighted ability is present, returning the empty set");
        return EvalResult::default();
    }

    let best = dispatch::dispatch(&reduction, config.max_power, config.threads);
    debug_assert!(best.set.ids().count() <= CHARM_COUNT_MAX);

    EvalResult {
        utility: best.utility,
        charms: best
            .set
            .ids()
            .map(|id| reduction.charms[id as usize].original_index)
            .collect(),
    }
}

/// Options of the exhaustive search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaiveOptions {
    pub threads: usize,
    /// Report what the reducer kept before searching
    pub trace: bool,
}

impl Default for NaiveOptions {
    fn default() -> Self {
        Self {
            threads: std::thread::available_parallelism().map_or(1, |n| n.get()),
            trace: false,
        }
    }
}

/// Evaluation algorithm; only the exhaustive search exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Naive(NaiveOptions),
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::Naive(NaiveOptions::default())
    }
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Naive(_) => "naive",
        }
    }

    /// Worker count the algorithm will use.
    pub fn threads(&self) -> usize {
        match self {
            Algorithm::Naive(opts) => opts.threads,
        }
    }

    /// Run the algorithm. The tracer is only consulted when the algorithm's
    /// options enable tracing.
    pub fn run(
        &self,
        charms: &[Charm],
        max_power: u32,
        weights: Weights,
        tracer: Option<PruneTracer<'_>>,
    ) -> EvalResult {
        match self {
            Algorithm::Naive(opts) => {
                let config = EvalConfig {
                    charms,
                    max_power,
                    weights,
                    threads: opts.threads,
                };
                search(&config, tracer.filter(|_| opts.trace))
            }
        }
    }
}

impl std::str::FromStr for Algorithm {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "naive" => Ok(Algorithm::Naive(NaiveOptions::default())),
            other => Err(CoreError::UnknownAlgorithm(other.to_string())),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::Ability;
    use crate::charm::weights_from;
    use std::cell::RefCell;

    #[test]
    fn test_trivial_search_returns_empty() {
        let charms = vec![Charm::new("a", 1).with(Ability::Armor, 3.0)];
        let config = EvalConfig {
            charms: &charms,
            max_power: 15,
            weights: weights_from(&[(Ability::Speed, 4)]),
            threads: 1,
        };
        assert_eq!(search(&config, None), EvalResult::default());
    }

    #[test]
    fn test_result_translates_to_catalog_indices() {
        let charms = vec![
            Charm::new("filler", 1).with(Ability::Speed, 3.0),
            Charm::new("a", 1).with(Ability::Armor, 3.0),
            Charm::new("filler 2", 1),
            Charm::new("b", 1).with(Ability::Armor, 2.0),
        ];
        let config = EvalConfig {
            charms: &charms,
            max_power: 15,
            weights: weights_from(&[(Ability::Armor, 1)]),
            threads: 1,
        };
        let result = search(&config, None);
        assert_eq!(result.charms, vec![1, 3]);
        assert_eq!(result.power_used(&charms), 2);
        assert_eq!(result.totals(&charms)[Ability::Armor.index()], 5.0);
    }

    #[test]
    fn test_tracer_sees_reduction_once() {
        let charms = vec![
            Charm::new("kept", 1).with(Ability::Armor, 3.0),
            Charm::new("dropped", 1).with(Ability::Speed, 3.0),
        ];
        let config = EvalConfig {
            charms: &charms,
            max_power: 15,
            weights: weights_from(&[(Ability::Armor, 1)]),
            threads: 1,
        };

        let seen = RefCell::new(Vec::new());
        let tracer = |report: &PruneReport<'_>| {
            seen.borrow_mut().push((
                report.abilities.clone(),
                report.charms.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            ));
        };
        search(&config, Some(&tracer));

        let seen = seen.into_inner();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, vec!["armor"]);
        assert_eq!(seen[0].1, vec!["kept".to_string()]);
    }

    #[test]
    fn test_result_json_shape() {
        let result = EvalResult {
            utility: 42,
            charms: vec![0, 3],
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"utility":42,"charms":[0,3]}"#);
        let back: EvalResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_algorithm_parse() {
        let algo: Algorithm = "naive".parse().unwrap();
        assert_eq!(algo.name(), "naive");
        assert!(algo.threads() >= 1);
        assert!("greedy".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_algorithm_gates_tracer() {
        let charms = vec![Charm::new("a", 1).with(Ability::Armor, 3.0)];
        let weights = weights_from(&[(Ability::Armor, 1)]);
        let calls = RefCell::new(0);
        let tracer = |_: &PruneReport<'_>| *calls.borrow_mut() += 1;

        let quiet = Algorithm::Naive(NaiveOptions { threads: 1, trace: false });
        quiet.run(&charms, 15, weights, Some(&tracer));
        assert_eq!(*calls.borrow(), 0);

        let loud = Algorithm::Naive(NaiveOptions { threads: 2, trace: true });
        let result = loud.run(&charms, 15, weights, Some(&tracer));
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(result.charms, vec![0]);
    }
}
