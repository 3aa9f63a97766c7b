//! # charm-core
//!
//! Finds the set of at most seven charms that maximizes a weighted sum of
//! their abilities under a charm power budget.
//!
//! | Stage | Module | Description |
//! |-------|--------|-------------|
//! | Load | [`catalog`], [`config`] | Parse the charm catalog and the weight config |
//! | Reduce | [`eval::reduce`] | Keep weighted abilities that some charm has; drop charms that have none of them; encode to fixed point |
//! | Dispatch | `eval::dispatch` | Pick the kernel compiled for the (rounded-up) number of kept abilities |
//! | Search | `eval::kernel`, `eval::parallel` | Depth-first enumeration with power-budget pruning, optionally split across worker threads |
//!
//! ```
//! use charm_core::{search, weights_from, Ability, Charm, EvalConfig};
//!
//! let charms = vec![
//!     Charm::new("Ember", 2).with(Ability::MagicDamage, 6.0),
//!     Charm::new("Frost", 3).with(Ability::MagicDamage, 9.0),
//! ];
//! let result = search(
//!     &EvalConfig {
//!         charms: &charms,
//!         max_power: 4,
//!         weights: weights_from(&[(Ability::MagicDamage, 1)]),
//!         threads: 1,
//!     },
//!     None,
//! );
//! assert_eq!(result.charms, vec![1]);
//! ```

pub mod ability;
pub mod catalog;
pub mod charm;
pub mod config;
pub mod error;
pub mod eval;

pub use ability::{Ability, AbilityInfo, ABILITY_COUNT};
pub use catalog::{parse_catalog, read_catalog};
pub use charm::{
    weights_from, Charm, CharmId, Rarity, Weights, CHARM_COUNT_MAX, CHARM_POWER_MAX, MISSING_ID,
};
pub use config::Config;
pub use error::{CatalogError, ConfigError, CoreError};
pub use eval::{
    search, Algorithm, EvalConfig, EvalResult, NaiveOptions, PruneReport, PruneTracer,
};
