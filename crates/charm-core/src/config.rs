//! Weight configuration.
//!
//! ```text
//! # anything after '#' is ignored
//! charm_power = 12
//!
//! [weights]
//! ability_damage = 3
//! ability_cooldown = 2
//! ```
//!
//! Keys before the first section header are global settings; the `[weights]`
//! section maps ability ids to signed integer weights. Reading several files
//! into the same [`Config`] layers them, later values winning.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::ability::{Ability, ABILITY_COUNT};
use crate::charm::{Weights, CHARM_POWER_MAX};
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Power budget
    pub max_power: u32,
    /// Explicitly configured weights; absent abilities weigh 0
    pub weights: BTreeMap<Ability, i32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_power: CHARM_POWER_MAX,
            weights: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Global,
    Weights,
}

impl Config {
    /// Dense weight vector for the search.
    pub fn to_weights(&self) -> Weights {
        let mut weights = [0; ABILITY_COUNT];
        for (ability, weight) in &self.weights {
            weights[ability.index()] = *weight;
        }
        weights
    }

    pub fn set_max_power(&mut self, value: u32) -> Result<(), ConfigError> {
        if value > CHARM_POWER_MAX {
            return Err(ConfigError::PowerTooHigh {
                value,
                max: CHARM_POWER_MAX,
            });
        }
        self.max_power = value;
        Ok(())
    }

    pub fn set_weight(&mut self, ability: Ability, weight: i32) {
        self.weights.insert(ability, weight);
    }

    /// Layer the contents of a config file over `self`.
    pub fn merge_file(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.merge_str(&text)?;
        tracing::debug!(path = %path.display(), weights = self.weights.len(), "loaded config");
        Ok(())
    }

    /// Layer config text over `self`.
    pub fn merge_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let mut section = Section::Global;

        for (i, raw_line) in text.lines().enumerate() {
            let line_no = i + 1;
            let line = raw_line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') {
                section = match line {
                    "[weights]" => Section::Weights,
                    other => {
                        return Err(ConfigError::IllegalSection {
                            line: line_no,
                            section: other.to_string(),
                        })
                    }
                };
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::MissingEquals {
                line: line_no,
                text: line.to_string(),
            })?;
            let (key, value) = (key.trim(), value.trim());

            match section {
                Section::Global => match key {
                    "charm_power" => {
                        let power: i32 = parse_int(line_no, value)?;
                        let power = u32::try_from(power).map_err(|_| ConfigError::MalformedInt {
                            line: line_no,
                            value: value.to_string(),
                        })?;
                        self.set_max_power(power)?;
                    }
                    _ => {
                        return Err(ConfigError::UnknownKey {
                            line: line_no,
                            key: key.to_string(),
                        })
                    }
                },
                Section::Weights => {
                    let ability = Ability::from_id(key).ok_or_else(|| ConfigError::UnknownEffect {
                        line: line_no,
                        effect: key.to_string(),
                    })?;
                    self.set_weight(ability, parse_int(line_no, value)?);
                }
            }
        }

        Ok(())
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut config = Config::default();
        config.merge_str(s)?;
        Ok(config)
    }
}

fn parse_int(line: usize, value: &str) -> Result<i32, ConfigError> {
    value.parse().map_err(|_| ConfigError::MalformedInt {
        line,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let text = "\
# budget
charm_power = 12   # trailing comment

[weights]
ability_damage = 3
ability_cooldown=-2
";
        let config: Config = text.parse().unwrap();
        assert_eq!(config.max_power, 12);
        assert_eq!(config.weights.len(), 2);

        let weights = config.to_weights();
        assert_eq!(weights[Ability::AbilityDamage.index()], 3);
        assert_eq!(weights[Ability::AbilityCooldown.index()], -2);
        assert_eq!(weights[Ability::Armor.index()], 0);
    }

    #[test]
    fn test_default_budget() {
        let config: Config = "[weights]\narmor = 1".parse().unwrap();
        assert_eq!(config.max_power, CHARM_POWER_MAX);
    }

    #[test]
    fn test_layering_overrides() {
        let mut config: Config = "charm_power = 8\n[weights]\narmor = 1\nspeed = 2"
            .parse()
            .unwrap();
        config.merge_str("[weights]\narmor = 5").unwrap();
        assert_eq!(config.max_power, 8);
        assert_eq!(config.weights[&Ability::Armor], 5);
        assert_eq!(config.weights[&Ability::Speed], 2);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            "[global]".parse::<Config>().unwrap_err(),
            ConfigError::IllegalSection { line: 1, .. }
        ));
        assert!(matches!(
            "charm_power 5".parse::<Config>().unwrap_err(),
            ConfigError::MissingEquals { .. }
        ));
        assert!(matches!(
            "budget = 5".parse::<Config>().unwrap_err(),
            ConfigError::UnknownKey { .. }
        ));
        assert!(matches!(
            "[weights]\n\nluck = 5".parse::<Config>().unwrap_err(),
            ConfigError::UnknownEffect { line: 3, .. }
        ));
        assert!(matches!(
            "[weights]\narmor = lots".parse::<Config>().unwrap_err(),
            ConfigError::MalformedInt { line: 2, .. }
        ));
        assert!(matches!(
            "charm_power = 16".parse::<Config>().unwrap_err(),
            ConfigError::PowerTooHigh { value: 16, .. }
        ));
        assert!(matches!(
            "charm_power = -1".parse::<Config>().unwrap_err(),
            ConfigError::MalformedInt { .. }
        ));
    }

    #[test]
    fn test_merge_missing_file() {
        let mut config = Config::default();
        assert!(matches!(
            config.merge_file("/definitely/not/here.ini").unwrap_err(),
            ConfigError::Io { .. }
        ));
    }
}
