//! Charm catalog reader.
//!
//! One charm per line, `;`-separated:
//!
//! ```text
//! rarity;name;power;effect_id:effect_id;value:value[;upgraded_value:upgraded_value]
//! ```
//!
//! A line with the sixth field produces two charms: the base (marked
//! `has_upgrade`) followed by its upgraded twin `"<name> (u)"`, one rarity tier
//! higher. Blank lines and `#` comments are skipped.

use std::fs;
use std::path::Path;

use crate::ability::{Ability, ABILITY_COUNT};
use crate::charm::{Charm, Rarity};
use crate::error::CatalogError;

/// Read and parse a catalog file.
pub fn read_catalog(path: impl AsRef<Path>) -> Result<Vec<Charm>, CatalogError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let charms = parse_catalog(&text)?;
    tracing::debug!(path = %path.display(), charms = charms.len(), "loaded catalog");
    Ok(charms)
}

/// Parse catalog text.
pub fn parse_catalog(text: &str) -> Result<Vec<Charm>, CatalogError> {
    let mut charms = Vec::new();

    for (i, raw_line) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split(';').map(str::trim).collect();
        if parts.len() != 5 && parts.len() != 6 {
            return Err(CatalogError::FieldCount {
                line: line_no,
                found: parts.len(),
            });
        }

        let rarity_index: usize = parse_value(line_no, parts[0])?;
        let rarity = Rarity::from_index(rarity_index).ok_or(CatalogError::IllegalRarity {
            line: line_no,
            rarity: rarity_index,
        })?;
        let name = parts[1];
        let power: u32 = parse_value(line_no, parts[2])?;

        let effects = split_list(parts[3])
            .into_iter()
            .map(|id| {
                Ability::from_id(id).ok_or_else(|| CatalogError::UnknownEffect {
                    line: line_no,
                    effect: id.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let base_values = parse_values(line_no, &effects, parts[4])?;

        if parts.len() == 6 {
            let upgraded_rarity = rarity.upgraded().ok_or(CatalogError::IllegalRarity {
                line: line_no,
                rarity: rarity_index,
            })?;
            let upgraded_values = parse_values(line_no, &effects, parts[5])?;

            charms.push(Charm {
                name: name.to_string(),
                power,
                rarity,
                has_upgrade: true,
                abilities: base_values,
            });
            charms.push(Charm {
                name: format!("{} (u)", name),
                power,
                rarity: upgraded_rarity,
                has_upgrade: false,
                abilities: upgraded_values,
            });
        } else {
            charms.push(Charm {
                name: name.to_string(),
                power,
                rarity,
                has_upgrade: false,
                abilities: base_values,
            });
        }
    }

    Ok(charms)
}

fn split_list(field: &str) -> Vec<&str> {
    if field.is_empty() {
        Vec::new()
    } else {
        field.split(':').map(str::trim).collect()
    }
}

fn parse_value<T: std::str::FromStr>(line: usize, value: &str) -> Result<T, CatalogError> {
    value.parse().map_err(|_| CatalogError::Malformed {
        line,
        value: value.to_string(),
    })
}

fn parse_values(
    line: usize,
    effects: &[Ability],
    field: &str,
) -> Result<[f64; ABILITY_COUNT], CatalogError> {
    let values = split_list(field);
    if values.len() != effects.len() {
        return Err(CatalogError::ValueCount {
            line,
            ids: effects.len(),
            values: values.len(),
        });
    }

    let mut out = [0.0; ABILITY_COUNT];
    for (ability, value) in effects.iter().zip(values) {
        out[ability.index()] = parse_value(line, value)?;
    }
    Ok(out)
}
