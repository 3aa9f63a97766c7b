//! Error types for loading catalogs and configs.
//!
//! The search itself cannot fail; only the text formats and algorithm names
//! feeding it can.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a charm catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bad charm data on line {line}: expected 5 or 6 fields, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("malformed charm data on line {line}: failed to parse '{value}'")]
    Malformed { line: usize, value: String },

    #[error("bad charm data on line {line}: illegal rarity {rarity}")]
    IllegalRarity { line: usize, rarity: usize },

    #[error("bad charm data on line {line}: unknown effect {effect}")]
    UnknownEffect { line: usize, effect: String },

    #[error("bad charm data on line {line}: {ids} effects but {values} values")]
    ValueCount { line: usize, ids: usize, values: usize },
}

/// Errors raised while reading a weight config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config on line {line}: illegal section '{section}'")]
    IllegalSection { line: usize, section: String },

    #[error("malformed entry on line {line}: '{text}'")]
    MissingEquals { line: usize, text: String },

    #[error("unknown key on line {line}: '{key}'")]
    UnknownKey { line: usize, key: String },

    #[error("unknown charm effect on line {line}: '{effect}'")]
    UnknownEffect { line: usize, effect: String },

    #[error("malformed config on line {line}: failed to parse '{value}' as int")]
    MalformedInt { line: usize, value: String },

    #[error("charm power must be less than or equal to {max}, got {value}")]
    PowerTooHigh { value: u32, max: u32 },
}

/// Errors raised while choosing how to evaluate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown charm evaluation algorithm: {0}")]
    UnknownAlgorithm(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_line_numbers() {
        let err = CatalogError::IllegalRarity { line: 7, rarity: 9 };
        assert_eq!(err.to_string(), "bad charm data on line 7: illegal rarity 9");

        let err = ConfigError::UnknownEffect {
            line: 3,
            effect: "luck".into(),
        };
        assert_eq!(err.to_string(), "unknown charm effect on line 3: 'luck'");
    }

    #[test]
    fn test_unknown_algorithm_message() {
        let err = "greedy".parse::<crate::Algorithm>().unwrap_err();
        assert!(matches!(&err, CoreError::UnknownAlgorithm(name) if name == "greedy"));
        assert_eq!(err.to_string(), "unknown charm evaluation algorithm: greedy");
    }
}
