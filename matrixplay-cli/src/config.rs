//! Driver configuration from the environment
//!
//! - `MATRIXPLAY_MATRIX`: initial main matrix
//! - `MATRIXPLAY_MULTIPLYING`: initial multiplying matrix
//! - `MATRIXPLAY_HISTORY_LIMIT`: maximum number of history entries
//! - `MATRIXPLAY_PRETTY`: `1` to echo a text view to stderr after each command
//!
//! Matrix literals are either JSON-style (`[[1, "1/2"], [3, 4]]`) or rows
//! separated by `;` with cells separated by commas or spaces (`1 1/2; 3 4`).

use matrixplay::{parse_scalar, Matrix, PlayError, PlaygroundConfig, Scalar};
use serde_json::Value as JsonValue;
use std::env;

pub const MATRIX_VAR: &str = "MATRIXPLAY_MATRIX";
pub const MULTIPLYING_VAR: &str = "MATRIXPLAY_MULTIPLYING";
pub const HISTORY_LIMIT_VAR: &str = "MATRIXPLAY_HISTORY_LIMIT";
pub const PRETTY_VAR: &str = "MATRIXPLAY_PRETTY";

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub playground: PlaygroundConfig,
    pub pretty: bool,
}

impl CliConfig {
    pub fn from_env() -> Result<Self, PlayError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep the defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PlayError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut playground = PlaygroundConfig::new();

        if let Some(text) = get(MATRIX_VAR) {
            playground = playground.with_main(
                parse_matrix(&text).map_err(|e| e.with_note(format!("while reading {}", MATRIX_VAR)))?,
            );
        }
        if let Some(text) = get(MULTIPLYING_VAR) {
            playground = playground.with_multiplying(
                parse_matrix(&text).map_err(|e| e.with_note(format!("while reading {}", MULTIPLYING_VAR)))?,
            );
        }
        if let Some(text) = get(HISTORY_LIMIT_VAR) {
            let limit = text.trim().parse::<usize>().map_err(|_| {
                PlayError::parse_error(format!("{} must be a positive integer, got '{}'", HISTORY_LIMIT_VAR, text))
            })?;
            playground = playground.with_history_limit(Some(limit));
        }

        let pretty = get(PRETTY_VAR)
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Ok(Self { playground, pretty })
    }
}

/// Parse a matrix literal
pub fn parse_matrix(text: &str) -> Result<Matrix, PlayError> {
    let text = text.trim();
    let rows = if text.starts_with('[') {
        parse_json_rows(text)?
    } else {
        parse_plain_rows(text)?
    };
    Ok(Matrix::from_rows(rows)?)
}

fn parse_json_rows(text: &str) -> Result<Vec<Vec<Scalar>>, PlayError> {
    let rows: Vec<Vec<JsonValue>> = serde_json::from_str(text)
        .map_err(|e| PlayError::parse_error(format!("matrix literal: {}", e)))?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(|(j, cell)| {
                    let raw = match cell {
                        JsonValue::String(s) => s.clone(),
                        JsonValue::Number(n) => n.to_string(),
                        other => other.to_string(),
                    };
                    parse_scalar(&raw).map_err(|e| PlayError::from(e).at_cell(i, j))
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect()
}

fn parse_plain_rows(text: &str) -> Result<Vec<Vec<Scalar>>, PlayError> {
    text.split(';')
        .enumerate()
        .map(|(i, row)| {
            row.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|cell| !cell.is_empty())
                .enumerate()
                .map(|(j, cell)| parse_scalar(cell).map_err(|e| PlayError::from(e).at_cell(i, j)))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrixplay_core::codes;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_plain_matrix() {
        let m = parse_matrix("1 2; 3, 1/2").unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.get(1, 1), Some(&Scalar::new(1, 2).unwrap()));
    }

    #[test]
    fn test_parse_json_matrix() {
        let m = parse_matrix(r#"[[1, "2/4"], [0.5, -3]]"#).unwrap();
        assert_eq!(m.get(0, 1), Some(&Scalar::new(1, 2).unwrap()));
        assert_eq!(m.get(1, 0), Some(&Scalar::new(1, 2).unwrap()));
        assert_eq!(m.get(1, 1), Some(&Scalar::from(-3)));
    }

    #[test]
    fn test_parse_matrix_errors() {
        let err = parse_matrix("1 2; 3").unwrap_err();
        assert_eq!(err.code, codes::DIMENSION_MISMATCH);

        let err = parse_matrix("1 x").unwrap_err();
        assert_eq!(err.code, codes::INVALID_NUMBER_FORMAT);
        assert_eq!(err.context.unwrap().cell, Some((0, 1)));

        assert_eq!(parse_matrix("[[1,").unwrap_err().code, codes::PARSE_ERROR);
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CliConfig::from_lookup(lookup(&[])).unwrap();
        assert!(!config.pretty);
        assert_eq!(config.playground.history_limit, None);
        assert_eq!(config.playground.main.rows(), 3);
    }

    #[test]
    fn test_reads_variables() {
        let config = CliConfig::from_lookup(lookup(&[
            (MATRIX_VAR, "1 0; 0 1"),
            (MULTIPLYING_VAR, "[[2]]"),
            (HISTORY_LIMIT_VAR, "10"),
            (PRETTY_VAR, "1"),
        ]))
        .unwrap();
        assert!(config.pretty);
        assert_eq!(config.playground.history_limit, Some(10));
        assert_eq!(config.playground.main, Matrix::identity(2).unwrap());
        assert_eq!(config.playground.multiplying.get(0, 0), Some(&Scalar::from(2)));
    }

    #[test]
    fn test_bad_limit() {
        let err = CliConfig::from_lookup(lookup(&[(HISTORY_LIMIT_VAR, "-1")])).unwrap_err();
        assert_eq!(err.code, codes::PARSE_ERROR);
    }
}
