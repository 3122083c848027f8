//! Operation Registry

use crate::traits::{self, OperationMeta};
use matrixplay_core::PlayError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Every row/column operation the playground knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    SwapRows,
    SwapColumns,
    AddRows,
    AddColumns,
    MultiplyRow,
    MultiplyColumn,
    DeleteRow,
    DeleteColumn,
    SetCell,
}

impl OperationKind {
    pub const ALL: [OperationKind; 9] = [
        OperationKind::SwapRows,
        OperationKind::SwapColumns,
        OperationKind::AddRows,
        OperationKind::AddColumns,
        OperationKind::MultiplyRow,
        OperationKind::MultiplyColumn,
        OperationKind::DeleteRow,
        OperationKind::DeleteColumn,
        OperationKind::SetCell,
    ];

    pub fn meta(&self) -> &'static OperationMeta {
        match self {
            OperationKind::SwapRows => &traits::SWAP_ROWS,
            OperationKind::SwapColumns => &traits::SWAP_COLUMNS,
            OperationKind::AddRows => &traits::ADD_ROWS,
            OperationKind::AddColumns => &traits::ADD_COLUMNS,
            OperationKind::MultiplyRow => &traits::MULTIPLY_ROW,
            OperationKind::MultiplyColumn => &traits::MULTIPLY_COLUMN,
            OperationKind::DeleteRow => &traits::DELETE_ROW,
            OperationKind::DeleteColumn => &traits::DELETE_COLUMN,
            OperationKind::SetCell => &traits::SET_CELL,
        }
    }

    pub fn name(&self) -> &'static str {
        self.meta().name
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperationKind {
    type Err = PlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        OperationKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == key)
            .ok_or_else(|| PlayError::unknown_operation(s))
    }
}

/// Lookup table for operation kinds by name and keyboard shortcut
#[derive(Debug, Clone)]
pub struct OperationRegistry {
    operations: BTreeMap<String, OperationKind>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self { operations: BTreeMap::new() }
    }

    /// Registry holding every built-in kind
    pub fn standard() -> Self {
        OperationKind::ALL
            .iter()
            .fold(Self::new(), |registry, kind| registry.with_operation(*kind))
    }

    pub fn with_operation(mut self, kind: OperationKind) -> Self {
        self.operations.insert(kind.name().to_string(), kind);
        self
    }

    pub fn by_name(&self, name: &str) -> Result<OperationKind, PlayError> {
        match self.operations.get(&name.trim().to_lowercase()) {
            Some(kind) => Ok(*kind),
            None => {
                // Find similar names for better error message
                let similar = self.find_similar(name);
                let mut err = PlayError::unknown_operation(name);
                if !similar.is_empty() {
                    let suggestions: Vec<&str> = similar.iter().take(3).map(|s| s.as_str()).collect();
                    err = err.with_suggestion(format!(
                        "Similar: {}. Use ops for the full list.",
                        suggestions.join(", ")
                    ));
                }
                Err(err)
            }
        }
    }

    /// Kind bound to a keyboard key, case-insensitive
    pub fn by_shortcut(&self, key: char) -> Option<OperationKind> {
        let key = key.to_ascii_lowercase();
        self.operations
            .values()
            .copied()
            .find(|kind| kind.meta().shortcut == Some(key))
    }

    pub fn list(&self) -> Vec<&'static OperationMeta> {
        self.operations.values().map(|kind| kind.meta()).collect()
    }

    pub fn help(&self, name: &str) -> Result<&'static OperationMeta, PlayError> {
        self.by_name(name).map(|kind| kind.meta())
    }

    /// Find operation names similar to the given name (for error suggestions)
    fn find_similar(&self, name: &str) -> Vec<String> {
        let name_lower = name.trim().to_lowercase();
        let mut matches: Vec<(String, usize)> = self.operations.keys()
            .filter_map(|op_name| {
                let score = Self::similarity_score(&name_lower, op_name);
                if score > 0 {
                    Some((op_name.clone(), score))
                } else {
                    None
                }
            })
            .collect();

        // Highest score first, ties by name
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    fn similarity_score(query: &str, candidate: &str) -> usize {
        if query.is_empty() {
            return 0;
        }

        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        // Shared words count for more than shared characters
        let query_words: HashSet<&str> = query.split('_').collect();
        score += candidate.split('_').filter(|w| query_words.contains(w)).count() * 20;

        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        if query_chars.intersection(&candidate_chars).count() * 2 >= candidate_chars.len() {
            score += 5;
        }

        score
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Interaction;
    use matrixplay_core::codes;

    #[test]
    fn test_standard_has_nine_kinds() {
        let registry = OperationRegistry::standard();
        assert_eq!(registry.list().len(), 9);
    }

    #[test]
    fn test_debug_lists_names() {
        let registry = OperationRegistry::new().with_operation(OperationKind::SwapRows);
        let text = format!("{:?}", registry);
        assert!(text.contains("swap_rows"));
    }

    #[test]
    fn test_by_name() {
        let registry = OperationRegistry::standard();
        assert_eq!(registry.by_name("add_rows").unwrap(), OperationKind::AddRows);
        assert_eq!(registry.by_name("  Delete_Column ").unwrap(), OperationKind::DeleteColumn);
    }

    #[test]
    fn test_unknown_name_suggests() {
        let registry = OperationRegistry::standard();
        let err = registry.by_name("swap").unwrap_err();
        assert_eq!(err.code, codes::UNKNOWN_OPERATION);
        let suggestion = err.suggestion.unwrap();
        assert!(suggestion.contains("swap_columns"));
        assert!(suggestion.contains("swap_rows"));
    }

    #[test]
    fn test_shortcuts() {
        let registry = OperationRegistry::standard();
        assert_eq!(registry.by_shortcut('r'), Some(OperationKind::SwapRows));
        assert_eq!(registry.by_shortcut('c'), Some(OperationKind::SwapColumns));
        assert_eq!(registry.by_shortcut('a'), Some(OperationKind::AddRows));
        assert_eq!(registry.by_shortcut('M'), Some(OperationKind::MultiplyRow));
        assert_eq!(registry.by_shortcut('d'), Some(OperationKind::DeleteRow));
        assert_eq!(registry.by_shortcut('x'), None);
    }

    #[test]
    fn test_shortcut_requires_registration() {
        let registry = OperationRegistry::new().with_operation(OperationKind::DeleteColumn);
        assert_eq!(registry.by_shortcut('d'), None);
    }

    #[test]
    fn test_help() {
        let registry = OperationRegistry::standard();
        let meta = registry.help("set_cell").unwrap();
        assert_eq!(meta.interaction, Interaction::EditCell);
        assert!(meta.requires_scalar);
        assert!(registry.help("nope").is_err());
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in OperationKind::ALL {
            assert_eq!(kind.to_string().parse::<OperationKind>().unwrap(), kind);
        }
        assert_eq!(serde_json::to_string(&OperationKind::MultiplyColumn).unwrap(), "\"multiply_column\"");
    }
}
