//! Derived completion scoring types.
//!
//! A `CompletionSnapshot` is never persisted; it is recomputed on demand so
//! every screen sees the same progress for the same underlying data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::destination::Category;
use super::user::FieldKey;

/// Readiness state of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionState {
    Complete,
    Partial,
    Incomplete,
}

impl CompletionState {
    /// Classify filled-vs-total counts.
    pub fn classify(filled: usize, total: usize) -> Self {
        if total > 0 && filled >= total {
            Self::Complete
        } else if filled == 0 {
            Self::Incomplete
        } else {
            Self::Partial
        }
    }
}

/// Per-category completion tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCompletion {
    pub filled_count: usize,
    pub total_count: usize,
    pub state: CompletionState,
    pub missing_fields: Vec<FieldKey>,
}

/// Aggregate readiness score across all categories.
///
/// Categories are kept in a `BTreeMap` so iteration order, and therefore any
/// serialized form, is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionSnapshot {
    pub categories: BTreeMap<Category, CategoryCompletion>,
    pub overall_percent: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_boundaries() {
        assert_eq!(CompletionState::classify(0, 5), CompletionState::Incomplete);
        assert_eq!(CompletionState::classify(3, 5), CompletionState::Partial);
        assert_eq!(CompletionState::classify(5, 5), CompletionState::Complete);
        // Over-filled funds category still reads complete
        assert_eq!(CompletionState::classify(7, 5), CompletionState::Complete);
    }
}
