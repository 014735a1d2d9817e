//! Facet grid layout
//!
//! Columns are variables and rows are model titles. A strip label is only
//! shown along a dimension with more than one level.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::reshape::LongTable;

/// Resolve a facet label against user overrides.
///
/// Keys match case-insensitively; a label without a matching key is
/// returned unchanged.
pub fn resolve_label(label: &str, overrides: &BTreeMap<String, String>) -> String {
    overrides
        .iter()
        .find(|(key, _)| key.to_lowercase() == label.to_lowercase())
        .map(|(_, value)| value.clone())
        .unwrap_or_else(|| label.to_string())
}

/// Row and column layout of a faceted plot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetGrid {
    /// One label per title level
    pub row_labels: Vec<String>,
    /// One label per variable level
    pub col_labels: Vec<String>,
    pub show_row_strips: bool,
    pub show_col_strips: bool,
}

impl FacetGrid {
    /// Lay out a table's titles and variables
    pub fn new(table: &LongTable, overrides: &BTreeMap<String, String>) -> Self {
        let row_labels: Vec<String> = table
            .titles()
            .iter()
            .map(|t| resolve_label(t, overrides))
            .collect();
        let col_labels: Vec<String> = table
            .variables()
            .iter()
            .map(|v| resolve_label(v, overrides))
            .collect();

        Self {
            show_row_strips: row_labels.len() > 1,
            show_col_strips: col_labels.len() > 1,
            row_labels,
            col_labels,
        }
    }

    pub fn rows(&self) -> usize {
        self.row_labels.len()
    }

    pub fn cols(&self) -> usize {
        self.col_labels.len()
    }

    /// Strip text of the panel at (row, col), if any
    pub fn strip(&self, row: usize, col: usize) -> Option<String> {
        let mut parts = Vec::new();
        if self.show_col_strips {
            parts.push(self.col_labels[col].as_str());
        }
        if self.show_row_strips {
            parts.push(self.row_labels[row].as_str());
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" | "))
        }
    }
}
