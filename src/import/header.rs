//! Header row recognition and column binding
//!
//! Header cells are matched against the expected labels in three tiers:
//! exact, case-insensitive exact, then substring in either direction.

use crate::types::LogicalField;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchTier {
    Exact,
    CaseInsensitive,
    Substring,
}

const TIERS: [MatchTier; 3] = [
    MatchTier::Exact,
    MatchTier::CaseInsensitive,
    MatchTier::Substring,
];

fn matches_tier(cell: &str, label: &str, tier: MatchTier) -> bool {
    match tier {
        MatchTier::Exact => cell == label,
        MatchTier::CaseInsensitive => cell.to_lowercase() == label.to_lowercase(),
        MatchTier::Substring => {
            let cell = cell.to_lowercase();
            let label = label.to_lowercase();
            cell.contains(&label) || label.contains(&cell)
        }
    }
}

/// Whether a header cell names the field at any tier
pub fn cell_matches(cell: &str, field: LogicalField) -> bool {
    let cell = cell.trim();
    !cell.is_empty() && TIERS.iter().any(|&t| matches_tier(cell, field.label(), t))
}

/// Required fields that no cell in the row names
pub fn missing_required(cells: &[String]) -> Vec<LogicalField> {
    LogicalField::REQUIRED
        .iter()
        .copied()
        .filter(|&field| !cells.iter().any(|c| cell_matches(c, field)))
        .collect()
}

/// Column index for each logical field a header row names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnBinding {
    columns: BTreeMap<LogicalField, usize>,
}

impl ColumnBinding {
    /// Bind header cells to fields.
    ///
    /// Each tier runs over every column before the next tier starts, and only
    /// fills fields and columns that are still unbound.
    pub fn bind(cells: &[String]) -> Self {
        let mut columns = BTreeMap::new();
        let mut column_taken = vec![false; cells.len()];

        for tier in TIERS {
            for (idx, cell) in cells.iter().enumerate() {
                let cell = cell.trim();
                if cell.is_empty() || column_taken[idx] {
                    continue;
                }
                let field = LogicalField::ALL.iter().copied().find(|f| {
                    !columns.contains_key(f) && matches_tier(cell, f.label(), tier)
                });
                if let Some(field) = field {
                    columns.insert(field, idx);
                    column_taken[idx] = true;
                }
            }
        }

        Self { columns }
    }

    pub fn column(&self, field: LogicalField) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// Required fields left without a column
    pub fn unbound_required(&self) -> Vec<LogicalField> {
        LogicalField::REQUIRED
            .iter()
            .copied()
            .filter(|f| !self.columns.contains_key(f))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Outcome of testing one row as a header candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCandidate {
    pub binding: ColumnBinding,
    pub missing: Vec<LogicalField>,
}

impl HeaderCandidate {
    pub fn evaluate(cells: &[String]) -> Self {
        let binding = ColumnBinding::bind(cells);
        let mut missing = missing_required(cells);
        // A single ambiguous cell can satisfy two required fields but bind only one
        for field in binding.unbound_required() {
            if !missing.contains(&field) {
                missing.push(field);
            }
        }
        missing.sort();
        Self { binding, missing }
    }

    pub fn is_header(&self) -> bool {
        self.missing.is_empty()
    }
}
