//! Lexical-frequency lookups against a word-form (or lemma) keyed table.

use std::collections::HashSet;

use crate::error::FluencyError;
use crate::types::IntervalTier;

mod import;
mod sqlite;

pub use import::{import_dictionary, IfExists};
pub use sqlite::SqliteLexicon;

pub const DEFAULT_KEY_COLUMN: &str = "WordForm";
pub const MISSING_LABEL: &str = "MISSING";

/// One table row as `(column, value)` pairs in column order.
pub type Row = Vec<(String, String)>;

pub trait RowLookup {
    /// Every column of the table, key column included.
    fn columns(&self) -> &[String];

    fn key_column(&self) -> &str;

    /// Case-insensitive exact match on the key column; at most one row.
    fn lookup(&self, key: &str) -> Result<Option<Row>, FluencyError>;
}

/// Columns that become output tiers: everything except the key column.
pub fn column_names(lookup: &dyn RowLookup) -> Vec<String> {
    lookup
        .columns()
        .iter()
        .filter(|column| column.as_str() != lookup.key_column())
        .cloned()
        .collect()
}

/// One tier per selected column, each interval labeled with that column's
/// value for the interval's word.
///
/// Words are trimmed and split on `'` (`isn't` -> `isn`, `t`); the values of
/// all segments are joined by a space. If any segment is missing, every tier
/// gets `MISSING`. Empty and ignored words get an empty label.
pub fn frequency_tiers(
    word_tier: &IntervalTier,
    lookup: &dyn RowLookup,
    ignore: &HashSet<String>,
    columns: Option<&[String]>,
) -> Result<Vec<IntervalTier>, FluencyError> {
    let selected = select_columns(lookup, columns)?;
    let ignore: HashSet<String> = ignore.iter().map(|word| word.to_lowercase()).collect();
    let mut labels: Vec<Vec<String>> = vec![Vec::with_capacity(word_tier.intervals.len()); selected.len()];

    for interval in &word_tier.intervals {
        let word = interval.label.trim();
        let values = if word.is_empty() || ignore.contains(&word.to_lowercase()) {
            vec![String::new(); selected.len()]
        } else {
            lookup_segments(lookup, word, &selected)?
                .unwrap_or_else(|| vec![MISSING_LABEL.to_string(); selected.len()])
        };
        for (column_labels, value) in labels.iter_mut().zip(values) {
            column_labels.push(value);
        }
    }

    Ok(selected
        .iter()
        .zip(labels)
        .map(|(column, column_labels)| {
            let intervals = word_tier
                .intervals
                .iter()
                .zip(column_labels)
                .map(|(interval, label)| interval.with_label(label))
                .collect();
            word_tier.derive(column.as_str(), intervals)
        })
        .collect())
}

fn select_columns(
    lookup: &dyn RowLookup,
    requested: Option<&[String]>,
) -> Result<Vec<String>, FluencyError> {
    let available = column_names(lookup);
    let Some(requested) = requested.filter(|r| !r.is_empty()) else {
        return Ok(available);
    };
    requested
        .iter()
        .filter(|column| column.as_str() != lookup.key_column())
        .map(|column| {
            if available.contains(column) {
                Ok(column.clone())
            } else {
                Err(FluencyError::invalid_input(format!(
                    "column '{column}' not found; available: {}",
                    available.join(", ")
                )))
            }
        })
        .collect()
}

fn lookup_segments(
    lookup: &dyn RowLookup,
    word: &str,
    columns: &[String],
) -> Result<Option<Vec<String>>, FluencyError> {
    let mut values: Vec<Vec<String>> = vec![Vec::new(); columns.len()];
    let mut segments = word.split('\'').filter(|segment| !segment.is_empty()).peekable();
    if segments.peek().is_none() {
        return Ok(None);
    }

    for segment in segments {
        let Some(row) = lookup.lookup(segment)? else {
            tracing::debug!(word, segment, "no dictionary row");
            return Ok(None);
        };
        for (column, column_values) in columns.iter().zip(values.iter_mut()) {
            let value = row
                .iter()
                .find(|(name, _)| name == column)
                .map(|(_, value)| value.clone())
                .unwrap_or_default();
            column_values.push(value);
        }
    }
    Ok(Some(values.into_iter().map(|v| v.join(" ")).collect()))
}
