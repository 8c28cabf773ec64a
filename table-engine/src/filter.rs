//! FILENAME: table-engine/src/filter.rs
//! PURPOSE: Search and type-filter evaluation over the row store.
//! CONTEXT: Every pass is recomputed from scratch. Only visible columns take
//! part in matching; hidden columns never make a row match.

use model::{ColumnRegistry, Record};

use crate::state::FilterState;

/// True if the record passes both the type filter and the search text.
///
/// Type filter: the row must hold a present (non-null, non-blank) value in at
/// least one visible column of the filtered type.
/// Search: at least one visible column's search predicate must accept the
/// value. Both conditions must hold.
pub fn matches(record: &Record, state: &FilterState, columns: &ColumnRegistry) -> bool {
    if let Some(wanted) = state.type_filter() {
        let type_match = columns
            .visible_columns()
            .filter(|c| c.column_type == wanted)
            .any(|c| record.get(&c.key).is_present());
        if !type_match {
            return false;
        }
    }

    let term = state.search_text();
    if !term.is_empty() {
        let search_match = columns
            .visible_columns()
            .any(|c| c.matches(record.get(&c.key), term));
        if !search_match {
            return false;
        }
    }

    true
}

/// Number of records that pass the filter, ignoring pagination.
pub fn count_matches(records: &[Record], state: &FilterState, columns: &ColumnRegistry) -> usize {
    records.iter().filter(|r| matches(r, state, columns)).count()
}

/// Indices of all matching records, in store order.
pub fn filtered_indices(records: &[Record], state: &FilterState, columns: &ColumnRegistry) -> Vec<usize> {
    if !state.has_active_filter() {
        return (0..records.len()).collect();
    }
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| matches(r, state, columns))
        .map(|(i, _)| i)
        .collect()
}

/// Indices of records whose `key` column accepts `term`.
/// An empty term, an unknown key or a hidden column match every record.
pub fn search_column(records: &[Record], key: &str, term: &str, columns: &ColumnRegistry) -> Vec<usize> {
    let column = match columns.column(key) {
        Some(c) if !term.is_empty() && columns.is_visible(key) => c,
        _ => return (0..records.len()).collect(),
    };
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| column.matches(r.get(key), term))
        .map(|(i, _)| i)
        .collect()
}
