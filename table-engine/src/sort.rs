//! FILENAME: table-engine/src/sort.rs
//! PURPOSE: Stable, comparator-driven ordering of filtered row indices.
//! CONTEXT: Sorting reorders an index list produced by the filter pass. It
//! never adds indices back. Child rows stay directly after their parent.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use model::{Column, ColumnRegistry, Record, Result, SortDirection, SortKey, Value};

/// One level of a sort: column key and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        SortSpec {
            key: key.into(),
            direction,
        }
    }

    pub fn ascending(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Ascending)
    }

    pub fn descending(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Descending)
    }
}

/// Sort levels, most significant first. Rarely more than a handful.
pub type SortSpecs = SmallVec<[SortSpec; 4]>;

// ============================================================================
// COMPARISON
// ============================================================================

/// Ascending comparison of two values in a column, by the column's sort key.
///
/// Values whose keys are of different kinds order by kind (see `SortKey`), so
/// text that cannot be read as a number sorts after every number in a
/// NUMERIC column.
pub fn compare_values(column: &Column, a: &Value, b: &Value) -> Ordering {
    column.sort_key(a).total_cmp(&column.sort_key(b))
}

/// Ascending comparison of two records on `key`.
pub fn compare(a: &Record, b: &Record, key: &str, columns: &ColumnRegistry) -> Result<Ordering> {
    let column = columns.get(key)?;
    Ok(compare_values(column, a.get(key), b.get(key)))
}

/// Resolves sort specs against the registry so a pass does no key lookups.
fn resolve<'a>(
    specs: &[SortSpec],
    columns: &'a ColumnRegistry,
) -> Result<SmallVec<[(&'a Column, SortDirection); 4]>> {
    specs
        .iter()
        .map(|spec| Ok((columns.get(&spec.key)?, spec.direction)))
        .collect()
}

/// Sort keys of one record, one per level.
type KeyRow = SmallVec<[SortKey; 4]>;

fn keys_for(record: &Record, levels: &[(&Column, SortDirection)]) -> KeyRow {
    levels
        .iter()
        .map(|(column, _)| column.sort_key(record.get(&column.key)))
        .collect()
}

fn compare_keys(a: &KeyRow, b: &KeyRow, levels: &[(&Column, SortDirection)]) -> Ordering {
    for ((ka, kb), (_, direction)) in a.iter().zip(b.iter()).zip(levels) {
        let ord = direction.apply(ka.total_cmp(kb));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

// ============================================================================
// SORTING
// ============================================================================

/// Returns `indices` reordered by `specs`. The sort is stable.
///
/// Child records whose parent is also in `indices` are kept directly after
/// that parent, in their original relative order. Children whose parent was
/// filtered out are sorted as top-level rows.
pub fn sort_indices(
    records: &[Record],
    indices: &[usize],
    specs: &[SortSpec],
    columns: &ColumnRegistry,
) -> Result<Vec<usize>> {
    let levels = resolve(specs, columns)?;
    if levels.is_empty() {
        return Ok(indices.to_vec());
    }

    let present: rustc_hash::FxHashSet<usize> = indices.iter().copied().collect();
    let mut top_level: Vec<usize> = Vec::with_capacity(indices.len());
    let mut children: FxHashMap<usize, SmallVec<[usize; 4]>> = FxHashMap::default();

    for &i in indices {
        let Some(record) = records.get(i) else { continue };
        match record.parent_index() {
            Some(parent) if present.contains(&parent) => {
                children.entry(parent).or_default().push(i);
            }
            _ => top_level.push(i),
        }
    }

    // Keys are computed once per row, not once per comparison
    let mut keyed: Vec<(usize, KeyRow)> = top_level
        .into_iter()
        .map(|i| (i, keys_for(&records[i], &levels)))
        .collect();
    keyed.sort_by(|(_, a), (_, b)| compare_keys(a, b, &levels));
    let top_level: Vec<usize> = keyed.into_iter().map(|(i, _)| i).collect();

    if children.is_empty() {
        return Ok(top_level);
    }

    let mut ordered = Vec::with_capacity(indices.len());
    for i in top_level {
        ordered.push(i);
        if let Some(kids) = children.get(&i) {
            ordered.extend_from_slice(kids);
        }
    }
    Ok(ordered)
}
