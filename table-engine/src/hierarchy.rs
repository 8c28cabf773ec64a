//! FILENAME: table-engine/src/hierarchy.rs
//! PURPOSE: Two-level parent/child rows: flattening and expand/collapse state.
//! CONTEXT: Nested input is flattened once into `Record`s tagged with a
//! `RowKind`. `HierarchyExpander` tracks which parents are expanded and decides
//! which child records are visible. It never touches row contents.

use rustc_hash::FxHashSet;

use model::{log_warn, Record, Result, Row, RowKind, TableError};

pub const DEFAULT_CHILD_KEY: &str = "children";

// ============================================================================
// NESTED INPUT
// ============================================================================

/// A parent row with its child rows, before flattening.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NestedRow {
    pub fields: Row,
    pub children: Vec<Row>,
}

impl NestedRow {
    pub fn new(fields: Row, children: Vec<Row>) -> Self {
        NestedRow { fields, children }
    }

    /// A row without children.
    pub fn leaf(fields: Row) -> Self {
        NestedRow {
            fields,
            children: Vec::new(),
        }
    }

    /// Splits a JSON object into parent fields and the child rows stored under
    /// `child_key`. A missing, null or non-array child field means no children.
    pub fn from_json(value: serde_json::Value, child_key: &str) -> Result<Self> {
        let mut object = match value {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(TableError::InvalidRow(format!(
                    "expected an object, found {}",
                    json_kind(&other)
                )))
            }
        };

        let children = match object.remove(child_key) {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(serde_json::Value::Array(items)) => items
                .into_iter()
                .map(serde_json::from_value::<Row>)
                .collect::<std::result::Result<Vec<_>, _>>()?,
            Some(other) => {
                log_warn!(
                    "HIERARCHY",
                    "child field '{}' is {}, treating row as childless",
                    child_key,
                    json_kind(&other)
                );
                Vec::new()
            }
        };

        let fields: Row = serde_json::from_value(serde_json::Value::Object(object))?;
        Ok(NestedRow { fields, children })
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Flattens nested rows: each parent is followed by its children in order.
/// Children point back at their parent's position in the output.
pub fn flatten(rows: Vec<NestedRow>) -> Vec<Record> {
    let capacity = rows.iter().map(|r| 1 + r.children.len()).sum();
    let mut out = Vec::with_capacity(capacity);

    for row in rows {
        let parent_index = out.len();
        out.push(Record {
            fields: row.fields,
            kind: RowKind::Parent {
                has_children: !row.children.is_empty(),
            },
        });
        for (child_index, child) in row.children.into_iter().enumerate() {
            out.push(Record {
                fields: child,
                kind: RowKind::Child {
                    parent_index,
                    child_index,
                },
            });
        }
    }

    out
}

// ============================================================================
// EXPAND / COLLAPSE
// ============================================================================

/// Expanded-parent bookkeeping over a flattened record list.
#[derive(Debug, Clone, Default)]
pub struct HierarchyExpander {
    expanded: FxHashSet<usize>,
}

impl HierarchyExpander {
    pub fn new() -> Self {
        HierarchyExpander {
            expanded: FxHashSet::default(),
        }
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }

    /// True if `row` is a parent with at least one child.
    pub fn is_collapsible(records: &[Record], row: usize) -> bool {
        records.get(row).is_some_and(Record::has_children)
    }

    pub fn is_expanded(&self, row: usize) -> bool {
        self.expanded.contains(&row)
    }

    /// Expanded parent indices in ascending order.
    pub fn expanded_rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self.expanded.iter().copied().collect();
        rows.sort_unstable();
        rows
    }

    /// Flips the expanded state of a collapsible parent and returns the new
    /// state. Rows that are not collapsible are ignored (`None`).
    pub fn toggle(&mut self, records: &[Record], row: usize) -> Option<bool> {
        if !Self::is_collapsible(records, row) {
            return None;
        }
        if self.expanded.remove(&row) {
            Some(false)
        } else {
            self.expanded.insert(row);
            Some(true)
        }
    }

    /// Returns true if the row changed from collapsed to expanded.
    pub fn expand(&mut self, records: &[Record], row: usize) -> bool {
        Self::is_collapsible(records, row) && self.expanded.insert(row)
    }

    /// Returns true if the row changed from expanded to collapsed.
    pub fn collapse(&mut self, row: usize) -> bool {
        self.expanded.remove(&row)
    }

    /// Store indices of the children directly following `row`.
    /// Scanning stops at the first record that is not a child of `row`.
    pub fn child_indices(records: &[Record], row: usize) -> Vec<usize> {
        if !Self::is_collapsible(records, row) {
            return Vec::new();
        }
        records
            .iter()
            .enumerate()
            .skip(row + 1)
            .take_while(|(_, r)| r.parent_index() == Some(row))
            .map(|(i, _)| i)
            .collect()
    }

    /// A child is visible only while its parent is expanded.
    pub fn is_row_visible(&self, records: &[Record], row: usize) -> bool {
        match records.get(row).and_then(Record::parent_index) {
            Some(parent) => self.is_expanded(parent),
            None => true,
        }
    }

    /// Keeps the rows of `window` that the expansion state shows.
    pub fn visible_rows(&self, records: &[Record], window: &[usize]) -> Vec<usize> {
        window
            .iter()
            .copied()
            .filter(|&i| self.is_row_visible(records, i))
            .collect()
    }

    /// Shifts expanded indices after a row was inserted at `index`.
    pub fn shift_from(&mut self, index: usize) {
        self.expanded = self
            .expanded
            .iter()
            .map(|&i| if i >= index { i + 1 } else { i })
            .collect();
    }
}
