//! FILENAME: model/src/store.rs
//! PURPOSE: The canonical ordered row store.
//! CONTEXT: `RowStore` owns every record and the row selection. It is the only
//! place row contents are mutated. Each mutation returns the `TableEvent` that
//! describes it; callers forward that to their presentation layer.

use rustc_hash::FxHashSet;

use crate::column::ColumnRegistry;
use crate::error::{Result, TableError};
use crate::events::TableEvent;
use crate::row::{Record, Row, RowKind};
use crate::value::Value;
use crate::{log_debug, log_info};

#[derive(Debug, Clone, Default)]
pub struct RowStore {
    records: Vec<Record>,
    selected: FxHashSet<usize>,
}

impl RowStore {
    pub fn new() -> Self {
        RowStore {
            records: Vec::new(),
            selected: FxHashSet::default(),
        }
    }

    // ========================================================================
    // BULK REPLACEMENT
    // ========================================================================

    /// Replaces all rows with plain records and clears the selection.
    pub fn set_data(&mut self, rows: Vec<Row>) -> TableEvent {
        self.set_records(rows.into_iter().map(Record::plain).collect())
    }

    /// Replaces all records (e.g. a flattened hierarchy) and clears the selection.
    pub fn set_records(&mut self, records: Vec<Record>) -> TableEvent {
        self.records = records;
        self.selected.clear();
        log_info!("STORE", "data set: {} rows", self.records.len());
        TableEvent::RowStoreReset {
            row_count: self.records.len(),
        }
    }

    pub fn clear(&mut self) -> TableEvent {
        self.set_records(Vec::new())
    }

    // ========================================================================
    // INCREMENTAL MUTATION
    // ========================================================================

    /// Inserts a plain row at `index` (0..=len), shifting later rows down.
    /// Child back-references and selected indices are shifted to match.
    pub fn insert_at(&mut self, index: usize, row: Row) -> Result<TableEvent> {
        let len = self.records.len();
        if index > len {
            return Err(TableError::RowOutOfRange { index, len });
        }

        for record in &mut self.records {
            if let RowKind::Child { parent_index, .. } = &mut record.kind {
                if *parent_index >= index {
                    *parent_index += 1;
                }
            }
        }
        self.selected = self
            .selected
            .iter()
            .map(|&i| if i >= index { i + 1 } else { i })
            .collect();

        self.records.insert(index, Record::plain(row));
        log_debug!("STORE", "row inserted at {} (now {} rows)", index, self.records.len());

        Ok(TableEvent::RowsInserted {
            first: index,
            last: index,
        })
    }

    /// Appends a plain row at the end.
    pub fn append_row(&mut self, row: Row) -> TableEvent {
        let index = self.records.len();
        self.records.push(Record::plain(row));
        TableEvent::RowsInserted {
            first: index,
            last: index,
        }
    }

    /// Writes a single cell. The column must exist in `columns` and be editable.
    pub fn set_cell(
        &mut self,
        index: usize,
        key: &str,
        value: Value,
        columns: &ColumnRegistry,
    ) -> Result<TableEvent> {
        let column = columns.get(key)?;
        if !column.editable {
            return Err(TableError::NotEditable(key.to_string()));
        }

        let len = self.records.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or(TableError::RowOutOfRange { index, len })?;
        record.fields.insert(key.to_string(), value);

        Ok(TableEvent::CellChanged {
            row: index,
            key: key.to_string(),
        })
    }

    // ========================================================================
    // READS
    // ========================================================================

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get_row(&self, index: usize) -> Result<&Row> {
        self.get_record(index).map(|r| &r.fields)
    }

    pub fn get_record(&self, index: usize) -> Result<&Record> {
        self.records.get(index).ok_or(TableError::RowOutOfRange {
            index,
            len: self.records.len(),
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Copies of all rows, without hierarchy bookkeeping.
    pub fn all_rows(&self) -> Vec<Row> {
        self.records.iter().map(|r| r.fields.clone()).collect()
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    pub fn select(&mut self, index: usize, selected: bool) -> Result<()> {
        if index >= self.records.len() {
            return Err(TableError::RowOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        if selected {
            self.selected.insert(index);
        } else {
            self.selected.remove(&index);
        }
        Ok(())
    }

    /// Flips the selection of every index given. Out-of-range indices are skipped.
    pub fn toggle_selection(&mut self, indices: &[usize]) {
        for &i in indices {
            if i >= self.records.len() {
                continue;
            }
            if !self.selected.remove(&i) {
                self.selected.insert(i);
            }
        }
    }

    pub fn select_many(&mut self, indices: &[usize]) {
        let len = self.records.len();
        self.selected.extend(indices.iter().copied().filter(|&i| i < len));
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Selected indices in ascending order.
    pub fn selected_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.selected.iter().copied().collect();
        indices.sort_unstable();
        indices
    }
}
