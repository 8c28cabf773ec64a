//! FILENAME: model/src/lib.rs
//! PURPOSE: Shared types and stores for the data table engine.
//! CONTEXT: Values, rows, the column schema and the row store live here.
//! The `table-engine` crate builds filtering, sorting, pagination, hierarchy
//! and aggregation on top of these types.

pub mod column;
pub mod error;
pub mod events;
pub mod format;
pub mod logging;
pub mod row;
pub mod store;
pub mod value;

// Re-export commonly used types at the crate root
pub use column::{
    Aggregator, Column, ColumnDef, ColumnRegistry, ColumnSpec, ColumnType, Formatter,
    SearchPredicate, SortDirection, SortKey, SortKeyFn,
};
pub use error::{Result, TableError};
pub use events::{EventQueue, FilterSummary, TableEvent};
pub use format::{default_matches, default_sort_key, format_decimal, format_value};
pub use row::{Record, Row, RowKind};
pub use store::RowStore;
pub use value::{Value, DATE_FORMAT};
