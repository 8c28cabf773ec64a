//! FILENAME: table-engine/src/lib.rs
//! Tabular data engine built on the `model` crate.
//!
//! The engines are pure functions over explicit data; `DataTable` composes
//! them into a stateful facade for a presentation layer.
//!
//! Layers:
//! - `state`: Search, type filter and page settings (what the user asked for)
//! - `filter`: Row predicates producing a filtered index list
//! - `sort`: Stable multi-level ordering of that list
//! - `paginate`: Page arithmetic over the filtered count
//! - `hierarchy`: Parent/child flattening and expand/collapse
//! - `aggregate`: Column reductions over the store or the filtered set
//! - `table`: The facade that keeps all of the above consistent

pub mod aggregate;
pub mod config;
pub mod filter;
pub mod hierarchy;
pub mod paginate;
pub mod sort;
pub mod state;
pub mod table;

pub use aggregate::{percentage_of, AggregationType};
pub use config::TableConfig;
pub use hierarchy::{flatten, HierarchyExpander, NestedRow};
pub use sort::{SortSpec, SortSpecs};
pub use state::FilterState;
pub use table::DataTable;

pub use model::{
    row, ColumnDef, ColumnRegistry, ColumnSpec, ColumnType, FilterSummary, Record, Row, RowKind,
    SortDirection, SortKey, TableError, TableEvent, Value,
};
