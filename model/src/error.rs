//! FILENAME: model/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Row index {index} out of range (row count {len})")]
    RowOutOfRange { index: usize, len: usize },

    #[error("Page {page} out of range (total pages {total})")]
    PageOutOfRange { page: usize, total: usize },

    #[error("Unknown column: {0}")]
    InvalidColumn(String),

    #[error("Column is not editable: {0}")]
    NotEditable(String),

    #[error("At least one column must stay visible")]
    NoVisibleColumns,

    #[error("Items per page must be greater than zero (got {0})")]
    InvalidPageSize(usize),

    #[error("Invalid row data: {0}")]
    InvalidRow(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TableError>;
