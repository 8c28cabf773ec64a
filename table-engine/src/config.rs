//! FILENAME: table-engine/src/config.rs
//! PURPOSE: Table settings that a host can load from JSON.
//! CONTEXT: Every field has a default, so a partial document (or `{}`) is valid.

use serde::{Deserialize, Serialize};

use model::Result;

use crate::hierarchy::DEFAULT_CHILD_KEY;
use crate::state::DEFAULT_ITEMS_PER_PAGE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableConfig {
    /// Rows per page when the table is created.
    pub items_per_page: usize,
    /// Allowed rows-per-page values. Empty means any positive size.
    pub page_size_options: Vec<usize>,
    /// Treat loaded JSON rows as parents with nested children.
    pub row_collapsing: bool,
    /// Field holding a parent's child rows.
    pub child_row_key: String,
    /// Whole numbers without decimals in NUMERIC columns.
    pub integer_display: bool,
    /// Pages shown either side of the current page in the page-number window.
    pub page_button_radius: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            page_size_options: vec![10, 25, 50, 100],
            row_collapsing: false,
            child_row_key: DEFAULT_CHILD_KEY.to_string(),
            integer_display: true,
            page_button_radius: 3,
        }
    }
}

impl TableConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Maps a requested page size onto the allowed options.
    /// A size outside a non-empty option list falls back to `items_per_page`.
    pub fn resolve_page_size(&self, requested: usize) -> usize {
        if self.page_size_options.is_empty() || self.page_size_options.contains(&requested) {
            requested
        } else {
            self.items_per_page
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TableConfig::default();
        assert_eq!(config.items_per_page, 25);
        assert_eq!(config.page_size_options, vec![10, 25, 50, 100]);
        assert_eq!(config.child_row_key, "children");
        assert!(config.integer_display);
        assert!(!config.row_collapsing);
    }

    #[test]
    fn test_partial_json() {
        let config = TableConfig::from_json(r#"{ "itemsPerPage": 10, "rowCollapsing": true }"#).unwrap();
        assert_eq!(config.items_per_page, 10);
        assert!(config.row_collapsing);
        assert_eq!(config.page_button_radius, 3);

        assert_eq!(TableConfig::from_json("{}").unwrap(), TableConfig::default());
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(TableConfig::from_json("{ itemsPerPage"), Err(model::TableError::Json(_))));
    }

    #[test]
    fn test_resolve_page_size() {
        let mut config = TableConfig::default();
        assert_eq!(config.resolve_page_size(50), 50);
        assert_eq!(config.resolve_page_size(7), 25);
        config.page_size_options.clear();
        assert_eq!(config.resolve_page_size(7), 7);
    }
}
