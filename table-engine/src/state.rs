//! FILENAME: table-engine/src/state.rs
//! PURPOSE: The single source of truth for search, type filter and pagination.
//! CONTEXT: `FilterState` holds what the user asked for. The filtered-row count
//! it caches is supplied by the caller after each filter pass and is dropped
//! whenever a filter-affecting field changes.

use model::{ColumnType, FilterSummary, Result, TableError};

use crate::paginate;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    search_text: String,
    type_filter: Option<ColumnType>,
    current_page: usize,
    items_per_page: usize,
    filtered_count: Option<usize>,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            search_text: String::new(),
            type_filter: None,
            current_page: 1,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            filtered_count: None,
        }
    }
}

impl FilterState {
    pub fn new(items_per_page: usize) -> Result<Self> {
        if items_per_page == 0 {
            return Err(TableError::InvalidPageSize(0));
        }
        Ok(FilterState {
            items_per_page,
            ..Default::default()
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn type_filter(&self) -> Option<ColumnType> {
        self.type_filter
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// Last recorded filtered count, or `None` if invalidated since.
    pub fn filtered_count(&self) -> Option<usize> {
        self.filtered_count
    }

    pub fn has_active_filter(&self) -> bool {
        !self.search_text.is_empty() || self.type_filter.is_some()
    }

    pub fn total_pages(&self) -> usize {
        paginate::total_pages(self.filtered_count.unwrap_or(0), self.items_per_page)
    }

    /// Half-open range of filtered positions on the current page.
    pub fn page_range(&self) -> (usize, usize) {
        paginate::page_range(
            self.current_page,
            self.items_per_page,
            self.filtered_count.unwrap_or(0),
        )
    }

    pub fn summary(&self) -> FilterSummary {
        FilterSummary {
            total_pages: self.total_pages(),
            current_page: self.current_page,
            filtered_count: self.filtered_count.unwrap_or(0),
            visible_range: self.page_range(),
        }
    }

    // ========================================================================
    // MUTATORS
    // ========================================================================

    /// Returns true if the text changed.
    pub fn set_search_text(&mut self, text: &str) -> bool {
        if self.search_text == text {
            return false;
        }
        self.search_text = text.to_string();
        self.invalidate();
        true
    }

    /// Returns true if the filter changed.
    pub fn set_type_filter(&mut self, filter: Option<ColumnType>) -> bool {
        if self.type_filter == filter {
            return false;
        }
        self.type_filter = filter;
        self.invalidate();
        true
    }

    /// Stores `page` clamped to `[1, total_pages]`. Returns the stored page.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.current_page = paginate::clamp_page(page, self.total_pages());
        self.current_page
    }

    /// Changes the page size and re-clamps the current page.
    pub fn set_items_per_page(&mut self, items_per_page: usize) -> Result<()> {
        if items_per_page == 0 {
            return Err(TableError::InvalidPageSize(0));
        }
        self.items_per_page = items_per_page;
        self.set_page(self.current_page);
        Ok(())
    }

    /// Records the result of a filter pass and re-clamps the current page.
    pub fn set_filtered_count(&mut self, count: usize) {
        self.filtered_count = Some(count);
        self.set_page(self.current_page);
    }

    /// Drops the cached filtered count and returns to page 1, so the page
    /// never points past a count that is no longer known.
    pub fn invalidate(&mut self) {
        self.filtered_count = None;
        self.current_page = 1;
    }

    /// Clears search and type filter and returns to page 1.
    pub fn reset(&mut self) {
        self.search_text.clear();
        self.type_filter = None;
        self.invalidate();
    }
}
