//! FILENAME: table-engine/src/table.rs
//! PURPOSE: `DataTable`, the facade a presentation layer drives.
//! CONTEXT: Owns the schema, the row store, the filter state, the sort stack
//! and the expansion state. Every mutation recomputes the filtered and sorted
//! view eagerly and queues `TableEvent`s for the host to drain.

use model::{
    log_debug, log_info, log_warn, ColumnDef, ColumnRegistry, ColumnSpec, ColumnType,
    EventQueue, FilterSummary, Record, Result, Row, RowStore, SortDirection, SortKey,
    TableError, TableEvent, Value,
};

use crate::aggregate;
use crate::config::TableConfig;
use crate::filter;
use crate::hierarchy::{self, HierarchyExpander, NestedRow};
use crate::paginate;
use crate::sort::{self, SortSpec, SortSpecs};
use crate::state::FilterState;

#[derive(Debug)]
pub struct DataTable {
    config: TableConfig,
    columns: ColumnRegistry,
    store: RowStore,
    expander: HierarchyExpander,
    state: FilterState,
    sort: SortSpecs,
    /// Filtered, sorted store indices across all pages.
    view: Vec<usize>,
    events: EventQueue,
}

impl Default for DataTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DataTable {
    pub fn new() -> Self {
        DataTable {
            config: TableConfig::default(),
            columns: ColumnRegistry::new(),
            store: RowStore::new(),
            expander: HierarchyExpander::new(),
            state: FilterState::default(),
            sort: SortSpecs::new(),
            view: Vec::new(),
            events: EventQueue::new(),
        }
    }

    pub fn with_config(config: TableConfig) -> Result<Self> {
        let state = FilterState::new(config.items_per_page)?;
        let mut columns = ColumnRegistry::new();
        columns.set_integer_display(config.integer_display);
        Ok(DataTable {
            config,
            columns,
            state,
            ..Self::new()
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn columns(&self) -> &ColumnRegistry {
        &self.columns
    }

    pub fn store(&self) -> &RowStore {
        &self.store
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.state
    }

    /// Takes all queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<TableEvent> {
        self.events.drain()
    }

    // ========================================================================
    // SCHEMA
    // ========================================================================

    /// Replaces the schema. Row data, sort and expansion state are cleared.
    pub fn set_columns(&mut self, defs: Vec<ColumnDef>) {
        self.columns.set_columns(defs);
        self.sort.clear();
        self.expander.clear();
        let reset = self.store.clear();
        self.events.push(reset);
        self.push_columns_changed();
        self.refresh();
    }

    /// Parses `[{"key": .., "label": .., "type": ..}, ..]` and applies it.
    pub fn load_columns_json(&mut self, json: &str) -> Result<()> {
        let specs: Vec<ColumnSpec> = serde_json::from_str(json)?;
        self.set_columns(specs.into_iter().map(ColumnDef::from).collect());
        Ok(())
    }

    pub fn set_visible_columns<S: AsRef<str>>(&mut self, keys: &[S]) -> Result<()> {
        self.columns.set_visible_columns(keys)?;
        self.push_columns_changed();
        self.refresh();
        Ok(())
    }

    /// Shows or hides one column. Hiding the last visible column fails.
    pub fn set_column_visible(&mut self, key: &str, visible: bool) -> Result<()> {
        if self.columns.set_column_visible(key, visible)? {
            self.push_columns_changed();
            self.refresh();
        }
        Ok(())
    }

    pub fn header_labels(&self) -> Vec<&str> {
        self.columns.header_labels()
    }

    pub fn set_formatter<F>(&mut self, key: &str, f: F)
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.columns.set_formatter(key, f);
    }

    /// Restores the column type's default display for `key`.
    pub fn reset_formatter(&mut self, key: &str) {
        self.columns.reset_formatter(key);
    }

    pub fn set_search_predicate<F>(&mut self, key: &str, f: F)
    where
        F: Fn(&Value, &str) -> bool + Send + Sync + 'static,
    {
        self.columns.set_search_predicate(key, f);
        self.refresh();
    }

    pub fn set_sort_key<F>(&mut self, key: &str, f: F)
    where
        F: Fn(&Value) -> SortKey + Send + Sync + 'static,
    {
        self.columns.set_sort_key(key, f);
        self.refresh();
    }

    pub fn set_aggregator<F>(&mut self, key: &str, name: impl Into<String>, f: F)
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.columns.set_aggregator(key, name, f);
    }

    pub fn set_editable(&mut self, key: &str, editable: bool) {
        self.columns.set_editable(key, editable);
    }

    pub fn set_integer_display(&mut self, enabled: bool) {
        self.config.integer_display = enabled;
        self.columns.set_integer_display(enabled);
    }

    // ========================================================================
    // DATA
    // ========================================================================

    /// Replaces all rows. Expansion and selection are cleared.
    pub fn set_data(&mut self, rows: Vec<Row>) {
        let event = self.store.set_data(rows);
        self.after_reset(event);
    }

    /// Replaces all rows with a flattened parent/child hierarchy.
    pub fn set_nested_data(&mut self, rows: Vec<NestedRow>) {
        let event = self.store.set_records(hierarchy::flatten(rows));
        self.after_reset(event);
    }

    /// Loads a JSON array of row objects. With row collapsing enabled each
    /// object may carry child rows under the configured child key.
    pub fn load_json(&mut self, json: &str) -> Result<()> {
        let items = match serde_json::from_str::<serde_json::Value>(json)? {
            serde_json::Value::Array(items) => items,
            _ => return Err(TableError::InvalidRow("expected an array of rows".to_string())),
        };

        if self.config.row_collapsing {
            let nested = items
                .into_iter()
                .map(|item| NestedRow::from_json(item, &self.config.child_row_key))
                .collect::<Result<Vec<_>>>()?;
            self.set_nested_data(nested);
        } else {
            let rows: Vec<Row> = items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<std::result::Result<_, _>>()?;
            self.set_data(rows);
        }
        Ok(())
    }

    fn after_reset(&mut self, event: TableEvent) {
        self.expander.clear();
        self.events.push(event);
        self.refresh();
    }

    pub fn insert_at(&mut self, index: usize, row: Row) -> Result<()> {
        let event = self.store.insert_at(index, row)?;
        self.expander.shift_from(index);
        self.events.push(event);
        self.refresh();
        Ok(())
    }

    pub fn append_row(&mut self, row: Row) {
        let event = self.store.append_row(row);
        self.events.push(event);
        self.refresh();
    }

    pub fn set_cell(&mut self, index: usize, key: &str, value: Value) -> Result<()> {
        let event = self.store.set_cell(index, key, value, &self.columns)?;
        self.events.push(event);
        self.refresh();
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.store.len()
    }

    pub fn get_row(&self, index: usize) -> Result<&Row> {
        self.store.get_row(index)
    }

    pub fn get_record(&self, index: usize) -> Result<&Record> {
        self.store.get_record(index)
    }

    pub fn all_rows(&self) -> Vec<Row> {
        self.store.all_rows()
    }

    // ========================================================================
    // FILTERING
    // ========================================================================

    /// Sets the search text and returns to page 1.
    pub fn set_search_text(&mut self, text: &str) {
        if self.state.set_search_text(text) {
            self.refresh();
            log_info!(
                "FILTER",
                "search='{}' matched={}",
                text,
                self.state.filtered_count().unwrap_or(0)
            );
        }
    }

    /// Sets (or clears) the type filter and returns to page 1.
    pub fn set_type_filter(&mut self, filter: Option<ColumnType>) {
        if self.state.set_type_filter(filter) {
            self.refresh();
        }
    }

    pub fn reset_filters(&mut self) {
        self.state.reset();
        self.refresh();
    }

    /// Number of rows passing the filter, across all pages.
    pub fn filtered_count(&self) -> usize {
        self.view.len()
    }

    /// Filtered, sorted store indices across all pages.
    pub fn filtered_rows(&self) -> &[usize] {
        &self.view
    }

    /// Rows whose `key` column matches `term`, ignoring the table filter.
    pub fn search_column(&self, key: &str, term: &str) -> Vec<usize> {
        filter::search_column(self.store.records(), key, term, &self.columns)
    }

    // ========================================================================
    // PAGINATION
    // ========================================================================

    pub fn current_page(&self) -> usize {
        self.state.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.state.total_pages()
    }

    pub fn items_per_page(&self) -> usize {
        self.state.items_per_page()
    }

    /// Moves to `page`, clamped into the valid range. Returns the page shown.
    pub fn set_page(&mut self, page: usize) -> usize {
        let before = self.state.current_page();
        let page = self.state.set_page(page);
        if page != before {
            self.push_filter_state();
        }
        page
    }

    pub fn next_page(&mut self) -> usize {
        self.set_page(self.current_page() + 1)
    }

    pub fn prev_page(&mut self) -> usize {
        self.set_page(self.current_page().saturating_sub(1))
    }

    pub fn first_page(&mut self) -> usize {
        self.set_page(1)
    }

    pub fn last_page(&mut self) -> usize {
        self.set_page(self.total_pages())
    }

    /// Changes the page size and returns to page 1. Sizes outside the
    /// configured options fall back to the configured default.
    pub fn set_items_per_page(&mut self, items_per_page: usize) -> Result<usize> {
        if items_per_page == 0 {
            return Err(TableError::InvalidPageSize(0));
        }
        let size = self.config.resolve_page_size(items_per_page);
        if size != items_per_page {
            log_warn!(
                "PAGINATION",
                "page size {} not in {:?}, using {}",
                items_per_page,
                self.config.page_size_options,
                size
            );
        }
        self.state.set_items_per_page(size)?;
        self.state.set_page(1);
        self.push_filter_state();
        Ok(size)
    }

    /// Page-number buttons around the current page.
    pub fn page_window(&self) -> Vec<usize> {
        paginate::page_window(
            self.current_page(),
            self.total_pages(),
            self.config.page_button_radius,
        )
    }

    pub fn summary(&self) -> FilterSummary {
        self.state.summary()
    }

    /// Store indices shown on the current page, after hiding the children of
    /// collapsed parents.
    pub fn visible_rows(&self) -> Vec<usize> {
        let (start, end) = self.state.page_range();
        self.expander
            .visible_rows(self.store.records(), &self.view[start..end])
    }

    /// Store indices shown on an explicit page.
    pub fn page_rows(&self, page: usize) -> Result<Vec<usize>> {
        let total = self.total_pages();
        if page == 0 || page > total {
            return Err(TableError::PageOutOfRange { page, total });
        }
        let (start, end) = paginate::page_range(page, self.items_per_page(), self.view.len());
        Ok(self
            .expander
            .visible_rows(self.store.records(), &self.view[start..end]))
    }

    // ========================================================================
    // SORTING
    // ========================================================================

    /// Sorts by a single column, replacing any previous sort.
    pub fn sort_by(&mut self, key: &str, direction: SortDirection) -> Result<()> {
        self.columns.get(key)?;
        self.sort.clear();
        self.sort.push(SortSpec::new(key, direction));
        self.after_sort_change(key, direction);
        Ok(())
    }

    /// Adds a less significant sort level. An existing level on the same
    /// column is replaced.
    pub fn then_by(&mut self, key: &str, direction: SortDirection) -> Result<()> {
        self.columns.get(key)?;
        self.sort.retain(|s| s.key != key);
        self.sort.push(SortSpec::new(key, direction));
        self.after_sort_change(key, direction);
        Ok(())
    }

    /// Restores store order.
    pub fn clear_sort(&mut self) {
        if self.sort.is_empty() {
            return;
        }
        self.sort.clear();
        self.events.push(TableEvent::SortCleared);
        self.refresh();
    }

    pub fn sort_specs(&self) -> &[SortSpec] {
        &self.sort
    }

    fn after_sort_change(&mut self, key: &str, direction: SortDirection) {
        log_info!("SORT", "sort by '{}' {:?} ({} levels)", key, direction, self.sort.len());
        self.events.push(TableEvent::SortChanged {
            key: key.to_string(),
            direction,
        });
        self.refresh();
    }

    // ========================================================================
    // HIERARCHY
    // ========================================================================

    /// Flips a parent's expanded state. Rows without children are ignored.
    pub fn toggle_expanded(&mut self, row: usize) -> Option<bool> {
        let expanded = self.expander.toggle(self.store.records(), row)?;
        self.events.push(TableEvent::ExpansionChanged { row, expanded });
        Some(expanded)
    }

    pub fn expand(&mut self, row: usize) -> bool {
        let changed = self.expander.expand(self.store.records(), row);
        if changed {
            self.events.push(TableEvent::ExpansionChanged { row, expanded: true });
        }
        changed
    }

    pub fn collapse(&mut self, row: usize) -> bool {
        let changed = self.expander.collapse(row);
        if changed {
            self.events.push(TableEvent::ExpansionChanged { row, expanded: false });
        }
        changed
    }

    pub fn is_collapsible(&self, row: usize) -> bool {
        HierarchyExpander::is_collapsible(self.store.records(), row)
    }

    pub fn is_expanded(&self, row: usize) -> bool {
        self.expander.is_expanded(row)
    }

    pub fn child_indices(&self, row: usize) -> Vec<usize> {
        HierarchyExpander::child_indices(self.store.records(), row)
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    pub fn select(&mut self, row: usize, selected: bool) -> Result<()> {
        self.store.select(row, selected)?;
        self.push_selection();
        Ok(())
    }

    /// Selects every row on the current page.
    pub fn select_all(&mut self) {
        let rows = self.visible_rows();
        self.store.select_many(&rows);
        self.push_selection();
    }

    pub fn select_none(&mut self) {
        self.store.clear_selection();
        self.push_selection();
    }

    /// Inverts the selection of the rows on the current page.
    pub fn select_inverse(&mut self) {
        let rows = self.visible_rows();
        self.store.toggle_selection(&rows);
        self.push_selection();
    }

    pub fn is_selected(&self, row: usize) -> bool {
        self.store.is_selected(row)
    }

    /// Selected store indices in ascending order.
    pub fn selected_rows(&self) -> Vec<usize> {
        self.store.selected_indices()
    }

    // ========================================================================
    // AGGREGATION
    // ========================================================================

    /// Aggregates a column over every stored row.
    pub fn aggregate(&self, key: &str, agg: &str) -> Result<Value> {
        aggregate::aggregate(self.store.records(), key, agg, &self.columns)
    }

    /// Aggregates a column over the rows passing the current filter.
    pub fn aggregate_filtered(&self, key: &str, agg: &str) -> Result<Value> {
        aggregate::aggregate_indices(self.store.records(), &self.view, key, agg, &self.columns)
    }

    pub fn percentage_of(&self, row: usize, key: &str) -> Result<f64> {
        aggregate::percentage_of(self.store.records(), row, key, &self.columns)
    }

    // ========================================================================
    // DISPLAY
    // ========================================================================

    /// Formatted text of one cell.
    pub fn format_cell(&self, row: usize, key: &str) -> Result<String> {
        let column = self.columns.get(key)?;
        let record = self.store.get_record(row)?;
        Ok(self.columns.format(column, record.get(key)))
    }

    /// Formatted cells of the visible columns, in display order.
    pub fn display_row(&self, row: usize) -> Result<Vec<String>> {
        let record = self.store.get_record(row)?;
        Ok(self
            .columns
            .visible_columns()
            .map(|c| self.columns.format(c, record.get(&c.key)))
            .collect())
    }

    // ========================================================================
    // VIEW RECOMPUTATION
    // ========================================================================

    /// Recomputes the filtered and sorted view and re-clamps the page.
    fn refresh(&mut self) {
        let records = self.store.records();
        let filtered = filter::filtered_indices(records, &self.state, &self.columns);

        self.view = match sort::sort_indices(records, &filtered, &self.sort, &self.columns) {
            Ok(sorted) => sorted,
            Err(e) => {
                log_warn!("SORT", "dropping sort: {}", e);
                self.sort.clear();
                filtered
            }
        };

        self.state.set_filtered_count(self.view.len());
        log_debug!(
            "FILTER",
            "refresh: {} of {} rows, page {}/{}",
            self.view.len(),
            self.store.len(),
            self.state.current_page(),
            self.state.total_pages()
        );
        self.push_filter_state();
    }

    fn push_filter_state(&mut self) {
        self.events.push(TableEvent::FilterStateChanged(self.state.summary()));
    }

    fn push_columns_changed(&mut self) {
        self.events.push(TableEvent::ColumnsChanged {
            visible: self.columns.visible_keys().to_vec(),
        });
    }

    fn push_selection(&mut self) {
        self.events.push(TableEvent::SelectionChanged {
            selected: self.store.selected_indices().len(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::row;

    fn table() -> DataTable {
        let mut t = DataTable::with_config(TableConfig {
            items_per_page: 10,
            ..TableConfig::default()
        })
        .unwrap();
        t.set_columns(vec![
            ColumnDef::new("name", "Name", ColumnType::String).editable(true),
            ColumnDef::new("office", "Office", ColumnType::String),
            ColumnDef::new("salary", "Salary", ColumnType::Numeric),
        ]);
        let rows = (0..23)
            .map(|i| {
                row! {
                    "name" => format!("Employee {:02}", i),
                    "office" => if i % 2 == 0 { "London" } else { "Tokyo" },
                    "salary" => 1000 * (i + 1),
                }
            })
            .collect();
        t.set_data(rows);
        t.drain_events();
        t
    }

    #[test]
    fn test_pages_after_load() {
        let t = table();
        assert_eq!(t.total_pages(), 3);
        assert_eq!(t.visible_rows(), (0..10).collect::<Vec<_>>());
        assert_eq!(t.page_rows(3).unwrap(), vec![20, 21, 22]);
        assert!(matches!(t.page_rows(4), Err(TableError::PageOutOfRange { page: 4, total: 3 })));
        assert!(matches!(t.page_rows(0), Err(TableError::PageOutOfRange { .. })));
    }

    #[test]
    fn test_navigation_clamps() {
        let mut t = table();
        assert_eq!(t.prev_page(), 1);
        assert_eq!(t.next_page(), 2);
        assert_eq!(t.last_page(), 3);
        assert_eq!(t.next_page(), 3);
        assert_eq!(t.set_page(99), 3);
        assert_eq!(t.first_page(), 1);
    }

    #[test]
    fn test_search_resets_page() {
        let mut t = table();
        t.set_page(3);
        t.set_search_text("tokyo");
        assert_eq!(t.current_page(), 1);
        assert_eq!(t.filtered_count(), 11);
        assert_eq!(t.total_pages(), 2);
        let events = t.drain_events();
        assert!(matches!(events.last(), Some(TableEvent::FilterStateChanged(s)) if s.filtered_count == 11));
    }

    #[test]
    fn test_page_size_falls_back_to_default() {
        let mut t = table();
        assert_eq!(t.set_items_per_page(7).unwrap(), 10);
        assert_eq!(t.set_items_per_page(25).unwrap(), 25);
        assert_eq!(t.total_pages(), 1);
        assert!(matches!(t.set_items_per_page(0), Err(TableError::InvalidPageSize(0))));
    }

    #[test]
    fn test_sort_then_clear() {
        let mut t = table();
        t.sort_by("salary", SortDirection::Descending).unwrap();
        assert_eq!(t.visible_rows()[0], 22);
        t.then_by("office", SortDirection::Ascending).unwrap();
        assert_eq!(t.sort_specs().len(), 2);
        t.clear_sort();
        assert_eq!(t.visible_rows()[0], 0);
        assert!(matches!(t.sort_by("bonus", SortDirection::Ascending), Err(TableError::InvalidColumn(_))));

        let events = t.drain_events();
        assert!(events.contains(&TableEvent::SortCleared));
        assert!(events.contains(&TableEvent::SortChanged {
            key: "salary".to_string(),
            direction: SortDirection::Descending
        }));
    }

    #[test]
    fn test_set_cell_refreshes_view() {
        let mut t = table();
        t.set_search_text("renamed");
        assert_eq!(t.filtered_count(), 0);
        t.set_cell(4, "name", Value::from("Renamed")).unwrap();
        assert_eq!(t.filtered_count(), 1);
        assert!(matches!(t.set_cell(4, "salary", Value::Null), Err(TableError::NotEditable(_))));
    }

    #[test]
    fn test_selection_over_page() {
        let mut t = table();
        t.next_page();
        t.select_all();
        assert_eq!(t.selected_rows(), (10..20).collect::<Vec<_>>());
        t.select(10, false).unwrap();
        t.select_inverse();
        assert_eq!(t.selected_rows(), vec![10]);
        t.select_none();
        assert!(t.selected_rows().is_empty());
        assert!(t.select(99, true).is_err());
    }

    #[test]
    fn test_column_visibility_affects_search() {
        let mut t = table();
        t.set_search_text("london");
        assert_eq!(t.filtered_count(), 12);
        t.set_column_visible("office", false).unwrap();
        assert_eq!(t.filtered_count(), 0);
        assert_eq!(t.header_labels(), vec!["Name", "Salary"]);
        t.set_column_visible("office", true).unwrap();
        assert_eq!(t.header_labels(), vec!["Name", "Office", "Salary"]);
        assert_eq!(t.filtered_count(), 12);
    }

    #[test]
    fn test_display_row_and_integer_display() {
        let mut t = table();
        assert_eq!(t.display_row(1).unwrap(), vec!["Employee 01", "Tokyo", "2000"]);
        t.set_integer_display(false);
        assert_eq!(t.format_cell(1, "salary").unwrap(), "2,000.00");
        assert!(matches!(t.format_cell(1, "bonus"), Err(TableError::InvalidColumn(_))));
    }

    #[test]
    fn test_set_columns_clears_rows() {
        let mut t = table();
        t.set_columns(vec![ColumnDef::new("id", "ID", ColumnType::Numeric)]);
        assert_eq!(t.row_count(), 0);
        assert_eq!(t.total_pages(), 1);
        let events = t.drain_events();
        assert_eq!(events[0], TableEvent::RowStoreReset { row_count: 0 });
    }

    #[test]
    fn test_load_json_flat_and_nested() {
        let mut t = DataTable::new();
        t.load_columns_json(r#"[{"key": "name", "label": "Name"}, {"key": "n", "label": "N", "type": "numeric"}]"#)
            .unwrap();
        t.load_json(r#"[{"name": "a", "n": 1}, {"name": "b", "n": 2}]"#).unwrap();
        assert_eq!(t.row_count(), 2);

        let mut t = DataTable::with_config(TableConfig {
            row_collapsing: true,
            ..TableConfig::default()
        })
        .unwrap();
        t.load_columns_json(r#"[{"key": "name", "label": "Name"}]"#).unwrap();
        t.load_json(r#"[{"name": "a", "children": [{"name": "a1"}, {"name": "a2"}]}, {"name": "b"}]"#)
            .unwrap();
        assert_eq!(t.row_count(), 4);
        assert!(t.is_collapsible(0));
        assert_eq!(t.visible_rows(), vec![0, 3]);
        assert_eq!(t.toggle_expanded(0), Some(true));
        assert_eq!(t.visible_rows(), vec![0, 1, 2, 3]);

        assert!(matches!(t.load_json(r#"{"name": "a"}"#), Err(TableError::InvalidRow(_))));
        assert!(matches!(t.load_json("[1, 2]"), Err(TableError::InvalidRow(_))));
    }

    #[test]
    fn test_aggregate_filtered() {
        let mut t = table();
        t.set_search_text("london");
        // Even rows: salaries 1000, 3000, .. 23000
        let expected: f64 = (0..23).filter(|i| i % 2 == 0).map(|i| 1000.0 * (i + 1) as f64).sum();
        assert_eq!(t.aggregate_filtered("salary", "sum").unwrap(), Value::Number(expected));
        assert_eq!(t.aggregate("salary", "count").unwrap(), Value::Number(23.0));
    }
}
