//! FILENAME: model/src/column.rs
//! PURPOSE: Column schema: types, per-column behaviour and the column registry.
//! CONTEXT: A `ColumnDef` describes a column as supplied by the caller. The
//! `ColumnRegistry` resolves each definition into a `Column` with a concrete
//! formatter, search predicate and sort key (type defaults fill any gaps),
//! and tracks which columns are visible and in what order.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};
use crate::format::{default_matches, default_sort_key, format_value};
use crate::value::Value;
use crate::{log_debug, log_info, log_warn};

/// Formats a value for display.
pub type Formatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Returns true when a value matches a search term.
pub type SearchPredicate = Arc<dyn Fn(&Value, &str) -> bool + Send + Sync>;

/// Maps a value to a comparable sort key.
pub type SortKeyFn = Arc<dyn Fn(&Value) -> SortKey + Send + Sync>;

/// Reduces all values of a column to one value.
pub type Aggregator = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

// ============================================================================
// COLUMN TYPES
// ============================================================================

/// Declared data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnType {
    String,
    Numeric,
    Date,
    Boolean,
    Progress,
    Custom,
}

impl Default for ColumnType {
    fn default() -> Self {
        ColumnType::String
    }
}

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Applies the direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// A comparable projection of a value.
///
/// Keys form a total order. Keys of different kinds order by kind:
/// booleans, numbers, NaN, dates, then text.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Bool(bool),
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Bool(_) => 0,
            SortKey::Number(n) if n.is_nan() => 2,
            SortKey::Number(_) => 1,
            SortKey::Date(_) => 3,
            SortKey::Text(_) => 4,
        }
    }

    /// Ascending comparison. Consistent across mixed kinds, so any slice of
    /// keys can be sorted with it.
    pub fn total_cmp(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) if !a.is_nan() && !b.is_nan() => a.total_cmp(b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

// ============================================================================
// COLUMN DEFINITION
// ============================================================================

/// Serializable part of a column definition (what JSON schemas carry).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub key: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    #[serde(default)]
    pub editable: bool,
}

/// A column as supplied by the caller. Unset behaviours fall back to type defaults.
#[derive(Clone)]
pub struct ColumnDef {
    pub key: String,
    pub label: String,
    pub column_type: ColumnType,
    pub editable: bool,
    pub formatter: Option<Formatter>,
    pub search: Option<SearchPredicate>,
    pub sort_key: Option<SortKeyFn>,
    pub aggregators: FxHashMap<String, Aggregator>,
}

impl ColumnDef {
    pub fn new(key: impl Into<String>, label: impl Into<String>, column_type: ColumnType) -> Self {
        ColumnDef {
            key: key.into(),
            label: label.into(),
            column_type,
            editable: false,
            formatter: None,
            search: None,
            sort_key: None,
            aggregators: FxHashMap::default(),
        }
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn with_formatter<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(f));
        self
    }

    pub fn with_search<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &str) -> bool + Send + Sync + 'static,
    {
        self.search = Some(Arc::new(f));
        self
    }

    pub fn with_sort_key<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> SortKey + Send + Sync + 'static,
    {
        self.sort_key = Some(Arc::new(f));
        self
    }

    pub fn with_aggregator<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.aggregators.insert(name.into(), Arc::new(f));
        self
    }
}

impl From<ColumnSpec> for ColumnDef {
    fn from(spec: ColumnSpec) -> Self {
        ColumnDef::new(spec.key, spec.label, spec.column_type).editable(spec.editable)
    }
}

impl fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("column_type", &self.column_type)
            .field("editable", &self.editable)
            .field("custom_formatter", &self.formatter.is_some())
            .field("custom_search", &self.search.is_some())
            .field("custom_sort_key", &self.sort_key.is_some())
            .field("aggregators", &self.aggregators.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// RESOLVED COLUMN
// ============================================================================

/// A registered column with all behaviours resolved.
#[derive(Clone)]
pub struct Column {
    pub key: String,
    pub label: String,
    pub column_type: ColumnType,
    pub editable: bool,
    /// None means the type default (which depends on integer display).
    formatter: Option<Formatter>,
    search: SearchPredicate,
    sort_key: SortKeyFn,
    aggregators: FxHashMap<String, Aggregator>,
}

impl Column {
    fn from_def(def: ColumnDef) -> Self {
        let column_type = def.column_type;
        let search = def.search.unwrap_or_else(|| {
            Arc::new(move |value: &Value, term: &str| default_matches(column_type, value, term))
        });
        let sort_key = def
            .sort_key
            .unwrap_or_else(|| Arc::new(move |value: &Value| default_sort_key(column_type, value)));

        Column {
            key: def.key,
            label: def.label,
            column_type,
            editable: def.editable,
            formatter: def.formatter,
            search,
            sort_key,
            aggregators: def.aggregators,
        }
    }

    pub fn matches(&self, value: &Value, term: &str) -> bool {
        (self.search)(value, term)
    }

    pub fn sort_key(&self, value: &Value) -> SortKey {
        (self.sort_key)(value)
    }

    pub fn aggregator(&self, name: &str) -> Option<&Aggregator> {
        self.aggregators.get(name)
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("column_type", &self.column_type)
            .field("editable", &self.editable)
            .finish()
    }
}

// ============================================================================
// COLUMN REGISTRY
// ============================================================================

/// Owns the column schema and the visible column order.
#[derive(Debug, Clone)]
pub struct ColumnRegistry {
    columns: Vec<Column>,
    index: FxHashMap<String, usize>,
    /// Visible column keys, in display order. Never empty while columns exist.
    visible: Vec<String>,
    integer_display: bool,
}

impl ColumnRegistry {
    pub fn new() -> Self {
        ColumnRegistry {
            columns: Vec::new(),
            index: FxHashMap::default(),
            visible: Vec::new(),
            integer_display: true,
        }
    }

    /// Replaces the whole schema. All columns become visible in definition order.
    /// A later definition with a duplicate key replaces the earlier one.
    pub fn set_columns(&mut self, defs: Vec<ColumnDef>) {
        self.columns.clear();
        self.index.clear();
        self.visible.clear();

        for def in defs {
            if let Some(&existing) = self.index.get(&def.key) {
                log_warn!("COLUMNS", "duplicate column key '{}', keeping last definition", def.key);
                self.columns[existing] = Column::from_def(def);
                continue;
            }
            self.index.insert(def.key.clone(), self.columns.len());
            self.visible.push(def.key.clone());
            self.columns.push(Column::from_def(def));
        }

        log_info!("COLUMNS", "schema set: {} columns", self.columns.len());
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Looks up a column, returning None for unknown keys.
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.index.get(key).map(|&i| &self.columns[i])
    }

    /// Looks up a column, failing with `InvalidColumn` for unknown keys.
    pub fn get(&self, key: &str) -> Result<&Column> {
        self.column(key)
            .ok_or_else(|| TableError::InvalidColumn(key.to_string()))
    }

    /// All columns in definition order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn visible_keys(&self) -> &[String] {
        &self.visible
    }

    /// Visible columns in display order.
    pub fn visible_columns(&self) -> impl Iterator<Item = &Column> {
        self.visible.iter().filter_map(move |key| self.column(key))
    }

    /// Header labels for the visible columns, in display order.
    pub fn header_labels(&self) -> Vec<&str> {
        self.visible_columns().map(|c| c.label.as_str()).collect()
    }

    /// Sets the visible columns and their order.
    pub fn set_visible_columns<S: AsRef<str>>(&mut self, keys: &[S]) -> Result<()> {
        for key in keys {
            if !self.contains(key.as_ref()) {
                return Err(TableError::InvalidColumn(key.as_ref().to_string()));
            }
        }
        if keys.is_empty() {
            return Err(TableError::NoVisibleColumns);
        }

        self.visible = keys.iter().map(|k| k.as_ref().to_string()).collect();
        log_debug!("COLUMNS", "visible columns: {:?}", self.visible);
        Ok(())
    }

    /// Shows or hides a single column. A shown column is placed back at its
    /// schema position relative to the other visible columns.
    /// Returns whether the visible set changed.
    pub fn set_column_visible(&mut self, key: &str, visible: bool) -> Result<bool> {
        if !self.contains(key) {
            return Err(TableError::InvalidColumn(key.to_string()));
        }

        let currently = self.visible.iter().any(|k| k == key);
        match (visible, currently) {
            (true, false) => {
                let keep: Vec<String> = self
                    .columns
                    .iter()
                    .filter(|c| c.key == key || self.visible.contains(&c.key))
                    .map(|c| c.key.clone())
                    .collect();
                self.visible = keep;
                Ok(true)
            }
            (false, true) => {
                if self.visible.len() == 1 {
                    return Err(TableError::NoVisibleColumns);
                }
                self.visible.retain(|k| k != key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.visible.iter().any(|k| k == key)
    }

    // ------------------------------------------------------------------------
    // Per-column setters. Unknown keys are ignored (logged, not an error).
    // ------------------------------------------------------------------------

    pub fn set_formatter<F>(&mut self, key: &str, f: F)
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        if let Some(column) = self.column_mut("set_formatter", key) {
            column.formatter = Some(Arc::new(f));
        }
    }

    pub fn set_search_predicate<F>(&mut self, key: &str, f: F)
    where
        F: Fn(&Value, &str) -> bool + Send + Sync + 'static,
    {
        if let Some(column) = self.column_mut("set_search_predicate", key) {
            column.search = Arc::new(f);
        }
    }

    pub fn set_sort_key<F>(&mut self, key: &str, f: F)
    where
        F: Fn(&Value) -> SortKey + Send + Sync + 'static,
    {
        if let Some(column) = self.column_mut("set_sort_key", key) {
            column.sort_key = Arc::new(f);
        }
    }

    pub fn set_aggregator<F>(&mut self, key: &str, name: impl Into<String>, f: F)
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        if let Some(column) = self.column_mut("set_aggregator", key) {
            column.aggregators.insert(name.into(), Arc::new(f));
        }
    }

    pub fn set_editable(&mut self, key: &str, editable: bool) {
        if let Some(column) = self.column_mut("set_editable", key) {
            column.editable = editable;
        }
    }

    /// Drops a custom formatter so the type default applies again.
    pub fn reset_formatter(&mut self, key: &str) {
        if let Some(column) = self.column_mut("reset_formatter", key) {
            column.formatter = None;
        }
    }

    fn column_mut(&mut self, op: &str, key: &str) -> Option<&mut Column> {
        match self.index.get(key) {
            Some(&i) => Some(&mut self.columns[i]),
            None => {
                log_warn!("COLUMNS", "{} ignored: unknown column '{}'", op, key);
                None
            }
        }
    }

    // ------------------------------------------------------------------------
    // Display
    // ------------------------------------------------------------------------

    pub fn integer_display(&self) -> bool {
        self.integer_display
    }

    /// Whole numbers without decimals (true) or always two decimals (false).
    /// Affects NUMERIC columns that use the default formatter.
    pub fn set_integer_display(&mut self, enabled: bool) {
        self.integer_display = enabled;
    }

    /// Formats a value with the column's formatter.
    pub fn format(&self, column: &Column, value: &Value) -> String {
        match &column.formatter {
            Some(f) => f(value),
            None => format_value(column.column_type, value, self.integer_display),
        }
    }
}

impl Default for ColumnRegistry {
    fn default() -> Self {
        Self::new()
    }
}
