//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for table-engine integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use table_engine::{
    row, ColumnDef, ColumnType, DataTable, NestedRow, Row, TableConfig, TableEvent, Value,
};

/// Test harness wrapping a `DataTable`.
pub struct TestHarness {
    pub table: DataTable,
}

impl TestHarness {
    /// Create a harness with the employee schema and no rows.
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    pub fn with_config(config: TableConfig) -> Self {
        let mut table = DataTable::with_config(config).expect("valid config");
        table.set_columns(EmployeeFixture::columns());
        table.drain_events();
        TestHarness { table }
    }

    /// Create a harness loaded with the 57 employee records.
    pub fn with_employees(items_per_page: usize) -> Self {
        let mut harness = Self::with_config(TableConfig {
            items_per_page,
            ..TableConfig::default()
        });
        harness.table.set_data(EmployeeFixture::rows());
        harness.table.drain_events();
        harness
    }

    /// Create a harness with department parents and employee children.
    pub fn with_departments() -> Self {
        let mut harness = Self::new();
        harness.table.set_nested_data(DepartmentFixture::rows());
        harness.table.drain_events();
        harness
    }

    /// Create a harness with `rows` generated employees.
    pub fn with_large_data(rows: usize) -> Self {
        let mut harness = Self::new();
        harness
            .table
            .set_data((0..rows).map(EmployeeFixture::generated).collect());
        harness.table.drain_events();
        harness
    }

    /// Names of the rows currently shown, in display order.
    pub fn visible_names(&self) -> Vec<String> {
        self.table
            .visible_rows()
            .into_iter()
            .map(|i| self.name_at(i))
            .collect()
    }

    pub fn name_at(&self, index: usize) -> String {
        self.table
            .get_row(index)
            .ok()
            .and_then(|r| r.get("name"))
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    /// Drain events and keep only the filter-state summaries.
    pub fn drain_filter_summaries(&mut self) -> Vec<table_engine::FilterSummary> {
        self.table
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                TableEvent::FilterStateChanged(s) => Some(s),
                _ => None,
            })
            .collect()
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub struct EmployeeFixture;

impl EmployeeFixture {
    pub const COUNT: usize = 57;

    /// Positions of the three London employees.
    pub const LONDON: [usize; 3] = [5, 20, 41];

    const OFFICES: [&'static str; 6] = [
        "Tokyo",
        "Edinburgh",
        "San Francisco",
        "New York",
        "Sydney",
        "Singapore",
    ];

    pub fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("name", "Name", ColumnType::String).editable(true),
            ColumnDef::new("position", "Position", ColumnType::String),
            ColumnDef::new("office", "Office", ColumnType::String),
            ColumnDef::new("age", "Age", ColumnType::Numeric),
            ColumnDef::new("start_date", "Start date", ColumnType::Date),
            ColumnDef::new("salary", "Salary", ColumnType::Numeric).editable(true),
            ColumnDef::new("active", "Active", ColumnType::Boolean),
        ]
    }

    pub fn rows() -> Vec<Row> {
        (0..Self::COUNT).map(Self::generated).collect()
    }

    /// Deterministic employee record number `i`.
    pub fn generated(i: usize) -> Row {
        let office = if Self::LONDON.contains(&i) {
            "London"
        } else {
            Self::OFFICES[i % Self::OFFICES.len()]
        };
        let position = ["Accountant", "Developer", "Support Engineer", "Sales Assistant"][i % 4];
        let start = NaiveDate::from_ymd_opt(2008 + (i % 10) as i32, 1 + (i % 12) as u32, 1 + (i % 28) as u32);
        row! {
            "name" => format!("Employee {:03}", i),
            "position" => position,
            "office" => office,
            "age" => 20 + (i % 45) as i64,
            "start_date" => start,
            "salary" => 50_000 + ((i * 7_919) % 150_000) as i64,
            "active" => i % 3 != 0,
        }
    }
}

pub struct SalaryFixture;

impl SalaryFixture {
    pub fn rows() -> Vec<Row> {
        vec![
            row! { "name" => "Tiger Nixon", "office" => "Edinburgh", "salary" => 162700 },
            row! { "name" => "Angelica Ramos", "office" => "London", "salary" => 1200000 },
            row! { "name" => "Ashton Cox", "office" => "San Francisco", "salary" => 86000 },
        ]
    }
}

pub struct DepartmentFixture;

impl DepartmentFixture {
    /// Three departments. "Engineering" has two children, "Legal" none,
    /// "Sales" one.
    pub fn rows() -> Vec<NestedRow> {
        vec![
            NestedRow::new(
                row! { "name" => "Engineering", "salary" => 300000 },
                vec![
                    row! { "name" => "Ana", "salary" => 120000 },
                    row! { "name" => "Bo", "salary" => 180000 },
                ],
            ),
            NestedRow::leaf(row! { "name" => "Legal", "salary" => 95555 }),
            NestedRow::new(
                row! { "name" => "Sales", "salary" => 150000 },
                vec![row! { "name" => "Cy", "salary" => 150000 }],
            ),
        ]
    }
}

// ============================================================================
// ASSERTION HELPERS
// ============================================================================

/// Assert that a numeric aggregate equals `expected`.
pub fn assert_number(value: Value, expected: f64) {
    match value {
        Value::Number(n) => assert!(
            (n - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            n
        ),
        other => panic!("expected number {}, got {:?}", expected, other),
    }
}
