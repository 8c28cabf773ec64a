//! FILENAME: table-engine/src/aggregate.rs
//! PURPOSE: Column aggregation (sum, avg, min, max, count) and row percentages.
//! CONTEXT: Aggregation never fails on data: mixed or non-numeric values
//! degrade to `Value::Null`. Only an unknown column is an error. A custom
//! aggregator registered on the column under the same name wins over the
//! built-in one.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use model::{log_debug, ColumnRegistry, Record, Result, TableError, Value};

/// Built-in aggregation functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationType {
    Sum,
    Avg,
    Min,
    Max,
    Count,
}

impl AggregationType {
    pub const ALL: [AggregationType; 5] = [
        AggregationType::Sum,
        AggregationType::Avg,
        AggregationType::Min,
        AggregationType::Max,
        AggregationType::Count,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AggregationType::Sum => "sum",
            AggregationType::Avg => "avg",
            AggregationType::Min => "min",
            AggregationType::Max => "max",
            AggregationType::Count => "count",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for AggregationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// BUILT-INS
// ============================================================================

/// Applies a built-in aggregation. Null values are skipped; an all-null
/// input yields `Null` (or 0 for `count`).
pub fn builtin(agg: AggregationType, values: &[Value]) -> Value {
    let present: Vec<&Value> = values.iter().filter(|v| !v.is_null()).collect();

    match agg {
        AggregationType::Count => Value::Number(present.len() as f64),
        _ if present.is_empty() => Value::Null,
        AggregationType::Sum | AggregationType::Avg => {
            let numbers: Option<Vec<f64>> = present.iter().map(|v| v.as_f64()).collect();
            let Some(numbers) = numbers else {
                return Value::Null;
            };
            let sum: f64 = numbers.iter().sum();
            if agg == AggregationType::Sum {
                Value::Number(sum)
            } else {
                Value::Number(sum / numbers.len() as f64)
            }
        }
        AggregationType::Min => extreme(&present, Ordering::Less),
        AggregationType::Max => extreme(&present, Ordering::Greater),
    }
}

/// Smallest (`Less`) or largest (`Greater`) value. Null if any pair is incomparable.
fn extreme(values: &[&Value], wanted: Ordering) -> Value {
    let mut best = values[0];
    for &value in &values[1..] {
        match value.compare_same_type(best) {
            Some(ord) if ord == wanted => best = value,
            Some(_) => {}
            None => return Value::Null,
        }
    }
    best.clone()
}

// ============================================================================
// COLUMN AGGREGATION
// ============================================================================

/// Aggregates a column over the records at `indices`.
/// Unknown aggregation names without a custom aggregator yield `Null`.
pub fn aggregate_indices(
    records: &[Record],
    indices: &[usize],
    key: &str,
    agg: &str,
    columns: &ColumnRegistry,
) -> Result<Value> {
    let column = columns.get(key)?;
    let values: Vec<Value> = indices
        .iter()
        .filter_map(|&i| records.get(i))
        .map(|r| r.get(key).clone())
        .collect();

    if let Some(custom) = column.aggregator(agg) {
        return Ok(custom(&values));
    }
    match AggregationType::parse(agg) {
        Some(kind) => Ok(builtin(kind, &values)),
        None => {
            log_debug!("AGGREGATE", "unknown aggregation '{}' on '{}'", agg, key);
            Ok(Value::Null)
        }
    }
}

/// Aggregates a column over every record.
pub fn aggregate(records: &[Record], key: &str, agg: &str, columns: &ColumnRegistry) -> Result<Value> {
    let all: Vec<usize> = (0..records.len()).collect();
    aggregate_indices(records, &all, key, agg, columns)
}

/// Share of `row`'s value in the column sum, in percent.
/// Non-numeric values and a zero or non-numeric total give 0.
pub fn percentage_of(records: &[Record], row: usize, key: &str, columns: &ColumnRegistry) -> Result<f64> {
    columns.get(key)?;
    let record = records.get(row).ok_or(TableError::RowOutOfRange {
        index: row,
        len: records.len(),
    })?;

    let Some(value) = record.get(key).as_f64() else {
        return Ok(0.0);
    };
    match aggregate(records, key, AggregationType::Sum.name(), columns)?.as_f64() {
        Some(total) if total != 0.0 => Ok(value / total * 100.0),
        _ => Ok(0.0),
    }
}
