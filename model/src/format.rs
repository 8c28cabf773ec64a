//! FILENAME: model/src/format.rs
//! PURPOSE: Default display formatting, search matching and sort keys per column type.
//! CONTEXT: `ColumnRegistry::set_columns` installs these for every column that
//! does not supply its own. They operate on raw `Value`s, never on display text.

use crate::column::{ColumnType, SortKey};
use crate::value::{Value, DATE_FORMAT};
use chrono::NaiveDate;

// ============================================================================
// FORMATTING
// ============================================================================

/// Formats a value for display according to its column type.
///
/// With `integer_display` on, whole numbers print bare (`1200000`) and
/// fractional ones with separators and two decimals (`1,234.50`). With it
/// off, every number prints with two decimals.
pub fn format_value(column_type: ColumnType, value: &Value, integer_display: bool) -> String {
    match column_type {
        ColumnType::Numeric => match value {
            Value::Number(n) if integer_display && n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{:.0}", n)
            }
            Value::Number(n) => format_decimal(*n, 2, true),
            other => other.to_string(),
        },
        ColumnType::Date => match value.as_date() {
            Some(d) => d.format(DATE_FORMAT).to_string(),
            None => value.to_string(),
        },
        ColumnType::Boolean => {
            if value.is_truthy() { "Yes" } else { "No" }.to_string()
        }
        ColumnType::String | ColumnType::Progress | ColumnType::Custom => value.to_string(),
    }
}

/// Format a number with specified decimal places and optional thousands separator.
/// NaN and infinities print as-is.
pub fn format_decimal(value: f64, decimal_places: u8, use_thousands_separator: bool) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = format!("{:.prec$}", value, prec = decimal_places as usize);

    if use_thousands_separator {
        add_thousands_separator(&rounded)
    } else {
        rounded
    }
}

/// Add thousands separators to a numeric string.
fn add_thousands_separator(s: &str) -> String {
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some((int, dec)) => (int, Some(dec)),
        None => (s, None),
    };

    let negative = integer_part.starts_with('-');
    let digits: Vec<char> = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut result = String::with_capacity(s.len() + digits.len() / 3 + 1);
    if negative {
        result.push('-');
    }
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    if let Some(decimal) = decimal_part {
        result.push('.');
        result.push_str(decimal);
    }

    result
}

// ============================================================================
// SEARCH
// ============================================================================

/// Default search predicate for a column type. `term` is the raw search text.
pub fn default_matches(column_type: ColumnType, value: &Value, term: &str) -> bool {
    match column_type {
        // Case-sensitive substring on the plain stringified number
        ColumnType::Numeric => value.to_string().contains(term),
        ColumnType::Date => value
            .as_date()
            .is_some_and(|d| d.format(DATE_FORMAT).to_string().contains(term)),
        ColumnType::Boolean => {
            // "y", "ye", "yes", "es" ... match true; "n", "no", "o" match false
            let term = term.to_lowercase();
            let truthy = value.is_truthy();
            ("yes".contains(term.as_str()) && truthy) || ("no".contains(term.as_str()) && !truthy)
        }
        ColumnType::String | ColumnType::Progress | ColumnType::Custom => value
            .to_string()
            .to_lowercase()
            .contains(&term.to_lowercase()),
    }
}

// ============================================================================
// SORT KEYS
// ============================================================================

/// Default sort key for a column type.
pub fn default_sort_key(column_type: ColumnType, value: &Value) -> SortKey {
    match column_type {
        ColumnType::String => SortKey::Text(value.to_string().to_lowercase()),
        ColumnType::Numeric | ColumnType::Progress => match value {
            Value::Null => SortKey::Number(0.0),
            Value::Number(n) => SortKey::Number(*n),
            Value::Boolean(b) => SortKey::Number(if *b { 1.0 } else { 0.0 }),
            Value::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) => SortKey::Number(n),
                Err(_) => SortKey::Text(s.clone()),
            },
            Value::Date(_) => SortKey::Text(value.to_string()),
        },
        ColumnType::Date => match value {
            Value::Date(d) => SortKey::Date(*d),
            _ => SortKey::Date(NaiveDate::MIN),
        },
        ColumnType::Boolean => SortKey::Bool(value.is_truthy()),
        ColumnType::Custom => SortKey::Text(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_format_integer_display() {
        assert_eq!(format_value(ColumnType::Numeric, &Value::Number(1200000.0), true), "1200000");
        assert_eq!(format_value(ColumnType::Numeric, &Value::Number(1234.5), true), "1,234.50");
        assert_eq!(format_value(ColumnType::Numeric, &Value::Number(-1234567.891), true), "-1,234,567.89");
    }

    #[test]
    fn test_numeric_format_always_decimals() {
        assert_eq!(format_value(ColumnType::Numeric, &Value::Number(1200000.0), false), "1,200,000.00");
        assert_eq!(format_value(ColumnType::Numeric, &Value::from("n/a"), false), "n/a");
    }

    #[test]
    fn test_non_finite_numbers_keep_their_text() {
        assert_eq!(format_value(ColumnType::Numeric, &Value::Number(f64::NAN), true), "NaN");
        assert_eq!(format_value(ColumnType::Numeric, &Value::Number(f64::INFINITY), false), "inf");
        assert_eq!(format_decimal(f64::NEG_INFINITY, 2, true), "-inf");
    }

    #[test]
    fn test_boolean_and_date_format() {
        assert_eq!(format_value(ColumnType::Boolean, &Value::Boolean(true), true), "Yes");
        assert_eq!(format_value(ColumnType::Boolean, &Value::Null, true), "No");
        let d = NaiveDate::from_ymd_opt(2009, 1, 12).unwrap();
        assert_eq!(format_value(ColumnType::Date, &Value::Date(d), true), "2009-01-12");
    }

    #[test]
    fn test_string_search_is_case_insensitive() {
        assert!(default_matches(ColumnType::String, &Value::from("London"), "lond"));
        assert!(default_matches(ColumnType::String, &Value::from("London"), "LONDON"));
        assert!(!default_matches(ColumnType::String, &Value::from("Tokyo"), "london"));
    }

    #[test]
    fn test_boolean_keyword_search() {
        assert!(default_matches(ColumnType::Boolean, &Value::Boolean(true), "Yes"));
        assert!(default_matches(ColumnType::Boolean, &Value::Boolean(true), "y"));
        assert!(!default_matches(ColumnType::Boolean, &Value::Boolean(false), "yes"));
        assert!(default_matches(ColumnType::Boolean, &Value::Boolean(false), "no"));
    }

    #[test]
    fn test_date_search_requires_date_value() {
        let d = NaiveDate::from_ymd_opt(2012, 10, 13).unwrap();
        assert!(default_matches(ColumnType::Date, &Value::Date(d), "2012-10"));
        assert!(!default_matches(ColumnType::Date, &Value::from("2012-10"), "2012"));
    }

    #[test]
    fn test_numeric_sort_key_defaults_null_to_zero() {
        assert_eq!(default_sort_key(ColumnType::Numeric, &Value::Null), SortKey::Number(0.0));
        assert_eq!(default_sort_key(ColumnType::Numeric, &Value::from("12")), SortKey::Number(12.0));
        assert_eq!(default_sort_key(ColumnType::Date, &Value::Null), SortKey::Date(NaiveDate::MIN));
    }
}
