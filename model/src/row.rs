//! FILENAME: model/src/row.rs
//! PURPOSE: Row records and their hierarchy kind.
//! CONTEXT: A `Row` is the caller-visible field map. The store keeps each row
//! inside a `Record` whose `kind` says whether it is a plain row, a parent or
//! a child, so bookkeeping never leaks into the row's own field namespace.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// An insertion-ordered mapping from column key to value.
pub type Row = IndexMap<String, Value>;

static NULL: Value = Value::Null;

/// Builds a `Row` from `key => value` pairs.
///
/// ```
/// let r = model::row! { "name" => "Airi Satou", "age" => 33 };
/// assert_eq!(r.len(), 2);
/// ```
#[macro_export]
macro_rules! row {
    () => { $crate::Row::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut row = $crate::Row::new();
        $( row.insert(::std::string::String::from($key), $crate::Value::from($value)); )+
        row
    }};
}

/// Position of a record in a two-level parent/child hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowKind {
    #[default]
    Plain,
    Parent {
        has_children: bool,
    },
    /// `parent_index` is the store index of the owning parent record.
    Child {
        parent_index: usize,
        child_index: usize,
    },
}

/// A stored row plus its hierarchy kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub fields: Row,
    pub kind: RowKind,
}

impl Record {
    pub fn plain(fields: Row) -> Self {
        Record {
            fields,
            kind: RowKind::Plain,
        }
    }

    /// Value for a column key; missing keys read as null.
    pub fn get(&self, key: &str) -> &Value {
        self.fields.get(key).unwrap_or(&NULL)
    }

    pub fn is_parent(&self) -> bool {
        matches!(self.kind, RowKind::Parent { .. })
    }

    pub fn is_child(&self) -> bool {
        matches!(self.kind, RowKind::Child { .. })
    }

    pub fn has_children(&self) -> bool {
        matches!(self.kind, RowKind::Parent { has_children: true })
    }

    pub fn parent_index(&self) -> Option<usize> {
        match self.kind {
            RowKind::Child { parent_index, .. } => Some(parent_index),
            _ => None,
        }
    }
}
