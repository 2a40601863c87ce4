//! Row — one ordered tuple of column values from a logical table.

use std::fmt;

use serde::{Deserialize, Serialize};
use super::Value;
use crate::{Error, Result};

/// Logical tables of an Anki collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Table {
    Decks,
    NoteTypes,
    CardTemplates,
    Fields,
    Tags,
    Notes,
    Cards,
}

impl Table {
    /// Name of the backing table in the collection schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Decks => "decks",
            Table::NoteTypes => "notetypes",
            Table::CardTemplates => "templates",
            Table::Fields => "fields",
            Table::Tags => "tags",
            Table::Notes => "notes",
            Table::Cards => "cards",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered tuple of column values.
///
/// Columns are positional. Entity builders pull the leading columns they
/// need through the typed accessors, which turn a missing or mistyped column
/// into [`Error::MalformedRow`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row(Vec<Value>);

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, column: usize) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Required INTEGER column.
    pub fn int(&self, table: Table, column: usize) -> Result<i64> {
        self.get(column)
            .and_then(Value::as_int)
            .ok_or_else(|| self.malformed(table, column, "INTEGER"))
    }

    /// Required TEXT column.
    pub fn text(&self, table: Table, column: usize) -> Result<&str> {
        self.get(column)
            .and_then(Value::as_str)
            .ok_or_else(|| self.malformed(table, column, "TEXT"))
    }

    /// Optional INTEGER column: absent, NULL or non-integral all read as `None`.
    pub fn opt_int(&self, column: usize) -> Option<i64> {
        self.get(column).and_then(Value::as_int)
    }

    fn malformed(&self, table: Table, column: usize, expected: &'static str) -> Error {
        let found = match self.get(column) {
            Some(v) => v.type_name().to_string(),
            None => format!("row of {} columns", self.len()),
        };
        Error::MalformedRow { table, column, expected, found }
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for Row {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Build a [`Row`] from heterogeneous column literals.
///
/// ```
/// use anki_graph::{row, Value};
/// let r = row![1, "Default"];
/// assert_eq!(r.get(1), Some(&Value::from("Default")));
/// ```
#[macro_export]
macro_rules! row {
    ($($v:expr),* $(,)?) => {
        $crate::model::Row::new(vec![$($crate::model::Value::from($v)),*])
    };
}
