//! Tag registered in the collection.

use serde::{Deserialize, Serialize};
use super::{Row, Table};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    /// Columns: `tag, ...`
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self { name: row.text(Table::Tags, 0)?.to_string() })
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
