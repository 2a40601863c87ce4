//! Field of a note type.

use serde::{Deserialize, Serialize};
use super::{NoteTypeId, OrdinalKey, Row, Table};
use crate::Result;

/// A note field, identified by `(note type id, ordinal)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub key: OrdinalKey,
    pub name: String,
    owner: Option<NoteTypeId>,
}

impl Field {
    pub fn new(key: OrdinalKey, name: impl Into<String>) -> Self {
        Self { key, name: name.into(), owner: None }
    }

    /// Columns: `ntid, ord, name, ...`
    pub fn from_row(row: &Row) -> Result<Self> {
        let key = OrdinalKey::from_row(row, Table::Fields)?;
        let name = row.text(Table::Fields, 2)?;
        Ok(Self::new(key, name))
    }

    pub fn note_type_id(&self) -> NoteTypeId {
        self.key.note_type_id
    }

    pub fn ordinal(&self) -> u32 {
        self.key.ordinal
    }

    pub fn owner(&self) -> Option<NoteTypeId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, id: NoteTypeId) {
        self.owner = Some(id);
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.key, self.name)
    }
}
