//! Note type (model) — owns its card types and fields.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::{DeckId, OrdinalKey, Row, Table};
use crate::Result;

/// Note type identifier (the `notetypes.id` / `notes.mid` column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteTypeId(pub i64);

impl std::fmt::Display for NoteTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A note type. Card types and fields are owned: their keys live here and
/// each of them points back via its owner id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteType {
    pub id: NoteTypeId,
    pub name: String,
    pub modified: Option<DateTime<Utc>>,
    decks: BTreeSet<DeckId>,
    card_types: BTreeSet<OrdinalKey>,
    fields: BTreeSet<OrdinalKey>,
}

impl NoteType {
    pub fn new(id: NoteTypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            modified: None,
            decks: BTreeSet::new(),
            card_types: BTreeSet::new(),
            fields: BTreeSet::new(),
        }
    }

    /// Columns: `id, name, mtime_secs?, ...`
    pub fn from_row(row: &Row) -> Result<Self> {
        let id = NoteTypeId(row.int(Table::NoteTypes, 0)?);
        let name = row.text(Table::NoteTypes, 1)?;
        let mut nt = Self::new(id, name);
        nt.modified = row.opt_int(2).and_then(|secs| DateTime::from_timestamp(secs, 0));
        Ok(nt)
    }

    /// Decks whose cards use this note type.
    pub fn decks(&self) -> &BTreeSet<DeckId> {
        &self.decks
    }

    /// Owned card types, ordered by ordinal.
    pub fn card_types(&self) -> &BTreeSet<OrdinalKey> {
        &self.card_types
    }

    /// Owned fields, ordered by ordinal.
    pub fn fields(&self) -> &BTreeSet<OrdinalKey> {
        &self.fields
    }

    pub(crate) fn add_deck(&mut self, id: DeckId) {
        self.decks.insert(id);
    }

    pub(crate) fn add_card_type(&mut self, key: OrdinalKey) {
        self.card_types.insert(key);
    }

    pub(crate) fn add_field(&mut self, key: OrdinalKey) {
        self.fields.insert(key);
    }
}

impl std::fmt::Display for NoteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.id, self.name)
    }
}
