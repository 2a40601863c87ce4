//! Card type (card template) of a note type.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use super::{DeckId, NoteTypeId, OrdinalKey, Row, Table};
use crate::Result;

/// A card template, identified by `(note type id, ordinal)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardType {
    pub key: OrdinalKey,
    pub name: String,
    /// Back-reference to the owning note type, set by the linker.
    owner: Option<NoteTypeId>,
    decks: BTreeSet<DeckId>,
}

impl CardType {
    pub fn new(key: OrdinalKey, name: impl Into<String>) -> Self {
        Self { key, name: name.into(), owner: None, decks: BTreeSet::new() }
    }

    /// Columns: `ntid, ord, name, ...`
    pub fn from_row(row: &Row) -> Result<Self> {
        let key = OrdinalKey::from_row(row, Table::CardTemplates)?;
        let name = row.text(Table::CardTemplates, 2)?;
        Ok(Self::new(key, name))
    }

    pub fn note_type_id(&self) -> NoteTypeId {
        self.key.note_type_id
    }

    pub fn ordinal(&self) -> u32 {
        self.key.ordinal
    }

    /// Owning note type once linked.
    pub fn owner(&self) -> Option<NoteTypeId> {
        self.owner
    }

    /// Decks using this card type.
    pub fn decks(&self) -> &BTreeSet<DeckId> {
        &self.decks
    }

    pub(crate) fn set_owner(&mut self, id: NoteTypeId) {
        self.owner = Some(id);
    }

    pub(crate) fn add_deck(&mut self, id: DeckId) {
        self.decks.insert(id);
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.key, self.name)
    }
}
