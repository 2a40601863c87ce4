//! Deck in the collection graph.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::{NoteTypeId, OrdinalKey, Row, Table};
use crate::Result;

/// Separator between hierarchy levels in a stored deck name.
pub const DECK_NAME_SEPARATOR: char = '\x1f';

/// Deck identifier (the `decks.id` column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeckId(pub i64);

impl std::fmt::Display for DeckId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A deck, with the note types and card types its cards use.
///
/// The association sets are empty until the linker runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: DeckId,
    /// Stored name; hierarchy levels are separated by `\x1f`.
    pub name: String,
    pub modified: Option<DateTime<Utc>>,
    note_types: BTreeSet<NoteTypeId>,
    card_types: BTreeSet<OrdinalKey>,
}

impl Deck {
    pub fn new(id: DeckId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            modified: None,
            note_types: BTreeSet::new(),
            card_types: BTreeSet::new(),
        }
    }

    /// Columns: `id, name, mtime_secs?, ...`
    pub fn from_row(row: &Row) -> Result<Self> {
        let id = DeckId(row.int(Table::Decks, 0)?);
        let name = row.text(Table::Decks, 1)?;
        let mut deck = Self::new(id, name);
        deck.modified = row.opt_int(2).and_then(|secs| DateTime::from_timestamp(secs, 0));
        Ok(deck)
    }

    /// Name with hierarchy levels joined by `::`, as users type it.
    pub fn display_name(&self) -> String {
        self.name.split(DECK_NAME_SEPARATOR).collect::<Vec<_>>().join("::")
    }

    /// Matches either the stored or the `::`-joined form of the name.
    pub fn is_named(&self, name: &str) -> bool {
        self.name == name || self.display_name() == name
    }

    pub fn note_types(&self) -> &BTreeSet<NoteTypeId> {
        &self.note_types
    }

    pub fn card_types(&self) -> &BTreeSet<OrdinalKey> {
        &self.card_types
    }

    pub(crate) fn add_note_type(&mut self, id: NoteTypeId) {
        self.note_types.insert(id);
    }

    pub(crate) fn add_card_type(&mut self, key: OrdinalKey) {
        self.card_types.insert(key);
    }
}

impl std::fmt::Display for Deck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.id, self.display_name())
    }
}
