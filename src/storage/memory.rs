//! In-memory row source.
//!
//! This is the reference implementation of `RowSource`.
//! It keeps one `Vec<Row>` per table behind a RwLock.
//!
//! ## Limitations
//!
//! - **No query planner**: the per-deck queries scan `cards` and `notes`.
//! - **Clones share tables**: a clone is a second handle onto the same data,
//!   so a test can keep one to seed rows after handing the other to a
//!   `Collection`.
//!
//! Use this source for:
//! - Testing the builder and linker without a collection file
//! - Embedding the graph over rows obtained some other way

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use parking_lot::RwLock;

use crate::model::*;
use crate::row;
use crate::Result;
use super::RowSource;

// ============================================================================
// MemoryRowSource
// ============================================================================

/// In-memory collection tables.
#[derive(Clone, Default)]
pub struct MemoryRowSource {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    tables: RwLock<HashMap<Table, Vec<Row>>>,
}

impl MemoryRowSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw row to a table.
    pub fn insert_row(&self, table: Table, row: Row) {
        self.inner.tables.write().entry(table).or_default().push(row);
    }

    pub fn add_deck(&self, id: i64, name: &str) {
        self.insert_row(Table::Decks, row![id, name, 0, -1]);
    }

    pub fn add_note_type(&self, id: i64, name: &str) {
        self.insert_row(Table::NoteTypes, row![id, name, 0, -1]);
    }

    pub fn add_card_template(&self, note_type_id: i64, ordinal: u32, name: &str) {
        self.insert_row(Table::CardTemplates, row![note_type_id, ordinal, name, 0, -1]);
    }

    pub fn add_field(&self, note_type_id: i64, ordinal: u32, name: &str) {
        self.insert_row(Table::Fields, row![note_type_id, ordinal, name]);
    }

    pub fn add_tag(&self, name: &str) {
        self.insert_row(Table::Tags, row![name, -1, 0]);
    }

    /// Add a note; `fields` are joined with the field separator and the
    /// first one becomes the sort field.
    pub fn add_note(&self, id: i64, note_type_id: i64, fields: &[&str], tags: &str) {
        let sep = FIELD_SEPARATOR.to_string();
        let flds = fields.join(sep.as_str());
        let sfld = fields.first().copied().unwrap_or_default();
        let tags = if tags.is_empty() { String::new() } else { format!(" {tags} ") };
        self.insert_row(
            Table::Notes,
            row![id, format!("g{id}"), note_type_id, 0, -1, tags, flds, sfld, 0, 0, ""],
        );
    }

    pub fn add_card(&self, id: i64, note_id: i64, deck_id: i64, ordinal: u32) {
        self.insert_row(
            Table::Cards,
            row![id, note_id, deck_id, ordinal, 0, -1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, ""],
        );
    }

    fn table(&self, table: Table) -> Vec<Row> {
        self.inner.tables.read().get(&table).cloned().unwrap_or_default()
    }

    /// Note ids referenced by the deck's cards.
    fn note_ids_for_deck(&self, deck: DeckId) -> Result<HashSet<i64>> {
        let tables = self.inner.tables.read();
        let mut ids = HashSet::new();
        for card in tables.get(&Table::Cards).into_iter().flatten() {
            if card.int(Table::Cards, 2)? == deck.0 {
                ids.insert(card.int(Table::Cards, 1)?);
            }
        }
        Ok(ids)
    }

    /// Notes behind the deck's cards, ordered by note id.
    fn deck_notes(&self, deck: DeckId) -> Result<Vec<Row>> {
        let nids = self.note_ids_for_deck(deck)?;
        let tables = self.inner.tables.read();
        let mut notes = Vec::new();
        for note in tables.get(&Table::Notes).into_iter().flatten() {
            if nids.contains(&note.int(Table::Notes, 0)?) {
                notes.push(note.clone());
            }
        }
        notes.sort_by_key(|n| n.opt_int(0));
        Ok(notes)
    }
}

// ============================================================================
// RowSource impl
// ============================================================================

impl RowSource for MemoryRowSource {
    fn rows(&self, table: Table) -> Result<Vec<Row>> {
        Ok(self.table(table))
    }

    fn note_type_ids_for_deck(&self, deck: DeckId) -> Result<Vec<NoteTypeId>> {
        let mut mids = BTreeSet::new();
        for note in self.deck_notes(deck)? {
            mids.insert(NoteTypeId(note.int(Table::Notes, 2)?));
        }
        Ok(mids.into_iter().collect())
    }

    fn notes_for_deck(&self, deck: DeckId) -> Result<Vec<Row>> {
        self.deck_notes(deck)?
            .into_iter()
            .map(|note| {
                let id = note.int(Table::Notes, 0)?;
                let tags = note.text(Table::Notes, 5)?.to_string();
                let flds = note.text(Table::Notes, 6)?.to_string();
                let sfld = note.get(7).cloned().unwrap_or(Value::Null);
                Ok(Row::new(vec![Value::Int(id), sfld, Value::Text(flds), Value::Text(tags)]))
            })
            .collect()
    }

    fn cards_for_deck(&self, deck: DeckId) -> Result<Vec<Row>> {
        let mut cards = Vec::new();
        for card in self.table(Table::Cards) {
            if card.int(Table::Cards, 2)? == deck.0 {
                cards.push(card);
            }
        }
        Ok(cards)
    }

    fn count(&self, table: Table) -> Result<u64> {
        Ok(self.inner.tables.read().get(&table).map_or(0, Vec::len) as u64)
    }
}

// ============================================================================
// Tests
// ============================================================================
