//! The entity arena.
//!
//! Every entity lives in exactly one id-keyed map here. Associations between
//! entities are the id/key sets stored on the entities themselves, so
//! traversal is always "look up the id in the arena".
//!
//! Map iteration order is unspecified. Anything user-facing sorts by key.

use hashbrown::HashMap;
use tracing::warn;

use crate::model::*;

/// Decks, note types, card types, fields and tags of one collection, plus
/// whatever notes and cards were loaded on request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnkiGraph {
    pub(crate) decks: HashMap<DeckId, Deck>,
    pub(crate) note_types: HashMap<NoteTypeId, NoteType>,
    pub(crate) card_types: HashMap<OrdinalKey, CardType>,
    pub(crate) fields: HashMap<OrdinalKey, Field>,
    pub(crate) tags: HashMap<String, Tag>,
    pub(crate) notes: HashMap<NoteId, Note>,
    pub(crate) cards: HashMap<CardId, Card>,
}

impl AnkiGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Maps
    // ========================================================================

    pub fn decks(&self) -> &HashMap<DeckId, Deck> { &self.decks }
    pub fn note_types(&self) -> &HashMap<NoteTypeId, NoteType> { &self.note_types }
    pub fn card_types(&self) -> &HashMap<OrdinalKey, CardType> { &self.card_types }
    pub fn fields(&self) -> &HashMap<OrdinalKey, Field> { &self.fields }
    pub fn tags(&self) -> &HashMap<String, Tag> { &self.tags }
    pub fn notes(&self) -> &HashMap<NoteId, Note> { &self.notes }
    pub fn cards(&self) -> &HashMap<CardId, Card> { &self.cards }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn deck(&self, id: DeckId) -> Option<&Deck> { self.decks.get(&id) }
    pub fn note_type(&self, id: NoteTypeId) -> Option<&NoteType> { self.note_types.get(&id) }
    pub fn card_type(&self, key: OrdinalKey) -> Option<&CardType> { self.card_types.get(&key) }
    pub fn field(&self, key: OrdinalKey) -> Option<&Field> { self.fields.get(&key) }
    pub fn tag(&self, name: &str) -> Option<&Tag> { self.tags.get(name) }

    /// First deck (lowest id) whose stored or `::`-joined name matches.
    pub fn deck_by_name(&self, name: &str) -> Option<&Deck> {
        self.decks
            .values()
            .filter(|d| d.is_named(name))
            .min_by_key(|d| d.id)
    }

    /// All decks ordered by id.
    pub fn decks_sorted(&self) -> Vec<&Deck> {
        let mut decks: Vec<&Deck> = self.decks.values().collect();
        decks.sort_by_key(|d| d.id);
        decks
    }

    /// All note types ordered by id.
    pub fn note_types_sorted(&self) -> Vec<&NoteType> {
        let mut nts: Vec<&NoteType> = self.note_types.values().collect();
        nts.sort_by_key(|nt| nt.id);
        nts
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Note types used by a deck, ordered by id.
    pub fn note_types_of(&self, deck: &Deck) -> Vec<&NoteType> {
        deck.note_types().iter().filter_map(|id| self.note_types.get(id)).collect()
    }

    /// Card types used by a deck, ordered by key.
    pub fn card_types_of_deck(&self, deck: &Deck) -> Vec<&CardType> {
        deck.card_types().iter().filter_map(|k| self.card_types.get(k)).collect()
    }

    /// Card types owned by a note type, ordered by ordinal.
    pub fn card_types_of(&self, note_type: &NoteType) -> Vec<&CardType> {
        note_type.card_types().iter().filter_map(|k| self.card_types.get(k)).collect()
    }

    /// Fields owned by a note type, ordered by ordinal.
    pub fn fields_of(&self, note_type: &NoteType) -> Vec<&Field> {
        note_type.fields().iter().filter_map(|k| self.fields.get(k)).collect()
    }

    /// Decks using a note type, ordered by id.
    pub fn decks_of(&self, note_type: &NoteType) -> Vec<&Deck> {
        note_type.decks().iter().filter_map(|id| self.decks.get(id)).collect()
    }

    // ========================================================================
    // Insertion (builder only)
    // ========================================================================

    pub(crate) fn insert_deck(&mut self, deck: Deck) {
        if let Some(old) = self.decks.insert(deck.id, deck) {
            warn!(id = %old.id, name = %old.name, "duplicate deck id, keeping later row");
        }
    }

    pub(crate) fn insert_note_type(&mut self, nt: NoteType) {
        if let Some(old) = self.note_types.insert(nt.id, nt) {
            warn!(id = %old.id, name = %old.name, "duplicate note type id, keeping later row");
        }
    }

    pub(crate) fn insert_card_type(&mut self, ct: CardType) {
        if let Some(old) = self.card_types.insert(ct.key, ct) {
            warn!(key = %old.key, name = %old.name, "duplicate card type key, keeping later row");
        }
    }

    pub(crate) fn insert_field(&mut self, field: Field) {
        if let Some(old) = self.fields.insert(field.key, field) {
            warn!(key = %old.key, name = %old.name, "duplicate field key, keeping later row");
        }
    }

    pub(crate) fn insert_tag(&mut self, tag: Tag) {
        if let Some(old) = self.tags.insert(tag.name.clone(), tag) {
            warn!(name = %old.name, "duplicate tag, keeping later row");
        }
    }

    pub(crate) fn insert_note(&mut self, note: Note) {
        self.notes.insert(note.id, note);
    }

    pub(crate) fn insert_card(&mut self, card: Card) {
        self.cards.insert(card.id, card);
    }
}
