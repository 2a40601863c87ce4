//! Deck and note type listings.
//!
//! Produces plain rows ordered by id; turning them into a table is left to
//! the caller.

use serde::Serialize;

use crate::graph::AnkiGraph;
use crate::model::*;
use crate::storage::RowSource;
use crate::{Collection, Result};

/// One line of the deck listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckSummary {
    pub id: DeckId,
    pub name: String,
    pub cards: u64,
    pub notes: u64,
    pub note_types: usize,
    pub card_types: usize,
}

/// One line of the note type listing. Names are ordered by ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteTypeSummary {
    pub id: NoteTypeId,
    pub name: String,
    pub card_types: Vec<String>,
    pub fields: Vec<String>,
    pub decks: usize,
}

/// Collection-wide counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectionTotals {
    pub decks: usize,
    pub notes: u64,
    pub cards: u64,
    pub note_types: usize,
    pub card_types: usize,
    pub fields: usize,
    pub tags: usize,
}

/// Every deck with its card/note counts and linked type counts.
pub fn list_decks<S: RowSource>(col: &Collection<S>) -> Result<Vec<DeckSummary>> {
    col.graph()
        .decks_sorted()
        .into_iter()
        .map(|deck| {
            Ok(DeckSummary {
                id: deck.id,
                name: deck.display_name(),
                cards: col.source().card_count_for_deck(deck.id)?,
                notes: col.source().note_count_for_deck(deck.id)?,
                note_types: deck.note_types().len(),
                card_types: deck.card_types().len(),
            })
        })
        .collect()
}

/// Every note type with the names of its card types and fields.
pub fn list_note_types(graph: &AnkiGraph) -> Vec<NoteTypeSummary> {
    graph
        .note_types_sorted()
        .into_iter()
        .map(|nt| NoteTypeSummary {
            id: nt.id,
            name: nt.name.clone(),
            card_types: graph.card_types_of(nt).into_iter().map(|c| c.name.clone()).collect(),
            fields: graph.fields_of(nt).into_iter().map(|f| f.name.clone()).collect(),
            decks: nt.decks().len(),
        })
        .collect()
}

pub fn totals<S: RowSource>(col: &Collection<S>) -> Result<CollectionTotals> {
    let g = col.graph();
    Ok(CollectionTotals {
        decks: g.decks().len(),
        notes: col.note_count()?,
        cards: col.card_count()?,
        note_types: g.note_types().len(),
        card_types: g.card_types().len(),
        fields: g.fields().len(),
        tags: g.tags().len(),
    })
}
