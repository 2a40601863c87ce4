//! Collection builder.
//!
//! Turns the rows of each table into entities and files them into the
//! [`AnkiGraph`] arena, then hands the graph to the linker.
//!
//! ```text
//! RowSource ─rows─▶ Entity::from_row ─▶ AnkiGraph maps ─▶ link::link_all
//! ```
//!
//! Notes and cards are never built here. See
//! [`crate::Collection::load_notes`] and [`crate::Collection::load_cards`].

use tracing::{debug, info, info_span};

use crate::graph::AnkiGraph;
use crate::link::{self, Linked};
use crate::model::*;
use crate::storage::RowSource;
use crate::Result;

/// Build and link the graph for `source`.
///
/// On any error the partially built graph is dropped; nothing half-linked
/// escapes.
pub fn build<S: RowSource + ?Sized>(source: &S) -> Result<(AnkiGraph, Linked)> {
    let span = info_span!("build_collection");
    let _enter = span.enter();

    let mut graph = build_unlinked(source)?;
    let linked = link::link_all(&mut graph, source)?;

    info!(
        decks = graph.decks.len(),
        note_types = graph.note_types.len(),
        card_types = graph.card_types.len(),
        fields = graph.fields.len(),
        tags = graph.tags.len(),
        "collection graph linked"
    );
    Ok((graph, linked))
}

/// Build every entity map without linking.
pub fn build_unlinked<S: RowSource + ?Sized>(source: &S) -> Result<AnkiGraph> {
    let mut graph = AnkiGraph::new();
    build_decks(source, &mut graph)?;
    build_note_types(source, &mut graph)?;
    build_card_types(source, &mut graph)?;
    build_tags(source, &mut graph)?;
    build_fields(source, &mut graph)?;
    Ok(graph)
}

fn build_decks<S: RowSource + ?Sized>(source: &S, graph: &mut AnkiGraph) -> Result<()> {
    debug!("building decks");
    for row in source.rows(Table::Decks)? {
        graph.insert_deck(Deck::from_row(&row)?);
    }
    Ok(())
}

fn build_note_types<S: RowSource + ?Sized>(source: &S, graph: &mut AnkiGraph) -> Result<()> {
    debug!("building note types");
    for row in source.rows(Table::NoteTypes)? {
        graph.insert_note_type(NoteType::from_row(&row)?);
    }
    Ok(())
}

fn build_card_types<S: RowSource + ?Sized>(source: &S, graph: &mut AnkiGraph) -> Result<()> {
    debug!("building card types");
    for row in source.rows(Table::CardTemplates)? {
        graph.insert_card_type(CardType::from_row(&row)?);
    }
    Ok(())
}

fn build_tags<S: RowSource + ?Sized>(source: &S, graph: &mut AnkiGraph) -> Result<()> {
    debug!("building tags");
    for row in source.rows(Table::Tags)? {
        graph.insert_tag(Tag::from_row(&row)?);
    }
    Ok(())
}

fn build_fields<S: RowSource + ?Sized>(source: &S, graph: &mut AnkiGraph) -> Result<()> {
    debug!("building fields");
    for row in source.rows(Table::Fields)? {
        graph.insert_field(Field::from_row(&row)?);
    }
    Ok(())
}

/// Card entities for one deck.
pub fn build_cards_for_deck<S: RowSource + ?Sized>(source: &S, deck: DeckId) -> Result<Vec<Card>> {
    source.cards_for_deck(deck)?.into_iter().map(Card::from_row).collect()
}

/// Note entities for one deck, over the per-deck note rows.
pub fn build_notes_for_deck<S: RowSource + ?Sized>(source: &S, deck: DeckId) -> Result<Vec<Note>> {
    source.notes_for_deck(deck)?.into_iter().map(Note::from_row).collect()
}
