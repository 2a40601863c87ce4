//! # Linker
//!
//! Resolves the many-to-many relationships between decks, note types, card
//! types and fields once every entity exists. Three passes, in order:
//!
//! | Pass | Function | Wires | I/O |
//! |------|----------|-------|-----|
//! | 1 | [`link_deck_note_types`] | deck ↔ note type | one query per deck |
//! | 2 | [`link_card_types`] | note type → card type, card type ↔ deck | none |
//! | 3 | [`link_fields`] | note type → field | none |
//!
//! Each pass returns a stage token that the next pass takes by value, so
//! running them out of order does not compile. Pass 2 reads the deck sets
//! that pass 1 leaves on every note type.
//!
//! A card type or field whose note type does not exist is a
//! [`Error::ReferentialIntegrity`] failure. The passes stop at the first one;
//! callers drop the half-linked graph.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::graph::AnkiGraph;
use crate::model::*;
use crate::storage::RowSource;
use crate::{Error, Result};

// ============================================================================
// Stage tokens
// ============================================================================

/// Pass 1 has run: every deck knows its note types and vice versa.
#[derive(Debug)]
pub struct DeckNoteTypesLinked {
    deck_note_type_links: usize,
}

/// Pass 2 has run: card types are owned and associated with decks.
#[derive(Debug)]
pub struct CardTypesLinked {
    deck_note_type_links: usize,
    card_type_links: usize,
    deck_card_type_links: usize,
}

/// All three passes have run.
#[derive(Debug, Clone, Copy)]
pub struct Linked {
    pub stats: LinkStats,
}

/// Association counts produced by a full link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub deck_note_type_links: usize,
    pub card_type_links: usize,
    pub deck_card_type_links: usize,
    pub field_links: usize,
}

// ============================================================================
// Passes
// ============================================================================

/// Pass 1 — deck ↔ note type.
///
/// Note type ids are deduplicated here even if the source already returns
/// them distinct, so a deck is linked to each note type exactly once.
pub fn link_deck_note_types<S: RowSource + ?Sized>(
    graph: &mut AnkiGraph,
    source: &S,
) -> Result<DeckNoteTypesLinked> {
    let mut links = 0;
    for deck in graph.decks.values_mut() {
        let ids: BTreeSet<NoteTypeId> = source.note_type_ids_for_deck(deck.id)?.into_iter().collect();
        for ntid in ids {
            let nt = graph.note_types.get_mut(&ntid).ok_or_else(|| Error::ReferentialIntegrity {
                entity: "deck",
                key: deck.id.to_string(),
                note_type_id: ntid,
            })?;
            deck.add_note_type(ntid);
            nt.add_deck(deck.id);
            links += 1;
        }
    }
    debug!(links, "linked decks and note types");
    Ok(DeckNoteTypesLinked { deck_note_type_links: links })
}

/// Pass 2 — note type → card type, card type ↔ deck.
pub fn link_card_types(graph: &mut AnkiGraph, prev: DeckNoteTypesLinked) -> Result<CardTypesLinked> {
    let mut owned = 0;
    let mut deck_links = 0;
    for ct in graph.card_types.values_mut() {
        let ntid = ct.note_type_id();
        let nt = graph.note_types.get_mut(&ntid).ok_or_else(|| Error::ReferentialIntegrity {
            entity: "card type",
            key: ct.key.to_string(),
            note_type_id: ntid,
        })?;
        nt.add_card_type(ct.key);
        ct.set_owner(nt.id);
        owned += 1;

        for &did in nt.decks() {
            let deck = graph
                .decks
                .get_mut(&did)
                .ok_or_else(|| Error::NotFound(format!("Deck {did} linked to note type {ntid}")))?;
            deck.add_card_type(ct.key);
            ct.add_deck(did);
            deck_links += 1;
        }
    }
    debug!(owned, deck_links, "linked card types");
    Ok(CardTypesLinked {
        deck_note_type_links: prev.deck_note_type_links,
        card_type_links: owned,
        deck_card_type_links: deck_links,
    })
}

/// Pass 3 — note type → field.
pub fn link_fields(graph: &mut AnkiGraph, prev: CardTypesLinked) -> Result<Linked> {
    let mut owned = 0;
    for field in graph.fields.values_mut() {
        let ntid = field.note_type_id();
        let nt = graph.note_types.get_mut(&ntid).ok_or_else(|| Error::ReferentialIntegrity {
            entity: "field",
            key: field.key.to_string(),
            note_type_id: ntid,
        })?;
        nt.add_field(field.key);
        field.set_owner(nt.id);
        owned += 1;
    }
    debug!(owned, "linked fields");
    Ok(Linked {
        stats: LinkStats {
            deck_note_type_links: prev.deck_note_type_links,
            card_type_links: prev.card_type_links,
            deck_card_type_links: prev.deck_card_type_links,
            field_links: owned,
        },
    })
}

/// Run all three passes in order.
pub fn link_all<S: RowSource + ?Sized>(graph: &mut AnkiGraph, source: &S) -> Result<Linked> {
    let decks = link_deck_note_types(graph, source)?;
    let card_types = link_card_types(graph, decks)?;
    link_fields(graph, card_types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build_unlinked;
    use crate::storage::MemoryRowSource;

    fn basic_source() -> MemoryRowSource {
        let src = MemoryRowSource::new();
        src.add_deck(1, "Default");
        src.add_deck(2, "Unused");
        src.add_note_type(10, "Basic");
        src.add_note_type(20, "Basic (and reversed card)");
        src.add_card_template(10, 0, "Card 1");
        src.add_card_template(20, 0, "Card 1");
        src.add_card_template(20, 1, "Card 2");
        src.add_field(10, 0, "Front");
        src.add_field(10, 1, "Back");
        src.add_field(20, 0, "Front");
        src.add_field(20, 1, "Back");
        src.add_note(100, 10, &["Q", "A"], "");
        src.add_card(1000, 100, 1, 0);
        src
    }

    /// Row source that reports a note type once per card instead of once.
    struct RepeatingIds(MemoryRowSource);

    impl RowSource for RepeatingIds {
        fn rows(&self, table: Table) -> Result<Vec<Row>> {
            self.0.rows(table)
        }

        fn note_type_ids_for_deck(&self, deck: DeckId) -> Result<Vec<NoteTypeId>> {
            let ids = self.0.note_type_ids_for_deck(deck)?;
            Ok(ids.iter().chain(&ids).chain(&ids).copied().collect())
        }

        fn notes_for_deck(&self, deck: DeckId) -> Result<Vec<Row>> {
            self.0.notes_for_deck(deck)
        }

        fn cards_for_deck(&self, deck: DeckId) -> Result<Vec<Row>> {
            self.0.cards_for_deck(deck)
        }
    }

    #[test]
    fn test_repeated_note_type_ids_link_once() {
        let src = RepeatingIds(basic_source());
        assert_eq!(src.note_type_ids_for_deck(DeckId(1)).unwrap(), vec![NoteTypeId(10); 3]);

        let mut graph = build_unlinked(&src).unwrap();
        let linked = link_all(&mut graph, &src).unwrap();

        let deck = graph.deck(DeckId(1)).unwrap();
        assert_eq!(deck.note_types(), &BTreeSet::from([NoteTypeId(10)]));
        assert_eq!(graph.note_type(NoteTypeId(10)).unwrap().decks(), &BTreeSet::from([DeckId(1)]));
        assert_eq!(linked.stats.deck_note_type_links, 1);
        assert_eq!(linked.stats.deck_card_type_links, 1);
    }

    #[test]
    fn test_passes_in_order() {
        let src = basic_source();
        let mut graph = build_unlinked(&src).unwrap();

        let p1 = link_deck_note_types(&mut graph, &src).unwrap();
        assert_eq!(p1.deck_note_type_links, 1);
        assert!(graph.card_type(OrdinalKey::new(NoteTypeId(10), 0)).unwrap().owner().is_none());

        let p2 = link_card_types(&mut graph, p1).unwrap();
        assert_eq!(p2.card_type_links, 3);
        assert_eq!(p2.deck_card_type_links, 1);

        let linked = link_fields(&mut graph, p2).unwrap();
        assert_eq!(
            linked.stats,
            LinkStats {
                deck_note_type_links: 1,
                card_type_links: 3,
                deck_card_type_links: 1,
                field_links: 4,
            }
        );
    }

    #[test]
    fn test_unused_note_type_has_no_decks() {
        let src = basic_source();
        let mut graph = build_unlinked(&src).unwrap();
        link_all(&mut graph, &src).unwrap();

        let reversed = graph.note_type(NoteTypeId(20)).unwrap();
        assert!(reversed.decks().is_empty());
        assert_eq!(reversed.card_types().len(), 2);
        for ct in graph.card_types_of(reversed) {
            assert!(ct.decks().is_empty());
            assert_eq!(ct.owner(), Some(NoteTypeId(20)));
        }
        assert!(graph.deck(DeckId(2)).unwrap().note_types().is_empty());
    }

    #[test]
    fn test_dangling_card_type_is_fatal() {
        let src = basic_source();
        src.add_card_template(99, 0, "Orphan");
        let mut graph = build_unlinked(&src).unwrap();
        let err = link_all(&mut graph, &src).unwrap_err();
        match err {
            Error::ReferentialIntegrity { entity, key, note_type_id } => {
                assert_eq!(entity, "card type");
                assert_eq!(key, "99:0");
                assert_eq!(note_type_id, NoteTypeId(99));
            }
            other => panic!("expected ReferentialIntegrity, got {other:?}"),
        }
    }

    #[test]
    fn test_dangling_note_type_from_deck_query_is_fatal() {
        let src = basic_source();
        src.add_note(101, 77, &["x", "y"], "");
        src.add_card(1001, 101, 2, 0);
        let mut graph = build_unlinked(&src).unwrap();
        let err = link_deck_note_types(&mut graph, &src).unwrap_err();
        assert!(matches!(err, Error::ReferentialIntegrity { entity: "deck", .. }));
    }
}
