//! Export round-trip test: export a deck → parse the dump → plan an import.
//!
//! Tests the deck exchange path:
//!   Collection → export_deck_notes() → text → parse_notes() → plan_import()
//!
//! Re-importing an unchanged export must plan no changes.

use anki_graph::export::{export_deck_notes, export_listing_json, ExportOutcome};
use anki_graph::import::{parse_notes, plan_import, ImportOutcome};
use anki_graph::storage::MemoryRowSource;
use anki_graph::{Collection, DeckId, NoteId};

/// Helper: one deck with notes that need escaping.
fn seed_collection() -> Collection<MemoryRowSource> {
    let src = MemoryRowSource::new();
    src.add_deck(1, "Default");
    src.add_deck(2, "Geo\x1fCapitals");
    src.add_note_type(10, "Basic");
    src.add_card_template(10, 0, "Card 1");
    src.add_field(10, 0, "Front");
    src.add_field(10, 1, "Back");

    src.add_note(100, 10, &["France", "Paris"], "europe");
    src.add_note(101, 10, &["Japan", "Tokyo\nEast Asia"], "asia");
    src.add_note(102, 10, &["Tab\tCountry", "C:\\capital"], "");
    src.add_card(1000, 100, 2, 0);
    src.add_card(1001, 101, 2, 0);
    src.add_card(1002, 102, 2, 0);

    Collection::open(src).unwrap()
}

fn export_to_string(col: &Collection<MemoryRowSource>, name: &str) -> (ExportOutcome, String) {
    let mut buf = Vec::new();
    let outcome = export_deck_notes(col, name, &mut buf).unwrap();
    (outcome, String::from_utf8(buf).unwrap())
}

#[test]
fn test_export_note_count() {
    let col = seed_collection();
    let (outcome, dump) = export_to_string(&col, "Geo::Capitals");

    assert_eq!(outcome, ExportOutcome::Exported { deck: DeckId(2), notes: 3 });
    let data_lines = dump.lines().filter(|l| !l.starts_with('#')).count();
    assert_eq!(data_lines, 3, "Expected 3 note lines, got:\n{dump}");
}

#[test]
fn test_export_header() {
    let col = seed_collection();
    let (_, dump) = export_to_string(&col, "Geo::Capitals");

    assert!(dump.contains("# deck: Geo::Capitals"));
    assert!(dump.contains("# notes: 3"));
}

#[test]
fn test_export_escapes_content() {
    let col = seed_collection();
    let (_, dump) = export_to_string(&col, "Geo::Capitals");

    assert!(dump.contains("101\tJapan\tTokyo\\nEast Asia\tasia"));
    assert!(dump.contains("102\tTab\\tCountry\tC:\\\\capital\t"));
}

#[test]
fn test_export_unknown_deck() {
    let col = seed_collection();
    let (outcome, dump) = export_to_string(&col, "Nope");

    assert_eq!(outcome, ExportOutcome::DeckNotFound { name: "Nope".into() });
    assert!(dump.is_empty(), "Nothing may be written for a missing deck");
}

#[test]
fn test_export_empty_deck() {
    let col = seed_collection();
    let (outcome, dump) = export_to_string(&col, "Default");

    assert_eq!(outcome, ExportOutcome::Exported { deck: DeckId(1), notes: 0 });
    assert!(dump.contains("# notes: 0"));
}

#[test]
fn test_reimport_unchanged_export_is_noop() {
    let col = seed_collection();
    let (_, dump) = export_to_string(&col, "Geo::Capitals");

    let incoming = parse_notes(dump.as_bytes()).unwrap();
    assert_eq!(incoming.len(), 3);
    assert_eq!(incoming[1].id, Some(NoteId(101)));
    assert_eq!(incoming[1].body, "Tokyo\nEast Asia");

    match plan_import(&col, "Geo::Capitals", incoming).unwrap() {
        ImportOutcome::Planned(plan) => {
            assert_eq!(plan.deck, Some(DeckId(2)));
            assert!(plan.added.is_empty());
            assert!(plan.updated.is_empty());
            assert_eq!(plan.unchanged, 3);
        }
        other => panic!("expected a plan, got {other:?}"),
    }
}

#[test]
fn test_import_into_other_deck_adds_everything() {
    let col = seed_collection();
    let (_, dump) = export_to_string(&col, "Geo::Capitals");
    let incoming = parse_notes(dump.as_bytes()).unwrap();

    let ImportOutcome::Planned(plan) = plan_import(&col, "Default", incoming).unwrap() else {
        panic!("Default deck exists");
    };
    assert_eq!(plan.added.len(), 3);
    assert_eq!(plan.unchanged, 0);
}

#[test]
fn test_import_unknown_deck() {
    let col = seed_collection();
    let outcome = plan_import(&col, "Nope", Vec::new()).unwrap();
    assert_eq!(outcome, ImportOutcome::DeckNotFound { name: "Nope".into() });
}

#[test]
fn test_listing_json() {
    let col = seed_collection();
    let mut buf = Vec::new();
    export_listing_json(&col, &mut buf).unwrap();

    let doc: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(doc["totals"]["decks"], 2);
    assert_eq!(doc["totals"]["cards"], 3);
    assert_eq!(doc["decks"][1]["name"], "Geo::Capitals");
    assert_eq!(doc["decks"][1]["notes"], 3);
    assert_eq!(doc["note_types"][0]["fields"][1], "Back");
}
