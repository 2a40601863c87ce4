//! Deck export — write a deck's notes as tab-separated text.
//!
//! ```text
//! Collection → deck_by_name() → notes_for_deck() → export_deck_notes()
//!   → one line per note, readable again by import::parse_notes()
//! ```
//!
//! Line format: `id \t subject \t body \t tags`, where `body` is everything
//! after the note's first field. Backslash, tab, newline, carriage return
//! and the field separator are backslash-escaped.

use std::io::Write;

use serde::Serialize;

use crate::listing::{self, CollectionTotals, DeckSummary, NoteTypeSummary};
use crate::model::*;
use crate::storage::RowSource;
use crate::{Collection, Result};

/// Result of an export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// No deck has the requested name. Nothing was written.
    DeckNotFound { name: String },
    Exported { deck: DeckId, notes: usize },
}

/// Export the notes of the deck named `deck_name`.
pub fn export_deck_notes<S: RowSource>(
    col: &Collection<S>,
    deck_name: &str,
    writer: &mut dyn Write,
) -> Result<ExportOutcome> {
    let Some(deck) = col.deck_by_name(deck_name) else {
        return Ok(ExportOutcome::DeckNotFound { name: deck_name.to_string() });
    };
    let notes = col.notes_for_deck(deck.id)?;

    // Header
    writeln!(writer, "# anki-graph deck export")?;
    writeln!(writer, "# deck: {}", deck.display_name())?;
    writeln!(writer, "# notes: {}", notes.len())?;

    for note in &notes {
        writeln!(writer, "{}", format_note(note))?;
    }

    Ok(ExportOutcome::Exported { deck: deck.id, notes: notes.len() })
}

#[derive(Serialize)]
struct ListingDocument {
    totals: CollectionTotals,
    decks: Vec<DeckSummary>,
    note_types: Vec<NoteTypeSummary>,
}

/// Write the deck and note type listings as pretty JSON.
pub fn export_listing_json<S: RowSource>(col: &Collection<S>, writer: &mut dyn Write) -> Result<()> {
    let doc = ListingDocument {
        totals: listing::totals(col)?,
        decks: listing::list_decks(col)?,
        note_types: listing::list_note_types(col.graph()),
    };
    serde_json::to_writer_pretty(&mut *writer, &doc)?;
    writeln!(writer)?;
    Ok(())
}

/// Format one note as an export line (without the trailing newline).
pub fn format_note(note: &NoteRecord) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        note.id,
        escape(&note.subject),
        escape(note.body()),
        escape(&note.tag_string()),
    )
}

pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            FIELD_SEPARATOR => out.push_str("\\x1f"),
            c => out.push(c),
        }
    }
    out
}
