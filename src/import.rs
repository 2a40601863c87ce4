//! Import planning.
//!
//! Reads notes in the export format and works out what a merge into a deck
//! would do. The plan is handed to the bulk loader that owns the write path;
//! nothing here touches the store.

use std::collections::HashMap;
use std::io::BufRead;

use serde::Serialize;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::model::*;
use crate::storage::RowSource;
use crate::{Collection, Error, Result};

/// A note read from an import file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedNote {
    /// Present when the line came from an export of this collection.
    pub id: Option<NoteId>,
    pub subject: String,
    pub body: String,
    pub tags: SmallVec<[String; 4]>,
}

/// What merging a set of notes into a deck would change. Notes are matched
/// by subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportPlan {
    pub deck: Option<DeckId>,
    /// Subjects the deck does not have yet.
    pub added: Vec<ImportedNote>,
    /// Existing notes whose body or tags differ, with the note they replace.
    pub updated: Vec<(NoteId, ImportedNote)>,
    pub unchanged: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// No deck has the requested name.
    DeckNotFound { name: String },
    Planned(ImportPlan),
}

/// Parse export-format lines.
///
/// Accepts `id \t subject \t body \t tags` as written by the exporter, and
/// `subject \t body [\t tags]` for hand-written files. `#` lines and blank
/// lines are skipped.
pub fn parse_notes<R: BufRead>(reader: R) -> Result<Vec<ImportedNote>> {
    let mut notes = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        notes.push(parse_line(line).map_err(|message| Error::Parse { line: idx + 1, message })?);
    }
    Ok(notes)
}

fn parse_line(line: &str) -> std::result::Result<ImportedNote, String> {
    let cols: Vec<&str> = line.split('\t').collect();
    let (id, subject, body, tags) = match cols.as_slice() {
        [id, subject, body, tags] => {
            let id = if id.is_empty() {
                None
            } else {
                Some(NoteId(id.parse().map_err(|_| format!("invalid note id '{id}'"))?))
            };
            (id, *subject, *body, *tags)
        }
        [subject, body, tags] => (None, *subject, *body, *tags),
        [subject, body] => (None, *subject, *body, ""),
        _ => return Err(format!("expected 2 to 4 tab-separated columns, found {}", cols.len())),
    };
    Ok(ImportedNote {
        id,
        subject: unescape(subject)?,
        body: unescape(body)?,
        tags: split_tags(&unescape(tags)?),
    })
}

fn unescape(s: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                if hex != "1f" {
                    return Err(format!("unsupported escape '\\x{hex}'"));
                }
                out.push(FIELD_SEPARATOR);
            }
            Some(other) => return Err(format!("unsupported escape '\\{other}'")),
            None => return Err("dangling backslash".to_string()),
        }
    }
    Ok(out)
}

/// Match `incoming` against `existing` by subject. When several notes on
/// either side share a subject the last one wins.
pub fn plan_merge(existing: &[NoteRecord], incoming: Vec<ImportedNote>) -> ImportPlan {
    let mut by_subject: HashMap<&str, &NoteRecord> = HashMap::with_capacity(existing.len());
    for note in existing {
        if let Some(old) = by_subject.insert(note.subject.as_str(), note) {
            warn!(subject = %note.subject, replaced = %old.id, by = %note.id, "duplicate subject in deck");
        }
    }

    let mut latest: Vec<ImportedNote> = Vec::with_capacity(incoming.len());
    let mut seen: HashMap<String, usize> = HashMap::new();
    for note in incoming {
        match seen.get(&note.subject) {
            Some(&i) => latest[i] = note,
            None => {
                seen.insert(note.subject.clone(), latest.len());
                latest.push(note);
            }
        }
    }

    let mut plan = ImportPlan::default();
    for note in latest {
        match by_subject.get(note.subject.as_str()) {
            None => plan.added.push(note),
            Some(old) if old.body() == note.body && old.tags == note.tags => plan.unchanged += 1,
            Some(old) => plan.updated.push((old.id, note)),
        }
    }
    plan
}

/// Plan merging `incoming` into the deck named `deck_name`.
pub fn plan_import<S: RowSource>(
    col: &Collection<S>,
    deck_name: &str,
    incoming: Vec<ImportedNote>,
) -> Result<ImportOutcome> {
    let Some(deck) = col.deck_by_name(deck_name) else {
        return Ok(ImportOutcome::DeckNotFound { name: deck_name.to_string() });
    };
    let existing = col.notes_for_deck(deck.id)?;
    let mut plan = plan_merge(&existing, incoming);
    plan.deck = Some(deck.id);
    debug!(
        deck = %deck.id,
        added = plan.added.len(),
        updated = plan.updated.len(),
        unchanged = plan.unchanged,
        "planned import"
    );
    Ok(ImportOutcome::Planned(plan))
}
