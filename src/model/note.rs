//! Notes and cards.
//!
//! `Note` and `Card` are thin wrappers over their raw rows and are only
//! built when a caller asks for a specific deck. Exports go through
//! [`NoteRecord`], which is read straight from the per-deck note query.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use super::{DeckId, Row, Table, Value};
use crate::{Error, Result};

/// Separator between the fields of a note inside `notes.flds`.
pub const FIELD_SEPARATOR: char = '\x1f';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub i64);

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A note row, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub raw: Row,
}

impl Note {
    pub fn from_row(row: Row) -> Result<Self> {
        let id = NoteId(row.int(Table::Notes, 0)?);
        Ok(Self { id, raw: row })
    }
}

/// A card row, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub note_id: NoteId,
    pub deck_id: DeckId,
    pub raw: Row,
}

impl Card {
    /// Columns: `id, nid, did, ...`
    pub fn from_row(row: Row) -> Result<Self> {
        let id = CardId(row.int(Table::Cards, 0)?);
        let note_id = NoteId(row.int(Table::Cards, 1)?);
        let deck_id = DeckId(row.int(Table::Cards, 2)?);
        Ok(Self { id, note_id, deck_id, raw: row })
    }
}

/// A note as returned by the per-deck note query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: NoteId,
    /// Sort field of the note.
    pub subject: String,
    /// All fields, joined by [`FIELD_SEPARATOR`].
    pub content: String,
    pub tags: SmallVec<[String; 4]>,
}

impl NoteRecord {
    /// Columns: `id, subject, content, tags`
    pub fn from_row(row: &Row) -> Result<Self> {
        let id = NoteId(row.int(Table::Notes, 0)?);
        let subject = text_like(row, 1)?;
        let content = text_like(row, 2)?;
        let tags = match row.get(3) {
            None | Some(Value::Null) => SmallVec::new(),
            Some(_) => split_tags(row.text(Table::Notes, 3)?),
        };
        Ok(Self { id, subject, content, tags })
    }

    /// Individual field values.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.content.split(FIELD_SEPARATOR)
    }

    /// `(first field, remainder)`. The remainder keeps any further
    /// separators; a single-field note has an empty remainder.
    pub fn split_content(&self) -> (&str, &str) {
        self.content.split_once(FIELD_SEPARATOR).unwrap_or((self.content.as_str(), ""))
    }

    /// Content after the first field.
    pub fn body(&self) -> &str {
        self.split_content().1
    }

    /// Tags in the stored space-separated form.
    pub fn tag_string(&self) -> String {
        self.tags.join(" ")
    }
}

/// Split a stored tag string (`" tag1 tag2 "`) into tags.
pub fn split_tags(raw: &str) -> SmallVec<[String; 4]> {
    raw.split_whitespace().map(str::to_string).collect()
}

/// `sfld` has integer affinity, so numeric subjects come back as numbers.
fn text_like(row: &Row, column: usize) -> Result<String> {
    match row.get(column) {
        Some(Value::Text(s)) => Ok(s.clone()),
        Some(Value::Int(i)) => Ok(i.to_string()),
        Some(Value::Float(f)) => Ok(f.to_string()),
        other => Err(Error::MalformedRow {
            table: Table::Notes,
            column,
            expected: "TEXT",
            found: other.map_or_else(
                || format!("row of {} columns", row.len()),
                |v| v.type_name().to_string(),
            ),
        }),
    }
}
