//! SQLite row source over an Anki collection file.
//!
//! Reads the normalised tables of a modern collection (`decks`,
//! `notetypes`, `templates`, `fields`, `tags`, `notes`, `cards`). The
//! connection is held for the lifetime of the source and closed on drop,
//! so every exit path of a command releases the file.
//!
//! Name columns in a collection are declared `collate unicase`, a collation
//! Anki registers on its own connections. SQLite refuses to read tables
//! keyed on an unknown collation, so every connection this source holds has
//! it registered first.

use std::cmp::Ordering;
use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, params};
use tracing::debug;

use crate::model::*;
use crate::{Error, Result};
use super::RowSource;

const SQL_DECK_NOTE_IDS: &str = "select nid from cards where did = ?1";

/// Collation name used by the collection schema.
pub const UNICASE: &str = "unicase";

/// Row source backed by a `rusqlite::Connection`.
pub struct SqliteRowSource {
    conn: Connection,
}

impl SqliteRowSource {
    /// Open a collection file. Fails with `NotFound` if it does not exist.
    pub fn open(path: impl AsRef<Path>, read_only: bool) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(format!("collection database {}", path.display())));
        }
        let flags = if read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };
        let conn = Connection::open_with_flags(path, flags)?;
        register_collations(&conn)?;
        debug!(path = %path.display(), read_only, "opened collection database");
        Ok(Self { conn })
    }

    /// Wrap an existing connection, registering the collations it needs.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        register_collations(&conn)?;
        Ok(Self { conn })
    }

    fn query_rows(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Row>> {
        let mut stmt = self.conn.prepare(sql)?;
        let width = stmt.column_count();
        let rows = stmt.query_map(params, |r| {
            (0..width)
                .map(|i| r.get_ref(i).map(value_from_ref))
                .collect::<rusqlite::Result<Row>>()
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn query_count(&self, sql: &str, params: impl rusqlite::Params) -> Result<u64> {
        let n: i64 = self.conn.query_row(sql, params, |r| r.get(0))?;
        Ok(n.max(0) as u64)
    }
}

/// Register the collations the collection schema refers to on `conn`.
///
/// Needed before creating or reading any table declared with
/// `collate unicase`.
pub fn register_collations(conn: &Connection) -> Result<()> {
    conn.create_collation(UNICASE, unicase_cmp)?;
    Ok(())
}

/// Case-insensitive comparison, folding each character to lowercase.
fn unicase_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

fn value_from_ref(v: ValueRef<'_>) -> Value {
    match v {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

impl RowSource for SqliteRowSource {
    fn rows(&self, table: Table) -> Result<Vec<Row>> {
        self.query_rows(&format!("select * from {table}"), [])
    }

    fn note_type_ids_for_deck(&self, deck: DeckId) -> Result<Vec<NoteTypeId>> {
        let sql = format!("select distinct mid from notes where id in ({SQL_DECK_NOTE_IDS})");
        let mut stmt = self.conn.prepare(&sql)?;
        let ids = stmt.query_map(params![deck.0], |r| r.get::<_, i64>(0))?;
        Ok(ids.map(|id| id.map(NoteTypeId)).collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn notes_for_deck(&self, deck: DeckId) -> Result<Vec<Row>> {
        let sql = format!(
            "select id, sfld, flds, tags from notes where id in ({SQL_DECK_NOTE_IDS}) order by id"
        );
        self.query_rows(&sql, params![deck.0])
    }

    fn cards_for_deck(&self, deck: DeckId) -> Result<Vec<Row>> {
        self.query_rows("select * from cards where did = ?1 order by id", params![deck.0])
    }

    fn count(&self, table: Table) -> Result<u64> {
        self.query_count(&format!("select count(*) from {table}"), [])
    }

    fn card_count_for_deck(&self, deck: DeckId) -> Result<u64> {
        self.query_count("select count(*) from cards where did = ?1", params![deck.0])
    }

    fn note_count_for_deck(&self, deck: DeckId) -> Result<u64> {
        self.query_count("select count(distinct nid) from cards where did = ?1", params![deck.0])
    }
}
