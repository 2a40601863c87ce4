//! # Row Source Trait
//!
//! This is THE contract between the graph builder and the relational store.
//! The builder only ever asks for whole tables plus two per-deck queries, so
//! the surface is deliberately small and read-only.
//!
//! ## Implementations
//!
//! | Source | Module | Description |
//! |--------|--------|-------------|
//! | `MemoryRowSource` | `memory` | In-memory tables for testing/embedding |
//! | `SqliteRowSource` | `sqlite` | Anki `collection.anki2` file via rusqlite |

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use crate::model::*;
use crate::Result;

pub use memory::MemoryRowSource;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRowSource;

// ============================================================================
// Source Configuration
// ============================================================================

/// Configuration for opening a row source.
#[derive(Debug, Clone)]
pub enum SourceConfig {
    /// Empty in-memory tables
    Memory,

    /// Anki collection file
    #[cfg(feature = "sqlite")]
    Sqlite {
        path: std::path::PathBuf,
        /// Open with `SQLITE_OPEN_READ_ONLY`. The builder never writes.
        read_only: bool,
    },
}

impl SourceConfig {
    /// Read-only SQLite configuration for the given collection file.
    #[cfg(feature = "sqlite")]
    pub fn sqlite(path: impl Into<std::path::PathBuf>) -> Self {
        SourceConfig::Sqlite { path: path.into(), read_only: true }
    }
}

/// Open the row source described by `config`.
pub fn open(config: &SourceConfig) -> Result<Box<dyn RowSource>> {
    match config {
        SourceConfig::Memory => Ok(Box::new(MemoryRowSource::new())),
        #[cfg(feature = "sqlite")]
        SourceConfig::Sqlite { path, read_only } => {
            Ok(Box::new(SqliteRowSource::open(path, *read_only)?))
        }
    }
}

// ============================================================================
// RowSource Trait
// ============================================================================

/// The query surface the builder consumes.
///
/// Rows come back in whatever order the store yields them. Column layout
/// per table follows the collection schema:
///
/// | Table | Leading columns |
/// |-------|-----------------|
/// | decks | `id, name, mtime_secs, ...` |
/// | notetypes | `id, name, mtime_secs, ...` |
/// | templates | `ntid, ord, name, ...` |
/// | fields | `ntid, ord, name, ...` |
/// | tags | `tag, ...` |
/// | notes | `id, guid, mid, mod, usn, tags, flds, sfld, ...` |
/// | cards | `id, nid, did, ord, ...` |
pub trait RowSource {
    /// All rows of a table.
    fn rows(&self, table: Table) -> Result<Vec<Row>>;

    /// Distinct note type ids of the notes behind the deck's cards.
    fn note_type_ids_for_deck(&self, deck: DeckId) -> Result<Vec<NoteTypeId>>;

    /// Notes behind the deck's cards as `(id, subject, content, tags)` rows.
    fn notes_for_deck(&self, deck: DeckId) -> Result<Vec<Row>>;

    /// Raw card rows of a deck.
    fn cards_for_deck(&self, deck: DeckId) -> Result<Vec<Row>>;

    /// Number of rows in a table.
    fn count(&self, table: Table) -> Result<u64> {
        Ok(self.rows(table)?.len() as u64)
    }

    fn card_count_for_deck(&self, deck: DeckId) -> Result<u64> {
        Ok(self.cards_for_deck(deck)?.len() as u64)
    }

    fn note_count_for_deck(&self, deck: DeckId) -> Result<u64> {
        Ok(self.notes_for_deck(deck)?.len() as u64)
    }
}

impl<S: RowSource + ?Sized> RowSource for Box<S> {
    fn rows(&self, table: Table) -> Result<Vec<Row>> {
        (**self).rows(table)
    }

    fn note_type_ids_for_deck(&self, deck: DeckId) -> Result<Vec<NoteTypeId>> {
        (**self).note_type_ids_for_deck(deck)
    }

    fn notes_for_deck(&self, deck: DeckId) -> Result<Vec<Row>> {
        (**self).notes_for_deck(deck)
    }

    fn cards_for_deck(&self, deck: DeckId) -> Result<Vec<Row>> {
        (**self).cards_for_deck(deck)
    }

    fn count(&self, table: Table) -> Result<u64> {
        (**self).count(table)
    }

    fn card_count_for_deck(&self, deck: DeckId) -> Result<u64> {
        (**self).card_count_for_deck(deck)
    }

    fn note_count_for_deck(&self, deck: DeckId) -> Result<u64> {
        (**self).note_count_for_deck(deck)
    }
}
