//! # anki-graph — In-memory object graph over an Anki collection
//!
//! Reads the decks, note types, card templates, fields and tags of a
//! collection, links them into a bidirectional graph, and answers listing,
//! export and import-planning questions over it.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `RowSource` is the contract between the builder and the store
//! 2. **Arena, not pointers**: entities live in id-keyed maps; associations are id sets
//! 3. **Ordered linking**: the three link passes hand stage tokens to each other
//! 4. **Lazy bulk data**: notes and cards are only read per deck, on request
//!
//! ## Quick Start
//!
//! ```rust
//! use anki_graph::{Collection, DeckId, NoteTypeId};
//! use anki_graph::storage::MemoryRowSource;
//!
//! # fn example() -> anki_graph::Result<()> {
//! let source = MemoryRowSource::new();
//! source.add_deck(1, "Default");
//! source.add_note_type(10, "Basic");
//! source.add_card_template(10, 0, "Card 1");
//! source.add_field(10, 0, "Front");
//! source.add_field(10, 1, "Back");
//! source.add_note(100, 10, &["Question", "Answer"], "");
//! source.add_card(1000, 100, 1, 0);
//!
//! let col = Collection::open(source)?;
//! let deck = col.graph().deck(DeckId(1)).unwrap();
//! assert!(deck.note_types().contains(&NoteTypeId(10)));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Row Sources
//!
//! | Source | Feature | Description |
//! |--------|---------|-------------|
//! | Memory | (always) | In-memory tables for testing/embedding |
//! | SQLite | `sqlite` (default) | Anki `collection.anki2` via rusqlite |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod storage;
pub mod graph;
pub mod build;
pub mod link;
pub mod listing;
pub mod export;
pub mod import;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Deck, DeckId, NoteType, NoteTypeId, CardType, Field, Tag,
    Note, NoteId, Card, CardId, NoteRecord, OrdinalKey,
    Row, Table, Value,
};

// ============================================================================
// Re-exports: Storage, Graph, Linker
// ============================================================================

pub use storage::{RowSource, SourceConfig};
pub use graph::AnkiGraph;
pub use link::LinkStats;

use tracing::debug;

// ============================================================================
// Top-level Collection handle
// ============================================================================

/// The primary entry point. A `Collection` owns a row source and the graph
/// built from it.
///
/// The graph is built and linked once in [`Collection::open`]. Dropping the
/// collection drops the source, which releases the store connection.
pub struct Collection<S: RowSource> {
    source: S,
    graph: AnkiGraph,
    stats: LinkStats,
}

impl<S: RowSource> Collection<S> {
    /// Build and link the graph over `source`.
    pub fn open(source: S) -> Result<Self> {
        let (graph, linked) = build::build(&source)?;
        Ok(Self { source, graph, stats: linked.stats })
    }

    pub fn graph(&self) -> &AnkiGraph {
        &self.graph
    }

    /// Access the underlying row source (for advanced use).
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn link_stats(&self) -> LinkStats {
        self.stats
    }

    /// Deck by stored or `::`-joined name. `None` is a lookup miss the caller
    /// must report.
    pub fn deck_by_name(&self, name: &str) -> Option<&Deck> {
        self.graph.deck_by_name(name)
    }

    /// Notes behind a deck's cards, read on demand.
    pub fn notes_for_deck(&self, deck: DeckId) -> Result<Vec<NoteRecord>> {
        self.source
            .notes_for_deck(deck)?
            .iter()
            .map(NoteRecord::from_row)
            .collect()
    }

    /// Populate the card map with one deck's cards. Returns how many were
    /// loaded.
    pub fn load_cards(&mut self, deck: DeckId) -> Result<usize> {
        self.require_deck(deck)?;
        let cards = build::build_cards_for_deck(&self.source, deck)?;
        let n = cards.len();
        for card in cards {
            self.graph.insert_card(card);
        }
        debug!(deck = %deck, cards = n, "loaded cards");
        Ok(n)
    }

    /// Populate the note map with one deck's notes. Returns how many were
    /// loaded.
    pub fn load_notes(&mut self, deck: DeckId) -> Result<usize> {
        self.require_deck(deck)?;
        let notes = build::build_notes_for_deck(&self.source, deck)?;
        let n = notes.len();
        for note in notes {
            self.graph.insert_note(note);
        }
        debug!(deck = %deck, notes = n, "loaded notes");
        Ok(n)
    }

    /// Number of notes in the store.
    pub fn note_count(&self) -> Result<u64> {
        self.source.count(Table::Notes)
    }

    /// Number of cards in the store.
    pub fn card_count(&self) -> Result<u64> {
        self.source.count(Table::Cards)
    }

    fn require_deck(&self, deck: DeckId) -> Result<()> {
        if self.graph.deck(deck).is_none() {
            return Err(Error::NotFound(format!("Deck {deck}")));
        }
        Ok(())
    }
}

/// Collection read from an Anki collection file.
#[cfg(feature = "sqlite")]
impl Collection<storage::SqliteRowSource> {
    /// Open `path` read-only and build the graph.
    pub fn open_sqlite(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::open(storage::SqliteRowSource::open(path, true)?)
    }
}

/// Collection over whichever source a [`SourceConfig`] names.
impl Collection<Box<dyn RowSource>> {
    pub fn open_with(config: &SourceConfig) -> Result<Self> {
        Self::open(storage::open(config)?)
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Referential integrity violation: {entity} {key} references missing note type {note_type_id}")]
    ReferentialIntegrity {
        entity: &'static str,
        key: String,
        note_type_id: NoteTypeId,
    },

    #[error("Malformed row in {table}: column {column} expected {expected}, found {found}")]
    MalformedRow {
        table: Table,
        column: usize,
        expected: &'static str,
        found: String,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Storage(format!("SQLite error: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
