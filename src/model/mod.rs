//! # Collection Model
//!
//! Typed entities mirroring the tables of an Anki collection. Each entity is
//! built from exactly one [`Row`] and never looks at other entities; the
//! cross-references between them are filled in later by [`crate::link`].
//!
//! | Entity | Identity | Built from |
//! |--------|----------|------------|
//! | [`Deck`] | [`DeckId`] | `decks` |
//! | [`NoteType`] | [`NoteTypeId`] | `notetypes` |
//! | [`CardType`] | [`OrdinalKey`] | `templates` |
//! | [`Field`] | [`OrdinalKey`] | `fields` |
//! | [`Tag`] | name | `tags` |
//! | [`Note`] / [`Card`] | [`NoteId`] / [`CardId`] | `notes` / `cards`, per deck on request |
//!
//! Design rule: associations are stored as ids and keys, never as references.
//! This module is pure data — no I/O, no state.

pub mod value;
pub mod row;
pub mod key;
pub mod deck;
pub mod note_type;
pub mod card_type;
pub mod field;
pub mod tag;
pub mod note;

pub use value::Value;
pub use row::{Row, Table};
pub use key::{OrdinalKey, ParseKeyError};
pub use deck::{Deck, DeckId, DECK_NAME_SEPARATOR};
pub use note_type::{NoteType, NoteTypeId};
pub use card_type::CardType;
pub use field::Field;
pub use tag::Tag;
pub use note::{Card, CardId, Note, NoteId, NoteRecord, FIELD_SEPARATOR, split_tags};
