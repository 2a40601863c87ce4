//! End-to-end tests against an Anki-shaped SQLite collection file.

#![cfg(feature = "sqlite")]

use anki_graph::listing::{list_decks, list_note_types};
use anki_graph::storage::SqliteRowSource;
use anki_graph::storage::sqlite::register_collations;
use anki_graph::{Collection, DeckId, Error, NoteTypeId, SourceConfig};
use rusqlite::Connection;
use tempfile::TempDir;

/// Table definitions of a modern (schema 18) collection file.
const SCHEMA: &str = "
create table decks (id integer primary key not null, name text not null collate unicase,
                    mtime_secs integer not null, usn integer not null, common blob not null, kind blob not null);
create unique index idx_decks_name on decks (name);
create table notetypes (id integer not null primary key, name text not null collate unicase,
                        mtime_secs integer not null, usn integer not null, config blob not null);
create unique index idx_notetypes_name on notetypes (name);
create table templates (ntid integer not null, ord integer not null, name text not null collate unicase,
                        mtime_secs integer not null, usn integer not null, config blob not null,
                        primary key (ntid, ord)) without rowid;
create unique index idx_templates_name_ntid on templates (name, ntid);
create table fields (ntid integer not null, ord integer not null, name text not null collate unicase,
                     config blob not null, primary key (ntid, ord)) without rowid;
create unique index idx_fields_name_ntid on fields (name, ntid);
create table tags (tag text not null primary key collate unicase, usn integer not null,
                   collapsed boolean not null, config blob null) without rowid;
create table notes (id integer primary key, guid text not null, mid integer not null, mod integer not null,
                    usn integer not null, tags text not null, flds text not null, sfld integer not null,
                    csum integer not null, flags integer not null, data text not null);
create table cards (id integer primary key, nid integer not null, did integer not null, ord integer not null,
                    mod integer not null, usn integer not null, type integer not null, queue integer not null,
                    due integer not null, ivl integer not null, factor integer not null, reps integer not null,
                    lapses integer not null, left integer not null, odue integer not null, odid integer not null,
                    flags integer not null, data text not null);
";

/// Helper: write a small collection file and return its directory.
fn write_collection(extra: &str) -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("collection.anki2");
    let conn = Connection::open(&path).unwrap();
    register_collations(&conn).unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn.execute_batch(
        "insert into decks values (1, 'Default', 1700000000, 0, x'', x'');
         insert into decks values (2, 'Vocab' || char(31) || 'Spanish', 1700000000, 0, x'', x'');
         insert into notetypes values (10, 'Basic', 1700000000, 0, x'');
         insert into templates values (10, 0, 'Card 1', 0, 0, x'');
         insert into fields values (10, 0, 'Front', x''), (10, 1, 'Back', x'');
         insert into tags values ('spanish', 0, 0, null), ('Grammar', 0, 1, null);
         insert into notes values (100, 'a', 10, 0, 0, ' spanish ', 'perro' || char(31) || 'dog', 'perro', 0, 0, '');
         insert into notes values (101, 'b', 10, 0, 0, ' spanish ', 'gato' || char(31) || 'cat', 'gato', 0, 0, '');
         insert into cards values (1000, 100, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, '');
         insert into cards values (1001, 101, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, '');",
    )
    .unwrap();
    conn.execute_batch(extra).unwrap();
    drop(conn);
    (dir, path)
}

#[test]
fn test_open_sqlite_builds_linked_graph() {
    let (_dir, path) = write_collection("");
    let col = Collection::open_sqlite(&path).unwrap();
    let g = col.graph();

    let vocab = col.deck_by_name("Vocab::Spanish").unwrap();
    assert_eq!(vocab.id, DeckId(2));
    assert_eq!(vocab.modified.map(|t| t.timestamp()), Some(1_700_000_000));
    assert!(vocab.note_types().contains(&NoteTypeId(10)));
    assert_eq!(vocab.card_types().len(), 1);
    assert_eq!(g.note_type(NoteTypeId(10)).unwrap().fields().len(), 2);
    assert!(g.tag("spanish").is_some());
    assert!(g.tag("Grammar").is_some());

    let notes = col.notes_for_deck(vocab.id).unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].split_content(), ("perro", "dog"));
}

#[test]
fn test_listing_over_sqlite() {
    let (_dir, path) = write_collection("");
    let col = Collection::open_sqlite(&path).unwrap();

    let decks = list_decks(&col).unwrap();
    assert_eq!(decks.len(), 2);
    assert_eq!(decks[1].name, "Vocab::Spanish");
    assert_eq!((decks[1].cards, decks[1].notes), (2, 2));

    let nts = list_note_types(col.graph());
    assert_eq!(nts[0].fields, vec!["Front", "Back"]);
}

#[test]
fn test_open_with_config() {
    let (_dir, path) = write_collection("");
    let col = Collection::open_with(&SourceConfig::sqlite(&path)).unwrap();
    assert_eq!(col.graph().decks().len(), 2);
    assert_eq!(col.card_count().unwrap(), 2);
}

#[test]
fn test_dangling_template_aborts() {
    let (_dir, path) = write_collection("insert into templates values (99, 0, 'Orphan', 0, 0, x'');");
    let err = Collection::open_sqlite(&path).err().unwrap();
    assert!(matches!(err, Error::ReferentialIntegrity { entity: "card type", .. }));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Collection::open_sqlite(dir.path().join("missing.anki2")).err().unwrap();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_from_connection() {
    let (_dir, path) = write_collection("");
    let conn = Connection::open(&path).unwrap();
    let col = Collection::open(SqliteRowSource::from_connection(conn).unwrap()).unwrap();
    assert_eq!(col.note_count().unwrap(), 2);
    assert_eq!(col.graph().tags().len(), 2);
}
