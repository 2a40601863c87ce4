//! Composite key shared by card templates and fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use super::{NoteTypeId, Row, Table};
use crate::Error;

/// `(note type id, ordinal)` — identifies a card type or field within the
/// whole collection. Renders as `"{noteTypeId}:{ordinal}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrdinalKey {
    pub note_type_id: NoteTypeId,
    pub ordinal: u32,
}

impl OrdinalKey {
    pub fn new(note_type_id: NoteTypeId, ordinal: u32) -> Self {
        Self { note_type_id, ordinal }
    }

    /// Read the leading `note_type_id, ordinal` columns of a template or
    /// field row.
    pub fn from_row(row: &Row, table: Table) -> crate::Result<Self> {
        let ntid = row.int(table, 0)?;
        let ord = row.int(table, 1)?;
        let ordinal = u32::try_from(ord).map_err(|_| Error::MalformedRow {
            table,
            column: 1,
            expected: "non-negative ordinal",
            found: ord.to_string(),
        })?;
        Ok(Self::new(NoteTypeId(ntid), ordinal))
    }
}

impl fmt::Display for OrdinalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.note_type_id, self.ordinal)
    }
}

/// Error parsing an [`OrdinalKey`] from its string form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid ordinal key '{0}', expected '<noteTypeId>:<ordinal>'")]
pub struct ParseKeyError(pub String);

impl FromStr for OrdinalKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseKeyError(s.to_string());
        let (ntid, ord) = s.split_once(':').ok_or_else(err)?;
        let ntid: i64 = ntid.parse().map_err(|_| err())?;
        let ord: u32 = ord.parse().map_err(|_| err())?;
        let key = Self::new(NoteTypeId(ntid), ord);
        // Only the canonical form is accepted: no sign prefix, no leading zeros.
        if key.to_string() != s {
            return Err(err());
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        let key = OrdinalKey::new(NoteTypeId(1342697561419), 1);
        assert_eq!(key.to_string(), "1342697561419:1");
    }

    #[test]
    fn test_key_parse() {
        let key: OrdinalKey = "10:0".parse().unwrap();
        assert_eq!(key, OrdinalKey::new(NoteTypeId(10), 0));
        assert_eq!("-5:2".parse::<OrdinalKey>().unwrap().note_type_id, NoteTypeId(-5));
    }

    #[test]
    fn test_key_parse_rejects_garbage() {
        assert!("10".parse::<OrdinalKey>().is_err());
        assert!("10:x".parse::<OrdinalKey>().is_err());
        assert!("10:-1".parse::<OrdinalKey>().is_err());
        assert!("10:1:2".parse::<OrdinalKey>().is_err());
    }

    #[test]
    fn test_key_parse_requires_canonical_form() {
        assert!("+10:1".parse::<OrdinalKey>().is_err());
        assert!("10:+1".parse::<OrdinalKey>().is_err());
        assert!("+10:+1".parse::<OrdinalKey>().is_err());
        assert!("010:1".parse::<OrdinalKey>().is_err());
        assert!(" 10:1".parse::<OrdinalKey>().is_err());
        assert_eq!("10:1".parse::<OrdinalKey>().unwrap().to_string(), "10:1");
    }

    #[test]
    fn test_key_from_row_rejects_negative_ordinal() {
        let err = OrdinalKey::from_row(&crate::row![10, -1, "Card 1"], Table::CardTemplates)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedRow { column: 1, .. }));
    }

    #[test]
    fn test_key_ordering_groups_by_note_type() {
        let mut keys = vec![
            OrdinalKey::new(NoteTypeId(2), 0),
            OrdinalKey::new(NoteTypeId(1), 1),
            OrdinalKey::new(NoteTypeId(1), 0),
        ];
        keys.sort();
        assert_eq!(keys[0], OrdinalKey::new(NoteTypeId(1), 0));
        assert_eq!(keys[2], OrdinalKey::new(NoteTypeId(2), 0));
    }
}
