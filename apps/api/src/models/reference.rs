//! Reference values, as written by the API and as found on disk.

use bson::{oid::ObjectId, Bson};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("'{0}' is not a valid id")]
pub struct InvalidId(pub String);

/// Parses a 24-character hex id.
pub fn parse_object_id(raw: &str) -> Result<ObjectId, InvalidId> {
    ObjectId::parse_str(raw.trim()).map_err(|_| InvalidId(raw.to_string()))
}

/// A reference as accepted from a client: either nothing, or a decodable id.
/// Whether the target exists is never checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Absent,
    Id(ObjectId),
}

impl Reference {
    /// `None` and blank strings mean "no reference".
    pub fn parse(raw: Option<&str>) -> Result<Self, InvalidId> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Reference::Absent),
            Some(value) => parse_object_id(value).map(Reference::Id),
        }
    }

    pub fn id(self) -> Option<ObjectId> {
        match self {
            Reference::Absent => None,
            Reference::Id(id) => Some(id),
        }
    }
}

/// A key to try against a target collection's `_id`.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupKey {
    Id(ObjectId),
    Raw(String),
}

impl LookupKey {
    pub fn to_bson(&self) -> Bson {
        match self {
            LookupKey::Id(id) => Bson::ObjectId(*id),
            LookupKey::Raw(raw) => Bson::String(raw.clone()),
        }
    }
}

/// Ordered keys to try for a stored reference value.
///
/// Older documents hold references as plain strings. A string that decodes
/// as an id is tried structured first, then verbatim; anything else that is
/// not an id or a string has no candidates.
pub fn lookup_candidates(stored: Option<&Bson>) -> Vec<LookupKey> {
    match stored {
        Some(Bson::ObjectId(id)) => vec![LookupKey::Id(*id)],
        Some(Bson::String(raw)) if !raw.trim().is_empty() => match parse_object_id(raw) {
            Ok(id) => vec![LookupKey::Id(id), LookupKey::Raw(raw.clone())],
            Err(_) => vec![LookupKey::Raw(raw.clone())],
        },
        _ => Vec::new(),
    }
}

/// Wire form of a stored id: hex for structured ids, the string itself for
/// legacy string ids, `None` otherwise.
pub fn render_id(stored: Option<&Bson>) -> Option<String> {
    match stored {
        Some(Bson::ObjectId(id)) => Some(id.to_hex()),
        Some(Bson::String(raw)) => Some(raw.clone()),
        _ => None,
    }
}
