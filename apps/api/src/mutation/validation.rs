//! Request validation performed before any write reaches the store.

use bson::oid::ObjectId;

use crate::errors::AppError;
use crate::models::reference::{parse_object_id, Reference};

/// Upper bound on a stored HTML signature.
pub const MAX_SIGNATURE_BYTES: usize = 64 * 1024;

/// Parses an id taken from the request path.
pub fn parse_path_id(raw: &str) -> Result<ObjectId, AppError> {
    parse_object_id(raw).map_err(|_| AppError::Validation("Invalid ID".to_string()))
}

/// Rejects blank values of a required text attribute.
pub fn require_text(name: &str, value: String) -> Result<String, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} is required")));
    }
    Ok(value)
}

/// Parses an optional reference; blank means absent.
pub fn parse_reference(name: &str, raw: Option<&str>) -> Result<Reference, AppError> {
    Reference::parse(raw).map_err(|_| AppError::Validation(format!("Invalid {name}")))
}

/// Parses a reference that must be present.
pub fn require_reference(name: &str, raw: Option<&str>) -> Result<ObjectId, AppError> {
    parse_reference(name, raw)?
        .id()
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

pub fn check_signature(signature: &str) -> Result<(), AppError> {
    if signature.len() > MAX_SIGNATURE_BYTES {
        return Err(AppError::Validation("Signature too large".to_string()));
    }
    Ok(())
}
