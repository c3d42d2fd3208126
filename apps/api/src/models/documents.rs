use bson::{oid::ObjectId, DateTime};
use serde::Serialize;

use crate::models::kinds::EntityKind;

/// A freshly validated document ready to be inserted into its collection.
pub trait EntityDocument: Serialize + Send + Sync {
    const KIND: EntityKind;
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldDoc {
    pub field: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyDoc {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<ObjectId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipientDoc {
    pub email: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<ObjectId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentityDoc {
    pub identity: String,
    pub name: String,
    pub description: String,
    pub html_signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<ObjectId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverLetterDoc {
    pub recipient_id: ObjectId,
    pub conversation_id: String,
    pub cover_letter: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl CoverLetterDoc {
    pub fn new(recipient_id: ObjectId, conversation_id: String, cover_letter: String) -> Self {
        let now = DateTime::now();
        Self {
            recipient_id,
            conversation_id,
            cover_letter,
            created_at: now,
            updated_at: now,
        }
    }
}

impl EntityDocument for FieldDoc {
    const KIND: EntityKind = EntityKind::Field;
}

impl EntityDocument for CompanyDoc {
    const KIND: EntityKind = EntityKind::Company;
}

impl EntityDocument for RecipientDoc {
    const KIND: EntityKind = EntityKind::Recipient;
}

impl EntityDocument for IdentityDoc {
    const KIND: EntityKind = EntityKind::Identity;
}

impl EntityDocument for CoverLetterDoc {
    const KIND: EntityKind = EntityKind::CoverLetter;
}
