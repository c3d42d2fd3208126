//! Entity kinds and their reference metadata.
//!
//! Every collection is schemaless, so this module is the only place that knows
//! which stored keys are scalar attributes and which are foreign references.
//! Both the resolution engine and the mutation gateway are driven from here.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Field,
    Company,
    Recipient,
    Identity,
    CoverLetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Text,
    Timestamp,
}

/// A scalar attribute: stored key, wire key, and the noun used in messages.
#[derive(Debug)]
pub struct Attribute {
    pub stored: &'static str,
    pub wire: &'static str,
    pub label: &'static str,
    pub kind: AttributeKind,
}

/// How a resolved target is flattened into the referencing document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Only the target id plus one display attribute (stored key).
    Display(&'static str),
    /// All scalar attributes of the target, its id and its own raw references.
    Attributes,
}

/// A single-valued foreign reference held by an entity.
#[derive(Debug)]
pub struct ReferenceField {
    pub stored: &'static str,
    pub target: EntityKind,
    /// Wire key carrying the raw referenced id.
    pub wire_id: &'static str,
    /// Wire key carrying the embedded view (or null).
    pub wire_view: &'static str,
    pub projection: Projection,
    /// Required references are set on creation and never mutated afterwards.
    pub required: bool,
}

const fn text(stored: &'static str, wire: &'static str, label: &'static str) -> Attribute {
    Attribute {
        stored,
        wire,
        label,
        kind: AttributeKind::Text,
    }
}

const fn timestamp(stored: &'static str, wire: &'static str) -> Attribute {
    Attribute {
        stored,
        wire,
        label: wire,
        kind: AttributeKind::Timestamp,
    }
}

const FIELD_ATTRIBUTES: &[Attribute] = &[text("field", "field", "name")];

const COMPANY_ATTRIBUTES: &[Attribute] = &[
    text("name", "name", "name"),
    text("description", "description", "description"),
];

const RECIPIENT_ATTRIBUTES: &[Attribute] = &[
    text("email", "email", "email"),
    text("name", "name", "name"),
    text("description", "description", "description"),
];

const IDENTITY_ATTRIBUTES: &[Attribute] = &[
    text("identity", "identity", "identity"),
    text("name", "name", "name"),
    text("description", "description", "description"),
    text("html_signature", "html_signature", "signature"),
];

const COVER_LETTER_ATTRIBUTES: &[Attribute] = &[
    text("conversation_id", "conversationId", "conversation"),
    text("cover_letter", "coverLetter", "content"),
    timestamp("created_at", "createdAt"),
    timestamp("updated_at", "updatedAt"),
];

const FIELD_OF_INTEREST: ReferenceField = ReferenceField {
    stored: "field",
    target: EntityKind::Field,
    wire_id: "fieldId",
    wire_view: "fieldInfo",
    projection: Projection::Display("field"),
    required: false,
};

const COMPANY_REFERENCES: &[ReferenceField] = &[FIELD_OF_INTEREST];

const IDENTITY_REFERENCES: &[ReferenceField] = &[FIELD_OF_INTEREST];

const RECIPIENT_REFERENCES: &[ReferenceField] = &[ReferenceField {
    stored: "company",
    target: EntityKind::Company,
    wire_id: "companyId",
    wire_view: "companyInfo",
    projection: Projection::Attributes,
    required: false,
}];

const COVER_LETTER_REFERENCES: &[ReferenceField] = &[ReferenceField {
    stored: "recipient_id",
    target: EntityKind::Recipient,
    wire_id: "recipientId",
    wire_view: "recipientInfo",
    projection: Projection::Attributes,
    required: true,
}];

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Field,
        EntityKind::Company,
        EntityKind::Recipient,
        EntityKind::Identity,
        EntityKind::CoverLetter,
    ];

    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Field => "fields",
            EntityKind::Company => "companies",
            EntityKind::Recipient => "recipients",
            EntityKind::Identity => "identities",
            EntityKind::CoverLetter => "cover-letters",
        }
    }

    /// Human-readable name used in response messages.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Field => "Field",
            EntityKind::Company => "Company",
            EntityKind::Recipient => "Recipient",
            EntityKind::Identity => "Identity",
            EntityKind::CoverLetter => "Cover letter",
        }
    }

    /// Suffix of the `WIRE_ID_KEY_*` environment override.
    pub fn env_suffix(self) -> &'static str {
        match self {
            EntityKind::Field => "FIELD",
            EntityKind::Company => "COMPANY",
            EntityKind::Recipient => "RECIPIENT",
            EntityKind::Identity => "IDENTITY",
            EntityKind::CoverLetter => "COVER_LETTER",
        }
    }

    pub fn attributes(self) -> &'static [Attribute] {
        match self {
            EntityKind::Field => FIELD_ATTRIBUTES,
            EntityKind::Company => COMPANY_ATTRIBUTES,
            EntityKind::Recipient => RECIPIENT_ATTRIBUTES,
            EntityKind::Identity => IDENTITY_ATTRIBUTES,
            EntityKind::CoverLetter => COVER_LETTER_ATTRIBUTES,
        }
    }

    pub fn references(self) -> &'static [ReferenceField] {
        match self {
            EntityKind::Field => &[],
            EntityKind::Company => COMPANY_REFERENCES,
            EntityKind::Recipient => RECIPIENT_REFERENCES,
            EntityKind::Identity => IDENTITY_REFERENCES,
            EntityKind::CoverLetter => COVER_LETTER_REFERENCES,
        }
    }

    pub fn attribute(self, stored: &str) -> Option<&'static Attribute> {
        self.attributes().iter().find(|a| a.stored == stored)
    }

    pub fn reference(self, stored: &str) -> Option<&'static ReferenceField> {
        self.references().iter().find(|r| r.stored == stored)
    }

    /// Kinds carrying an `updated_at` stamp that moves on every effective update.
    pub fn tracks_updates(self) -> bool {
        self.attribute("updated_at").is_some()
    }

    fn default_wire_id_key(self) -> &'static str {
        match self {
            EntityKind::Company => "id",
            _ => "_id",
        }
    }
}

/// Per-kind name of the id key in rendered documents.
///
/// Companies have historically been served with `id` while every other kind
/// uses `_id`; clients depend on both, so the mapping stays configurable.
#[derive(Debug, Clone)]
pub struct WireIdKeys {
    keys: HashMap<EntityKind, String>,
}

impl Default for WireIdKeys {
    fn default() -> Self {
        let keys = EntityKind::ALL
            .iter()
            .map(|kind| (*kind, kind.default_wire_id_key().to_string()))
            .collect();
        Self { keys }
    }
}

impl WireIdKeys {
    pub fn key(&self, kind: EntityKind) -> &str {
        self.keys
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_wire_id_key())
    }

    pub fn with_override(mut self, kind: EntityKind, key: impl Into<String>) -> Self {
        self.keys.insert(kind, key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_targets() {
        let company_field = EntityKind::Company.reference("field").unwrap();
        assert_eq!(company_field.target, EntityKind::Field);
        assert_eq!(company_field.projection, Projection::Display("field"));

        let letter_recipient = EntityKind::CoverLetter.reference("recipient_id").unwrap();
        assert_eq!(letter_recipient.target, EntityKind::Recipient);
        assert!(letter_recipient.required);

        assert!(EntityKind::Field.references().is_empty());
    }

    #[test]
    fn test_display_attributes_exist_on_target() {
        for kind in EntityKind::ALL {
            for reference in kind.references() {
                if let Projection::Display(attr) = reference.projection {
                    assert!(
                        reference.target.attribute(attr).is_some(),
                        "{:?}.{} displays missing attribute {attr}",
                        kind,
                        reference.stored
                    );
                }
            }
        }
    }

    #[test]
    fn test_only_cover_letters_track_updates() {
        let tracked: Vec<_> = EntityKind::ALL
            .into_iter()
            .filter(|k| k.tracks_updates())
            .collect();
        assert_eq!(tracked, vec![EntityKind::CoverLetter]);
    }

    #[test]
    fn test_wire_id_defaults_and_override() {
        let keys = WireIdKeys::default();
        assert_eq!(keys.key(EntityKind::Company), "id");
        assert_eq!(keys.key(EntityKind::Field), "_id");
        assert_eq!(keys.key(EntityKind::CoverLetter), "_id");

        let keys = keys.with_override(EntityKind::Company, "_id");
        assert_eq!(keys.key(EntityKind::Company), "_id");
    }
}
