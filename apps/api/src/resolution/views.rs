//! Renders resolved documents into their JSON wire shape.

use bson::{Bson, Document};
use serde_json::{Map, Value};

use crate::models::kinds::{AttributeKind, EntityKind, Projection, ReferenceField, WireIdKeys};
use crate::models::reference::render_id;
use crate::resolution::engine::Resolved;

/// Embedded views always carry their id under this key.
const EMBEDDED_ID_KEY: &str = "id";

pub fn render(resolved: &Resolved, ids: &WireIdKeys) -> Value {
    let kind = resolved.kind;
    let document = &resolved.document;

    let mut body = scalar_attributes(kind, document);
    body.insert(ids.key(kind).to_string(), id_value(document.get("_id")));

    for expansion in &resolved.expansions {
        let reference = expansion.reference;
        body.insert(
            reference.wire_id.to_string(),
            id_value(document.get(reference.stored)),
        );
        body.insert(
            reference.wire_view.to_string(),
            expansion
                .target
                .as_ref()
                .map_or(Value::Null, |target| embed(reference, target)),
        );
    }

    Value::Object(body)
}

pub fn render_all(items: &[Resolved], ids: &WireIdKeys) -> Value {
    Value::Array(items.iter().map(|item| render(item, ids)).collect())
}

fn embed(reference: &ReferenceField, target: &Document) -> Value {
    let target_kind = reference.target;
    let mut view = match reference.projection {
        Projection::Display(stored) => {
            let mut view = Map::new();
            if let Some(attribute) = target_kind.attribute(stored) {
                view.insert(
                    attribute.wire.to_string(),
                    attribute_value(target.get(stored), attribute.kind),
                );
            }
            view
        }
        Projection::Attributes => {
            let mut view = scalar_attributes(target_kind, target);
            for nested in target_kind.references() {
                view.insert(
                    nested.wire_id.to_string(),
                    id_value(target.get(nested.stored)),
                );
            }
            view
        }
    };
    view.insert(EMBEDDED_ID_KEY.to_string(), id_value(target.get("_id")));
    Value::Object(view)
}

fn scalar_attributes(kind: EntityKind, document: &Document) -> Map<String, Value> {
    kind.attributes()
        .iter()
        .map(|attribute| {
            (
                attribute.wire.to_string(),
                attribute_value(document.get(attribute.stored), attribute.kind),
            )
        })
        .collect()
}

fn id_value(stored: Option<&Bson>) -> Value {
    render_id(stored).map_or(Value::Null, Value::String)
}

fn attribute_value(value: Option<&Bson>, kind: AttributeKind) -> Value {
    match (value, kind) {
        (None | Some(Bson::Null), _) => Value::Null,
        (Some(Bson::String(text)), _) => Value::String(text.clone()),
        (Some(Bson::DateTime(at)), AttributeKind::Timestamp) => {
            Value::String(at.to_chrono().to_rfc3339())
        }
        (Some(Bson::ObjectId(id)), _) => Value::String(id.to_hex()),
        (Some(other), _) => other.clone().into_relaxed_extjson(),
    }
}
