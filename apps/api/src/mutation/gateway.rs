//! Mutation gateway: create, field-scoped update, associate/unset, delete.
//!
//! Referential integrity is advisory: references are checked for syntax
//! only, targets are never required to exist, and deletes never cascade.

use std::sync::Arc;

use bson::{oid::ObjectId, Bson, DateTime, Document};
use tracing::{info, warn};

use crate::db::{DocumentStore, StoreError, UpdateOutcome};
use crate::errors::AppError;
use crate::models::documents::EntityDocument;
use crate::models::kinds::{EntityKind, ReferenceField};
use crate::models::reference::Reference;
use crate::resolution::engine::{resolve_one, Resolved};

/// Inserts a validated document and returns it with its new id and a
/// best-effort expansion of any reference supplied at creation.
pub async fn create<D: EntityDocument>(
    store: &Arc<dyn DocumentStore>,
    document: D,
) -> Result<Resolved, AppError> {
    let kind = D::KIND;
    let mut stored = bson::to_document(&document).map_err(StoreError::from)?;
    let id = store.insert(kind.collection(), stored.clone()).await?;
    stored.insert("_id", id);
    info!("Created {} {id}", kind.label());

    match resolve_one(Arc::clone(store), kind, id).await {
        Ok(Some(resolved)) => Ok(resolved),
        Ok(None) => {
            warn!("{} {id} was not readable right after insert", kind.label());
            Ok(Resolved::unresolved(kind, stored))
        }
        Err(e) => {
            warn!("Could not resolve references of new {} {id}: {e}", kind.label());
            Ok(Resolved::unresolved(kind, stored))
        }
    }
}

/// Sets one scalar attribute.
///
/// Fails with `NotFound` when no document has `id`, and with `Unchanged` when
/// the stored value already equals `value`.
pub async fn update_field(
    store: &dyn DocumentStore,
    kind: EntityKind,
    id: ObjectId,
    attribute: &str,
    value: impl Into<Bson>,
) -> Result<(), AppError> {
    let label = kind.attribute(attribute).map_or(attribute, |a| a.label);

    let mut fields = Document::new();
    fields.insert(attribute, value.into());
    let outcome = store.set_fields(kind.collection(), id, fields).await?;
    classify_update(kind, label, outcome)?;

    if kind.tracks_updates() {
        let mut stamp = Document::new();
        stamp.insert("updated_at", DateTime::now());
        store.set_fields(kind.collection(), id, stamp).await?;
    }

    info!("Updated {} of {} {id}", label, kind.label());
    Ok(())
}

fn classify_update(kind: EntityKind, label: &str, outcome: UpdateOutcome) -> Result<(), AppError> {
    let message = || format!("{} not found or {label} unchanged", kind.label());
    if outcome.matched == 0 {
        return Err(AppError::NotFound(message()));
    }
    if outcome.modified == 0 {
        return Err(AppError::Unchanged(message()));
    }
    Ok(())
}

/// Points `reference` at `target`, or clears it when `target` is absent.
/// Returns the number of documents actually modified (0 or 1); a missing
/// source document is reported as 0, not as an error.
pub async fn associate(
    store: &dyn DocumentStore,
    kind: EntityKind,
    id: ObjectId,
    reference: &ReferenceField,
    target: Reference,
) -> Result<u64, AppError> {
    if reference.required {
        return Err(AppError::Validation(format!(
            "{} cannot be changed",
            reference.wire_id
        )));
    }

    let outcome = match target {
        Reference::Id(target_id) => {
            let mut fields = Document::new();
            fields.insert(reference.stored, target_id);
            store.set_fields(kind.collection(), id, fields).await?
        }
        Reference::Absent => {
            store
                .unset_field(kind.collection(), id, reference.stored)
                .await?
        }
    };

    info!(
        "{} {id}: {} {} (modified {})",
        kind.label(),
        reference.stored,
        if target == Reference::Absent { "cleared" } else { "associated" },
        outcome.modified
    );
    Ok(outcome.modified)
}

/// Deletes by id. Dependents keep their now-dangling references.
pub async fn delete(
    store: &dyn DocumentStore,
    kind: EntityKind,
    id: ObjectId,
) -> Result<(), AppError> {
    let deleted = store.delete(kind.collection(), id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(format!("{} not found", kind.label())));
    }
    info!("Deleted {} {id}", kind.label());
    Ok(())
}
