//! Plumbing shared by the per-entity route modules.

use axum::{http::StatusCode, Json};
use bson::Bson;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::kinds::EntityKind;
use crate::mutation::gateway;
use crate::mutation::validation::{parse_path_id, parse_reference};
use crate::resolution::engine::{resolve_all, resolve_one, Resolved};
use crate::resolution::views::{render, render_all};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NameBody {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct DescriptionBody {
    #[serde(default)]
    pub description: String,
}

pub fn message(text: impl Into<String>) -> Json<Value> {
    Json(json!({ "message": text.into() }))
}

/// Every document of `kind`, references expanded.
pub async fn list(state: &AppState, kind: EntityKind) -> Result<Json<Value>, AppError> {
    let items = resolve_all(state.store.clone(), kind).await?;
    Ok(Json(render_all(&items, &state.config.wire_ids)))
}

pub async fn single(
    state: &AppState,
    kind: EntityKind,
    raw_id: &str,
) -> Result<Json<Value>, AppError> {
    let id = parse_path_id(raw_id)?;
    let resolved = resolve_one(state.store.clone(), kind, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} not found", kind.label())))?;
    Ok(Json(render(&resolved, &state.config.wire_ids)))
}

pub fn created(state: &AppState, resolved: &Resolved) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(render(resolved, &state.config.wire_ids)),
    )
}

/// Field-scoped update of one scalar attribute.
pub async fn update(
    state: &AppState,
    kind: EntityKind,
    raw_id: &str,
    attribute: &str,
    value: impl Into<Bson>,
) -> Result<Json<Value>, AppError> {
    let id = parse_path_id(raw_id)?;
    gateway::update_field(state.store.as_ref(), kind, id, attribute, value).await?;
    let label = kind.attribute(attribute).map_or(attribute, |a| a.label);
    Ok(message(format!("{} {label} updated successfully", kind.label())))
}

/// Associate or unset the reference stored under `stored`. Blank or missing
/// `raw_target` clears it.
pub async fn associate(
    state: &AppState,
    kind: EntityKind,
    raw_id: &str,
    stored: &str,
    raw_target: Option<&str>,
) -> Result<Json<Value>, AppError> {
    let id = parse_path_id(raw_id)?;
    let reference = kind
        .reference(stored)
        .ok_or_else(|| anyhow::anyhow!("{} has no reference '{stored}'", kind.label()))?;
    let target = parse_reference(reference.wire_id, raw_target)?;

    let modified = gateway::associate(state.store.as_ref(), kind, id, reference, target).await?;
    let verb = if target.id().is_some() { "associated" } else { "cleared" };
    Ok(Json(json!({
        "message": format!("{} {verb} successfully", reference.target.label()),
        "modifiedCount": modified,
    })))
}

pub async fn remove(
    state: &AppState,
    kind: EntityKind,
    raw_id: &str,
) -> Result<Json<Value>, AppError> {
    let id = parse_path_id(raw_id)?;
    gateway::delete(state.store.as_ref(), kind, id).await?;
    Ok(message(format!("{} deleted successfully", kind.label())))
}
