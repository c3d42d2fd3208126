use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::documents::IdentityDoc;
use crate::models::kinds::EntityKind;
use crate::mutation::gateway;
use crate::mutation::validation::{check_signature, parse_reference, require_text};
use crate::routes::companies::FieldRefBody;
use crate::routes::shared::{self, DescriptionBody, NameBody};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateIdentityRequest {
    #[serde(default)]
    pub identity: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub html_signature: String,
    #[serde(default, rename = "fieldId", alias = "field_id")]
    pub field_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdentityBody {
    #[serde(default)]
    pub identity: String,
}

#[derive(Debug, Deserialize)]
pub struct SignatureBody {
    #[serde(default)]
    pub html_signature: String,
}

/// GET /api/identities
pub async fn handle_list_identities(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    shared::list(&state, EntityKind::Identity).await
}

/// POST /api/identities
pub async fn handle_create_identity(
    State(state): State<AppState>,
    Json(req): Json<CreateIdentityRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    check_signature(&req.html_signature)?;
    let document = IdentityDoc {
        identity: require_text("identity", req.identity)?,
        name: req.name,
        description: req.description,
        html_signature: req.html_signature,
        field: parse_reference("fieldId", req.field_id.as_deref())?.id(),
    };
    let created = gateway::create(&state.store, document).await?;
    Ok(shared::created(&state, &created))
}

/// GET /api/identities/:id
pub async fn handle_get_identity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    shared::single(&state, EntityKind::Identity, &id).await
}

/// PUT /api/identities/:id/identity
pub async fn handle_update_identity_text(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<IdentityBody>,
) -> Result<Json<Value>, AppError> {
    let identity = require_text("identity", req.identity)?;
    shared::update(&state, EntityKind::Identity, &id, "identity", identity).await
}

/// PUT /api/identities/:id/name
pub async fn handle_update_identity_name(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<NameBody>,
) -> Result<Json<Value>, AppError> {
    shared::update(&state, EntityKind::Identity, &id, "name", req.name).await
}

/// PUT /api/identities/:id/description
pub async fn handle_update_identity_description(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<DescriptionBody>,
) -> Result<Json<Value>, AppError> {
    shared::update(&state, EntityKind::Identity, &id, "description", req.description).await
}

/// PUT /api/identities/:id/signature
pub async fn handle_update_identity_signature(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SignatureBody>,
) -> Result<Json<Value>, AppError> {
    check_signature(&req.html_signature)?;
    shared::update(&state, EntityKind::Identity, &id, "html_signature", req.html_signature).await
}

/// PUT /api/identities/:id/field
pub async fn handle_associate_identity_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<FieldRefBody>,
) -> Result<Json<Value>, AppError> {
    shared::associate(&state, EntityKind::Identity, &id, "field", req.field_id.as_deref()).await
}

/// DELETE /api/identities/:id
pub async fn handle_delete_identity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    shared::remove(&state, EntityKind::Identity, &id).await
}
