use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::documents::FieldDoc;
use crate::models::kinds::EntityKind;
use crate::mutation::gateway;
use crate::mutation::validation::require_text;
use crate::routes::shared;
use crate::state::AppState;

/// `{field}`; older clients send `{name}`.
#[derive(Debug, Deserialize)]
pub struct FieldBody {
    #[serde(default, alias = "name")]
    pub field: String,
}

/// GET /api/fields
pub async fn handle_list_fields(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    shared::list(&state, EntityKind::Field).await
}

/// POST /api/fields
pub async fn handle_create_field(
    State(state): State<AppState>,
    Json(req): Json<FieldBody>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let document = FieldDoc {
        field: require_text("field", req.field)?,
    };
    let created = gateway::create(&state.store, document).await?;
    Ok(shared::created(&state, &created))
}

/// GET /api/fields/:id
pub async fn handle_get_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    shared::single(&state, EntityKind::Field, &id).await
}

/// PUT /api/fields/:id
pub async fn handle_update_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<FieldBody>,
) -> Result<Json<Value>, AppError> {
    let field = require_text("field", req.field)?;
    shared::update(&state, EntityKind::Field, &id, "field", field).await
}

/// DELETE /api/fields/:id
pub async fn handle_delete_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    shared::remove(&state, EntityKind::Field, &id).await
}
