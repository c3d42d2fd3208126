use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::documents::CoverLetterDoc;
use crate::models::kinds::EntityKind;
use crate::mutation::gateway;
use crate::mutation::validation::require_reference;
use crate::routes::shared;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCoverLetterRequest {
    #[serde(default, rename = "recipientId")]
    pub recipient_id: Option<String>,
    #[serde(default, rename = "coverLetter")]
    pub cover_letter: String,
    #[serde(default, rename = "conversationId")]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContentBody {
    #[serde(default)]
    pub content: String,
}

/// GET /api/cover-letters
pub async fn handle_list_cover_letters(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    shared::list(&state, EntityKind::CoverLetter).await
}

/// POST /api/cover-letters
///
/// A conversation id is minted when the client does not continue an
/// existing one.
pub async fn handle_create_cover_letter(
    State(state): State<AppState>,
    Json(req): Json<CreateCoverLetterRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let recipient_id = require_reference("recipientId", req.recipient_id.as_deref())?;
    let conversation_id = req
        .conversation_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let document = CoverLetterDoc::new(recipient_id, conversation_id, req.cover_letter);
    let created = gateway::create(&state.store, document).await?;
    Ok(shared::created(&state, &created))
}

/// GET /api/cover-letters/:id
pub async fn handle_get_cover_letter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    shared::single(&state, EntityKind::CoverLetter, &id).await
}

/// PUT /api/cover-letters/:id
pub async fn handle_update_cover_letter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ContentBody>,
) -> Result<Json<Value>, AppError> {
    shared::update(&state, EntityKind::CoverLetter, &id, "cover_letter", req.content).await?;
    Ok(shared::message("Cover letter updated successfully"))
}

/// DELETE /api/cover-letters/:id
pub async fn handle_delete_cover_letter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    shared::remove(&state, EntityKind::CoverLetter, &id).await
}
