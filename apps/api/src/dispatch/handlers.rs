use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::mutation::validation::parse_path_id;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RefineRequest {
    #[serde(default)]
    pub prompt: String,
}

/// POST /api/recipients/:id/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let recipient_id = parse_path_id(&id)?;
    state
        .dispatcher
        .generate(state.store.as_ref(), recipient_id)
        .await?;
    Ok(Json(json!({ "message": "Generation queued successfully" })))
}

/// POST /api/cover-letters/:id/refine
pub async fn handle_refine(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RefineRequest>,
) -> Result<Json<Value>, AppError> {
    let letter_id = parse_path_id(&id)?;
    state
        .dispatcher
        .refine(state.store.clone(), letter_id, req.prompt)
        .await?;
    Ok(Json(json!({ "message": "Refinement queued successfully" })))
}

/// POST /api/cover-letters/:id/send
pub async fn handle_send(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let letter_id = parse_path_id(&id)?;
    state.dispatcher.send(state.store.clone(), letter_id).await?;
    Ok(Json(json!({ "message": "Email queued successfully" })))
}
