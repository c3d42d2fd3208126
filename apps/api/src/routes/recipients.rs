use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::documents::RecipientDoc;
use crate::models::kinds::EntityKind;
use crate::mutation::gateway;
use crate::mutation::validation::{parse_reference, require_text};
use crate::routes::shared::{self, DescriptionBody, NameBody};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateRecipientRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "companyId")]
    pub company_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmailBody {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct CompanyRefBody {
    #[serde(default, rename = "companyId")]
    pub company_id: Option<String>,
}

/// GET /api/recipients
pub async fn handle_list_recipients(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    shared::list(&state, EntityKind::Recipient).await
}

/// POST /api/recipients
pub async fn handle_create_recipient(
    State(state): State<AppState>,
    Json(req): Json<CreateRecipientRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let document = RecipientDoc {
        email: require_text("email", req.email)?,
        name: req.name,
        description: req.description,
        company: parse_reference("companyId", req.company_id.as_deref())?.id(),
    };
    let created = gateway::create(&state.store, document).await?;
    Ok(shared::created(&state, &created))
}

/// GET /api/recipients/:id
pub async fn handle_get_recipient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    shared::single(&state, EntityKind::Recipient, &id).await
}

/// PUT /api/recipients/:id/name
pub async fn handle_update_recipient_name(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<NameBody>,
) -> Result<Json<Value>, AppError> {
    shared::update(&state, EntityKind::Recipient, &id, "name", req.name).await
}

/// PUT /api/recipients/:id/email
pub async fn handle_update_recipient_email(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<EmailBody>,
) -> Result<Json<Value>, AppError> {
    let email = require_text("email", req.email)?;
    shared::update(&state, EntityKind::Recipient, &id, "email", email).await
}

/// PUT /api/recipients/:id/description
pub async fn handle_update_recipient_description(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<DescriptionBody>,
) -> Result<Json<Value>, AppError> {
    shared::update(&state, EntityKind::Recipient, &id, "description", req.description).await
}

/// PUT /api/recipients/:id/company
pub async fn handle_associate_recipient_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CompanyRefBody>,
) -> Result<Json<Value>, AppError> {
    let company = req.company_id.as_deref();
    shared::associate(&state, EntityKind::Recipient, &id, "company", company).await
}

/// DELETE /api/recipients/:id
pub async fn handle_delete_recipient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    shared::remove(&state, EntityKind::Recipient, &id).await
}
