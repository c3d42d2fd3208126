use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::documents::CompanyDoc;
use crate::models::kinds::EntityKind;
use crate::mutation::gateway;
use crate::mutation::validation::{parse_reference, require_text};
use crate::routes::shared::{self, DescriptionBody, NameBody};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "fieldId", alias = "field_id")]
    pub field_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FieldRefBody {
    #[serde(default, rename = "fieldId", alias = "field_id")]
    pub field_id: Option<String>,
}

/// GET /api/companies
pub async fn handle_list_companies(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    shared::list(&state, EntityKind::Company).await
}

/// POST /api/companies
pub async fn handle_create_company(
    State(state): State<AppState>,
    Json(req): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let document = CompanyDoc {
        name: require_text("name", req.name)?,
        description: req.description,
        field: parse_reference("fieldId", req.field_id.as_deref())?.id(),
    };
    let created = gateway::create(&state.store, document).await?;
    Ok(shared::created(&state, &created))
}

/// GET /api/companies/:id
pub async fn handle_get_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    shared::single(&state, EntityKind::Company, &id).await
}

/// PUT /api/companies/:id/name
pub async fn handle_update_company_name(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<NameBody>,
) -> Result<Json<Value>, AppError> {
    let name = require_text("name", req.name)?;
    shared::update(&state, EntityKind::Company, &id, "name", name).await
}

/// PUT /api/companies/:id/description
pub async fn handle_update_company_description(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<DescriptionBody>,
) -> Result<Json<Value>, AppError> {
    shared::update(&state, EntityKind::Company, &id, "description", req.description).await
}

/// PUT /api/companies/:id/field
pub async fn handle_associate_company_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<FieldRefBody>,
) -> Result<Json<Value>, AppError> {
    shared::associate(&state, EntityKind::Company, &id, "field", req.field_id.as_deref()).await
}

/// DELETE /api/companies/:id
pub async fn handle_delete_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    shared::remove(&state, EntityKind::Company, &id).await
}
