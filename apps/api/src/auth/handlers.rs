use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /api/login
///
/// Login is disabled while no admin password is configured.
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    match state.config.admin_password.as_deref() {
        Some(expected) if !expected.is_empty() && req.password == expected => {}
        Some(_) => {
            warn!("Rejected login attempt");
            return Err(AppError::Unauthorized("Unauthorized"));
        }
        None => {
            warn!("Login attempted but ADMIN_PASSWORD is not set");
            return Err(AppError::Unauthorized("Unauthorized"));
        }
    }

    let token = state
        .tokens
        .issue()
        .map_err(|e| anyhow::anyhow!("Failed to sign token: {e}"))?;
    info!("Issued session token");
    Ok(Json(LoginResponse { token }))
}
