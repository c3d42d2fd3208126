use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;

/// Rejects requests without a valid `Authorization: Bearer <token>` header.
///
/// Applied to the protected router only; `/health` and `/api/login` bypass it.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized("Missing token"))?;

    state.tokens.verify(token).map_err(|e| {
        debug!("Token rejected: {e}");
        AppError::Unauthorized("Invalid token")
    })?;

    Ok(next.run(request).await)
}
