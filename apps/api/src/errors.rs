use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::StoreError;
use crate::queue::QueueError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every error is rendered as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The target exists but the update left it byte-for-byte identical.
    /// Shares the 404 status with `NotFound`.
    #[error("Unchanged: {0}")]
    Unchanged(String),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] QueueError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) | AppError::Unchanged(_) => StatusCode::NOT_FOUND,
            AppError::Dispatch(_) | AppError::Store(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Validation(msg) | AppError::NotFound(msg) | AppError::Unchanged(msg) => {
                msg.clone()
            }
            AppError::Unauthorized(msg) => msg.to_string(),
            AppError::Dispatch(e) => {
                tracing::error!("Dispatch error: {e}");
                "Failed to queue job".to_string()
            }
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                "A database error occurred".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_and_unchanged_share_status_but_not_variant() {
        let not_found = AppError::NotFound("Recipient not found or name unchanged".into());
        let unchanged = AppError::Unchanged("Recipient not found or name unchanged".into());
        assert!(matches!(not_found, AppError::NotFound(_)));
        assert!(matches!(unchanged, AppError::Unchanged(_)));

        let (s1, b1) = body_of(not_found).await;
        let (s2, b2) = body_of(unchanged).await;
        assert_eq!(s1, StatusCode::NOT_FOUND);
        assert_eq!(s2, StatusCode::NOT_FOUND);
        assert_eq!(b1, b2);
    }

    #[tokio::test]
    async fn test_validation_is_400_with_message() {
        let (status, body) = body_of(AppError::Validation("Invalid ID".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid ID" }));
    }

    #[tokio::test]
    async fn test_store_error_details_are_not_leaked() {
        let error = AppError::from(StoreError::Backend("socket closed at 10.0.0.3".into()));
        let (status, body) = body_of(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "A database error occurred");
    }

    #[tokio::test]
    async fn test_dispatch_error_is_500() {
        let error = AppError::from(QueueError::Redis(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "connection refused",
        ))));
        let (status, body) = body_of(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to queue job");
    }
}
