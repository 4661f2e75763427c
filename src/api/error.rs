//! API error type and its JSON rendering

use crate::storage::StorageError;
use crate::CoinError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors returned by the route handlers
///
/// Rendered as `{"detail": "<message>"}` with the matching status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::CoinNotFound(_) => Self::NotFound("Coin not found".to_string()),
            StorageError::UserNotFound(_) => Self::NotFound("User not found".to_string()),
            StorageError::ItemNotFound(_) => Self::NotFound("Collection item not found".to_string()),
            StorageError::AlreadyOwned(_) => {
                Self::BadRequest("Coin already in collection".to_string())
            }
            StorageError::DuplicateUser(name) => {
                Self::BadRequest(format!("Username already taken: {}", name))
            }
            StorageError::MintageOutOfRange(mintage) => {
                Self::Internal(format!("Mintage out of range: {}", mintage))
            }
            StorageError::Sqlite(e) => Self::Internal(format!("Database error: {}", e)),
        }
    }
}

impl From<CoinError> for ApiError {
    fn from(error: CoinError) -> Self {
        match error {
            CoinError::Storage(e) => e.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_map_to_status() {
        let cases = [
            (StorageError::CoinNotFound("x".into()), StatusCode::NOT_FOUND),
            (StorageError::ItemNotFound("x".into()), StatusCode::NOT_FOUND),
            (StorageError::AlreadyOwned("x".into()), StatusCode::BAD_REQUEST),
            (
                StorageError::Sqlite(rusqlite::Error::QueryReturnedNoRows),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }

    #[tokio::test]
    async fn test_error_body_has_detail() {
        let response = ApiError::NotFound("Coin not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), 10_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["detail"], "Coin not found");
    }
}
