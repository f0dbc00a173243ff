//! Error responses for API handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tf_core::ProfileError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("terrain {0} not found")]
    TerrainNotFound(String),

    #[error("{count} samples exceeds the limit of {limit}")]
    TooManySamples { count: usize, limit: usize },

    #[error("{0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Profile(err) => err.kind(),
            ApiError::TerrainNotFound(_) => "not_found",
            ApiError::TooManySamples { .. } => "too_many_samples",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Internal(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Profile(ProfileError::UnreachableCorridor { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Profile(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::TerrainNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::TooManySamples { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!(status = %status, "{}", self);
        }
        let body = json!({
            "error": self.kind(),
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
