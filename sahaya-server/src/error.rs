use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sahaya_rag::RagError;
use serde::{Deserialize, Serialize};

pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

/// What a caller may learn about a failed turn. Carries no detail on
/// purpose; the orchestrator has already logged it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    MessageRequired,
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::MessageRequired => (StatusCode::BAD_REQUEST, MESSAGE_REQUIRED),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR),
        };
        let body = ErrorBody {
            error: error.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::InvalidInput => ApiError::MessageRequired,
            RagError::Upstream { .. } | RagError::Internal { .. } => ApiError::Internal,
        }
    }
}
