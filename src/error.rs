use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required header: {0}")]
    MissingHeader(&'static str),

    #[error("Missing required query parameter: {0}")]
    MissingParam(&'static str),

    #[error("Signing error: {0}")]
    Sign(#[from] SignError),
}

/// Failure to produce a signed URL.
///
/// Signing only fails when an identifier cannot be mapped to a path. Callers
/// that embed links in larger documents treat this as "no link".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignError {
    #[error("Resource {id} could not be resolved")]
    Unresolved { id: u64 },
}

/// Reason a token was rejected by the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("Missing token")]
    MissingToken,

    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    #[error("Timestamp outside window: skew {skew}s exceeds {max_skew}s")]
    Expired { skew: u64, max_skew: u64 },

    #[error("Digest mismatch")]
    DigestMismatch,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Signing secret must not be empty")]
    EmptySecret,

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::MissingHeader(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::MissingParam(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Sign(SignError::Unresolved { .. }) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": message,
        }));

        (status, body).into_response()
    }
}
