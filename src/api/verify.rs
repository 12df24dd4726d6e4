use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::headers::original_uri;
use crate::error::ApiError;
use crate::services::{Clock, Verifier};

/// Query for the /api/verify endpoint
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    /// Request target to check, e.g. `/previews/a.mp3?verify=...`
    pub uri: Option<String>,
}

/// Response from the /api/verify endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResponse {
    /// Status code (200 = request handled)
    pub status: u16,
    /// Whether the signed URL would be accepted
    pub valid: bool,
    /// Rejection reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Gateway settings shared by the verifying handlers
#[derive(Clone)]
pub struct VerifySettings {
    pub verifier: Arc<Verifier>,
    pub clock: Arc<dyn Clock>,
    pub param_name: Arc<str>,
}

/// Check a signed request target
///
/// Diagnostic counterpart of `/auth`: always answers 200 with the verdict.
#[utoipa::path(
    get,
    path = "/api/verify",
    responses(
        (status = 200, description = "Verification result", body = VerifyResponse),
        (status = 400, description = "Missing uri parameter"),
    ),
    params(
        ("uri" = String, Query, description = "Request target including the token parameter"),
    ),
    tag = "Verification"
)]
pub async fn handle_verify(
    State(settings): State<VerifySettings>,
    Query(query): Query<VerifyQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let uri = query
        .uri
        .filter(|u| !u.is_empty())
        .ok_or(ApiError::MissingParam("uri"))?;

    let result = settings
        .verifier
        .verify_request_uri(&uri, &settings.param_name, settings.clock.now());

    Ok(Json(VerifyResponse {
        status: 200,
        valid: result.is_ok(),
        reason: result.err().map(|e| e.to_string()),
    }))
}

/// Forward-auth check for reverse proxies
///
/// Answers 204 when the original request carries a valid token and 403
/// otherwise.
#[utoipa::path(
    get,
    path = "/auth",
    responses(
        (status = 204, description = "Signed URL accepted"),
        (status = 400, description = "Original URI header missing"),
        (status = 403, description = "Signed URL rejected"),
    ),
    params(
        ("X-Original-URI" = String, Header, description = "Original request target (or X-Forwarded-Uri)"),
    ),
    tag = "Verification"
)]
pub async fn handle_auth(
    State(settings): State<VerifySettings>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let uri = original_uri(&headers)?;

    match settings
        .verifier
        .verify_request_uri(uri, &settings.param_name, settings.clock.now())
    {
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            tracing::info!(uri = uri, reason = %e, "Denied signed URL");
            Ok(StatusCode::FORBIDDEN)
        }
    }
}
