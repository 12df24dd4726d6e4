use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::Resource;
use crate::services::UrlSigner;

/// Response from the /api/sign endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct SignResponse {
    /// Status code (200 = success)
    pub status: u16,
    /// Signed URL, including any extra parameters
    pub url: String,
    /// Path covered by the signature
    pub canonical_path: String,
    /// Unix seconds embedded in the token, when timestamping is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// Issue a signed URL
///
/// `resource` is a path or a numeric identifier. Every other query parameter
/// is appended to the signed URL unsigned.
#[utoipa::path(
    get,
    path = "/api/sign",
    responses(
        (status = 200, description = "URL signed", body = SignResponse),
        (status = 400, description = "Missing resource parameter"),
        (status = 404, description = "Identifier could not be resolved"),
    ),
    params(
        ("resource" = String, Query, description = "Resource path or numeric identifier"),
    ),
    tag = "Signing"
)]
pub async fn handle_sign(
    State(signer): State<Arc<UrlSigner>>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, ApiError> {
    let (resource, extra) = split_resource(query)?;

    let signed = signer.sign(&Resource::parse(&resource), extra)?;

    tracing::info!(
        resource = %resource,
        canonical_path = %signed.canonical_path,
        "Issued signed URL"
    );

    Ok(Json(SignResponse {
        status: 200,
        url: signed.url,
        canonical_path: signed.canonical_path,
        timestamp: signed.timestamp,
    }))
}

/// Separate the resource from the pass-through parameters, keeping order.
fn split_resource(
    query: Vec<(String, String)>,
) -> Result<(String, Vec<(String, String)>), ApiError> {
    let mut resource = None;
    let mut extra = Vec::with_capacity(query.len());
    for (key, value) in query {
        if key == "resource" && resource.is_none() {
            resource = Some(value);
        } else {
            extra.push((key, value));
        }
    }
    let resource = resource
        .filter(|r| !r.is_empty())
        .ok_or(ApiError::MissingParam("resource"))?;
    Ok((resource, extra))
}
