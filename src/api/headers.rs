//! Header parsing utilities for gateway requests.

use axum::http::HeaderMap;

use crate::error::ApiError;

/// Headers proxies use to pass the original request target to a
/// forward-auth endpoint, in lookup order.
pub const ORIGINAL_URI_HEADERS: [&str; 2] = ["X-Original-URI", "X-Forwarded-Uri"];

/// Extension trait for convenient header parsing.
pub trait HeaderMapExt {
    /// Get a header value as a string, returning None if missing.
    fn get_str(&self, name: &str) -> Option<&str>;

    /// First non-empty value among `names`.
    fn first_str(&self, names: &[&str]) -> Option<&str>;
}

impl HeaderMapExt for HeaderMap {
    fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.to_str().ok())
    }

    fn first_str(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|name| self.get_str(name))
            .find(|v| !v.is_empty())
    }
}

/// Original request target forwarded by the proxy
pub fn original_uri(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .first_str(&ORIGINAL_URI_HEADERS)
        .ok_or(ApiError::MissingHeader(ORIGINAL_URI_HEADERS[0]))
}
