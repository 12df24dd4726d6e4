use serde::Serialize;
use utoipa::ToSchema;

use crate::services::digest::TIMESTAMP_SEPARATOR;

/// What the caller asks to sign
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// Path or absolute URL, signed as given (after canonicalization)
    Path(String),
    /// Opaque identifier looked up through the configured resolver.
    ///
    /// `raw` is the text the caller passed in. Without a resolver it is
    /// signed as a path, so `"007"` stays `"007"`.
    Id { id: u64, raw: String },
}

impl Resource {
    /// Treat an all-digit string as an identifier, anything else as a path.
    pub fn parse(input: &str) -> Self {
        if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = input.parse() {
                return Resource::Id {
                    id,
                    raw: input.to_string(),
                };
            }
        }
        Resource::Path(input.to_string())
    }
}

/// A produced URL together with the pieces a verifier recomputes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SignedUrl {
    /// Final URL including token and extra parameters
    pub url: String,
    /// Exact string that was signed (before the timestamp)
    pub canonical_path: String,
    /// Unix seconds mixed into the signature, if timestamping is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Value of the token query parameter
    pub token: String,
}

/// Token field split into its timestamp and digest parts.
///
/// The digest is kept exactly as it appeared in the request, still
/// percent-encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenField<'a> {
    pub timestamp: Option<&'a str>,
    pub digest: &'a str,
}

impl<'a> TokenField<'a> {
    /// Split on the first separator when timestamps are in use.
    pub fn split(value: &'a str, use_timestamp: bool) -> Self {
        if use_timestamp {
            if let Some((ts, digest)) = value.split_once(TIMESTAMP_SEPARATOR) {
                return TokenField {
                    timestamp: Some(ts),
                    digest,
                };
            }
        }
        TokenField {
            timestamp: None,
            digest: value,
        }
    }
}
