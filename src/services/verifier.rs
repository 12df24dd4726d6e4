//! Gateway-side check of signed URLs.
//!
//! Verification is stateless: the expected digest is recomputed from the
//! request path and the timestamp carried in the token, then compared in
//! constant time.

use std::borrow::Cow;
use subtle::ConstantTimeEq;

use super::digest;
use crate::error::VerifyError;
use crate::models::{SignerConfig, TokenField};

/// Freshness window used when none is configured
pub const DEFAULT_MAX_SKEW_SECONDS: u64 = 600;

/// Outcome of a successful verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedToken {
    pub timestamp: Option<i64>,
}

/// Recomputes and checks tokens produced by [`UrlSigner`](super::UrlSigner).
#[derive(Clone)]
pub struct Verifier {
    secret: Vec<u8>,
    use_timestamp: bool,
    max_skew_seconds: u64,
}

impl Verifier {
    pub fn new(secret: impl AsRef<[u8]>, use_timestamp: bool, max_skew_seconds: u64) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            use_timestamp,
            max_skew_seconds,
        }
    }

    /// Verifier mirroring a signer's secret and timestamp mode
    pub fn from_config(config: &SignerConfig, max_skew_seconds: u64) -> Self {
        Self::new(config.secret(), config.use_timestamp(), max_skew_seconds)
    }

    pub fn max_skew_seconds(&self) -> u64 {
        self.max_skew_seconds
    }

    /// Check `token` (the raw query value) against the request `path`.
    pub fn verify(&self, path: &str, token: &str, now: i64) -> Result<VerifiedToken, VerifyError> {
        if token.is_empty() {
            return Err(VerifyError::MissingToken);
        }

        let field = TokenField::split(token, self.use_timestamp);
        let timestamp = if self.use_timestamp {
            let raw = field
                .timestamp
                .ok_or_else(|| VerifyError::MalformedTimestamp(token.to_string()))?;
            let ts = parse_timestamp(raw)?;
            let skew = now.abs_diff(ts);
            if skew > self.max_skew_seconds {
                return Err(VerifyError::Expired {
                    skew,
                    max_skew: self.max_skew_seconds,
                });
            }
            Some(ts)
        } else {
            None
        };

        let message = digest::signed_message(path, timestamp);
        let expected = digest::encoded_digest(&self.secret, &message);
        if !constant_time_eq(&expected, field.digest) {
            return Err(VerifyError::DigestMismatch);
        }

        Ok(VerifiedToken { timestamp })
    }

    /// Verify a raw request target such as `/a.mp3?verify=...&dl=1`.
    ///
    /// The token is read from the query without percent-decoding, since the
    /// signer compares the encoded form. Hex digits in percent-escapes are
    /// case-insensitive, so `%2b` matches `%2B`. Other parameters are
    /// ignored.
    pub fn verify_request_uri(
        &self,
        request_uri: &str,
        param_name: &str,
        now: i64,
    ) -> Result<VerifiedToken, VerifyError> {
        let (path, query) = request_uri
            .split_once('?')
            .ok_or(VerifyError::MissingToken)?;
        let token = raw_query_value(query, param_name).ok_or(VerifyError::MissingToken)?;

        let result = self.verify(path, token, now);
        if let Err(e) = &result {
            tracing::debug!(path = path, reason = %e, "Rejected signed URL");
        }
        result
    }
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier")
            .field("secret", &"<redacted>")
            .field("use_timestamp", &self.use_timestamp)
            .field("max_skew_seconds", &self.max_skew_seconds)
            .finish()
    }
}

/// WAF-style predicate over `message <separator> timestamp "-" mac`.
///
/// `separator_len` is the byte length of the separator between the message
/// and the timestamp (8 for `?verify=`). The MAC is everything after the last
/// hyphen; the timestamp is the run of digits right before it.
pub fn is_timed_hmac_valid(
    secret: &[u8],
    message_mac: &str,
    ttl: u64,
    now: i64,
    separator_len: usize,
) -> bool {
    let Some((head, mac)) = message_mac.rsplit_once(digest::TIMESTAMP_SEPARATOR) else {
        return false;
    };

    let prefix = head.trim_end_matches(|c: char| c.is_ascii_digit());
    let ts_str = &head[prefix.len()..];
    let Ok(ts) = parse_timestamp(ts_str) else {
        return false;
    };
    if now.abs_diff(ts) > ttl {
        return false;
    }

    let Some(message) = prefix
        .len()
        .checked_sub(separator_len)
        .and_then(|end| prefix.get(..end))
    else {
        return false;
    };

    let expected = digest::encoded_digest(secret, &format!("{message}{ts_str}"));
    constant_time_eq(&expected, mac)
}

fn parse_timestamp(raw: &str) -> Result<i64, VerifyError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VerifyError::MalformedTimestamp(raw.to_string()));
    }
    raw.parse()
        .map_err(|_| VerifyError::MalformedTimestamp(raw.to_string()))
}

fn raw_query_value<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query.split('&').find_map(|pair| match pair.split_once('=') {
        Some((key, value)) if key == name => Some(value),
        _ => None,
    })
}

/// `expected` is produced with uppercase escapes; proxies may lowercase them.
fn constant_time_eq(expected: &str, provided: &str) -> bool {
    let provided = uppercase_escapes(provided);
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

/// Uppercase the two characters following each `%`, leaving the rest alone.
fn uppercase_escapes(value: &str) -> Cow<'_, str> {
    if !value.contains('%') {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len());
    let mut pending = 0;
    for c in value.chars() {
        if pending > 0 {
            out.push(c.to_ascii_uppercase());
            pending -= 1;
        } else {
            if c == '%' {
                pending = 2;
            }
            out.push(c);
        }
    }
    Cow::Owned(out)
}
