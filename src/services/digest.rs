//! Token wire format shared by the signer and the verifier.
//!
//! The signed message is the canonical path immediately followed by the
//! decimal timestamp, with no delimiter. Existing gateways recompute it the
//! same way, so the concatenation must not change.

use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Characters escaped in extra query keys and values (everything except
/// alphanumerics and `-_.~`).
pub const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Separator between timestamp and digest in the token field.
pub const TIMESTAMP_SEPARATOR: char = '-';

/// Build the message fed into the HMAC.
pub fn signed_message(canonical_path: &str, timestamp: Option<i64>) -> String {
    match timestamp {
        Some(ts) => format!("{canonical_path}{ts}"),
        None => canonical_path.to_string(),
    }
}

/// HMAC-SHA256 of `message`, base64 encoded, then percent-encoded.
///
/// Base64 emits `+`, `/` and `=`, which come out as `%2B`, `%2F` and `%3D`.
pub fn encoded_digest(secret: &[u8], message: &str) -> String {
    let digest = raw_digest(secret, message.as_bytes());
    let b64 = STANDARD.encode(digest);
    utf8_percent_encode(&b64, NON_ALPHANUMERIC).to_string()
}

/// Assemble the token field value carried in the query parameter.
pub fn token_field(timestamp: Option<i64>, encoded_digest: &str) -> String {
    match timestamp {
        Some(ts) => format!("{ts}{TIMESTAMP_SEPARATOR}{encoded_digest}"),
        None => encoded_digest.to_string(),
    }
}

/// Percent-encode an extra query key or value.
pub fn encode_query_component(s: &str) -> String {
    utf8_percent_encode(s, QUERY_COMPONENT).to_string()
}

fn raw_digest(secret: &[u8], message: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}
