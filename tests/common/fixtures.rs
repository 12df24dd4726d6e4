//! Test fixtures and constants.

/// Instant the test clock is pinned to
pub const NOW: i64 = 1_700_000_000;

/// Shared secret used by the fixture config
pub const SECRET: &str = "k";

/// Service configuration used by TestApp
pub const CONFIG: &str = r#"
base_url: https://cdn.example.com
secret: k
resource_base: /previews
param_name: verify
use_timestamp: true
max_skew_seconds: 600
strip_words: [scaled]
resources:
  42: /uploads/song-scaled.mp3
"#;

/// Same service without timestamps or resources
pub const CONFIG_NO_TIMESTAMP: &str = r#"
base_url: https://cdn.example.com
secret: k
resource_base: /previews
use_timestamp: false
"#;

/// Strip the origin so the URL reads like a proxied request target
pub fn request_target(url: &str) -> &str {
    url.strip_prefix("https://cdn.example.com")
        .expect("URL should start with the fixture base URL")
}

/// Percent-encode a request target for use inside a query value
pub fn encode_query_value(value: &str) -> String {
    percent_encoding::utf8_percent_encode(value, percent_encoding::NON_ALPHANUMERIC).to_string()
}
