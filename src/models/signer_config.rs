use std::fmt;

use crate::error::ConfigError;
use crate::services::strip_words::DEFAULT_STRIP_WORD;

/// Query parameter carrying the token unless configured otherwise
pub const DEFAULT_PARAM_NAME: &str = "verify";

/// Timestamping is on unless disabled
pub const DEFAULT_USE_TIMESTAMP: bool = true;

/// Immutable signing configuration for one deployment or tenant.
///
/// Build it with [`SignerConfig::builder`]. Changing `resource_base` or the
/// secret invalidates every URL issued under the previous values.
#[derive(Clone)]
pub struct SignerConfig {
    base_url: String,
    secret: Vec<u8>,
    resource_base: Option<String>,
    param_name: String,
    use_timestamp: bool,
    strip_words: Vec<String>,
}

impl SignerConfig {
    /// Start a builder. Timestamping is on by default, matching the
    /// service configuration file.
    pub fn builder(base_url: impl Into<String>, secret: impl AsRef<[u8]>) -> SignerConfigBuilder {
        SignerConfigBuilder {
            base_url: base_url.into(),
            secret: secret.as_ref().to_vec(),
            resource_base: None,
            param_name: DEFAULT_PARAM_NAME.to_string(),
            use_timestamp: DEFAULT_USE_TIMESTAMP,
            strip_words: vec![DEFAULT_STRIP_WORD.to_string()],
        }
    }

    /// Base URL without trailing slash. Not covered by the signature.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// Normalized prefix: one leading slash, no trailing slash.
    pub fn resource_base(&self) -> Option<&str> {
        self.resource_base.as_deref()
    }

    pub fn param_name(&self) -> &str {
        &self.param_name
    }

    pub fn use_timestamp(&self) -> bool {
        self.use_timestamp
    }

    pub fn strip_words(&self) -> &[String] {
        &self.strip_words
    }
}

impl fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerConfig")
            .field("base_url", &self.base_url)
            .field("secret", &"<redacted>")
            .field("resource_base", &self.resource_base)
            .field("param_name", &self.param_name)
            .field("use_timestamp", &self.use_timestamp)
            .field("strip_words", &self.strip_words)
            .finish()
    }
}

/// Builder for [`SignerConfig`]
#[derive(Clone)]
pub struct SignerConfigBuilder {
    base_url: String,
    secret: Vec<u8>,
    resource_base: Option<String>,
    param_name: String,
    use_timestamp: bool,
    strip_words: Vec<String>,
}

impl SignerConfigBuilder {
    pub fn resource_base(mut self, base: impl Into<String>) -> Self {
        self.resource_base = Some(base.into());
        self
    }

    pub fn param_name(mut self, name: impl Into<String>) -> Self {
        self.param_name = name.into();
        self
    }

    pub fn use_timestamp(mut self, enabled: bool) -> Self {
        self.use_timestamp = enabled;
        self
    }

    /// Replace the strip-word list (the default holds a single word).
    pub fn strip_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strip_words = words.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<SignerConfig, ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }

        let base_url = self.base_url.trim_end_matches('/').to_string();
        if !base_url.is_empty()
            && !base_url.starts_with("http://")
            && !base_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidBaseUrl(self.base_url));
        }

        let param_name = if self.param_name.is_empty() {
            DEFAULT_PARAM_NAME.to_string()
        } else {
            self.param_name
        };

        Ok(SignerConfig {
            base_url,
            secret: self.secret,
            resource_base: self.resource_base.as_deref().and_then(normalize_resource_base),
            param_name,
            use_timestamp: self.use_timestamp,
            strip_words: self.strip_words,
        })
    }
}

/// One leading slash, no trailing slash; `None` if nothing remains.
fn normalize_resource_base(base: &str) -> Option<String> {
    let trimmed = base.trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{trimmed}"))
    }
}
