use base64::{engine::general_purpose::STANDARD, Engine};
use rand::Rng;
use std::sync::Arc;

use super::clock::{Clock, SystemClock};
use super::digest;
use super::resolver::ResourceResolver;
use super::strip_words::StripWordFilter;
use crate::error::SignError;
use crate::models::{Resource, SignedUrl, SignerConfig};

/// Produces signed URLs for one [`SignerConfig`].
///
/// Signing holds no per-request state, so one signer can be shared across
/// threads behind an `Arc`.
pub struct UrlSigner {
    config: SignerConfig,
    strip_words: StripWordFilter,
    resolver: Option<Arc<dyn ResourceResolver>>,
    clock: Arc<dyn Clock>,
}

impl UrlSigner {
    /// Signer without a resolver, reading the system clock
    pub fn new(config: SignerConfig) -> Self {
        let strip_words = StripWordFilter::new(config.strip_words().iter().cloned());
        Self {
            config,
            strip_words,
            resolver: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Resolve numeric resources through `resolver`
    pub fn with_resolver(mut self, resolver: impl ResourceResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_shared_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    pub fn strip_words(&self) -> &[String] {
        self.strip_words.words()
    }

    pub fn has_resolver(&self) -> bool {
        self.resolver.is_some()
    }

    /// Add words to the strip list. Existing words are kept in place.
    pub fn add_strip_words<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strip_words.extend(words);
    }

    /// Sign `resource` at the current time.
    ///
    /// `params` are appended after the token and are not covered by the
    /// signature.
    pub fn sign<I, K, V>(&self, resource: &Resource, params: I) -> Result<SignedUrl, SignError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.sign_at(resource, params, self.clock.now())
    }

    /// Sign `resource` as if the clock read `now`.
    ///
    /// `now` is ignored when timestamping is disabled.
    pub fn sign_at<I, K, V>(
        &self,
        resource: &Resource,
        params: I,
        now: i64,
    ) -> Result<SignedUrl, SignError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let canonical_path = self.canonical_path(resource)?;
        let timestamp = self.config.use_timestamp().then_some(now);

        let message = digest::signed_message(&canonical_path, timestamp);
        let encoded = digest::encoded_digest(self.config.secret(), &message);
        let token = digest::token_field(timestamp, &encoded);

        let mut url = if is_absolute_url(&canonical_path) {
            canonical_path.clone()
        } else {
            format!("{}{canonical_path}", self.config.base_url())
        };
        url.push('?');
        url.push_str(self.config.param_name());
        url.push('=');
        url.push_str(&token);
        for (key, value) in params {
            url.push('&');
            url.push_str(&digest::encode_query_component(key.as_ref()));
            url.push('=');
            url.push_str(&digest::encode_query_component(value.as_ref()));
        }

        tracing::debug!(
            canonical_path = %canonical_path,
            timestamp = ?timestamp,
            "Signed resource"
        );

        Ok(SignedUrl {
            url,
            canonical_path,
            timestamp,
            token,
        })
    }

    /// String-level entry point: `None` when the resource cannot be resolved,
    /// so a page render can simply omit the link.
    pub fn generate_signed_url<I, K, V>(&self, resource: &str, params: I) -> Option<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        match self.sign(&Resource::parse(resource), params) {
            Ok(signed) => Some(signed.url),
            Err(e) => {
                tracing::warn!(%e, resource = resource, "No signed URL produced");
                None
            }
        }
    }

    /// The exact string fed into the HMAC ahead of the timestamp.
    pub fn canonical_path(&self, resource: &Resource) -> Result<String, SignError> {
        let path = match resource {
            Resource::Id { id, raw } => match &self.resolver {
                Some(resolver) => {
                    let resolved = resolver
                        .resolve(*id)
                        .ok_or(SignError::Unresolved { id: *id })?;
                    self.strip_words.apply_to_path(&resolved)
                }
                // Without a resolver the digits are an ordinary path.
                None => raw.clone(),
            },
            Resource::Path(path) => path.clone(),
        };

        let path = match self.config.resource_base() {
            Some(base) => format!("{base}/{}", path.trim_start_matches('/')),
            None => path,
        };

        if is_absolute_url(&path) {
            Ok(path)
        } else {
            Ok(format!("/{}", path.trim_start_matches('/')))
        }
    }
}

/// Random 32-byte secret, base64 encoded
pub fn generate_secret() -> String {
    let secret: [u8; 32] = rand::thread_rng().gen();
    STANDARD.encode(secret)
}

fn is_absolute_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}
