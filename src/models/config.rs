use crate::assets::AssetLoader;
use crate::error::ConfigError;
use crate::models::SignerConfig;
use crate::services::strip_words::DEFAULT_STRIP_WORD;
use crate::services::verifier::DEFAULT_MAX_SKEW_SECONDS;
use crate::services::StaticResolver;
use serde::Deserialize;
use std::collections::HashMap;

/// Service configuration loaded from config.yaml
#[derive(Deserialize, Clone)]
pub struct AppConfig {
    /// Origin prepended to every signed path
    pub base_url: String,

    /// Shared HMAC secret (overridable via EDGESIGN_SECRET)
    #[serde(default)]
    pub secret: String,

    /// Path prefix prepended to every resource before signing
    #[serde(default)]
    pub resource_base: Option<String>,

    /// Query parameter carrying the token
    #[serde(default = "default_param_name")]
    pub param_name: String,

    /// Mix the current time into the signature
    #[serde(default = "default_use_timestamp")]
    pub use_timestamp: bool,

    /// Freshness window enforced by the verifying endpoints
    #[serde(default = "default_max_skew")]
    pub max_skew_seconds: u64,

    /// Words stripped from resolved filenames
    #[serde(default = "default_strip_words")]
    pub strip_words: Vec<String>,

    /// Identifier to path table for numeric resources
    #[serde(default)]
    pub resources: HashMap<u64, String>,
}

fn default_param_name() -> String {
    crate::models::signer_config::DEFAULT_PARAM_NAME.to_string()
}

fn default_use_timestamp() -> bool {
    crate::models::signer_config::DEFAULT_USE_TIMESTAMP
}

fn default_max_skew() -> u64 {
    DEFAULT_MAX_SKEW_SECONDS
}

fn default_strip_words() -> Vec<String> {
    vec![DEFAULT_STRIP_WORD.to_string()]
}

impl AppConfig {
    /// Parse a YAML document
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load configuration from AssetLoader (external file or embedded template)
    pub fn load_from_assets(loader: &AssetLoader) -> Result<Self, ConfigError> {
        let content = loader.read_config_string()?;
        let config = Self::from_yaml(&content)?;
        tracing::info!(
            base_url = %config.base_url,
            use_timestamp = config.use_timestamp,
            resources = config.resources.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Replace the secret when `secret` is set and non-empty
    pub fn with_secret_override(mut self, secret: Option<String>) -> Self {
        if let Some(secret) = secret.filter(|s| !s.is_empty()) {
            self.secret = secret;
        }
        self
    }

    /// Build the signing configuration
    pub fn signer_config(&self) -> Result<SignerConfig, ConfigError> {
        let mut builder = SignerConfig::builder(&self.base_url, &self.secret)
            .param_name(&self.param_name)
            .use_timestamp(self.use_timestamp)
            .strip_words(self.strip_words.iter().cloned());
        if let Some(base) = &self.resource_base {
            builder = builder.resource_base(base);
        }
        builder.build()
    }

    /// Resolver over the configured resources, if any are listed
    pub fn resolver(&self) -> Option<StaticResolver> {
        if self.resources.is_empty() {
            None
        } else {
            Some(StaticResolver::new(self.resources.clone()))
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("secret", &"<redacted>")
            .field("resource_base", &self.resource_base)
            .field("param_name", &self.param_name)
            .field("use_timestamp", &self.use_timestamp)
            .field("max_skew_seconds", &self.max_skew_seconds)
            .field("strip_words", &self.strip_words)
            .field("resources", &self.resources.len())
            .finish()
    }
}
