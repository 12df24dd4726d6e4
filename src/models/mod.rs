pub mod config;
pub mod signer_config;
pub mod token;

pub use config::AppConfig;
pub use signer_config::{SignerConfig, SignerConfigBuilder};
pub use token::{Resource, SignedUrl, TokenField};
