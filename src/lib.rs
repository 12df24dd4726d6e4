//! Edgesign - time-limited signed URLs
//!
//! Builds URLs carrying an HMAC-SHA256 token that a reverse proxy or WAF
//! rule can check without a database lookup. The signer lives in
//! [`services::UrlSigner`]; [`services::Verifier`] is the matching gateway
//! check.
//!
//! ```
//! use edgesign::models::{Resource, SignerConfig};
//! use edgesign::services::{FixedClock, UrlSigner, Verifier};
//!
//! let config = SignerConfig::builder("https://cdn.example.com", "k")
//!     .resource_base("/previews")
//!     .use_timestamp(true)
//!     .build()
//!     .unwrap();
//! let signer = UrlSigner::new(config.clone()).with_clock(FixedClock(1_700_000_000));
//!
//! let no_params: [(&str, &str); 0] = [];
//! let signed = signer.sign(&Resource::parse("song.mp3"), no_params).unwrap();
//! assert!(signed.url.starts_with("https://cdn.example.com/previews/song.mp3?verify=1700000000-"));
//!
//! let verifier = Verifier::from_config(&config, 600);
//! assert!(verifier.verify(&signed.canonical_path, &signed.token, 1_700_000_100).is_ok());
//! ```

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
