pub mod clock;
pub mod digest;
pub mod resolver;
pub mod strip_words;
pub mod url_signer;
pub mod verifier;

pub use clock::{Clock, FixedClock, SystemClock};
pub use resolver::{ResourceResolver, StaticResolver};
pub use strip_words::StripWordFilter;
pub use url_signer::{generate_secret, UrlSigner};
pub use verifier::{is_timed_hmac_valid, VerifiedToken, Verifier};
