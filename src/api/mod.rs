pub mod headers;
pub mod sign;
pub mod verify;

pub use sign::{handle_sign, SignResponse, __path_handle_sign};
pub use verify::{
    handle_auth, handle_verify, VerifyResponse, VerifySettings, __path_handle_auth,
    __path_handle_verify,
};
