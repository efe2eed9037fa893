//! Credential checking and the signed client-side session used by the gateway.
//! Keep the public surface thin and split implementation across sub-modules.

mod credentials;
mod session;

pub use credentials::CredentialStore;
pub use session::{parse_cookie, SessionCodec, SessionData, SessionError, SESSION_COOKIE};
