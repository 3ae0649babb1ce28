//! Session port - bearer credential supplier
//!
//! Credential acquisition, persistence, and refresh live outside this
//! crate. The client only reads whatever token the session holder
//! currently has and passes auth failures back to the caller.

/// Supplies the opaque bearer credential for authenticated requests.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait SessionPort: Send + Sync {
    /// The current token, if a session exists. May or may not already
    /// carry the `Bearer ` prefix; adapters normalize it.
    fn bearer_token(&self) -> Option<String>;
}
