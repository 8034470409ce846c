//! Session token issuing.

use common::SessionToken;

/// Issues opaque session tokens on login.
///
/// There is no credential store: any non-empty username and password pair
/// is accepted. The token is the only thing a client needs to own a cart.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenIssuer;

impl TokenIssuer {
    /// Creates a new token issuer.
    pub fn new() -> Self {
        Self
    }

    /// Returns a fresh token, or `None` if either credential is empty.
    #[tracing::instrument(skip(self, password))]
    pub fn issue(&self, username: &str, password: &str) -> Option<SessionToken> {
        if username.trim().is_empty() || password.is_empty() {
            tracing::debug!("login rejected: empty credentials");
            return None;
        }

        metrics::counter!("sessions_issued_total").increment(1);
        Some(SessionToken::generate())
    }
}
