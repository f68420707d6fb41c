//! Access to the reception portal: the server-side credential gate and the
//! login state machine.

pub mod controller;
pub mod gate;
pub mod redirect;

pub use controller::{AccessController, Submission};
pub use gate::AccessGate;
pub use redirect::RedirectTarget;

use crate::feed::FeedItem;
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::StatusCode;
use std::net::IpAddr;
use thiserror::Error;

/// Why a submission did not unlock the portal. `Display` is the message
/// shown to the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Fel lösenord")]
    WrongCredential,

    #[error("För många försök, försök igen senare")]
    RateLimited,

    #[error("Något gick fel")]
    UnexpectedFailure,
}

impl AccessError {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::TOO_MANY_REQUESTS => AccessError::RateLimited,
            StatusCode::UNAUTHORIZED => AccessError::WrongCredential,
            _ => AccessError::UnexpectedFailure,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AccessState {
    LoggedOut,
    /// A submission is in flight.
    Checking,
    /// Unlocked; the feed exists only in this state.
    LoggedIn(Vec<FeedItem>),
    Error(AccessError),
}

impl AccessState {
    pub fn is_unlocked(&self) -> bool {
        matches!(self, AccessState::LoggedIn(_))
    }

    pub fn error(&self) -> Option<AccessError> {
        match self {
            AccessState::Error(e) => Some(*e),
            _ => None,
        }
    }
}

/// Outcome of one call to the verification endpoint.
#[derive(Debug, Clone)]
pub struct Verification {
    pub status: StatusCode,
    /// `mottagning_key` from a successful response body.
    pub credential: Option<String>,
    /// `Set-Cookie` values to relay to the browser unchanged.
    pub set_cookies: Vec<HeaderValue>,
    /// `error` detail from the response body, for logs only.
    pub error: Option<String>,
}

/// The verification endpoint.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Submit `candidate` once. `client_ip` is forwarded so the endpoint can
    /// rate limit per visitor rather than per frontend instance.
    async fn verify(
        &self,
        candidate: &str,
        client_ip: Option<IpAddr>,
    ) -> anyhow::Result<Verification>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_distinct_messages() {
        let limited = AccessError::from_status(StatusCode::TOO_MANY_REQUESTS);
        let wrong = AccessError::from_status(StatusCode::UNAUTHORIZED);
        let other = AccessError::from_status(StatusCode::BAD_GATEWAY);

        assert_eq!(limited.to_string(), "För många försök, försök igen senare");
        assert_eq!(wrong.to_string(), "Fel lösenord");
        assert_eq!(other.to_string(), "Något gick fel");
        assert_ne!(limited.to_string(), wrong.to_string());
    }
}
