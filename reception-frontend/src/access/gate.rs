use super::AccessState;
use crate::feed::FeedLoader;
use secrecy::Secret;
use service_core::utils::secrets_match;

/// Server-side check of the credential cookie, run once per page render.
#[derive(Clone)]
pub struct AccessGate {
    secret: Secret<String>,
}

impl AccessGate {
    pub fn new(secret: Secret<String>) -> Self {
        Self { secret }
    }

    /// Exact, constant-time match against the configured secret.
    pub fn admits(&self, credential: Option<&str>) -> bool {
        credential.is_some_and(|presented| secrets_match(&self.secret, presented))
    }

    /// Seed the page: unlocked with a freshly loaded feed when the presented
    /// credential matches, otherwise logged out.
    pub async fn initial_state(&self, credential: Option<&str>, feed: &FeedLoader) -> AccessState {
        match credential {
            Some(presented) if self.admits(Some(presented)) => {
                AccessState::LoggedIn(feed.load_or_empty(presented).await)
            }
            _ => AccessState::LoggedOut,
        }
    }
}
