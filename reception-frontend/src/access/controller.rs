use super::{AccessError, AccessState, CredentialVerifier, RedirectTarget};
use crate::feed::FeedLoader;
use reqwest::header::HeaderValue;
use reqwest::StatusCode;
use std::net::IpAddr;
use std::sync::Arc;

/// What the page should do after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Access granted with a pending deep link: leave for this path. The
    /// target page runs its own access check, so no feed is loaded here.
    Navigate(String),
    /// The controller settled in `LoggedIn` or `Error`; render its state.
    Settled,
}

/// Login state machine for one rendering of the reception page.
///
/// `LoggedOut --submit--> Checking --200--> LoggedIn`,
/// `Checking --200 + redirect--> Navigate`,
/// `Checking --401/429/other--> Error --submit--> Checking`.
///
/// [`submit_credential`](Self::submit_credential) borrows the controller
/// mutably, so a controller never has two submissions pending.
pub struct AccessController {
    verifier: Arc<dyn CredentialVerifier>,
    feed: FeedLoader,
    redirect: Option<RedirectTarget>,
    client_ip: Option<IpAddr>,
    state: AccessState,
    granted_cookies: Vec<HeaderValue>,
}

impl AccessController {
    pub fn new(
        verifier: Arc<dyn CredentialVerifier>,
        feed: FeedLoader,
        redirect: Option<RedirectTarget>,
    ) -> Self {
        Self {
            verifier,
            feed,
            redirect,
            client_ip: None,
            state: AccessState::LoggedOut,
            granted_cookies: Vec::new(),
        }
    }

    /// Start from a state seeded by the server-side gate.
    pub fn with_state(mut self, state: AccessState) -> Self {
        self.state = state;
        self
    }

    pub fn with_client_ip(mut self, client_ip: Option<IpAddr>) -> Self {
        self.client_ip = client_ip;
        self
    }

    pub fn state(&self) -> &AccessState {
        &self.state
    }

    pub fn into_state(self) -> AccessState {
        self.state
    }

    pub fn redirect(&self) -> Option<&RedirectTarget> {
        self.redirect.as_ref()
    }

    /// Cookies the verification endpoint set on success.
    pub fn granted_cookies(&self) -> &[HeaderValue] {
        &self.granted_cookies
    }

    #[tracing::instrument(name = "submit_credential", skip_all)]
    pub async fn submit_credential(&mut self, candidate: &str) -> Submission {
        self.state = AccessState::Checking;

        let verification = match self.verifier.verify(candidate, self.client_ip).await {
            Ok(verification) => verification,
            Err(e) => {
                tracing::error!(error = %e, "Credential verification request failed");
                self.state = AccessState::Error(AccessError::UnexpectedFailure);
                return Submission::Settled;
            }
        };

        if verification.status != StatusCode::OK {
            let error = AccessError::from_status(verification.status);
            match error {
                AccessError::UnexpectedFailure => tracing::error!(
                    status = %verification.status,
                    detail = verification.error.as_deref().unwrap_or("-"),
                    "Unexpected verification response"
                ),
                _ => tracing::info!(
                    status = %verification.status,
                    detail = verification.error.as_deref().unwrap_or("-"),
                    "Credential rejected"
                ),
            }
            self.state = AccessState::Error(error);
            return Submission::Settled;
        }

        self.granted_cookies = verification.set_cookies;

        if let Some(target) = &self.redirect {
            tracing::info!(target = %target.path(), "Access granted, following deep link");
            return Submission::Navigate(target.path());
        }

        let credential = verification
            .credential
            .unwrap_or_else(|| candidate.to_string());
        let posts = self.feed.load_or_empty(&credential).await;
        tracing::info!(posts = posts.len(), "Access granted");
        self.state = AccessState::LoggedIn(posts);
        Submission::Settled
    }
}
