pub mod access;
pub mod config;
pub mod feed;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use access::{AccessGate, CredentialVerifier};
use feed::FeedLoader;
use std::net::IpAddr;
use std::sync::Arc;

/// Shared application state: the credential gate and the reception API seams.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<AccessGate>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub feed_loader: FeedLoader,
    /// Proxies allowed to name the visitor in `x-forwarded-for`.
    pub trusted_proxies: Arc<[IpAddr]>,
}

impl AppState {
    pub fn new(
        gate: AccessGate,
        verifier: Arc<dyn CredentialVerifier>,
        feed_loader: FeedLoader,
    ) -> Self {
        Self {
            gate: Arc::new(gate),
            verifier,
            feed_loader,
            trusted_proxies: Arc::from(Vec::new()),
        }
    }

    pub fn with_trusted_proxies(mut self, trusted_proxies: &[IpAddr]) -> Self {
        self.trusted_proxies = trusted_proxies.into();
        self
    }
}
