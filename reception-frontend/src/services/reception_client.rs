use crate::access::{CredentialVerifier, Verification};
use crate::config::ReceptionSettings;
use crate::feed::{FeedError, FeedPayload, FeedSource};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::SET_COOKIE;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use service_core::observability::TracedClientExt;
use std::net::IpAddr;

pub const RECEPTION_PATH: &str = "/api/mottagning-password";
pub const CREDENTIAL_HEADER: &str = "mottagning_key";

#[derive(Deserialize, Default)]
struct VerificationBody {
    #[serde(default)]
    mottagning_key: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the reception API: credential verification and the feed.
pub struct ReceptionClient {
    client: Client,
    base_url: String,
}

impl ReceptionClient {
    pub fn new(settings: &ReceptionSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build reception API client: {}", e))?;

        Ok(Self {
            client,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, RECEPTION_PATH)
    }
}

#[async_trait]
impl CredentialVerifier for ReceptionClient {
    #[tracing::instrument(skip_all)]
    async fn verify(&self, candidate: &str, client_ip: Option<IpAddr>) -> Result<Verification> {
        let url = self.endpoint();

        let mut request = self.client.traced_post(&url).json(&serde_json::json!({
            "type": "password",
            "password": candidate,
        }));
        if let Some(ip) = client_ip {
            request = request.header("x-forwarded-for", &ip.to_string());
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Failed to send POST request to {}: {}", url, e);
            anyhow::anyhow!("HTTP request failed: {}", e)
        })?;

        let status = response.status();
        let set_cookies = response.headers().get_all(SET_COOKIE).iter().cloned().collect();

        // The status alone decides the outcome; an unreadable body only loses detail.
        let body = response
            .json::<VerificationBody>()
            .await
            .unwrap_or_else(|e| {
                tracing::debug!(status = %status, "Verification body not readable: {}", e);
                VerificationBody::default()
            });

        Ok(Verification {
            status,
            credential: body.mottagning_key,
            set_cookies,
            error: body.error,
        })
    }
}

#[async_trait]
impl FeedSource for ReceptionClient {
    #[tracing::instrument(skip_all)]
    async fn fetch_feed(&self, credential: &str) -> Result<FeedPayload, FeedError> {
        let response = self
            .client
            .traced_get(&self.endpoint())
            .header(CREDENTIAL_HEADER, credential)
            .send()
            .await
            .map_err(FeedError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FeedError::Unavailable(status));
        }

        response.json::<FeedPayload>().await.map_err(FeedError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        http::HeaderMap,
        response::IntoResponse,
        routing::get,
    };
    use secrecy::Secret;

    async fn stub_endpoint() -> String {
        async fn verify(Json(body): Json<serde_json::Value>) -> impl IntoResponse {
            if body["password"] == "secret123" && body["type"] == "password" {
                (
                    StatusCode::OK,
                    [(SET_COOKIE, "mottagning_key=secret123; Path=/; HttpOnly")],
                    Json(serde_json::json!({ "mottagning_key": "secret123" })),
                )
                    .into_response()
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({ "error": "Fel lösenord" })),
                )
                    .into_response()
            }
        }

        async fn feed(headers: HeaderMap) -> impl IntoResponse {
            match headers.get(CREDENTIAL_HEADER).and_then(|v| v.to_str().ok()) {
                Some("secret123") => Json(serde_json::json!({
                    "posts": [{ "id": "a", "title": "Välkommen", "publishDate": { "_seconds": 5 } }]
                }))
                .into_response(),
                _ => StatusCode::UNAUTHORIZED.into_response(),
            }
        }

        let app = Router::new().route(RECEPTION_PATH, get(feed).post(verify));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn client(api_url: String) -> ReceptionClient {
        ReceptionClient::new(&ReceptionSettings {
            secret: Secret::new("unused".to_string()),
            api_url,
            request_timeout_secs: 2,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn successful_verification_relays_cookie_and_key() {
        let client = client(stub_endpoint().await);

        let verification = client.verify("secret123", None).await.unwrap();

        assert_eq!(verification.status, StatusCode::OK);
        assert_eq!(verification.credential.as_deref(), Some("secret123"));
        assert_eq!(verification.set_cookies.len(), 1);
    }

    #[tokio::test]
    async fn rejection_keeps_status_and_detail() {
        let client = client(stub_endpoint().await);

        let verification = client.verify("wrong", None).await.unwrap();

        assert_eq!(verification.status, StatusCode::UNAUTHORIZED);
        assert_eq!(verification.error.as_deref(), Some("Fel lösenord"));
        assert!(verification.set_cookies.is_empty());
    }

    #[tokio::test]
    async fn feed_sends_credential_header() {
        let client = client(stub_endpoint().await);

        let payload = client.fetch_feed("secret123").await.unwrap();
        assert_eq!(payload.posts.unwrap()[0].publish_date.seconds, 5);

        let err = client.fetch_feed("wrong").await.unwrap_err();
        assert!(matches!(err, FeedError::Unavailable(StatusCode::UNAUTHORIZED)));
    }

    #[tokio::test]
    async fn unreachable_api_is_a_transport_error() {
        let client = client("http://127.0.0.1:1".to_string());

        assert!(client.verify("secret123", None).await.is_err());
        assert!(matches!(
            client.fetch_feed("secret123").await,
            Err(FeedError::Transport(_))
        ));
    }
}
