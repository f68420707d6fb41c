use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use reception_frontend::access::{AccessGate, CredentialVerifier, Verification};
use reception_frontend::feed::{FeedError, FeedLoader, FeedPayload, FeedSource};
use reception_frontend::startup::build_router;
use reception_frontend::AppState;
use secrecy::Secret;
use std::net::IpAddr;
use std::sync::Arc;
use tower::util::ServiceExt;

/// Reception API that is never reached by the routes under test.
struct Offline;

#[async_trait::async_trait]
impl CredentialVerifier for Offline {
    async fn verify(&self, _: &str, _: Option<IpAddr>) -> anyhow::Result<Verification> {
        Err(anyhow::anyhow!("offline"))
    }
}

#[async_trait::async_trait]
impl FeedSource for Offline {
    async fn fetch_feed(&self, _: &str) -> Result<FeedPayload, FeedError> {
        Err(FeedError::Unavailable(reqwest::StatusCode::SERVICE_UNAVAILABLE))
    }
}

fn app() -> axum::Router {
    let offline = Arc::new(Offline);
    build_router(AppState::new(
        AccessGate::new(Secret::new("secret123".to_string())),
        offline.clone(),
        FeedLoader::new(offline),
    ))
}

#[tokio::test]
async fn health_check_works() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn static_pages_render_with_page_policy() {
    for uri in ["/", "/dokument", "/mottagning"] {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        let csp = response
            .headers()
            .get("content-security-policy")
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(csp.contains("https://unpkg.com"), "{}", uri);
    }
}

#[tokio::test]
async fn unreachable_api_shows_generic_error() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/mottagning")
                .header("content-type", "application/x-www-form-urlencoded")
                .header("hx-request", "true")
                .body(Body::from("password=secret123"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("Något gick fel"));
}
