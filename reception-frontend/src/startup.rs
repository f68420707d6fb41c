use crate::access::AccessGate;
use crate::config::Settings;
use crate::feed::FeedLoader;
use crate::handlers::{
    app::{health_check, index},
    documents::documents_page,
    reception::{login_handler, reception_page, reception_subpage},
};
use crate::middleware::auth::reception_gate;
use crate::services::ReceptionClient;
use crate::AppState;
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use service_core::middleware::{
    metrics::metrics_middleware,
    security_headers::security_headers_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use service_core::observability::metrics_handler;
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    let gated = Router::new()
        .route("/mottagning/:page", get(reception_subpage))
        .route_layer(from_fn_with_state(state.clone(), reception_gate));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/dokument", get(documents_page))
        .route("/mottagning", get(reception_page).post(login_handler))
        .merge(gated)
        .with_state(state)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
}

/// Wire the gate and the reception API client from configuration.
pub fn build_state(settings: &Settings) -> anyhow::Result<AppState> {
    let client = Arc::new(ReceptionClient::new(&settings.reception)?);

    Ok(AppState::new(
        AccessGate::new(settings.reception.secret.clone()),
        client.clone(),
        FeedLoader::new(client),
    )
    .with_trusted_proxies(&settings.server.trusted_proxies))
}

type ServerFuture = Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>;

pub struct Application {
    port: u16,
    server: ServerFuture,
}

impl Application {
    pub async fn build(settings: Settings) -> anyhow::Result<Self> {
        let state = build_state(&settings)?;
        Self::build_with_state(&settings, state).await
    }

    pub async fn build_with_state(settings: &Settings, state: AppState) -> anyhow::Result<Self> {
        let address = format!("{}:{}", settings.server.host, settings.server.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Starting reception-frontend on {}:{}", settings.server.host, port);

        // Peer addresses are forwarded to the reception API for rate limiting.
        let server = axum::serve(
            listener,
            build_router(state).into_make_service_with_connect_info::<SocketAddr>(),
        );

        Ok(Self {
            port,
            server: Box::pin(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
