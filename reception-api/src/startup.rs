use crate::config::ReceptionApiConfig;
use crate::handlers;
use crate::services::{MongoDb, MongoPostStore, PostStore};
use axum::{
    handler::Handler,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    rate_limit::{create_ip_rate_limiter, ip_rate_limit_middleware, ClientRateLimiter},
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

#[derive(Clone)]
pub struct AppState {
    pub config: ReceptionApiConfig,
    pub posts: Arc<dyn PostStore>,
}

pub fn build_router(state: AppState) -> Router {
    let login_limiter = ClientRateLimiter::new(
        create_ip_rate_limiter(
            state.config.rate_limit.login_attempts,
            state.config.rate_limit.login_window_seconds,
        ),
        &state.config.rate_limit.trusted_proxies,
    );

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(metrics_handler))
        .route(
            "/api/mottagning-password",
            get(handlers::reception_feed).post(
                handlers::check_password
                    .layer(from_fn_with_state(login_limiter, ip_rate_limit_middleware)),
            ),
        )
        .with_state(state)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
}

type ServerFuture = Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>;

pub struct Application {
    port: u16,
    server: ServerFuture,
}

impl Application {
    /// Connect to MongoDB and bind the listener.
    pub async fn build(config: ReceptionApiConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database).await?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        Self::build_with_store(config, Arc::new(MongoPostStore::new(db))).await
    }

    pub async fn build_with_store(
        config: ReceptionApiConfig,
        posts: Arc<dyn PostStore>,
    ) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let app = build_router(AppState { config, posts });

        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        // Peer addresses feed the login rate limiter.
        let server = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
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
