use mongodb::bson::{Bson, DateTime};
use reception_api::config::{
    CookieConfig, MongoConfig, RateLimitConfig, ReceptionApiConfig,
};
use reception_api::models::Post;
use reception_api::services::{MemoryPostStore, PostStore};
use reception_api::startup::Application;
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub const TEST_KEY: &str = "secret123";

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

pub fn test_config() -> ReceptionApiConfig {
    ReceptionApiConfig {
        common: CoreConfig {
            port: 0, // Random port for testing
            ..CoreConfig::default()
        },
        mottagning_key: Secret::new(TEST_KEY.to_string()),
        mongodb: MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "reception_test".to_string(),
        },
        rate_limit: RateLimitConfig::default(),
        cookie: CookieConfig {
            secure: false,
            ..CookieConfig::default()
        },
    }
}

pub fn post(id: &str, seconds: i64, visibility: &str) -> Post {
    Post {
        id: Bson::String(id.to_string()),
        title: format!("Inlägg {}", id),
        subtitle: String::new(),
        body: "Information till nyantagna".to_string(),
        image: String::new(),
        author: "Mottagningen".to_string(),
        publish_date: DateTime::from_millis(seconds * 1000),
        visibility: visibility.to_string(),
    }
}

impl TestApp {
    pub async fn spawn(posts: Vec<Post>) -> Self {
        Self::spawn_with_store(Arc::new(MemoryPostStore::new(posts))).await
    }

    pub async fn spawn_with_store(store: Arc<dyn PostStore>) -> Self {
        Self::spawn_with_config(test_config(), store).await
    }

    pub async fn spawn_with_config(config: ReceptionApiConfig, store: Arc<dyn PostStore>) -> Self {
        let app = Application::build_with_store(config, store)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/mottagning-password", self.address)
    }
}
