//! Cross-service workflow test harness.
//!
//! Runs the reception API (backed by an in-memory post store) and the
//! reception frontend in-process on ephemeral ports, wired to each other the
//! way they are deployed. Tests drive the frontend with a cookie-keeping
//! `reqwest` client standing in for the browser.

use anyhow::{anyhow, Result};
use mongodb::bson::{Bson, DateTime};
use reception_api::config::{CookieConfig, MongoConfig, RateLimitConfig, ReceptionApiConfig};
use reception_api::models::Post;
use reception_api::services::MemoryPostStore;
use reception_frontend::config::{ReceptionSettings, ServerSettings, Settings, TelemetrySettings};
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::sync::{Arc, Once};
use std::time::Duration;

pub const RECEPTION_KEY: &str = "workflow-secret";

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,workflow_tests=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A published post; only `visibility = "mottagning"` reaches the feed.
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

fn api_config(login_attempts: u32) -> ReceptionApiConfig {
    ReceptionApiConfig {
        common: CoreConfig {
            port: 0,
            ..CoreConfig::default()
        },
        mottagning_key: Secret::new(RECEPTION_KEY.to_string()),
        mongodb: MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "workflow_tests".to_string(),
        },
        rate_limit: RateLimitConfig {
            login_attempts,
            // The frontend runs on loopback and names the visitor.
            trusted_proxies: vec![std::net::IpAddr::from([127, 0, 0, 1])],
            ..RateLimitConfig::default()
        },
        cookie: CookieConfig {
            secure: false,
            ..CookieConfig::default()
        },
    }
}

fn frontend_settings(api_url: String) -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            trusted_proxies: Vec::new(),
        },
        reception: ReceptionSettings {
            secret: Secret::new(RECEPTION_KEY.to_string()),
            api_url,
            request_timeout_secs: 5,
        },
        telemetry: TelemetrySettings::default(),
    }
}

/// Poll `{base}/health` until it answers 200 or `timeout` passes.
pub async fn wait_for_service(base: &str, timeout: Duration) -> Result<()> {
    let client = reqwest::Client::new();
    let health_url = format!("{}/health", base);
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        if let Ok(response) = client.get(&health_url).send().await {
            if response.status().is_success() {
                return Ok(());
            }
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(anyhow!("{} not healthy after {:?}", base, timeout));
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

/// Both services running and wired together.
pub struct WorkflowTestContext {
    pub api_url: String,
    pub frontend_url: String,
    /// Keeps cookies and does not follow redirects, so tests see each hop.
    pub browser: reqwest::Client,
}

impl WorkflowTestContext {
    pub async fn start(posts: Vec<Post>) -> Result<Self> {
        Self::start_with_limit(posts, RateLimitConfig::default().login_attempts).await
    }

    pub async fn start_with_limit(posts: Vec<Post>, login_attempts: u32) -> Result<Self> {
        init_tracing();

        let api = reception_api::startup::Application::build_with_store(
            api_config(login_attempts),
            Arc::new(MemoryPostStore::new(posts)),
        )
        .await
        .map_err(|e| anyhow!("Failed to build reception API: {}", e))?;
        let api_url = format!("http://127.0.0.1:{}", api.port());
        tokio::spawn(api.run_until_stopped());

        let frontend =
            reception_frontend::startup::Application::build(frontend_settings(api_url.clone()))
                .await?;
        let frontend_url = format!("http://127.0.0.1:{}", frontend.port());
        tokio::spawn(frontend.run_until_stopped());

        wait_for_service(&api_url, Duration::from_secs(10)).await?;
        wait_for_service(&frontend_url, Duration::from_secs(10)).await?;

        let browser = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            api_url,
            frontend_url,
            browser,
        })
    }

    pub fn page(&self, path: &str) -> String {
        format!("{}{}", self.frontend_url, path)
    }

    /// Submit the reception login form as the HTMX panel does.
    pub async fn log_in(&self, password: &str, url: Option<&str>) -> Result<reqwest::Response> {
        let mut form = vec![("password", password)];
        if let Some(url) = url {
            form.push(("url", url));
        }

        Ok(self
            .browser
            .post(self.page("/mottagning"))
            .header("HX-Request", "true")
            .form(&form)
            .send()
            .await?)
    }

    pub async fn get_text(&self, path: &str) -> Result<(reqwest::StatusCode, String)> {
        let response = self.browser.get(self.page(path)).send().await?;
        let status = response.status();
        Ok((status, response.text().await?))
    }
}
