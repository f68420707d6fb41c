use secrecy::Secret;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub reception: ReceptionSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Reverse proxies whose `x-forwarded-for` names the visitor. Empty means
    /// the socket peer is the visitor.
    #[serde(default)]
    pub trusted_proxies: Vec<IpAddr>,
}

#[derive(Deserialize, Clone)]
pub struct ReceptionSettings {
    /// Shared reception password; a `mottagning_key` cookie equal to this unlocks the portal.
    pub secret: Secret<String>,
    /// Base URL of the reception API (e.g. http://reception-api:8080).
    pub api_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ReceptionSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

fn default_request_timeout_secs() -> u64 {
    10
}

#[derive(Deserialize, Clone)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Span export is disabled when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("Failed to determine the current directory: {}", e)))?;

    // Works from the workspace root and from inside the crate
    let configuration_directory = if base_path.ends_with("reception-frontend") {
        base_path.join("config")
    } else {
        base_path.join("reception-frontend").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
