use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct ReceptionApiConfig {
    pub common: core_config::Config,
    /// The shared reception password; also the cookie value handed out on success.
    pub mottagning_key: Secret<String>,
    pub mongodb: MongoConfig,
    pub rate_limit: RateLimitConfig,
    pub cookie: CookieConfig,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub login_attempts: u32,
    pub login_window_seconds: u64,
    /// Proxies allowed to name the client in `x-forwarded-for`, such as the
    /// reception frontend. Requests from anyone else are keyed on the peer.
    pub trusted_proxies: Vec<IpAddr>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login_attempts: 3,
            login_window_seconds: 60,
            trusted_proxies: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub secure: bool,
    pub max_age_days: i64,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secure: true,
            max_age_days: 30,
        }
    }
}

impl ReceptionApiConfig {
    pub fn load() -> Result<Self, AppError> {
        // Handles .env and APP__ prefixed settings
        let common_config = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(ReceptionApiConfig {
            common: common_config,
            mottagning_key: Secret::new(get_env("MOTTAGNING_KEY", Some("mottagning-dev"), is_prod)?),
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some("mongodb://localhost:27017"), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("sektionen"), is_prod)?,
            },
            rate_limit: RateLimitConfig {
                login_attempts: parse_env("LOGIN_ATTEMPTS", 3)?,
                login_window_seconds: parse_env("LOGIN_WINDOW_SECONDS", 60)?,
                trusted_proxies: parse_ip_list("TRUSTED_PROXIES")?,
            },
            cookie: CookieConfig {
                secure: parse_env("COOKIE_SECURE", is_prod)?,
                max_age_days: parse_env("COOKIE_MAX_AGE_DAYS", 30)?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else {
                default.map(|d| d.to_string()).ok_or_else(|| {
                    AppError::ConfigError(anyhow::anyhow!("{} is not set", key))
                })
            }
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val.parse().map_err(|e: T::Err| {
            AppError::ConfigError(anyhow::anyhow!("Invalid value for {}: {}", key, e))
        }),
        Err(_) => Ok(default),
    }
}

/// Comma-separated IP list; unset or empty means none.
fn parse_ip_list(key: &str) -> Result<Vec<IpAddr>, AppError> {
    env::var(key)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<IpAddr>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Invalid address in {}: {}: {}", key, s, e))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trusted_proxies_default_to_none() {
        assert!(parse_ip_list("RECEPTION_API_TEST_UNSET_PROXIES").unwrap().is_empty());
        assert!(RateLimitConfig::default().trusted_proxies.is_empty());
    }

    #[test]
    fn get_env_requires_values_in_production() {
        let result = get_env("RECEPTION_API_TEST_UNSET_KEY", Some("fallback"), true);
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn get_env_falls_back_in_dev() {
        let value = get_env("RECEPTION_API_TEST_UNSET_KEY", Some("fallback"), false).unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn parse_env_uses_default_when_unset() {
        let attempts: u32 = parse_env("RECEPTION_API_TEST_UNSET_ATTEMPTS", 3).unwrap();
        assert_eq!(attempts, 3);
    }
}
