//! Process configuration.
//!
//! Static platform settings ship in `storefront.config.json` and are compiled in.
//! Secrets and deployment-specific values come from the environment.

use std::{collections::HashMap, env, path::PathBuf, time::Duration};

use serde::Deserialize;

use crate::permission::{CapabilityTable, CapabilityTableError, Operation};

const PLATFORM_CONFIG: &str = include_str!("../../../storefront.config.json");

const DEFAULT_CHECKOUT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    pub name: String,
    pub environment: Environment,
    pub session: SessionSettings,
    pub capabilities: HashMap<Operation, String>,
}

impl PlatformConfig {
    pub fn embedded() -> Result<Self, ConfigError> {
        serde_json::from_str(PLATFORM_CONFIG)
            .map_err(|e| ConfigError::InvalidValue(format!("storefront.config.json: {}", e)))
    }
}

#[derive(Clone)]
pub struct ApiConfig {
    pub database_url: String,
    pub stripe_secret_key: Option<String>,
    pub stripe_webhook_secret: Option<String>,
    pub session_secret: String,
    pub session_cookie: String,
    pub session_ttl: Duration,
    pub checkout_timeout: Duration,
    pub capabilities_file: Option<PathBuf>,
    pub platform: PlatformConfig,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("stripe_configured", &self.stripe_secret_key.is_some())
            .field("webhook_configured", &self.stripe_webhook_secret.is_some())
            .field("session_cookie", &self.session_cookie)
            .field("session_ttl", &self.session_ttl)
            .field("checkout_timeout", &self.checkout_timeout)
            .field("capabilities_file", &self.capabilities_file)
            .finish_non_exhaustive()
    }
}

fn parse_secs(var: &'static str) -> Result<Option<Duration>, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| ConfigError::InvalidValue(var.to_string())),
        Err(_) => Ok(None),
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let platform = PlatformConfig::embedded()?;

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;
        let session_secret = env::var("ADMIN_SESSION_SECRET")
            .map_err(|_| ConfigError::MissingVar("ADMIN_SESSION_SECRET"))?;
        if session_secret.len() < 32 {
            return Err(ConfigError::InvalidValue(
                "ADMIN_SESSION_SECRET must be at least 32 bytes".to_string(),
            ));
        }

        let session_ttl = parse_secs("ADMIN_SESSION_TTL_SECS")?
            .unwrap_or(Duration::from_secs(platform.session.ttl_secs));
        let checkout_timeout = parse_secs("CHECKOUT_TIMEOUT_SECS")?
            .unwrap_or(Duration::from_secs(DEFAULT_CHECKOUT_TIMEOUT_SECS));

        Ok(ApiConfig {
            database_url,
            stripe_secret_key: env::var("STRIPE_SECRET_KEY").ok(),
            stripe_webhook_secret: env::var("STRIPE_WEBHOOK_SECRET").ok(),
            session_secret,
            session_cookie: platform.session.cookie_name.clone(),
            session_ttl,
            checkout_timeout,
            capabilities_file: env::var("CAPABILITIES_FILE").ok().map(PathBuf::from),
            platform,
        })
    }

    /// Configuration for tests and embedding. No payment provider, default timeouts.
    pub fn for_testing(session_secret: impl Into<String>) -> Result<Self, ConfigError> {
        let platform = PlatformConfig::embedded()?;
        Ok(ApiConfig {
            database_url: "sqlite::memory:".to_string(),
            stripe_secret_key: None,
            stripe_webhook_secret: None,
            session_secret: session_secret.into(),
            session_cookie: platform.session.cookie_name.clone(),
            session_ttl: Duration::from_secs(platform.session.ttl_secs),
            checkout_timeout: Duration::from_secs(DEFAULT_CHECKOUT_TIMEOUT_SECS),
            capabilities_file: None,
            platform,
        })
    }

    /// Loads the capability table, preferring `CAPABILITIES_FILE` over the embedded one.
    pub fn capability_table(&self) -> Result<CapabilityTable, ConfigError> {
        match &self.capabilities_file {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    ConfigError::InvalidValue(format!("CAPABILITIES_FILE {}: {}", path.display(), e))
                })?;
                Ok(CapabilityTable::from_json(&json)?)
            }
            None => Ok(CapabilityTable::from_names(&self.platform.capabilities)?),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidValue(String),
    Capabilities(CapabilityTableError),
}

impl From<CapabilityTableError> for ConfigError {
    fn from(err: CapabilityTableError) -> Self {
        ConfigError::Capabilities(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVar(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidValue(var) => write!(f, "Invalid value for: {}", var),
            ConfigError::Capabilities(err) => write!(f, "Capability table error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_is_complete() {
        let config = ApiConfig::for_testing("x".repeat(32)).unwrap();
        assert_eq!(config.session_cookie, "admin_session");
        assert!(config.capability_table().is_ok());
    }
}
