use std::env;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Settings needed to talk to a library registry.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Server the `/v1/...` paths are resolved against
    pub base_url: String,
    /// Bearer token sent with every request
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Whole-request timeout; unset means no timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Load the configuration from `config/default`, `config/<RUN_MODE>` and
    /// `LIBRARY_*` environment variables, later sources winning.
    pub fn load() -> Result<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "dev".into());

        let config = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // LIBRARY_BASE_URL, LIBRARY_AUTH_TOKEN, ...
            .add_source(
                Environment::with_prefix("LIBRARY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_token: None,
            user_agent: None,
            timeout_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_helpers() {
        let config = ClientConfig::new("https://library.example.com").with_auth_token("s3cret");
        assert_eq!(config.base_url, "https://library.example.com");
        assert_eq!(config.auth_token.as_deref(), Some("s3cret"));
        assert_eq!(config.timeout(), None);

        let config = ClientConfig {
            timeout_secs: Some(30),
            ..Default::default()
        };
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
