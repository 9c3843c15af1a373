//! Client configuration
//!
//! Connection settings are resolved once, at client construction, from
//! explicit values, environment variables, or the documented defaults.

use std::env;
use std::time::Duration;

use crate::error::{Result, VectraError};

/// Default server host
pub const DEFAULT_HOST: &str = "http://localhost:8000";

/// Default API path segment
pub const DEFAULT_API_BASE: &str = "api";

/// Default API version segment
///
/// Servers before the tenant/database addressing change expect `v1`; set
/// [`ClientConfig::api_version`] accordingly when talking to one.
pub const DEFAULT_API_VERSION: &str = "v2";

const ENV_HOST: &str = "VECTRA_HOST";
const ENV_API_BASE: &str = "VECTRA_API_BASE";
const ENV_API_VERSION: &str = "VECTRA_API_VERSION";
const ENV_USERNAME: &str = "VECTRA_USERNAME";
const ENV_PASSWORD: &str = "VECTRA_PASSWORD";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server host, e.g. `http://localhost:8000`
    pub host: String,

    /// API path segment under the host
    pub api_base: String,

    /// API version segment (`v1` or `v2` depending on server revision)
    pub api_version: String,

    /// Basic-auth username; credentials are attached only when the
    /// password is also set
    pub username: Option<String>,

    /// Basic-auth password
    pub password: Option<String>,

    /// TCP connect timeout handed to the HTTP transport
    pub connect_timeout: Duration,

    /// End-to-end request timeout handed to the HTTP transport
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            username: None,
            password: None,
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Configuration for a specific host, defaults for everything else
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Read configuration from `VECTRA_*` environment variables, falling
    /// back to the defaults for anything unset
    pub fn from_env() -> Self {
        Self {
            host: env_or(ENV_HOST, DEFAULT_HOST),
            api_base: env_or(ENV_API_BASE, DEFAULT_API_BASE),
            api_version: env_or(ENV_API_VERSION, DEFAULT_API_VERSION),
            username: env::var(ENV_USERNAME).ok().filter(|v| !v.is_empty()),
            password: env::var(ENV_PASSWORD).ok().filter(|v| !v.is_empty()),
            ..Self::default()
        }
    }

    /// Set basic-auth credentials
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Override the API version segment
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Override both transport timeouts
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self.timeout = timeout;
        self
    }

    /// Base URL every endpoint path is appended to:
    /// `{host}/{api_base}/{api_version}`
    ///
    /// Pure given the configuration snapshot; performs no I/O.
    pub fn base_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.host.trim_end_matches('/'),
            self.api_base,
            self.api_version
        )
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(VectraError::validation("host must not be empty"));
        }
        if self.api_base.is_empty() {
            return Err(VectraError::validation("api_base must not be empty"));
        }
        if self.api_version.is_empty() {
            return Err(VectraError::validation("api_version must not be empty"));
        }
        Ok(())
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), "http://localhost:8000/api/v2");
    }

    #[test]
    fn test_base_url_segments_compose() {
        let mut config = ClientConfig::new("https://db.internal:9000");
        config.api_base = "gateway".to_string();
        config.api_version = "v1".to_string();
        assert_eq!(config.base_url(), "https://db.internal:9000/gateway/v1");
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let config = ClientConfig::new("http://localhost:8000/");
        assert_eq!(config.base_url(), "http://localhost:8000/api/v2");
    }

    #[test]
    fn test_from_env_overrides() {
        temp_env::with_vars(
            [
                (ENV_HOST, Some("http://db:9000")),
                (ENV_API_VERSION, Some("v1")),
            ],
            || {
                let config = ClientConfig::from_env();
                assert_eq!(config.host, "http://db:9000");
                assert_eq!(config.api_base, "api");
                assert_eq!(config.base_url(), "http://db:9000/api/v1");
            },
        );
    }

    #[test]
    fn test_from_env_defaults_when_unset() {
        temp_env::with_vars_unset([ENV_HOST, ENV_API_BASE, ENV_API_VERSION], || {
            let config = ClientConfig::from_env();
            assert_eq!(config.base_url(), "http://localhost:8000/api/v2");
            assert!(config.username.is_none());
        });
    }

    #[test]
    fn test_from_env_credentials() {
        temp_env::with_vars(
            [(ENV_USERNAME, Some("admin")), (ENV_PASSWORD, Some("secret"))],
            || {
                let config = ClientConfig::from_env();
                assert_eq!(config.username.as_deref(), Some("admin"));
                assert_eq!(config.password.as_deref(), Some("secret"));
            },
        );
    }

    #[test]
    fn test_validate_rejects_empty_segments() {
        let mut config = ClientConfig::default();
        config.api_version = String::new();
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.host = String::new();
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("host"));
    }
}
