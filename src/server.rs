//! Server utility endpoints

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{or_fail, Result};
use crate::Client;

/// The server reports its version as a JSON-quoted string; accept a bare
/// string body as well.
fn version_string(body: &str) -> String {
    serde_json::from_str::<String>(body).unwrap_or_else(|_| body.trim().to_string())
}

impl Client {
    /// Server version string
    pub async fn version(&self) -> Result<String> {
        let body = self.http.get_text("/version").await?;
        Ok(version_string(&body))
    }

    /// Fail-fast [`Client::version`]
    pub async fn version_or_fail(&self) -> String {
        or_fail(self.version().await)
    }

    /// Liveness probe; the returned map carries a nanosecond timestamp
    pub async fn heartbeat(&self) -> Result<HashMap<String, u64>> {
        self.http.get_json("/heartbeat").await
    }

    /// Wipe the server's entire state; must be enabled server-side
    pub async fn reset(&self) -> Result<Value> {
        self.http.post_empty("/reset").await
    }

    /// Flush in-memory state to disk
    pub async fn persist(&self) -> Result<Value> {
        self.http.post_empty("/persist").await
    }

    /// Server health report
    pub async fn healthcheck(&self) -> Result<Value> {
        self.http.get_json("/healthcheck").await
    }

    /// Capability and limit report consulted before heavy operations
    pub async fn pre_flight_checks(&self) -> Result<Value> {
        self.http.get_json("/pre-flight-checks").await
    }

    /// Identity the server associates with this client's credentials
    pub async fn auth_identity(&self) -> Result<Value> {
        self.http.get_json("/auth/identity").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_string_accepts_quoted_and_bare() {
        assert_eq!(version_string("\"0.6.3\""), "0.6.3");
        assert_eq!(version_string("0.6.3"), "0.6.3");
        assert_eq!(version_string("0.6.3\n"), "0.6.3");
    }

    #[test]
    fn test_heartbeat_body_decodes() {
        let body = r#"{"nanosecond heartbeat": 1718031234567890123}"#;
        let heartbeat: HashMap<String, u64> = serde_json::from_str(body).unwrap();
        assert_eq!(
            heartbeat.get("nanosecond heartbeat"),
            Some(&1_718_031_234_567_890_123)
        );
    }
}
