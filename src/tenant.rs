//! Tenant endpoints

use serde::{Deserialize, Serialize};

use crate::error::{Result, VectraError};
use crate::Client;

/// Top-level namespace on the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub name: String,
}

impl Client {
    /// Create a tenant
    ///
    /// The server's acknowledgment body is not part of the contract; a 2xx
    /// response yields a handle for the created tenant.
    pub async fn create_tenant(&self, name: &str) -> Result<Tenant> {
        if name.is_empty() {
            return Err(VectraError::validation("tenant name must not be empty"));
        }

        let body = serde_json::json!({ "name": name });
        self.http
            .post_json::<_, serde_json::Value>("/tenants", &body)
            .await?;

        Ok(Tenant {
            name: name.to_string(),
        })
    }

    /// Fetch a tenant by name
    pub async fn get_tenant(&self, name: &str) -> Result<Tenant> {
        if name.is_empty() {
            return Err(VectraError::validation("tenant name must not be empty"));
        }
        self.http.get_json(&format!("/tenants/{}", name)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_decodes_from_server_body() {
        let tenant: Tenant = serde_json::from_str(r#"{"name": "acme"}"#).unwrap();
        assert_eq!(tenant.name, "acme");
    }

    #[test]
    fn test_empty_name_is_rejected_before_io() {
        // unroutable host: reaching the transport would fail with a
        // network error, so a validation result proves the short-circuit
        let client = Client::connect("127.0.0.1:1").unwrap();

        let error = tokio_test::block_on(client.create_tenant("")).unwrap_err();
        assert!(matches!(error, VectraError::Validation(_)));

        let error = tokio_test::block_on(client.get_tenant("")).unwrap_err();
        assert!(matches!(error, VectraError::Validation(_)));
    }
}
