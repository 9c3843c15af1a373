//! Database endpoints
//!
//! Databases nest under a tenant; every path here is tenant-scoped.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VectraError};
use crate::Client;

/// Namespace nested under a tenant, containing collections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    /// Server-assigned identifier, absent on client-built handles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    /// Owning tenant, referenced by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
}

// The server requires both segments to be meaningful names, not just
// non-empty.
fn validate_segment(label: &str, value: &str) -> Result<()> {
    if value.len() <= 2 {
        return Err(VectraError::validation(format!(
            "{} must be longer than 2 characters",
            label
        )));
    }
    Ok(())
}

impl Client {
    /// Create a database under a tenant
    ///
    /// The server's acknowledgment body is not part of the contract; a 2xx
    /// response yields a handle for the created database.
    pub async fn create_database(&self, name: &str, tenant: &str) -> Result<Database> {
        validate_segment("database name", name)?;
        validate_segment("tenant", tenant)?;

        let body = serde_json::json!({ "name": name });
        self.http
            .post_json::<_, serde_json::Value>(&format!("/tenants/{}/databases", tenant), &body)
            .await?;

        Ok(Database {
            id: None,
            name: name.to_string(),
            tenant: Some(tenant.to_string()),
        })
    }

    /// Fetch a database by name
    pub async fn get_database(&self, name: &str, tenant: &str) -> Result<Database> {
        validate_segment("database name", name)?;
        validate_segment("tenant", tenant)?;

        let mut database: Database = self
            .http
            .get_json(&format!("/tenants/{}/databases/{}", tenant, name))
            .await?;
        if database.tenant.is_none() {
            database.tenant = Some(tenant.to_string());
        }
        Ok(database)
    }

    /// Delete a database and everything in it
    pub async fn delete_database(&self, name: &str, tenant: &str) -> Result<()> {
        validate_segment("database name", name)?;
        validate_segment("tenant", tenant)?;

        self.http
            .delete(&format!("/tenants/{}/databases/{}", tenant, name))
            .await
    }

    /// List a tenant's databases in server order
    pub async fn list_databases(&self, tenant: &str) -> Result<Vec<Database>> {
        validate_segment("tenant", tenant)?;
        self.http
            .get_json(&format!("/tenants/{}/databases", tenant))
            .await
    }
}
