//! VectraDB Rust SDK
//!
//! HTTP client for the VectraDB vector database providing:
//! - Collection lifecycle (create, get, list, modify, delete)
//! - Embedding operations (add, update, upsert, query, count)
//! - Tenant and database management
//! - Server utility endpoints (version, heartbeat, reset)
//!
//! ## Addressing
//!
//! Collections are reachable through two URL shapes: the global
//! `/collections/...` form and the tenant/database-scoped
//! `/tenants/{tenant}/databases/{database}/collections/...` form. The SDK
//! picks the shape per call from the fields populated on the value it is
//! given; a half-scoped value is rejected before any request is sent.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vectradb_sdk::{Client, CreateCollectionRequest, EmbeddingBatch, QueryRequest};
//!
//! #[tokio::main]
//! async fn main() -> vectradb_sdk::Result<()> {
//!     let client = Client::connect("localhost:8000")?;
//!
//!     let collection = client
//!         .get_or_create_collection(&CreateCollectionRequest::new("articles"))
//!         .await?;
//!
//!     let batch = EmbeddingBatch::new()
//!         .with_ids(vec!["a".to_string(), "b".to_string()])
//!         .with_embeddings(vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
//!     client.add(&collection, &batch).await?;
//!
//!     let results = client
//!         .query(&collection, &QueryRequest::new(vec![vec![0.1, 0.2]]))
//!         .await?;
//!     println!("nearest ids: {:?}", results.ids[0]);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! Every operation returns [`Result`]; nothing is retried, suppressed, or
//! logged on the caller's behalf. The fail-fast `*_or_fail` companions panic
//! with the error's message instead, for callers that treat failures as
//! fatal.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

pub mod collection;
pub mod config;
pub mod database;
pub mod error;
mod http;
pub mod server;
pub mod tenant;

pub use collection::{
    Collection, CollectionUpdate, CreateCollectionRequest, EmbeddingBatch, Metadata, QueryRequest,
    QueryResponse, Scope,
};
pub use config::ClientConfig;
pub use database::Database;
pub use error::{Result, VectraError};
pub use tenant::Tenant;

use crate::http::Http;

/// VectraDB client
///
/// Stateless beyond its configuration snapshot; cheap to clone, and all
/// clones share one HTTP connection pool. Safe to use from many tasks at
/// once.
#[derive(Clone)]
pub struct Client {
    pub(crate) http: Http,
}

impl Client {
    /// Build a client from an explicit configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            http: Http::new(&config)?,
        })
    }

    /// Connect to a server address, using defaults for everything else
    pub fn connect(address: &str) -> Result<Self> {
        let host = if address.starts_with("http") {
            address.to_string()
        } else {
            format!("http://{}", address)
        };
        Self::new(ClientConfig::new(host))
    }

    /// Build a client from `VECTRA_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Base URL every request is issued against
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_prepends_scheme() {
        let client = Client::connect("localhost:8000").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api/v2");

        let client = Client::connect("https://db.internal").unwrap();
        assert_eq!(client.base_url(), "https://db.internal/api/v2");
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = ClientConfig::default();
        config.host = String::new();
        assert!(Client::new(config).is_err());
    }
}
