//! Collection lifecycle and embedding operations
//!
//! A collection is reachable through two URL shapes: the global
//! `/collections/{ident}` form and the tenant/database-scoped
//! `/tenants/{tenant}/databases/{database}/collections/{ident}` form. Which
//! one applies is resolved per call from the fields populated on the
//! [`Collection`] value, in one place ([`collection_path`]), never per
//! operation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{or_fail, Result, VectraError};
use crate::Client;

/// Open JSON map used for collection and embedding metadata
pub type Metadata = serde_json::Map<String, Value>;

/// Number of results a query returns per input vector unless overridden
pub const DEFAULT_N_RESULTS: usize = 10;

/// Tenant/database pair for scoped addressing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub tenant: String,
    pub database: String,
}

impl Scope {
    pub fn new(tenant: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            database: database.into(),
        }
    }
}

/// A named grouping of embeddings on the server
///
/// Values returned by the server carry `id` and any server-reported fields;
/// handles built client-side with [`Collection::by_name`] or
/// [`Collection::by_id`] carry only what the caller provided. Either kind
/// addresses the same resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Server-assigned identifier; absent on handles built by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Server-side index configuration, reported by recent server revisions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Metadata>,

    /// Embedding dimensionality, absent until the first embedding is added
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_position: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
}

impl Collection {
    /// Handle addressing a collection by name
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            metadata: None,
            tenant: None,
            database: None,
            configuration: None,
            dimension: None,
            log_position: None,
            version: None,
        }
    }

    /// Handle addressing a collection by server-assigned id
    pub fn by_id(id: impl Into<String>) -> Self {
        let mut collection = Self::by_name("");
        collection.id = Some(id.into());
        collection
    }

    /// Attach tenant/database scoping to this handle
    pub fn scoped(mut self, scope: &Scope) -> Self {
        self.tenant = Some(scope.tenant.clone());
        self.database = Some(scope.database.clone());
        self
    }

    /// The path identifier: server id when present, otherwise the name
    fn identifier(&self) -> Option<&str> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| (!self.name.is_empty()).then_some(self.name.as_str()))
    }
}

/// Changes accepted by [`Client::modify_collection`]; unset fields are left
/// untouched on the server
#[derive(Debug, Clone, Default)]
pub struct CollectionUpdate {
    pub name: Option<String>,
    pub metadata: Option<Metadata>,
}

impl CollectionUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    fn renamed_to(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    fn is_empty(&self) -> bool {
        self.renamed_to().is_none() && self.metadata.is_none()
    }
}

/// Create / get-or-create request
#[derive(Debug, Clone)]
pub struct CreateCollectionRequest {
    pub name: String,
    /// Sent verbatim; defaults to an empty map
    pub metadata: Metadata,
    /// Tenant/database the collection lives under; global when unset
    pub scope: Option<Scope>,
}

impl CreateCollectionRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: Metadata::new(),
            scope: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn scoped(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }
}

/// Parallel-column payload for add / update / upsert
///
/// All present columns must share one cardinality; `ids` must be unique and
/// embedding vectors must all have the same length. Shape is checked
/// client-side before anything is sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmbeddingBatch {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeddings: Option<Vec<Vec<f32>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadatas: Option<Vec<Metadata>>,
}

impl EmbeddingBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids(mut self, ids: Vec<String>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_embeddings(mut self, embeddings: Vec<Vec<f32>>) -> Self {
        self.embeddings = Some(embeddings);
        self
    }

    pub fn with_documents(mut self, documents: Vec<String>) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn with_metadatas(mut self, metadatas: Vec<Metadata>) -> Self {
        self.metadatas = Some(metadatas);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.ids.is_empty() && self.embeddings.is_none() && self.documents.is_none() {
            return Err(VectraError::validation(
                "batch needs at least one of ids, embeddings, or documents",
            ));
        }

        if let Some(embeddings) = &self.embeddings {
            if let Some(first) = embeddings.first() {
                let width = first.len();
                for (index, vector) in embeddings.iter().enumerate() {
                    if vector.len() != width {
                        return Err(VectraError::validation(format!(
                            "ragged embeddings: vector {} has length {}, expected {}",
                            index,
                            vector.len(),
                            width
                        )));
                    }
                }
            }
        }

        let mut seen = HashSet::new();
        for id in &self.ids {
            if !seen.insert(id.as_str()) {
                return Err(VectraError::validation(format!("duplicate id: {}", id)));
            }
        }

        let mut cardinality: Option<(usize, &str)> = None;
        let columns = [
            ((!self.ids.is_empty()).then_some(self.ids.len()), "ids"),
            (self.embeddings.as_ref().map(Vec::len), "embeddings"),
            (self.documents.as_ref().map(Vec::len), "documents"),
            (self.metadatas.as_ref().map(Vec::len), "metadatas"),
        ];
        for (len, label) in columns {
            let Some(len) = len else { continue };
            match cardinality {
                None => cardinality = Some((len, label)),
                Some((expected, first_label)) if len != expected => {
                    return Err(VectraError::validation(format!(
                        "{} has {} entries but {} has {}",
                        label, len, first_label, expected
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

/// Nearest-neighbour query payload
///
/// Unset knobs serialize as the server defaults, so the wire body is always
/// fully populated.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub query_embeddings: Vec<Vec<f32>>,

    pub n_results: usize,

    /// Metadata filter, interpreted server-side
    #[serde(rename = "where")]
    pub where_metadata: Metadata,

    /// Document-content filter, interpreted server-side
    pub where_document: Metadata,

    /// Result columns to return
    pub include: Vec<String>,
}

impl QueryRequest {
    pub fn new(query_embeddings: Vec<Vec<f32>>) -> Self {
        Self {
            query_embeddings,
            n_results: DEFAULT_N_RESULTS,
            where_metadata: Metadata::new(),
            where_document: Metadata::new(),
            include: vec![
                "metadatas".to_string(),
                "documents".to_string(),
                "distances".to_string(),
            ],
        }
    }

    pub fn with_n_results(mut self, n_results: usize) -> Self {
        self.n_results = n_results;
        self
    }

    pub fn with_where(mut self, filter: Metadata) -> Self {
        self.where_metadata = filter;
        self
    }

    pub fn with_where_document(mut self, filter: Metadata) -> Self {
        self.where_document = filter;
        self
    }

    pub fn with_include(mut self, include: Vec<String>) -> Self {
        self.include = include;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.query_embeddings.is_empty() {
            return Err(VectraError::validation(
                "query needs at least one query embedding",
            ));
        }
        if self.n_results == 0 {
            return Err(VectraError::validation("n_results must be greater than 0"));
        }
        Ok(())
    }
}

/// Columnar query result
///
/// The outer index follows the input query vectors; inner sequences are
/// ranked by ascending distance. Columns excluded via `include` decode as
/// `None`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub ids: Vec<Vec<String>>,

    #[serde(default)]
    pub embeddings: Option<Vec<Vec<Vec<f32>>>>,

    #[serde(default)]
    pub documents: Option<Vec<Vec<Option<String>>>>,

    #[serde(default)]
    pub metadatas: Option<Vec<Vec<Option<Metadata>>>>,

    #[serde(default)]
    pub distances: Option<Vec<Vec<f32>>>,
}

/// Resolve the collections root: tenant/database-scoped when both fields are
/// present, global when neither is. Exactly one is a caller error.
fn collections_root(tenant: Option<&str>, database: Option<&str>) -> Result<String> {
    let tenant = tenant.filter(|value| !value.is_empty());
    let database = database.filter(|value| !value.is_empty());

    match (tenant, database) {
        (Some(tenant), Some(database)) => Ok(format!(
            "/tenants/{}/databases/{}/collections",
            tenant, database
        )),
        (None, None) => Ok("/collections".to_string()),
        (Some(_), None) => Err(VectraError::validation(
            "scoped collection is missing its database",
        )),
        (None, Some(_)) => Err(VectraError::validation(
            "scoped collection is missing its tenant",
        )),
    }
}

/// Resolve the URL path for one collection, honoring scoped addressing when
/// the handle carries it
fn collection_path(collection: &Collection, action: Option<&str>) -> Result<String> {
    let ident = collection.identifier().ok_or_else(|| {
        VectraError::validation("collection handle needs an id or a non-empty name")
    })?;

    let root = collections_root(collection.tenant.as_deref(), collection.database.as_deref())?;
    let mut path = format!("{}/{}", root, ident);
    if let Some(action) = action {
        path.push('/');
        path.push_str(action);
    }
    Ok(path)
}

fn scope_parts(scope: Option<&Scope>) -> (Option<&str>, Option<&str>) {
    match scope {
        Some(scope) => (Some(scope.tenant.as_str()), Some(scope.database.as_str())),
        None => (None, None),
    }
}

impl Client {
    /// Create a collection; the server rejects a name that already exists
    pub async fn create_collection(
        &self,
        request: &CreateCollectionRequest,
    ) -> Result<Collection> {
        self.create_collection_inner(request, false).await
    }

    /// Create a collection, or fetch the existing one with that name
    pub async fn get_or_create_collection(
        &self,
        request: &CreateCollectionRequest,
    ) -> Result<Collection> {
        self.create_collection_inner(request, true).await
    }

    async fn create_collection_inner(
        &self,
        request: &CreateCollectionRequest,
        get_or_create: bool,
    ) -> Result<Collection> {
        if request.name.is_empty() {
            return Err(VectraError::validation("collection name must not be empty"));
        }

        let (tenant, database) = scope_parts(request.scope.as_ref());
        let root = collections_root(tenant, database)?;

        let body = serde_json::json!({
            "name": request.name,
            "metadata": request.metadata,
            "get_or_create": get_or_create,
        });

        let mut collection: Collection = self.http.post_json(&root, &body).await?;
        if let Some(scope) = &request.scope {
            fill_scope(&mut collection, scope);
        }
        Ok(collection)
    }

    /// Fetch a collection by name or id
    pub async fn get_collection(&self, ident: &str, scope: Option<&Scope>) -> Result<Collection> {
        if ident.is_empty() {
            return Err(VectraError::validation(
                "collection identifier must not be empty",
            ));
        }

        let (tenant, database) = scope_parts(scope);
        let root = collections_root(tenant, database)?;

        let mut collection: Collection = self.http.get_json(&format!("{}/{}", root, ident)).await?;
        if let Some(scope) = scope {
            fill_scope(&mut collection, scope);
        }
        Ok(collection)
    }

    /// List collections in server order
    pub async fn list_collections(&self, scope: Option<&Scope>) -> Result<Vec<Collection>> {
        let (tenant, database) = scope_parts(scope);
        let root = collections_root(tenant, database)?;
        self.http.get_json(&root).await
    }

    /// Rename a collection and/or replace its metadata
    ///
    /// An update with nothing set succeeds without issuing a request. The
    /// returned value is the handle with the accepted changes applied; the
    /// server's acknowledgment body is not part of the contract.
    pub async fn modify_collection(
        &self,
        collection: &Collection,
        update: &CollectionUpdate,
    ) -> Result<Collection> {
        if update.is_empty() {
            return Ok(collection.clone());
        }

        let path = collection_path(collection, None)?;

        let mut body = Metadata::new();
        if let Some(name) = update.renamed_to() {
            body.insert("new_name".to_string(), Value::String(name.to_string()));
        }
        if let Some(metadata) = &update.metadata {
            body.insert("new_metadata".to_string(), Value::Object(metadata.clone()));
        }
        self.http.put(&path, &body).await?;

        let mut updated = collection.clone();
        if let Some(name) = update.renamed_to() {
            updated.name = name.to_string();
        }
        if let Some(metadata) = &update.metadata {
            updated.metadata = Some(metadata.clone());
        }
        Ok(updated)
    }

    /// Delete a collection
    pub async fn delete_collection(&self, collection: &Collection) -> Result<()> {
        let path = collection_path(collection, None)?;
        self.http.delete(&path).await
    }

    /// Number of embeddings in a collection
    pub async fn count(&self, collection: &Collection) -> Result<u64> {
        let path = collection_path(collection, Some("count"))?;
        self.http.get_json(&path).await
    }

    /// Add embeddings; the server rejects ids that already exist
    pub async fn add(&self, collection: &Collection, batch: &EmbeddingBatch) -> Result<Value> {
        self.submit_batch(collection, "add", batch).await
    }

    /// Update existing embeddings by id
    pub async fn update(&self, collection: &Collection, batch: &EmbeddingBatch) -> Result<Value> {
        self.submit_batch(collection, "update", batch).await
    }

    /// Add or overwrite embeddings by id
    pub async fn upsert(&self, collection: &Collection, batch: &EmbeddingBatch) -> Result<Value> {
        self.submit_batch(collection, "upsert", batch).await
    }

    async fn submit_batch(
        &self,
        collection: &Collection,
        action: &str,
        batch: &EmbeddingBatch,
    ) -> Result<Value> {
        batch.validate()?;
        let path = collection_path(collection, Some(action))?;
        self.http.post_json(&path, batch).await
    }

    /// Nearest-neighbour search over a collection
    pub async fn query(
        &self,
        collection: &Collection,
        request: &QueryRequest,
    ) -> Result<QueryResponse> {
        request.validate()?;
        let path = collection_path(collection, Some("query"))?;
        self.http.post_json(&path, request).await
    }

    // Fail-fast companions: same calls, panicking with the error's message
    // instead of returning it.

    /// Fail-fast [`Client::create_collection`]
    pub async fn create_collection_or_fail(&self, request: &CreateCollectionRequest) -> Collection {
        or_fail(self.create_collection(request).await)
    }

    /// Fail-fast [`Client::get_or_create_collection`]
    pub async fn get_or_create_collection_or_fail(
        &self,
        request: &CreateCollectionRequest,
    ) -> Collection {
        or_fail(self.get_or_create_collection(request).await)
    }

    /// Fail-fast [`Client::get_collection`]
    pub async fn get_collection_or_fail(&self, ident: &str, scope: Option<&Scope>) -> Collection {
        or_fail(self.get_collection(ident, scope).await)
    }

    /// Fail-fast [`Client::list_collections`]
    pub async fn list_collections_or_fail(&self, scope: Option<&Scope>) -> Vec<Collection> {
        or_fail(self.list_collections(scope).await)
    }

    /// Fail-fast [`Client::count`]
    pub async fn count_or_fail(&self, collection: &Collection) -> u64 {
        or_fail(self.count(collection).await)
    }

    /// Fail-fast [`Client::query`]
    pub async fn query_or_fail(
        &self,
        collection: &Collection,
        request: &QueryRequest,
    ) -> QueryResponse {
        or_fail(self.query(collection, request).await)
    }
}

/// Carry the request scope onto a returned value when the server body
/// omitted it, so the result is immediately usable for scoped operations
fn fill_scope(collection: &mut Collection, scope: &Scope) {
    if collection.tenant.is_none() {
        collection.tenant = Some(scope.tenant.clone());
    }
    if collection.database.is_none() {
        collection.database = Some(scope.database.clone());
    }
}
