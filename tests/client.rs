//! Offline behavior of the client: validation short-circuits, local no-ops,
//! and transport error surfacing.
//!
//! Every test here points at an unroutable address. An operation that
//! reaches the transport fails with a network error, so any other outcome
//! proves the call never issued a request.

use vectradb_sdk::{
    Client, Collection, CollectionUpdate, CreateCollectionRequest, EmbeddingBatch, QueryRequest,
    Scope, VectraError,
};

fn offline_client() -> Client {
    Client::connect("127.0.0.1:1").unwrap()
}

fn assert_validation(error: &VectraError) {
    assert!(
        matches!(error, VectraError::Validation(_)),
        "expected validation error, got {:?}",
        error
    );
}

#[tokio::test]
async fn unresolvable_handles_are_rejected_before_io() {
    let client = offline_client();
    let no_identifier = Collection::by_name("");

    assert_validation(&client.count(&no_identifier).await.unwrap_err());
    assert_validation(&client.delete_collection(&no_identifier).await.unwrap_err());
    assert_validation(
        &client
            .query(&no_identifier, &QueryRequest::new(vec![vec![1.0]]))
            .await
            .unwrap_err(),
    );

    let batch = EmbeddingBatch::new()
        .with_ids(vec!["a".to_string()])
        .with_embeddings(vec![vec![1.0]]);
    assert_validation(&client.add(&no_identifier, &batch).await.unwrap_err());
    assert_validation(&client.update(&no_identifier, &batch).await.unwrap_err());
    assert_validation(&client.upsert(&no_identifier, &batch).await.unwrap_err());
}

#[tokio::test]
async fn half_scoped_handles_are_rejected_before_io() {
    let client = offline_client();

    let mut half_scoped = Collection::by_name("docs");
    half_scoped.tenant = Some("acme".to_string());

    let error = client.count(&half_scoped).await.unwrap_err();
    assert_validation(&error);
    assert!(error.to_string().contains("database"));

    let error = client
        .modify_collection(&half_scoped, &CollectionUpdate::rename("fresh"))
        .await
        .unwrap_err();
    assert_validation(&error);
}

#[tokio::test]
async fn empty_modify_is_a_local_no_op() {
    let client = offline_client();
    let collection = Collection::by_id("1234");

    let unchanged = client
        .modify_collection(&collection, &CollectionUpdate::default())
        .await
        .unwrap();
    assert_eq!(unchanged.id.as_deref(), Some("1234"));
}

#[tokio::test]
async fn malformed_arguments_are_rejected_before_io() {
    let client = offline_client();
    let collection = Collection::by_id("1234").scoped(&Scope::new("acme", "prod"));

    assert_validation(
        &client
            .create_collection(&CreateCollectionRequest::new(""))
            .await
            .unwrap_err(),
    );
    assert_validation(&client.get_collection("", None).await.unwrap_err());
    assert_validation(
        &client
            .query(&collection, &QueryRequest::new(vec![]))
            .await
            .unwrap_err(),
    );

    let ragged = EmbeddingBatch::new()
        .with_ids(vec!["a".to_string(), "b".to_string()])
        .with_embeddings(vec![vec![1.0, 2.0], vec![3.0]]);
    assert_validation(&client.add(&collection, &ragged).await.unwrap_err());
}

#[tokio::test]
async fn transport_failures_surface_as_network_errors() {
    let client = offline_client();
    let collection = Collection::by_id("1234");

    let error = client.count(&collection).await.unwrap_err();
    assert!(
        matches!(error, VectraError::Network(_)),
        "expected network error, got {:?}",
        error
    );

    let error = client.heartbeat().await.unwrap_err();
    assert!(matches!(error, VectraError::Network(_)));
}

#[test]
fn client_is_shareable_across_tasks() {
    fn assert_send_sync<T: Send + Sync + Clone>() {}
    assert_send_sync::<Client>();
}
