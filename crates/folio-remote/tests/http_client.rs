//! `HttpCollections` against a mock REST document database.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use serde_json::{Map, Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use folio_core::types::CREATED_AT_FIELD;
use folio_core::{Error, NewDocument, OrderBy, Project, RemoteCollections};
use folio_remote::HttpCollections;

fn client(server: &MockServer) -> HttpCollections {
    HttpCollections::new(server.uri()).with_poll_interval(Duration::from_millis(20))
}

fn documents(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "documents": body }))
}

#[tokio::test]
async fn test_fetch_all_decodes_documents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/collections/projects/documents"))
        .respond_with(documents(json!([
            {"id": "p1", "fields": {"Title": "Folio", "TechStack": ["Rust"]}},
            {"id": "p2", "fields": {"Title": "Other"}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let docs = client(&server).fetch_all("projects").await.unwrap();
    assert_eq!(docs.len(), 2);

    let project: Project = docs[0].decode().unwrap();
    assert_eq!(project.id.as_str(), "p1");
    assert_eq!(project.title, "Folio");
}

#[tokio::test]
async fn test_api_key_header_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/collections/certificates/documents"))
        .and(header("x-api-key", "secret"))
        .respond_with(documents(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let remote = client(&server).with_api_key(Some("secret".to_string()));
    assert!(remote.fetch_all("certificates").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_server_error_is_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server).fetch_all("projects").await.unwrap_err();
    assert!(matches!(err, Error::Remote { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_append_posts_fields_and_timestamp_marker() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/collections/portfolio-comments/documents"))
        .and(body_json(json!({
            "fields": {"content": "Nice work", "userName": "Ana"},
            "serverTimestamp": "createdAt"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "c-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut fields = Map::new();
    fields.insert("content".into(), json!("Nice work"));
    fields.insert("userName".into(), json!("Ana"));
    let doc = NewDocument::new(fields).with_server_timestamp(CREATED_AT_FIELD);

    let id = client(&server)
        .append("portfolio-comments", doc)
        .await
        .unwrap();
    assert_eq!(id.as_str(), "c-1");
}

#[tokio::test]
async fn test_upload_blob_returns_url() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/blobs/profile-images/17_me.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"url": "https://cdn.example/profile-images/17_me.png"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let url = client(&server)
        .upload_blob("profile-images/17_me.png", vec![0x89, 0x50])
        .await
        .unwrap();
    assert_eq!(url, "https://cdn.example/profile-images/17_me.png");
}

#[tokio::test]
async fn test_subscribe_emits_initial_then_only_changes() {
    let server = MockServer::start().await;
    // Served once, for the initial snapshot.
    Mock::given(method("GET"))
        .and(path("/v1/collections/c/documents"))
        .respond_with(documents(json!([
            {"id": "old", "fields": {"createdAt": "2024-01-01T00:00:00Z"}}
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    // Every later poll sees the same two documents.
    Mock::given(method("GET"))
        .and(path("/v1/collections/c/documents"))
        .respond_with(documents(json!([
            {"id": "old", "fields": {"createdAt": "2024-01-01T00:00:00Z"}},
            {"id": "new", "fields": {"createdAt": "2024-02-01T00:00:00Z"}}
        ])))
        .mount(&server)
        .await;

    let mut sub = client(&server)
        .subscribe("c", &OrderBy::desc(CREATED_AT_FIELD))
        .await
        .unwrap();

    let first = sub.next_snapshot().await.unwrap();
    assert_eq!(first.len(), 1);

    let second = tokio::time::timeout(Duration::from_secs(2), sub.next_snapshot())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second[0].id.as_str(), "new");
    assert_eq!(second[1].id.as_str(), "old");

    // Unchanged polls emit nothing.
    let idle = tokio::time::timeout(Duration::from_millis(150), sub.next_snapshot()).await;
    assert!(idle.is_err());
}

#[tokio::test]
async fn test_subscribe_fails_when_initial_fetch_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client(&server).subscribe("c", &OrderBy::asc("x")).await;
    assert!(result.is_err());
}
