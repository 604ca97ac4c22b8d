//! Landing sync feeding the mirror that the detail view reads.

use serde_json::json;

use folio_core::{Certificate, GithubLink, Project, ViewHandle};
use folio_remote::Operation;
use folio_site::SyncOutcome;
use folio_store::cached;

use crate::common::TestHarness;

#[tokio::test]
async fn test_sync_then_detail_lookup() {
    let harness = TestHarness::new();
    harness.add_project(
        "abc",
        json!({"Title": "Folio", "Github": "Private", "TechStack": ["Rust", "Axum"]}),
    );
    harness.add_certificate("aws.png");

    let view = ViewHandle::mounted("landing");
    let report = harness.site.synchronizer.sync(&view).await.unwrap();
    assert_eq!(report.outcome, SyncOutcome::Applied);
    assert_eq!(harness.site.synchronizer.view().certificates.len(), 1);

    let detail = harness.site.resolver.resolve("abc").expect("cached after sync");
    assert_eq!(detail.title, "Folio");
    assert_eq!(detail.github, GithubLink::Private);
    assert_eq!(detail.technology_count(), 2);
    assert_eq!(detail.feature_count(), 0);
}

#[tokio::test]
async fn test_each_sync_replaces_snapshot() {
    let harness = TestHarness::new();
    harness.add_project("a", json!({"Title": "A"}));
    let view = ViewHandle::mounted("landing");
    harness.site.synchronizer.sync(&view).await.unwrap();

    harness.add_project("b", json!({"Title": "B"}));
    harness.site.synchronizer.sync(&view).await.unwrap();

    let cached: Vec<Project> = cached::read(harness.mirror.as_ref());
    let ids: Vec<&str> = cached.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(harness.remote.calls(Operation::FetchAll), 4);
}

#[tokio::test]
async fn test_failed_sync_keeps_previous_lists() {
    let harness = TestHarness::new();
    harness.add_project("a", json!({"Title": "A"}));
    harness.add_certificate("one.png");
    let view = ViewHandle::mounted("landing");
    harness.site.synchronizer.sync(&view).await.unwrap();

    harness.add_certificate("two.png");
    harness.remote.fail_next(Operation::FetchAll, 1);
    assert!(harness.site.synchronizer.sync(&view).await.is_err());

    assert_eq!(harness.site.synchronizer.view().certificates.len(), 1);
    let cached: Vec<Certificate> = cached::read(harness.mirror.as_ref());
    assert_eq!(cached, vec![Certificate::new("one.png")]);
}

#[tokio::test]
async fn test_undecodable_documents_are_skipped() {
    let harness = TestHarness::new();
    harness.add_project("good", json!({"Title": "Good"}));
    harness.add_project("bad", json!({"Title": 42}));

    let report = harness
        .site
        .synchronizer
        .sync(&ViewHandle::mounted("landing"))
        .await
        .unwrap();
    assert_eq!(report.view.projects.len(), 1);
    assert_eq!(report.view.projects[0].id.as_str(), "good");
}
