//! Detail lookup against the mirror, with and without the remote fallback.

use serde_json::json;

use folio_core::{FolioConfig, GithubLink, MirrorStore};
use folio_remote::Operation;
use folio_site::ProjectResolver;
use folio_store::PROJECTS_KEY;

use crate::common::TestHarness;

#[test]
fn test_missing_optional_fields_are_defaulted() {
    let harness = TestHarness::new();
    harness
        .mirror
        .set(PROJECTS_KEY, r#"[{"id":"a","Title":"Bare"}]"#)
        .unwrap();

    let detail = harness.site.resolver.resolve("a").unwrap();
    assert!(detail.features.is_empty());
    assert!(detail.tech_stack.is_empty());
    assert_eq!(
        detail.github,
        GithubLink::Repository("https://github.com/hritikjaiswall".to_string())
    );
    assert!(detail.live_demo().is_none());
    assert!(harness.site.resolver.resolve("missing").is_none());
}

#[tokio::test]
async fn test_default_config_falls_back_to_remote() {
    let harness = TestHarness::new();
    harness.add_project("remote-only", json!({"Title": "Fresh", "Link": "https://demo"}));

    assert!(harness.site.resolver.resolve("remote-only").is_none());
    let detail = harness
        .site
        .resolver
        .resolve_or_fetch("remote-only")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.live_demo(), Some("https://demo"));
    assert!(harness.mirror.get(PROJECTS_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_fallback_disabled_by_config() {
    let mut config = FolioConfig::default();
    config.site.detail_fallback_fetch = false;
    let harness = TestHarness::with_config(config);
    harness.add_project("remote-only", json!({"Title": "Fresh"}));

    let found = harness
        .site
        .resolver
        .resolve_or_fetch("remote-only")
        .await
        .unwrap();
    assert!(found.is_none());
    assert_eq!(harness.remote.calls(Operation::FetchAll), 0);
}

#[tokio::test]
async fn test_fallback_fetch_error_propagates() {
    let harness = TestHarness::new();
    harness.remote.fail_next(Operation::FetchAll, 1);
    let resolver = ProjectResolver::new(harness.mirror.clone(), "https://x")
        .with_remote_fallback(harness.remote.clone(), "projects");
    assert!(resolver.resolve_or_fetch("a").await.is_err());
}
