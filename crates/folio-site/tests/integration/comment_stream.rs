//! Comment feed and submit path against the in-process remote store.

use std::time::Duration;

use futures::StreamExt;
use serde_json::Value;

use folio_remote::Operation;
use folio_site::comments::COMMENTS_COLLECTION;
use folio_site::{CommentDraft, ImageAttachment, NETWORK_FAILURE_MESSAGE, SubmitError};

use crate::common::TestHarness;

const MIB: usize = 1024 * 1024;

fn network_calls(harness: &TestHarness) -> usize {
    harness.remote.calls(Operation::UploadBlob) + harness.remote.calls(Operation::Append)
}

#[tokio::test]
async fn test_empty_author_rejected_without_network() {
    let harness = TestHarness::new();
    let stream = harness.comment_stream();

    let err = stream
        .submit(CommentDraft::new("   ", "Hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::Validation { field: "author", .. }));

    let err = stream.submit(CommentDraft::new("Ana", "")).await.unwrap_err();
    assert!(matches!(err, SubmitError::Validation { field: "text", .. }));
    assert_eq!(network_calls(&harness), 0);
}

#[tokio::test]
async fn test_oversized_image_rejected_before_upload() {
    let harness = TestHarness::new();
    let stream = harness.comment_stream();
    let draft = CommentDraft::new("Ana", "Hi")
        .with_image(ImageAttachment::new("big.png", vec![0; 6 * MIB]));

    let err = stream.submit(draft).await.unwrap_err();
    assert!(matches!(
        err,
        SubmitError::ImageTooLarge { size, limit } if size == 6 * MIB && limit == 5 * MIB
    ));
    assert_eq!(network_calls(&harness), 0);
}

#[tokio::test]
async fn test_small_image_uploaded_then_referenced() {
    let harness = TestHarness::new();
    let stream = harness.comment_stream();
    let prefix = harness.site.config().comments.upload_prefix.clone();
    let draft = CommentDraft::new("Ana", "Hi")
        .with_image(ImageAttachment::new("me.png", vec![7; 1024]));

    stream.submit(draft).await.unwrap();

    let path = format!("{prefix}/1735787045000_me.png");
    assert_eq!(harness.remote.blob(&path), Some(vec![7; 1024]));

    let doc = &harness.remote.documents(COMMENTS_COLLECTION)[0];
    assert_eq!(
        doc.field("profileImage"),
        Some(&Value::String(format!("memory://blobs/{path}")))
    );
    assert_eq!(harness.remote.calls(Operation::UploadBlob), 1);
    assert_eq!(harness.remote.calls(Operation::Append), 1);
}

#[tokio::test]
async fn test_upload_failure_skips_append() {
    let harness = TestHarness::new();
    harness.remote.fail_next(Operation::UploadBlob, 1);
    let stream = harness.comment_stream();
    let draft = CommentDraft::new("Ana", "Hi")
        .with_image(ImageAttachment::new("me.png", vec![1; 1024]));

    let err = stream.submit(draft).await.unwrap_err();
    assert!(matches!(err, SubmitError::Network(_)));
    assert_eq!(err.user_message(), NETWORK_FAILURE_MESSAGE);
    assert_eq!(harness.remote.calls(Operation::Append), 0);
}

#[tokio::test]
async fn test_append_failure_after_upload_reports_orphan() {
    let harness = TestHarness::new();
    harness.remote.fail_next(Operation::Append, 1);
    let stream = harness.comment_stream();
    let draft = CommentDraft::new("Ana", "Hi")
        .with_image(ImageAttachment::new("me.png", vec![1; 16]));

    let err = stream.submit(draft).await.unwrap_err();
    let orphan = err.orphaned_blob().expect("partial failure").to_string();
    assert!(orphan.ends_with("_me.png"));
    assert_eq!(err.user_message(), NETWORK_FAILURE_MESSAGE);
    assert!(harness.remote.documents(COMMENTS_COLLECTION).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_back_to_back_submits_append_once() {
    let harness = TestHarness::new();
    harness
        .remote
        .set_latency(Some(Duration::from_millis(500)));
    let stream = harness.comment_stream();

    let (first, second) = tokio::join!(
        stream.submit(CommentDraft::new("Ana", "first")),
        stream.submit(CommentDraft::new("Ana", "second")),
    );

    assert!(first.is_ok());
    assert!(matches!(second, Err(SubmitError::InFlight)));
    assert_eq!(harness.remote.calls(Operation::Append), 1);
    assert!(!stream.is_submitting());
}

#[tokio::test]
async fn test_feed_is_newest_first_and_live() {
    let harness = TestHarness::new();
    let stream = harness.comment_stream();
    stream.submit(CommentDraft::new("Ana", "older")).await.unwrap();

    let mut feed = stream.subscribe().await.unwrap();
    let initial = feed.next().await.unwrap();
    assert_eq!(initial.len(), 1);

    stream.submit(CommentDraft::new("Ben", "newer")).await.unwrap();
    let snapshot = feed.next().await.unwrap();
    let texts: Vec<&str> = snapshot.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(texts, vec!["newer", "older"]);
    assert!(snapshot.iter().all(|c| !c.is_pending()));
    assert_eq!(feed.current().len(), 2);
}

#[tokio::test]
async fn test_feed_as_stream_and_release() {
    let harness = TestHarness::new();
    let stream = harness.comment_stream();

    let mut feed = stream.subscribe().await.unwrap();
    assert!(feed.next().await.unwrap().is_empty());
    stream.submit(CommentDraft::new("Ana", "hi")).await.unwrap();

    let snapshot = StreamExt::next(&mut feed).await.unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].user_name, "Ana");

    feed.release();
    assert_eq!(harness.remote.subscriber_count(COMMENTS_COLLECTION), 0);
}
