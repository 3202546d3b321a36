/*!
 * Batch runs and identifier handling
 */

use std::sync::Arc;
use anyhow::Result;
use bilisub::app_controller::{BatchSummary, Controller};
use bilisub::providers::mock::{MockCall, MockProvider};
use crate::common;

fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

/// Test that an identifier without the BV prefix never reaches the network
#[tokio::test]
async fn test_run_batch_withInvalidIdentifier_shouldCountFailureWithoutCalls() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let provider = Arc::new(MockProvider::new());
    let controller = Controller::new(common::test_config(temp_dir.path()), provider.clone());

    let summary = controller.run_batch(&ids(&["XY123"])).await;

    assert_eq!(summary, BatchSummary { attempted: 1, succeeded: 0 });
    assert_eq!(summary.failed(), 1);
    assert_eq!(provider.call_count(), 0);
    assert!(!temp_dir.path().join("output_XY123").exists());
    Ok(())
}

/// Test that failures do not stop later identifiers and order is preserved
#[tokio::test]
async fn test_run_batch_withMixedIdentifiers_shouldContinueAfterFailures() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let provider = Arc::new(
        MockProvider::new()
            .with_video("BV1first", "First", &[(1, "P1")])
            .with_subtitle(1, "zh-CN", "//cdn/1.json", common::sample_payload())
            .with_video("BV1third", "Third", &[(3, "P1")]),
    );
    let controller = Controller::new(common::test_config(temp_dir.path()), provider.clone());

    let summary = controller
        .run_batch(&ids(&["BV1first", "BV1missing", "nope", "BV1third"]))
        .await;

    assert_eq!(summary, BatchSummary { attempted: 4, succeeded: 2 });
    assert_eq!(summary.to_string(), "Successfully processed 2/4 BV IDs.");

    let video_calls: Vec<MockCall> = provider
        .calls()
        .into_iter()
        .filter(|c| matches!(c, MockCall::VideoInfo(_)))
        .collect();
    assert_eq!(video_calls, vec![
        MockCall::VideoInfo("BV1first".to_string()),
        MockCall::VideoInfo("BV1missing".to_string()),
        MockCall::VideoInfo("BV1third".to_string()),
    ]);
    Ok(())
}

/// Test that a list file with blank lines yields one attempt per identifier
#[tokio::test]
async fn test_run_batch_withIdFile_shouldAttemptEachListedId() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let list = common::create_test_file(temp_dir.path(), "ids.txt", "\nBV1aaa\n\n\nBV1bbb\n\n")?;
    let provider = Arc::new(
        MockProvider::new()
            .with_video("BV1aaa", "A", &[(1, "P1")])
            .with_video("BV1bbb", "B", &[(2, "P1")]),
    );
    let controller = Controller::new(common::test_config(temp_dir.path()), provider.clone());

    let listed = Controller::read_ids_from_file(&list);
    assert_eq!(listed.len(), 2);

    let summary = controller.run_batch(&listed).await;

    assert_eq!(summary, BatchSummary { attempted: 2, succeeded: 2 });
    let video_calls = provider
        .calls()
        .into_iter()
        .filter(|c| matches!(c, MockCall::VideoInfo(_)))
        .count();
    assert_eq!(video_calls, 2);
    Ok(())
}

/// Test that an unreadable list file behaves like an empty one
#[test]
fn test_read_ids_from_file_withMissingFile_shouldReturnEmpty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let listed = Controller::read_ids_from_file(temp_dir.path().join("missing.txt"));

    assert!(listed.is_empty());
    Ok(())
}

/// Test that surrounding whitespace in an identifier is tolerated
#[tokio::test]
async fn test_run_batch_withPaddedIdentifier_shouldTrim() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let provider = Arc::new(MockProvider::new().with_video("BV1pad", "Padded", &[]));
    let controller = Controller::new(common::test_config(temp_dir.path()), provider.clone());

    let summary = controller.run_batch(&ids(&["  BV1pad \n"])).await;

    assert_eq!(summary.succeeded, 1);
    assert!(temp_dir.path().join("output_BV1pad").is_dir());
    Ok(())
}
