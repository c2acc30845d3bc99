//! Integration tests for writing the markdown review.

mod common;

use crit::report::write_review;
use crit::tools::{Tool, WriteReviewTool};
use serde_json::json;

const REVIEW: &str = "## Summary\n\n- Consider extracting `parse_args` into a helper.\n- Nit: trailing whitespace in `main.rs`.\n";

#[test]
fn test_creates_deeply_nested_directories() {
    let dir = common::temp_test_dir();
    let path = dir.path().join("a/b/c/d/review.md");

    let result = write_review(REVIEW, &path, true).unwrap();

    assert!(result.success);
    assert!(path.exists());
    assert_eq!(result.output_path, path.display().to_string());
}

#[test]
fn test_without_metadata_writes_review_verbatim() {
    let dir = common::temp_test_dir();
    let path = dir.path().join("review.md");

    let result = write_review(REVIEW, &path, false).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), REVIEW);
    assert_eq!(result.file_size, REVIEW.len());
    assert!(!result.metadata_included);
}

#[test]
fn test_with_metadata_prefixes_header() {
    let dir = common::temp_test_dir();
    let path = dir.path().join("review.md");

    let result = write_review(REVIEW, &path, true).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();

    assert!(written.starts_with("# Code Review Report\n\n**Generated on:** "));
    assert!(written.contains(&format!("**Timestamp:** {}\n", result.timestamp)));
    assert!(written.ends_with(&format!("---\n\n{REVIEW}")));
    assert_eq!(result.file_size, written.len());
}

#[test]
fn test_write_fails_when_parent_is_a_file() {
    let dir = common::temp_test_dir();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "x").unwrap();

    let result = write_review(REVIEW, &blocker.join("review.md"), false);

    assert!(result.is_err());
}

#[tokio::test]
async fn test_tool_result_is_camel_case() {
    let dir = common::temp_test_dir();
    let path = dir.path().join("out/code-review-report.md");

    let output = WriteReviewTool
        .execute(json!({
            "reviewContent": REVIEW,
            "outputPath": path.to_str().unwrap(),
            "includeMetadata": false,
        }))
        .await
        .unwrap();

    assert_eq!(output["success"], true);
    assert_eq!(output["outputPath"], path.to_str().unwrap());
    assert_eq!(output["fileSize"], REVIEW.len());
    assert_eq!(output["metadataIncluded"], false);
    assert!(output["timestamp"].as_str().unwrap().ends_with('Z'));
}
