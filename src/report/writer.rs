//! Write the markdown review to disk.

use std::path::Path;

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::ReportError;

/// Title line of the metadata header.
pub const REPORT_TITLE: &str = "# Code Review Report";

/// Outcome of writing a review file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownWriteResult {
    pub success: bool,
    pub output_path: String,
    /// Bytes written.
    pub file_size: usize,
    pub timestamp: String,
    pub metadata_included: bool,
}

/// Write `content` to `output_path`, optionally prefixed with a metadata header.
///
/// - Creates missing parent directories
/// - Overwrites any existing file
pub fn write_review(
    content: &str,
    output_path: &Path,
    include_metadata: bool,
) -> Result<MarkdownWriteResult, ReportError> {
    let now = Local::now();
    let timestamp = iso_timestamp(&now);
    let markdown = render_review(content, include_metadata, &now);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ReportError::CreateDirFailed {
            path: parent.display().to_string(),
            source,
        })?;
    }

    std::fs::write(output_path, &markdown).map_err(|source| ReportError::WriteFailed {
        path: output_path.display().to_string(),
        source,
    })?;

    Ok(MarkdownWriteResult {
        success: true,
        output_path: output_path.display().to_string(),
        file_size: markdown.len(),
        timestamp,
        metadata_included: include_metadata,
    })
}

/// Render the file content for a review.
pub fn render_review(content: &str, include_metadata: bool, now: &DateTime<Local>) -> String {
    if !include_metadata {
        return content.to_string();
    }

    let mut markdown = String::with_capacity(content.len() + 128);
    markdown.push_str(REPORT_TITLE);
    markdown.push_str("\n\n");
    markdown.push_str(&format!(
        "**Generated on:** {} at {}\n",
        now.format("%-m/%-d/%Y"),
        now.format("%-I:%M:%S %p")
    ));
    markdown.push_str(&format!("**Timestamp:** {}\n\n", iso_timestamp(now)));
    markdown.push_str("---\n\n");
    markdown.push_str(content);
    markdown
}

fn iso_timestamp(now: &DateTime<Local>) -> String {
    now.with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
