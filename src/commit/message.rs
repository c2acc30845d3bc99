//! Commit message templating from the working-tree diff.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commit::classify::{
    CommitType, FileClassification, classify, determine_commit_type, is_test_path,
};
use crate::error::GitError;
use crate::git::{self, DiffSummary};

/// Message template to render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitStyle {
    /// `type(scope): phrase`
    #[default]
    Conventional,
    /// Counts per category, comma-joined.
    Simple,
    /// Header with line totals plus one bullet per category.
    Detailed,
}

impl FromStr for CommitStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conventional" => Ok(CommitStyle::Conventional),
            "simple" => Ok(CommitStyle::Simple),
            "detailed" => Ok(CommitStyle::Detailed),
            other => Err(format!(
                "unknown style '{other}' (expected conventional, simple or detailed)"
            )),
        }
    }
}

/// A generated commit message with the facts it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitMessageResult {
    pub message: String,
    #[serde(rename = "type")]
    pub commit_type: CommitType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub files_changed: usize,
    pub file_types: FileClassification,
    pub style: CommitStyle,
}

/// Generate a commit message for the changes in `dir`.
///
/// The changed-file list prefers staged files, then unstaged files, then
/// the diff summary's own file list.
pub fn generate_commit_message(
    dir: &Path,
    style: CommitStyle,
) -> Result<CommitMessageResult, GitError> {
    let repo = git::open_repository(dir)?;
    let summary = git::diff_summary(&repo)?;

    let staged = git::staged_file_names(&repo)?;
    let changed_files = if !staged.is_empty() {
        staged
    } else {
        let unstaged = git::unstaged_file_names(&repo)?;
        if !unstaged.is_empty() {
            unstaged
        } else {
            summary.paths()
        }
    };

    debug!(
        "Composing {} commit message for {} changed file(s)",
        style_name(style),
        changed_files.len()
    );

    Ok(compose_commit_message(&changed_files, &summary, style))
}

/// Compose a commit message from an already-collected file list and summary.
pub fn compose_commit_message(
    changed_files: &[String],
    summary: &DiffSummary,
    style: CommitStyle,
) -> CommitMessageResult {
    let file_types = classify(changed_files, summary);
    let commit_type = determine_commit_type(&file_types);
    let scope = if changed_files.len() == 1 {
        scope_for(&changed_files[0])
    } else {
        None
    };

    let message = match style {
        CommitStyle::Conventional => {
            let phrase = conventional_phrase(commit_type, changed_files);
            match &scope {
                Some(scope) => format!("{commit_type}({scope}): {phrase}"),
                None => format!("{commit_type}: {phrase}"),
            }
        }
        CommitStyle::Simple => simple_message(&file_types),
        CommitStyle::Detailed => {
            detailed_message(commit_type, &file_types, changed_files.len(), summary)
        }
    };

    CommitMessageResult {
        message,
        commit_type,
        scope,
        files_changed: changed_files.len(),
        file_types,
        style,
    }
}

fn style_name(style: CommitStyle) -> &'static str {
    match style {
        CommitStyle::Conventional => "conventional",
        CommitStyle::Simple => "simple",
        CommitStyle::Detailed => "detailed",
    }
}

/// Last path component (`src/auth/login.rs` → `login.rs`).
fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Base name up to the first dot (`src/auth.test.ts` → `auth`).
fn scope_for(path: &str) -> Option<String> {
    let stem = base_name(path).split('.').next().unwrap_or_default();
    (!stem.is_empty()).then(|| stem.to_string())
}

/// Short natural-language fragment for a conventional message.
fn conventional_phrase(commit_type: CommitType, files: &[String]) -> String {
    let main_files: Vec<&str> = files
        .iter()
        .map(String::as_str)
        .filter(|f| !is_test_path(f))
        .collect();
    let first_main = main_files.first().map(|f| base_name(f));
    let pick = |many: &str, none: &str| -> String {
        if main_files.len() > 1 {
            many.to_string()
        } else {
            first_main.map_or_else(|| none.to_string(), str::to_string)
        }
    };

    match commit_type {
        CommitType::Feat => format!("add {}", pick("new features", "functionality")),
        CommitType::Fix => format!("resolve issues in {}", pick("multiple files", "code")),
        CommitType::Refactor => format!("improve {}", pick("code structure", "implementation")),
        CommitType::Test => format!("add test coverage for {}", first_main.unwrap_or("code")),
        CommitType::Docs => "update documentation".to_string(),
        CommitType::Remove => format!("remove {}", pick("unused code", "files")),
        CommitType::Update => {
            let target = if files.len() > 1 {
                "multiple files"
            } else {
                files.first().map(|f| base_name(f)).unwrap_or("code")
            };
            format!("update {target}")
        }
    }
}

fn simple_message(files: &FileClassification) -> String {
    let mut actions = Vec::new();
    if !files.added.is_empty() {
        actions.push(format!("Added {} file(s)", files.added.len()));
    }
    if !files.modified.is_empty() {
        actions.push(format!("Modified {} file(s)", files.modified.len()));
    }
    if !files.deleted.is_empty() {
        actions.push(format!("Removed {} file(s)", files.deleted.len()));
    }
    actions.join(", ")
}

fn detailed_message(
    commit_type: CommitType,
    files: &FileClassification,
    files_changed: usize,
    summary: &DiffSummary,
) -> String {
    let mut message = format!(
        "{commit_type}: Updated {files_changed} file(s) with {} insertions and {} deletions",
        summary.insertions, summary.deletions
    );

    for (label, paths) in [
        ("Added", &files.added),
        ("Modified", &files.modified),
        ("Removed", &files.deleted),
    ] {
        if !paths.is_empty() {
            message.push_str(&format!("\n- {label}: {}", paths.join(", ")));
        }
    }

    message
}
