//! Working-tree diff collection using git2.

use std::path::Path;

use git2::{Diff, DiffFormat, DiffOptions, ErrorCode, Patch, Repository, Tree};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::GitError;

/// Paths never reported to the model (build output and lockfiles).
pub const EXCLUDED_PATHS: &[&str] = &["dist", "bun.lock"];

/// Unified diff text for one changed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiff {
    pub path: String,
    pub diff_text: String,
}

/// Insertion/deletion counts for one file in the diff summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffStat {
    pub path: String,
    pub insertions: usize,
    pub deletions: usize,
    /// Binary files carry no line counts.
    pub binary: bool,
}

/// Summary of unstaged changes to tracked files (`git diff --stat`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub files: Vec<DiffStat>,
    pub insertions: usize,
    pub deletions: usize,
}

impl DiffSummary {
    /// Look up the row for a path.
    pub fn get(&self, path: &str) -> Option<&DiffStat> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Paths in summary order.
    pub fn paths(&self) -> Vec<String> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Open the working tree containing `dir`.
///
/// Discovery walks up from `dir` the way the `git` CLI does, so a
/// subdirectory of a repository is accepted.
pub fn open_repository(dir: &Path) -> Result<Repository, GitError> {
    Repository::discover(dir).map_err(|source| GitError::OpenRepository {
        path: dir.display().to_string(),
        source,
    })
}

/// Collect per-file diffs for every changed file in `dir`, skipping
/// [`EXCLUDED_PATHS`].
pub fn collect_file_changes(dir: &Path) -> Result<Vec<FileDiff>, GitError> {
    let repo = open_repository(dir)?;
    let summary = diff_summary(&repo)?;

    let mut diffs = Vec::with_capacity(summary.files.len());
    for stat in &summary.files {
        if EXCLUDED_PATHS.contains(&stat.path.as_str()) {
            debug!("Skipping excluded path {}", stat.path);
            continue;
        }
        let diff_text = file_diff(&repo, &stat.path)?;
        diffs.push(FileDiff {
            path: stat.path.clone(),
            diff_text,
        });
    }

    Ok(diffs)
}

/// Build the diff summary of unstaged changes to tracked files.
pub fn diff_summary(repo: &Repository) -> Result<DiffSummary, GitError> {
    let diff = repo
        .diff_index_to_workdir(None, None)
        .map_err(GitError::DiffFailed)?;

    let mut summary = DiffSummary::default();
    for idx in 0..diff.deltas().len() {
        let Some(delta) = diff.get_delta(idx) else {
            continue;
        };
        let Some(path) = delta_path(&delta) else {
            continue;
        };

        let patch = Patch::from_diff(&diff, idx).map_err(|source| GitError::PatchFailed {
            path: path.clone(),
            source,
        })?;

        let stat = match patch {
            Some(patch) if !patch.delta().flags().is_binary() => {
                let (_, insertions, deletions) =
                    patch.line_stats().map_err(|source| GitError::PatchFailed {
                        path: path.clone(),
                        source,
                    })?;
                DiffStat {
                    path,
                    insertions,
                    deletions,
                    binary: false,
                }
            }
            _ => DiffStat {
                path,
                insertions: 0,
                deletions: 0,
                binary: true,
            },
        };

        summary.insertions += stat.insertions;
        summary.deletions += stat.deletions;
        summary.files.push(stat);
    }

    Ok(summary)
}

/// Unified diff text for a single path (`git diff -- <path>`).
pub fn file_diff(repo: &Repository, path: &str) -> Result<String, GitError> {
    let mut opts = DiffOptions::new();
    opts.pathspec(path).disable_pathspec_match(true);
    let diff = repo
        .diff_index_to_workdir(None, Some(&mut opts))
        .map_err(GitError::DiffFailed)?;

    Ok(render_patch(&diff))
}

/// Names of files staged relative to HEAD (`git diff --cached --name-only`).
pub fn staged_file_names(repo: &Repository) -> Result<Vec<String>, GitError> {
    let head_tree = resolve_head_tree(repo)?;
    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(GitError::DiffFailed)?;
    Ok(file_names(&diff))
}

/// Names of files with unstaged changes (`git diff --name-only`).
pub fn unstaged_file_names(repo: &Repository) -> Result<Vec<String>, GitError> {
    let diff = repo
        .diff_index_to_workdir(None, None)
        .map_err(GitError::DiffFailed)?;
    Ok(file_names(&diff))
}

/// Resolve the HEAD tree, treating an unborn branch as the empty tree.
fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(GitError::HeadUnresolved(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::HeadUnresolved)?;
    Ok(Some(tree))
}

fn file_names(diff: &Diff<'_>) -> Vec<String> {
    diff.deltas().filter_map(|d| delta_path(&d)).collect()
}

fn delta_path(delta: &git2::DiffDelta<'_>) -> Option<String> {
    delta
        .new_file()
        .path()
        .or_else(|| delta.old_file().path())
        .map(|p| p.to_string_lossy().to_string())
        .filter(|p| !p.is_empty())
}

/// Render a diff as patch text, keeping the `+`/`-`/` ` line origins.
fn render_patch(diff: &Diff<'_>) -> String {
    let mut text = String::new();

    if let Err(e) = diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        if origin == '+' || origin == '-' || origin == ' ' {
            text.push(origin);
        }
        text.push_str(&String::from_utf8_lossy(line.content()));
        true
    }) {
        warn!("Failed to render diff text: {e}");
    }

    text
}
