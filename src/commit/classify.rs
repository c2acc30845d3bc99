//! Change classification and commit type heuristics.

use std::fmt;

use serde::Serialize;

use crate::git::DiffSummary;

/// Conventional commit type derived from the changed files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Feat,
    Fix,
    Refactor,
    Test,
    Docs,
    Remove,
    Update,
}

impl CommitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Refactor => "refactor",
            CommitType::Test => "test",
            CommitType::Docs => "docs",
            CommitType::Remove => "remove",
            CommitType::Update => "update",
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Changed files partitioned by the shape of their line counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileClassification {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
}

impl FileClassification {
    pub fn total(&self) -> usize {
        self.added.len() + self.modified.len() + self.deleted.len()
    }
}

/// Whether a path looks like a test or spec file.
pub fn is_test_path(path: &str) -> bool {
    path.contains("test") || path.contains("spec")
}

fn is_bug_fix_path(path: &str) -> bool {
    path.contains("fix") || path.contains("bug")
}

fn is_doc_path(path: &str) -> bool {
    path.contains("readme") || path.contains("doc") || path.ends_with(".md")
}

/// Classify each changed file against its row in the diff summary.
///
/// - added: insertions only
/// - modified: insertions and deletions
/// - deleted: deletions only
///
/// Files missing from the summary, binary rows and rows without line
/// changes fall into no category.
pub fn classify(changed_files: &[String], summary: &DiffSummary) -> FileClassification {
    let mut classification = FileClassification::default();

    for path in changed_files {
        let Some(stat) = summary.get(path) else {
            continue;
        };
        if stat.binary {
            continue;
        }

        match (stat.insertions > 0, stat.deletions > 0) {
            (true, false) => classification.added.push(path.clone()),
            (true, true) => classification.modified.push(path.clone()),
            (false, true) => classification.deleted.push(path.clone()),
            (false, false) => {}
        }
    }

    classification
}

/// Pick the commit type. First match wins:
/// fix > refactor > test > docs > remove > feat.
pub fn determine_commit_type(files: &FileClassification) -> CommitType {
    let has_bug_fixes = files.modified.iter().any(|f| is_bug_fix_path(f));
    let has_new_features = files.added.iter().any(|f| !is_test_path(f));
    let is_pure_refactor =
        !files.modified.is_empty() && files.modified.iter().all(|f| !is_test_path(f));
    let has_tests = files.added.iter().any(|f| is_test_path(f));
    let has_docs = files.added.iter().any(|f| is_doc_path(f));

    if has_bug_fixes {
        CommitType::Fix
    } else if is_pure_refactor && !has_new_features {
        CommitType::Refactor
    } else if has_tests {
        CommitType::Test
    } else if has_docs {
        CommitType::Docs
    } else if !files.deleted.is_empty() {
        CommitType::Remove
    } else {
        CommitType::Feat
    }
}
