//! Git operations using git2-rs.

pub mod diff;

pub use diff::{
    DiffStat, DiffSummary, EXCLUDED_PATHS, FileDiff, collect_file_changes, diff_summary,
    file_diff, open_repository, staged_file_names, unstaged_file_names,
};
