//! Integration tests for diff collection and commit message generation
//! against real git repositories.

mod common;

use common::TestRepo;
use crit::commit::{CommitStyle, CommitType, generate_commit_message};
use crit::git::collect_file_changes;

#[test]
fn test_clean_tree_yields_empty_feat() {
    let repo = TestRepo::new();
    repo.commit_files(&[("src/lib.rs", "pub fn one() {}\n")], "initial");

    let result = generate_commit_message(repo.path(), CommitStyle::Simple).unwrap();

    assert_eq!(result.files_changed, 0);
    assert_eq!(result.commit_type, CommitType::Feat);
    assert_eq!(result.message, "");
    assert_eq!(result.file_types.total(), 0);
}

#[test]
fn test_single_appended_file_is_scoped_feat() {
    let repo = TestRepo::new();
    repo.commit_files(&[("src/auth.rs", "fn login() {}\n")], "initial");
    repo.write("src/auth.rs", "fn login() {}\nfn logout() {}\n");

    let result = generate_commit_message(repo.path(), CommitStyle::Conventional).unwrap();

    assert_eq!(result.commit_type, CommitType::Feat);
    assert_eq!(result.scope.as_deref(), Some("auth"));
    assert_eq!(result.message, "feat(auth): add auth.rs");
    assert_eq!(result.file_types.added, vec!["src/auth.rs"]);
}

#[test]
fn test_bug_named_modification_wins_over_new_feature() {
    let repo = TestRepo::new();
    repo.commit_files(
        &[
            ("src/bugfix_parser.rs", "let a = 1;\nlet b = 2;\n"),
            ("src/feature.rs", "fn one() {}\n"),
        ],
        "initial",
    );
    repo.write("src/bugfix_parser.rs", "let a = 1;\nlet b = 30;\n");
    repo.write("src/feature.rs", "fn one() {}\nfn two() {}\n");

    let result = generate_commit_message(repo.path(), CommitStyle::Conventional).unwrap();

    assert_eq!(result.commit_type, CommitType::Fix);
    assert_eq!(result.scope, None);
    assert_eq!(result.message, "fix: resolve issues in multiple files");
    assert_eq!(result.file_types.modified, vec!["src/bugfix_parser.rs"]);
    assert_eq!(result.file_types.added, vec!["src/feature.rs"]);
}

#[test]
fn test_deleted_file_is_remove() {
    let repo = TestRepo::new();
    repo.commit_files(
        &[("src/legacy.rs", "fn old() {}\nfn older() {}\n"), ("src/main.rs", "fn main() {}\n")],
        "initial",
    );
    repo.remove("src/legacy.rs");

    let result = generate_commit_message(repo.path(), CommitStyle::Conventional).unwrap();

    assert_eq!(result.commit_type, CommitType::Remove);
    assert_eq!(result.message, "remove(legacy): remove legacy.rs");
    assert_eq!(result.file_types.deleted, vec!["src/legacy.rs"]);
}

#[test]
fn test_staged_files_take_precedence() {
    let repo = TestRepo::new();
    repo.commit_files(&[("a.rs", "a\n"), ("b.rs", "b\n")], "initial");
    repo.write("a.rs", "a\nmore a\n");
    repo.stage("a.rs");
    repo.write("b.rs", "b\nmore b\n");

    let result = generate_commit_message(repo.path(), CommitStyle::Conventional).unwrap();

    assert_eq!(result.files_changed, 1);
    assert_eq!(result.scope.as_deref(), Some("a"));
}

#[test]
fn test_detailed_message_reports_totals() {
    let repo = TestRepo::new();
    repo.commit_files(
        &[("src/api.rs", "one\ntwo\n"), ("src/db.rs", "three\n")],
        "initial",
    );
    repo.write("src/api.rs", "one\nTWO\nextra\n");
    repo.write("src/db.rs", "three\nfour\n");

    let result = generate_commit_message(repo.path(), CommitStyle::Detailed).unwrap();

    assert_eq!(result.commit_type, CommitType::Feat);
    assert!(
        result
            .message
            .starts_with("feat: Updated 2 file(s) with 3 insertions and 1 deletions"),
        "{}",
        result.message
    );
    assert!(result.message.contains("\n- Added: src/db.rs"));
    assert!(result.message.contains("\n- Modified: src/api.rs"));
}

#[test]
fn test_file_changes_skip_lockfile_and_carry_diff_text() {
    let repo = TestRepo::new();
    repo.commit_files(
        &[("bun.lock", "lock v1\n"), ("src/app.ts", "export const a = 1;\n")],
        "initial",
    );
    repo.write("bun.lock", "lock v2 with more\n");
    repo.write("src/app.ts", "export const a = 20;\n");

    let changes = collect_file_changes(repo.path()).unwrap();

    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].path, "src/app.ts");
    assert!(changes[0].diff_text.contains("-export const a = 1;"));
    assert!(changes[0].diff_text.contains("+export const a = 20;"));
}

#[test]
fn test_subdirectory_resolves_enclosing_repository() {
    let repo = TestRepo::new();
    repo.commit_files(&[("pkg/lib.rs", "x\n")], "initial");
    repo.write("pkg/lib.rs", "x\ny\n");

    let result =
        generate_commit_message(&repo.file_path("pkg"), CommitStyle::Conventional).unwrap();

    assert_eq!(result.files_changed, 1);
    assert_eq!(result.message, "feat(lib): add lib.rs");
}
