//! Command handlers
//!
//! Each handler returns `anyhow::Result<()>`; `main` prints the error and
//! exits 1. Lifecycle commands share the hook flow: `pre_*` hook, then the
//! repository operation, then the `post_*` hook with a success or error
//! context — a failed `pre_*` hook skips the operation but the `post_*`
//! hook still runs, carrying the error.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::bail;

use crate::git::GitError;
use crate::path::absolutize;
use crate::shell_exec;

mod add;
mod init;
mod jump;
mod list;
mod remove;
mod reset;

pub use add::{handle_add, AddOptions};
pub use init::handle_init;
pub use jump::handle_jump;
pub use list::handle_list;
pub use remove::{handle_remove, RemoveOptions};
pub use reset::{handle_reset, reset_to_remote_main};

/// Whether `path` is the main working copy (directory-form `.git`).
pub(crate) fn is_main_repository(path: &Path) -> bool {
    path.join(".git").is_dir()
}

/// Locate the main repository root from the current directory, following
/// the common git directory out of linked worktrees.
pub(crate) fn find_main_repository_root() -> anyhow::Result<PathBuf> {
    let cwd = std::env::current_dir()?;

    let mut cmd = Command::new("git");
    cmd.args(["rev-parse", "--git-common-dir"]);
    cmd.current_dir(&cwd);
    let output = shell_exec::run(&mut cmd)?;
    if !output.status.success() {
        return Err(GitError::NotARepository { path: cwd }.into());
    }

    let common_dir = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let common_dir = absolutize(Path::new(&common_dir), &cwd);
    // The common dir is `<main>/.git`; its parent is the main working copy.
    let root = common_dir
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or(common_dir);
    Ok(crate::path::canonicalize(&root))
}

/// Fail unless the current directory is the main working copy.
///
/// Worktree mutation runs from the main repository so that relative paths
/// and hook defaults are anchored consistently.
pub(crate) fn ensure_main_repository(root: &Path) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    if !is_main_repository(&cwd) {
        bail!(
            "This command can only be run from the main repository (not from a worktree).\n\
             To enter the main repository, run:\n  cd {}",
            root.display()
        );
    }
    Ok(())
}

/// Reject branch names git would refuse anyway, with a friendlier message.
pub(crate) fn valid_branch_name(branch: &str) -> bool {
    let trimmed = branch.trim();
    if trimmed.is_empty() {
        return false;
    }
    if branch.contains(char::is_whitespace) || branch.contains("..") {
        return false;
    }
    if branch.starts_with(['.', '-']) || branch.ends_with(['.', '-']) {
        return false;
    }
    !branch.contains(['~', '^', ':', '?', '*', '[', ']', '\\'])
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("feature", true)]
    #[case("feature/nested-name.v2", true)]
    #[case("", false)]
    #[case("has space", false)]
    #[case("double..dot", false)]
    #[case(".leading-dot", false)]
    #[case("trailing-", false)]
    #[case("what?", false)]
    #[case("star*", false)]
    #[case("caret^", false)]
    fn branch_name_validation(#[case] name: &str, #[case] valid: bool) {
        assert_eq!(valid_branch_name(name), valid);
    }
}
