//! Git operations and worktree state

use std::path::PathBuf;

mod error;
mod parse;
mod repository;

pub use error::GitError;
pub use parse::parse_porcelain_list;
pub use repository::Repository;

/// One working copy as reported by `git worktree list --porcelain`.
///
/// Constructed by the porcelain parser or from the known parameters of a
/// just-created worktree; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worktree {
    pub path: PathBuf,
    /// Commit id of HEAD. Git emits this for every non-bare entry.
    pub head: Option<String>,
    /// Checked-out ref (e.g. `refs/heads/main`). Absent when detached.
    pub branch: Option<String>,
    pub detached: bool,
    pub bare: bool,
}

impl Worktree {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            head: None,
            branch: None,
            detached: false,
            bare: false,
        }
    }

    /// Whether this entry is the main working copy.
    ///
    /// The main working copy carries its administrative directory directly
    /// (`.git` is a directory); linked worktrees have a `.git` file pointing
    /// back at it.
    pub fn is_main(&self) -> bool {
        self.path.join(".git").is_dir()
    }

    /// Short branch name with any `refs/heads/` prefix stripped.
    pub fn short_branch(&self) -> Option<&str> {
        self.branch
            .as_deref()
            .map(|b| b.strip_prefix("refs/heads/").unwrap_or(b))
    }

    /// One-line display form: `<path> (<branch|head|detached>)`.
    pub fn describe(&self) -> String {
        let state = self
            .short_branch()
            .or(self.head.as_deref())
            .unwrap_or("detached");
        format!("{} ({})", self.path.display(), state)
    }
}
