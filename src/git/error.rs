//! Typed errors for git and worktree operations
//!
//! `GitError` is a typed enum for domain errors that can be pattern-matched
//! and tested. Use `.into()` to convert to `anyhow::Error` while preserving
//! the type for downcasting. `Display` produces styled output for users.

use std::fmt;
use std::path::PathBuf;

use color_print::cwrite;

/// Domain errors surfaced by the repository gateway.
///
/// Each variant stores the data needed to construct a user-facing message.
/// Hook command failures are *not* represented here; the hook engine reports
/// those as a boolean so callers can still run `post_*` hooks with an error
/// context.
#[derive(Debug, Clone)]
pub enum GitError {
    /// The given directory is not a git repository root.
    NotARepository { path: PathBuf },

    /// A git command exited non-zero; `message` carries its diagnostic text.
    CommandFailed { message: String },

    /// Fetching a remote branch failed before a tracking worktree could be
    /// created. Kept distinct from `CommandFailed` so callers can tell a
    /// network/remote problem from a worktree problem.
    FetchFailed {
        remote_branch: String,
        message: String,
    },
}

impl fmt::Display for GitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotARepository { path } => {
                cwrite!(f, "<red>Not a git repository:</> {}", path.display())
            }
            Self::CommandFailed { message } => {
                cwrite!(f, "<red>{}</>", message.trim_end())
            }
            Self::FetchFailed {
                remote_branch,
                message,
            } => {
                cwrite!(
                    f,
                    "<red>Failed to fetch</> <bold>{}</><red>:</> {}",
                    remote_branch,
                    message.trim_end()
                )
            }
        }
    }
}

impl std::error::Error for GitError {}
