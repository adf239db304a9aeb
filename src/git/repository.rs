//! Repository gateway
//!
//! Thin wrappers around the `git` worktree primitives. All commands run with
//! the repository root as their working directory and go through
//! [`shell_exec::run`](crate::shell_exec::run) for consistent debug tracing.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Context;

use super::{parse_porcelain_list, GitError, Worktree};
use crate::shell_exec;

/// Repository context for git operations.
///
/// Construction validates that the path is a repository root (main working
/// copy or linked worktree); every other method assumes that invariant.
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
}

impl Repository {
    /// Create a repository context at the specified path.
    ///
    /// Returns [`GitError::NotARepository`] when the directory has no `.git`
    /// entry (directory for the main working copy, file for a linked
    /// worktree).
    pub fn at(path: impl Into<PathBuf>) -> Result<Self, GitError> {
        let path = path.into();
        if !path.join(".git").exists() {
            return Err(GitError::NotARepository { path });
        }
        Ok(Self { path })
    }

    /// The repository root this context was created with.
    pub fn root(&self) -> &Path {
        &self.path
    }

    /// List all worktrees of this repository in git's order.
    ///
    /// Git lists the main working copy first; the parser preserves that
    /// order.
    pub fn list_worktrees(&self) -> anyhow::Result<Vec<Worktree>> {
        let stdout = self.run_command(&["worktree", "list", "--porcelain"])?;
        Ok(parse_porcelain_list(&stdout))
    }

    /// Create a worktree at `path`, optionally checking out `branch`.
    pub fn add_worktree(
        &self,
        path: &Path,
        branch: Option<&str>,
        force: bool,
    ) -> anyhow::Result<Worktree> {
        let path_str = path_arg(path)?;
        let mut args = vec!["worktree", "add"];
        if force {
            args.push("--force");
        }
        args.push(path_str.as_str());
        if let Some(branch) = branch {
            args.push(branch);
        }
        self.run_command(&args)?;

        let mut wt = Worktree::new(path);
        wt.branch = branch.map(str::to_string);
        Ok(wt)
    }

    /// Create a worktree at `path` on a newly created branch.
    pub fn add_worktree_with_new_branch(
        &self,
        path: &Path,
        branch: &str,
        force: bool,
    ) -> anyhow::Result<Worktree> {
        let path_str = path_arg(path)?;
        let mut args = vec!["worktree", "add"];
        if force {
            args.push("--force");
        }
        args.extend(["-b", branch, path_str.as_str()]);
        self.run_command(&args)?;

        let mut wt = Worktree::new(path);
        wt.branch = Some(branch.to_string());
        Ok(wt)
    }

    /// Create a worktree on a local branch tracking `remote_branch`
    /// (e.g. `origin/feature`).
    ///
    /// The remote branch is fetched first; a fetch failure surfaces as
    /// [`GitError::FetchFailed`] so callers can tell it apart from worktree
    /// creation problems.
    pub fn add_worktree_tracking_remote(
        &self,
        path: &Path,
        local_branch: &str,
        remote_branch: &str,
        force: bool,
    ) -> anyhow::Result<Worktree> {
        let (remote, branch) = remote_branch
            .split_once('/')
            .unwrap_or(("origin", remote_branch));
        if let Err(err) = self.run_command(&["fetch", remote, branch]) {
            return Err(GitError::FetchFailed {
                remote_branch: remote_branch.to_string(),
                message: err.to_string(),
            }
            .into());
        }

        let path_str = path_arg(path)?;
        let mut args = vec!["worktree", "add"];
        if force {
            args.push("--force");
        }
        args.extend(["--track", "-b", local_branch, path_str.as_str(), remote_branch]);
        self.run_command(&args)?;

        let mut wt = Worktree::new(path);
        wt.branch = Some(local_branch.to_string());
        Ok(wt)
    }

    /// Remove the worktree at `path`.
    ///
    /// `force` allows removal even when the worktree contains modified or
    /// untracked files.
    pub fn remove_worktree(&self, path: &Path, force: bool) -> anyhow::Result<()> {
        let path_str = path_arg(path)?;
        let mut args = vec!["worktree", "remove"];
        if force {
            args.push("--force");
        }
        args.push(path_str.as_str());
        self.run_command(&args)?;
        Ok(())
    }

    /// Prune worktree entries whose directories no longer exist.
    pub fn prune_worktrees(&self) -> anyhow::Result<()> {
        self.run_command(&["worktree", "prune"])?;
        Ok(())
    }

    /// Run a git command in this repository's context and return its stdout.
    ///
    /// Non-zero exit becomes [`GitError::CommandFailed`] carrying the
    /// command's diagnostic text (stderr first, then stdout — some git
    /// commands print errors to stdout).
    pub fn run_command(&self, args: &[&str]) -> anyhow::Result<String> {
        let mut cmd = Command::new("git");
        cmd.args(args);
        cmd.current_dir(&self.path);

        let output = shell_exec::run(&mut cmd)
            .with_context(|| format!("Failed to execute: git {}", args.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            for line in stderr.trim().lines() {
                log::debug!("  ! {}", line);
            }
            let stdout = String::from_utf8_lossy(&output.stdout);
            let message = [stderr.trim(), stdout.trim()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            return Err(GitError::CommandFailed { message }.into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        for line in stdout.trim().lines() {
            log::debug!("  {}", line);
        }
        Ok(stdout)
    }
}

fn path_arg(path: &Path) -> anyhow::Result<String> {
    path.to_str().map(str::to_string).ok_or_else(|| {
        GitError::CommandFailed {
            message: format!("Worktree path contains invalid UTF-8: {}", path.display()),
        }
        .into()
    })
}
