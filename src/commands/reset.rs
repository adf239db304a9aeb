//! `wtm reset` — reset the current worktree's branch to the remote main

use std::env;

use anyhow::{bail, Context};
use color_print::cprintln;

use crate::config::Config;
use crate::git::Repository;

use super::{find_main_repository_root, is_main_repository};

pub fn handle_reset(force: bool) -> anyhow::Result<()> {
    let cwd = env::current_dir().context("Failed to determine current directory")?;
    if is_main_repository(&cwd) {
        bail!("Run reset from inside a worktree, not the main repository.");
    }

    let root = find_main_repository_root()?;
    let config = Config::load(&root);

    // Anchor at the worktree itself so status and reset act on its checkout.
    let worktree = Repository::at(&cwd)?;
    reset_to_remote_main(&worktree, config.main_branch_name(), force)
}

/// Reset the worktree's branch to `origin/<main_branch>`.
///
/// A mixed reset by default, leaving divergent changes unstaged in the
/// working tree; `force` discards uncommitted changes and resets `--hard`.
pub fn reset_to_remote_main(
    worktree: &Repository,
    main_branch: &str,
    force: bool,
) -> anyhow::Result<()> {
    let current = worktree
        .run_command(&["rev-parse", "--abbrev-ref", "HEAD"])?
        .trim()
        .to_string();
    if current == main_branch {
        bail!(
            "This worktree is on '{}'. Resetting the main branch is not supported.",
            main_branch
        );
    }

    let status = worktree.run_command(&["status", "--porcelain"])?;
    if !status.trim().is_empty() && !force {
        bail!(
            "Worktree has uncommitted changes. Commit or stash them, \
             or pass --force to discard them."
        );
    }

    worktree.run_command(&["fetch", "origin", main_branch])?;
    let target = format!("origin/{}", main_branch);
    if force {
        worktree.run_command(&["reset", "--hard", target.as_str()])?;
    } else {
        worktree.run_command(&["reset", target.as_str()])?;
    }

    cprintln!(
        "<green>Reset '{}' to origin/{}.</>",
        current,
        main_branch
    );
    Ok(())
}
