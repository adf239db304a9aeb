//! `wtm add` — create a worktree with pre/post hooks

use std::path::Path;

use anyhow::bail;
use color_print::cprintln;

use crate::config::{Config, HookType};
use crate::git::Repository;
use crate::hooks::{HookContext, HookRunner};

use super::{ensure_main_repository, find_main_repository_root, valid_branch_name};

pub struct AddOptions {
    pub name_or_path: String,
    pub branch: Option<String>,
    pub new_branch: Option<String>,
    pub track: Option<String>,
    pub force: bool,
    pub no_hooks: bool,
}

pub fn handle_add(opts: AddOptions) -> anyhow::Result<()> {
    let root = find_main_repository_root()?;
    ensure_main_repository(&root)?;

    if opts.name_or_path.trim().is_empty() {
        bail!("Name or path cannot be empty");
    }

    let config = Config::load(&root);
    let path = config.resolve_worktree_path(&opts.name_or_path);

    // The -b option takes precedence over the positional branch argument.
    let mut target_branch = opts.new_branch.clone().or_else(|| opts.branch.clone());

    // Remote tracking: explicit --track, or a positional branch argument
    // containing `/` (e.g. origin/feature) auto-detects one. The local name
    // is the segment after the first `/`.
    let remote_branch = match (&opts.track, &opts.branch) {
        (Some(remote), _) => Some(remote.clone()),
        (None, Some(branch)) if opts.new_branch.is_none() && branch.contains('/') => {
            Some(branch.clone())
        }
        _ => None,
    };
    if let Some(remote) = &remote_branch {
        let local = remote.split_once('/').map(|(_, b)| b).unwrap_or(remote);
        target_branch = Some(local.to_string());
    }

    if let Some(branch) = &target_branch {
        if !valid_branch_name(branch) {
            bail!(
                "Invalid branch name '{}'. Branch names cannot contain spaces or special characters.",
                branch
            );
        }
    }

    let repo = Repository::at(&root)?;
    validate_no_conflicts(
        &repo,
        &path,
        target_branch.as_deref(),
        opts.new_branch.is_some(),
        opts.force,
    )?;

    let runner = HookRunner::new(&config);
    let mut context = HookContext::new();
    context.insert("path".to_string(), path.display().to_string());
    if let Some(branch) = &target_branch {
        context.insert("branch".to_string(), branch.clone());
    }
    context.insert("force".to_string(), opts.force.to_string());

    if !opts.no_hooks && !runner.execute(HookType::PreAdd, &context)? {
        let mut error_context = context.clone();
        error_context.insert("success".to_string(), "false".to_string());
        error_context.insert(
            "error".to_string(),
            "pre_add hook failed".to_string(),
        );
        runner.execute(HookType::PostAdd, &error_context)?;
        bail!("pre_add hook failed. Aborting worktree creation.");
    }

    let result = if let Some(remote) = &remote_branch {
        let local = target_branch.as_deref().unwrap_or_default();
        repo.add_worktree_tracking_remote(&path, local, remote, opts.force)
    } else if let Some(branch) = &opts.new_branch {
        repo.add_worktree_with_new_branch(&path, branch, opts.force)
    } else {
        repo.add_worktree(&path, target_branch.as_deref(), opts.force)
    };

    match result {
        Ok(worktree) => {
            cprintln!(
                "<green>Worktree created:</> {}",
                worktree.describe()
            );
            println!("\nTo enter the worktree, run:\n  cd {}", worktree.path.display());

            if !opts.no_hooks {
                let mut post_context = context.clone();
                post_context.insert("success".to_string(), "true".to_string());
                post_context.insert(
                    "worktree_path".to_string(),
                    worktree.path.display().to_string(),
                );
                runner.execute(HookType::PostAdd, &post_context)?;
            }
            Ok(())
        }
        Err(err) => {
            if !opts.no_hooks {
                let mut error_context = context.clone();
                error_context.insert("success".to_string(), "false".to_string());
                error_context.insert("error".to_string(), err.to_string());
                runner.execute(HookType::PostAdd, &error_context)?;
            }
            Err(err)
        }
    }
}

/// Refuse paths and branches that are already claimed by another worktree.
fn validate_no_conflicts(
    repo: &Repository,
    path: &Path,
    branch: Option<&str>,
    creating_branch: bool,
    force: bool,
) -> anyhow::Result<()> {
    let worktrees = repo.list_worktrees()?;

    // Git reports real paths; resolve ours the same way before comparing,
    // so a symlinked form of a claimed path is still a conflict.
    let resolved = crate::path::canonicalize(path);
    if let Some(existing) = worktrees
        .iter()
        .find(|wt| crate::path::canonicalize(&wt.path) == resolved)
    {
        bail!(
            "A worktree already exists at path '{}'\n  Existing worktree: {}",
            path.display(),
            existing.describe()
        );
    }

    if let Some(branch) = branch {
        if !creating_branch {
            if let Some(existing) = worktrees
                .iter()
                .find(|wt| wt.short_branch() == Some(branch))
            {
                bail!(
                    "Branch '{}' is already checked out in another worktree\n  Existing worktree: {}",
                    branch,
                    existing.describe()
                );
            }
        } else {
            let listed = repo.run_command(&["branch", "--list", branch])?;
            if !listed.trim().is_empty() {
                bail!(
                    "Branch '{}' already exists\n  Use a different branch name or check out the existing branch",
                    branch
                );
            }
        }
    }

    if !force && path.is_dir() && path.read_dir()?.next().is_some() {
        bail!(
            "Directory '{}' already exists and is not empty\n  Use --force to override or choose a different path",
            path.display()
        );
    }

    Ok(())
}
