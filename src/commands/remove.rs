//! `wtm remove` — remove worktrees with pre/post hooks

use anyhow::bail;
use color_print::cprintln;

use crate::config::{Config, HookType};
use crate::git::{Repository, Worktree};
use crate::hooks::{HookContext, HookRunner};

use super::{ensure_main_repository, find_main_repository_root, is_main_repository};

pub struct RemoveOptions {
    pub name_or_path: Option<String>,
    pub all: bool,
    pub force: bool,
    pub no_hooks: bool,
}

pub fn handle_remove(opts: RemoveOptions) -> anyhow::Result<()> {
    let root = find_main_repository_root()?;
    ensure_main_repository(&root)?;

    let config = Config::load(&root);
    let repo = Repository::at(&root)?;
    let runner = HookRunner::new(&config);

    if opts.all {
        if opts.name_or_path.is_some() {
            bail!("Cannot specify both --all and a specific worktree");
        }
        return remove_all(&repo, &runner, &opts);
    }

    let Some(name_or_path) = &opts.name_or_path else {
        let worktrees = repo.list_worktrees()?;
        let removable: Vec<_> = worktrees
            .iter()
            .filter(|wt| !is_main_repository(&wt.path))
            .collect();
        if removable.is_empty() {
            bail!("No removable worktrees found (only the main repository exists).");
        }
        let listing = removable
            .iter()
            .map(|wt| format!("  - {}", wt.describe()))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("Specify the worktree to remove. Candidates:\n{}", listing);
    };

    let path = config.resolve_worktree_path(name_or_path);
    if is_main_repository(&path) {
        bail!("Cannot remove the main repository");
    }

    // Git reports real paths; resolve ours the same way before comparing.
    let path = crate::path::canonicalize(&path);
    let worktrees = repo.list_worktrees()?;
    let Some(target) = worktrees
        .iter()
        .find(|wt| crate::path::canonicalize(&wt.path) == path)
    else {
        bail!("Worktree not found at path: {}", path.display());
    };

    remove_one(&repo, &runner, target, &opts)
}

fn remove_one(
    repo: &Repository,
    runner: &HookRunner,
    target: &Worktree,
    opts: &RemoveOptions,
) -> anyhow::Result<()> {
    let mut context = HookContext::new();
    context.insert("path".to_string(), target.path.display().to_string());
    if let Some(branch) = target.short_branch() {
        context.insert("branch".to_string(), branch.to_string());
    }
    context.insert("force".to_string(), opts.force.to_string());

    if !opts.no_hooks && !runner.execute(HookType::PreRemove, &context)? {
        let mut error_context = context.clone();
        error_context.insert("success".to_string(), "false".to_string());
        error_context.insert("error".to_string(), "pre_remove hook failed".to_string());
        runner.execute(HookType::PostRemove, &error_context)?;
        bail!("pre_remove hook failed. Aborting worktree removal.");
    }

    match repo.remove_worktree(&target.path, opts.force) {
        Ok(()) => {
            cprintln!("<green>Worktree removed:</> {}", target.path.display());
            if !opts.no_hooks {
                let mut post_context = context.clone();
                post_context.insert("success".to_string(), "true".to_string());
                runner.execute(HookType::PostRemove, &post_context)?;
            }
            Ok(())
        }
        Err(err) => {
            if !opts.no_hooks {
                let mut error_context = context.clone();
                error_context.insert("success".to_string(), "false".to_string());
                error_context.insert("error".to_string(), err.to_string());
                runner.execute(HookType::PostRemove, &error_context)?;
            }
            Err(err)
        }
    }
}

/// Remove every worktree except the main working copy. Requires `--force`
/// since there is no confirmation prompt.
fn remove_all(
    repo: &Repository,
    runner: &HookRunner,
    opts: &RemoveOptions,
) -> anyhow::Result<()> {
    let worktrees = repo.list_worktrees()?;
    let removable: Vec<_> = worktrees
        .into_iter()
        .filter(|wt| !is_main_repository(&wt.path))
        .collect();

    if removable.is_empty() {
        println!("No worktrees to remove (only the main repository found).");
        return Ok(());
    }

    if !opts.force {
        bail!(
            "Removing all worktrees requires confirmation.\n\
             Use --force to remove all {} worktrees.",
            removable.len()
        );
    }

    let mut failed = 0usize;
    for worktree in &removable {
        println!("\nRemoving worktree: {}", worktree.path.display());
        if let Err(err) = remove_one(repo, runner, worktree, opts) {
            cprintln!("<red>Error:</> {:#}", err);
            failed += 1;
        }
    }

    // Clear admin entries for any worktree directories deleted out of band.
    repo.prune_worktrees()?;

    if failed > 0 {
        bail!("Failed to remove {} of {} worktrees", failed, removable.len());
    }
    println!("\nRemoved {} worktrees.", removable.len());
    Ok(())
}
