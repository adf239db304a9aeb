//! `wtm jump` — locate a worktree by fuzzy name for shell `cd` integration
//!
//! Prints the matched path on stdout so a shell wrapper can do
//! `cd "$(wtm jump foo)"`. Everything else goes to stderr.

use anyhow::bail;
use color_print::ceprintln;

use crate::git::{Repository, Worktree};

use super::find_main_repository_root;

pub fn handle_jump(name: Option<String>) -> anyhow::Result<()> {
    let root = find_main_repository_root()?;
    let repo = Repository::at(&root)?;
    let worktrees = repo.list_worktrees()?;

    let Some(name) = name else {
        ceprintln!("<yellow>Specify a worktree to jump to.</> Available:");
        for worktree in &worktrees {
            eprintln!("  {}", worktree.describe());
        }
        bail!("No worktree name given");
    };

    match find_match(&worktrees, &name) {
        Some(worktree) => {
            println!("{}", worktree.path.display());
            Ok(())
        }
        None => {
            ceprintln!("<red>No worktree matches:</> {}", name);
            eprintln!("Available:");
            for worktree in &worktrees {
                eprintln!("  {}", worktree.describe());
            }
            bail!("No worktree matching '{}'", name)
        }
    }
}

/// Match priority: exact directory name, then branch substring, then path
/// substring. First hit in list order wins within each tier.
fn find_match<'a>(worktrees: &'a [Worktree], name: &str) -> Option<&'a Worktree> {
    if let Some(exact) = worktrees
        .iter()
        .find(|wt| wt.path.file_name().is_some_and(|f| f == name))
    {
        return Some(exact);
    }
    if let Some(by_branch) = worktrees
        .iter()
        .find(|wt| wt.short_branch().is_some_and(|b| b.contains(name)))
    {
        return Some(by_branch);
    }
    worktrees
        .iter()
        .find(|wt| wt.path.to_string_lossy().contains(name))
}
