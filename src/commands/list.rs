//! `wtm list` — show all worktrees of the current repository

use color_print::cprintln;

use crate::git::{Repository, Worktree};
use crate::path::format_path_for_display;

use super::{find_main_repository_root, is_main_repository};

pub fn handle_list() -> anyhow::Result<()> {
    let root = find_main_repository_root()?;
    let repo = Repository::at(&root)?;

    let worktrees = repo.list_worktrees()?;
    if worktrees.is_empty() {
        println!("No worktrees found.");
        return Ok(());
    }

    for worktree in &worktrees {
        if is_main_repository(&worktree.path) {
            cprintln!("{} <dim>[main]</>", display_line(worktree));
        } else {
            println!("{}", display_line(worktree));
        }
    }
    Ok(())
}

fn display_line(worktree: &Worktree) -> String {
    let state = worktree
        .short_branch()
        .or(worktree.head.as_deref())
        .unwrap_or("detached");
    format!("{} ({})", format_path_for_display(&worktree.path), state)
}
