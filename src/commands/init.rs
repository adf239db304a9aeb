//! `wtm init` — write a starter `.worktree.yml`

use std::fs;

use anyhow::{bail, Context};
use color_print::cprintln;

use super::{ensure_main_repository, find_main_repository_root};

const SAMPLE_CONFIG: &str = "\
# Worktree manager configuration.
#
# worktrees_dir: where bare worktree names are placed, relative to the
# repository root. Defaults to the parent directory.
worktrees_dir: \"../\"

# Branch that `wtm reset` targets on origin.
main_branch_name: \"main\"

# Lifecycle hooks. Each hook accepts a single command string, a list of
# commands, or a mapping with `commands`, `pwd` and `stop_on_error`.
hooks:
  # post_add:
  #   commands:
  #     - cp $WORKTREE_MAIN/.env $WORKTREE_ABSOLUTE_PATH/.env
  #     - bundle install
  #   pwd: $WORKTREE_ABSOLUTE_PATH
  # pre_remove: echo \"removing $WORKTREE_PATH\"
";

pub fn handle_init(force: bool) -> anyhow::Result<()> {
    let root = find_main_repository_root()?;
    ensure_main_repository(&root)?;

    let target = root.join(".worktree.yml");
    if target.exists() && !force {
        bail!(
            "{} already exists. Use --force to overwrite it.",
            target.display()
        );
    }

    fs::write(&target, SAMPLE_CONFIG)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    cprintln!("<green>Wrote</> {}", target.display());
    Ok(())
}
