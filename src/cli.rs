//! Command-line surface

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wtm")]
#[command(about = "Git worktree management with lifecycle hooks", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all worktrees
    List,

    /// Create a new worktree
    ///
    /// NAME_OR_PATH can be a bare name (placed in the configured worktrees
    /// directory), a relative path (resolved against the repository root),
    /// or an absolute path.
    Add {
        /// Worktree name or path
        name_or_path: String,

        /// Branch to check out; `remote/branch` forms create a tracking
        /// branch automatically
        branch: Option<String>,

        /// Create a new branch for the worktree
        #[arg(short = 'b', long = "branch", value_name = "BRANCH")]
        new_branch: Option<String>,

        /// Track a remote branch (e.g. origin/feature)
        #[arg(short = 't', long, value_name = "REMOTE_BRANCH")]
        track: Option<String>,

        /// Force creation even if the directory exists
        #[arg(short, long)]
        force: bool,

        /// Skip pre_add and post_add hooks
        #[arg(long)]
        no_hooks: bool,
    },

    /// Remove an existing worktree
    Remove {
        /// Worktree name or path
        name_or_path: Option<String>,

        /// Remove all worktrees except the main repository
        #[arg(long)]
        all: bool,

        /// Force removal even if the worktree has changes
        #[arg(short, long)]
        force: bool,

        /// Skip pre_remove and post_remove hooks
        #[arg(long)]
        no_hooks: bool,
    },

    /// Print the path of a worktree (for shell `cd` wrappers)
    #[command(alias = "move")]
    Jump {
        /// Worktree name, branch, or path fragment
        name: Option<String>,
    },

    /// Reset the current worktree branch to the remote main branch
    Reset {
        /// Discard uncommitted changes and reset --hard
        #[arg(short, long)]
        force: bool,
    },

    /// Create a sample .worktree.yml configuration file
    Init {
        /// Overwrite an existing .worktree.yml
        #[arg(short, long)]
        force: bool,
    },

    /// Print the version
    Version,
}
