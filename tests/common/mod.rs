//! Test fixtures: isolated git repositories in temporary directories.
//!
//! Git runs with its global and system configuration pinned so host
//! settings (hooks path, default branch overrides, commit signing) cannot
//! leak into tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

pub struct TestRepo {
    _dir: TempDir,
    root: PathBuf,
    git_config: PathBuf,
}

impl TestRepo {
    /// A fresh repository with one commit on `main`.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let root = dir.path().join("main");
        fs::create_dir(&root).expect("create repo dir");

        let git_config = dir.path().join("gitconfig");
        fs::write(
            &git_config,
            "[user]\n\tname = Test\n\temail = test@example.com\n\
             [init]\n\tdefaultBranch = main\n",
        )
        .expect("write git config");

        let repo = Self {
            _dir: dir,
            root,
            git_config,
        };
        repo.run_git(&["init"]);
        fs::write(repo.root.join("README.md"), "fixture\n").unwrap();
        repo.run_git(&["add", "."]);
        repo.run_git(&["commit", "-m", "initial"]);
        repo
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A path beside the main working copy, for worktrees.
    pub fn sibling(&self, name: &str) -> PathBuf {
        self.root.parent().unwrap().join(name)
    }

    pub fn git_command(&self) -> Command {
        self.git_command_in(&self.root)
    }

    pub fn git_command_in(&self, dir: &Path) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(dir);
        cmd.env("GIT_CONFIG_GLOBAL", &self.git_config);
        cmd.env("GIT_CONFIG_SYSTEM", null_device());
        cmd.env("GIT_AUTHOR_DATE", "2026-01-01T00:00:00Z");
        cmd.env("GIT_COMMITTER_DATE", "2026-01-01T00:00:00Z");
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd.env("LC_ALL", "C");
        cmd
    }

    pub fn run_git(&self, args: &[&str]) {
        self.run_git_in(&self.root, args);
    }

    pub fn run_git_in(&self, dir: &Path, args: &[&str]) {
        let output = self
            .git_command_in(dir)
            .args(args)
            .output()
            .expect("spawn git");
        assert!(
            output.status.success(),
            "git {:?} failed:\n{}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    pub fn git_stdout(&self, args: &[&str]) -> String {
        self.git_stdout_in(&self.root, args)
    }

    pub fn git_stdout_in(&self, dir: &Path, args: &[&str]) -> String {
        let output = self
            .git_command_in(dir)
            .args(args)
            .output()
            .expect("spawn git");
        assert!(output.status.success(), "git {:?} failed", args);
        String::from_utf8_lossy(&output.stdout).into_owned()
    }
}

fn null_device() -> &'static str {
    if cfg!(windows) {
        "NUL"
    } else {
        "/dev/null"
    }
}
