//! End-to-end hook execution: configuration file in, shell effects out.

#![cfg(unix)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use wtm::{Config, HookContext, HookRunner, HookType};

fn write_config(dir: &Path, yaml: &str) -> Config {
    fs::write(dir.join(".worktree.yml"), yaml).unwrap();
    Config::load(dir)
}

fn context(entries: &[(&str, &str)]) -> HookContext {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn structured_hook_stops_at_first_failure() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        "hooks:\n\
         \x20 pre_add:\n\
         \x20   commands:\n\
         \x20     - touch first.marker\n\
         \x20     - \"false\"\n\
         \x20     - touch third.marker\n",
    );
    let runner = HookRunner::new(&config);

    let ok = runner.execute(HookType::PreAdd, &HookContext::new()).unwrap();

    assert!(!ok);
    assert!(dir.path().join("first.marker").exists());
    assert!(!dir.path().join("third.marker").exists());
}

#[test]
fn stop_on_error_false_runs_everything_and_succeeds() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        "hooks:\n\
         \x20 pre_add:\n\
         \x20   commands:\n\
         \x20     - \"false\"\n\
         \x20     - touch second.marker\n\
         \x20   stop_on_error: false\n",
    );
    let runner = HookRunner::new(&config);

    let ok = runner.execute(HookType::PreAdd, &HookContext::new()).unwrap();

    assert!(ok);
    assert!(dir.path().join("second.marker").exists());
}

#[test]
fn legacy_command_list_runs_all_but_reports_failure() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        "pre_add:\n\
         \x20 - \"false\"\n\
         \x20 - touch after-failure.marker\n",
    );
    let runner = HookRunner::new(&config);

    let ok = runner.execute(HookType::PreAdd, &HookContext::new()).unwrap();

    assert!(!ok);
    assert!(dir.path().join("after-failure.marker").exists());
}

#[test]
fn hook_sees_context_and_root_in_environment() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        "hooks:\n\
         \x20 post_add: printenv WORKTREE_PATH WORKTREE_BRANCH WORKTREE_MAIN WORKTREE_ABSOLUTE_PATH > env.txt\n",
    );
    let runner = HookRunner::new(&config);
    fs::create_dir(dir.path().join("wt")).unwrap();

    let ok = runner
        .execute(HookType::PostAdd, &context(&[("path", "wt"), ("branch", "feature/x")]))
        .unwrap();
    assert!(ok);

    // post_add defaults to the worktree directory, so the file lands there.
    let env = fs::read_to_string(dir.path().join("wt/env.txt")).unwrap();
    let lines: Vec<&str> = env.lines().collect();
    // The context value stays literal; only WORKTREE_ABSOLUTE_PATH resolves.
    assert_eq!(lines[0], "wt");
    assert_eq!(lines[1], "feature/x");
    assert_eq!(lines[2], dir.path().to_str().unwrap());
    assert_eq!(lines[3], dir.path().join("wt").to_str().unwrap());
}

#[test]
fn secrets_are_not_forwarded_to_hooks() {
    let dir = TempDir::new().unwrap();
    // The runner snapshots its baseline at construction, so pin it instead
    // of mutating the process environment.
    let config = write_config(
        dir.path(),
        "hooks:\n\
         \x20 pre_add: env > env.txt\n",
    );
    let base = vec![("PATH".to_string(), std::env::var("PATH").unwrap())];
    let runner = HookRunner::with_base_env(&config, base);

    assert!(runner.execute(HookType::PreAdd, &HookContext::new()).unwrap());

    let env = fs::read_to_string(dir.path().join("env.txt")).unwrap();
    assert!(env.lines().any(|l| l.starts_with("PATH=")));
    assert!(!env.lines().any(|l| l.starts_with("CARGO")));
}

#[test]
fn default_working_directory_follows_lifecycle() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        "hooks:\n\
         \x20 pre_add: pwd > pre.txt\n\
         \x20 pre_remove: pwd > pre-remove.txt\n",
    );
    let runner = HookRunner::new(&config);
    fs::create_dir(dir.path().join("wt")).unwrap();
    let ctx = context(&[("path", "wt")]);

    assert!(runner.execute(HookType::PreAdd, &ctx).unwrap());
    assert!(runner.execute(HookType::PreRemove, &ctx).unwrap());

    let root = dir.path().canonicalize().unwrap();
    let pre = fs::read_to_string(dir.path().join("pre.txt")).unwrap();
    assert_eq!(Path::new(pre.trim()).canonicalize().unwrap(), root);
    let pre_remove = fs::read_to_string(dir.path().join("wt/pre-remove.txt")).unwrap();
    assert_eq!(
        Path::new(pre_remove.trim()).canonicalize().unwrap(),
        root.join("wt")
    );
}

#[test]
fn pwd_template_relocates_the_hook() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        "hooks:\n\
         \x20 pre_add:\n\
         \x20   commands:\n\
         \x20     - pwd > here.txt\n\
         \x20   pwd: $WORKTREE_ABSOLUTE_PATH/nested\n",
    );
    let runner = HookRunner::new(&config);
    fs::create_dir_all(dir.path().join("wt/nested")).unwrap();

    assert!(runner
        .execute(HookType::PreAdd, &context(&[("path", "wt")]))
        .unwrap());

    let here = fs::read_to_string(dir.path().join("wt/nested/here.txt")).unwrap();
    assert_eq!(
        Path::new(here.trim()).canonicalize().unwrap(),
        dir.path().canonicalize().unwrap().join("wt/nested")
    );
}

#[test]
fn single_string_hook_from_legacy_key() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "post_remove: touch removed.marker\n");
    let runner = HookRunner::new(&config);

    assert!(runner
        .execute(HookType::PostRemove, &HookContext::new())
        .unwrap());
    assert!(dir.path().join("removed.marker").exists());
}

#[test]
fn hooks_key_wins_over_legacy_top_level() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        "pre_add: touch legacy.marker\n\
         hooks:\n\
         \x20 pre_add: touch structured.marker\n",
    );
    let runner = HookRunner::new(&config);

    assert!(runner.execute(HookType::PreAdd, &HookContext::new()).unwrap());
    assert!(dir.path().join("structured.marker").exists());
    assert!(!dir.path().join("legacy.marker").exists());
}

#[test]
fn execute_is_idempotent_for_side_effect_free_commands() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        "hooks:\n\
         \x20 pre_add:\n\
         \x20   commands:\n\
         \x20     - \"true\"\n\
         \x20     - \"false\"\n",
    );
    let runner = HookRunner::new(&config);

    let first = runner.execute(HookType::PreAdd, &HookContext::new()).unwrap();
    let second = runner.execute(HookType::PreAdd, &HookContext::new()).unwrap();
    assert_eq!(first, second);
    assert!(!first);
}

#[test]
fn malformed_config_degrades_to_no_hooks() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "hooks: [unterminated\n");
    let runner = HookRunner::new(&config);

    assert!(!runner.has_hook(HookType::PreAdd));
    assert!(runner.execute(HookType::PreAdd, &HookContext::new()).unwrap());
}
