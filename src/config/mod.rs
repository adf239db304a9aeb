//! Configuration loading and path resolution
//!
//! One YAML file configures the worktree directory convention, the trunk
//! branch name, and the lifecycle hooks. Candidate locations are tried in
//! order and the first existing file wins; a missing file means defaults, a
//! malformed file warns and means defaults. Nothing here ever fails the
//! process.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use strum::IntoEnumIterator;

mod hooks;

pub use hooks::{DetailedHook, FailurePolicy, HookDefinition, HookSet, HookType, ResolvedHook};

use crate::path::absolutize;

/// Candidate configuration files, relative to the repository root.
/// First match wins.
const CONFIG_FILES: &[&str] = &[".worktree.yml", ".git/.worktree.yml"];

const DEFAULT_WORKTREES_DIR: &str = "../";
const DEFAULT_MAIN_BRANCH: &str = "main";

/// Raw file shape. Hook definitions live either under `hooks:` or, for
/// backward compatibility, directly at the top level; the flattened map
/// captures the latter along with any unknown keys (which are ignored).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    worktrees_dir: Option<String>,
    main_branch_name: Option<String>,
    hooks: Option<BTreeMap<String, serde_yaml::Value>>,
    #[serde(flatten)]
    rest: BTreeMap<String, serde_yaml::Value>,
}

/// Loaded configuration, immutable after construction.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    worktrees_dir: String,
    main_branch_name: String,
    hooks: HookSet,
}

impl Config {
    /// Load configuration for the repository rooted at `root`.
    pub fn load(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let file = match find_config_file(&root) {
            Some(path) => match std::fs::read_to_string(&path) {
                Ok(contents) => match serde_yaml::from_str::<ConfigFile>(&contents) {
                    Ok(file) => file,
                    Err(err) => {
                        log::warn!(
                            "Failed to parse config file {}: {}; using defaults",
                            path.display(),
                            err
                        );
                        ConfigFile::default()
                    }
                },
                Err(err) => {
                    log::warn!(
                        "Failed to read config file {}: {}; using defaults",
                        path.display(),
                        err
                    );
                    ConfigFile::default()
                }
            },
            None => ConfigFile::default(),
        };

        let hooks = normalize_hooks(&file);
        Self {
            root,
            worktrees_dir: file
                .worktrees_dir
                .unwrap_or_else(|| DEFAULT_WORKTREES_DIR.to_string()),
            main_branch_name: file
                .main_branch_name
                .unwrap_or_else(|| DEFAULT_MAIN_BRANCH.to_string()),
            hooks,
        }
    }

    /// Configuration with all defaults and no hooks, for the given root.
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            worktrees_dir: DEFAULT_WORKTREES_DIR.to_string(),
            main_branch_name: DEFAULT_MAIN_BRANCH.to_string(),
            hooks: HookSet::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory new worktrees are placed in by default, resolved against
    /// the repository root.
    pub fn worktrees_dir(&self) -> PathBuf {
        absolutize(Path::new(&self.worktrees_dir), &self.root)
    }

    /// Trunk branch name used by operations that need to identify it.
    pub fn main_branch_name(&self) -> &str {
        &self.main_branch_name
    }

    pub fn hooks(&self) -> &HookSet {
        &self.hooks
    }

    /// Resolve a user-supplied worktree name or path to an absolute path.
    ///
    /// Absolute input is returned unchanged; input containing a path
    /// separator is resolved relative to the repository root; a bare name
    /// lands in the configured worktrees directory.
    pub fn resolve_worktree_path(&self, name_or_path: &str) -> PathBuf {
        let candidate = Path::new(name_or_path);
        if candidate.is_absolute() {
            return candidate.to_path_buf();
        }
        if name_or_path.contains(std::path::MAIN_SEPARATOR) || name_or_path.contains('/') {
            return absolutize(candidate, &self.root);
        }
        self.worktrees_dir().join(name_or_path)
    }
}

fn find_config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|file| root.join(file))
        .find(|path| path.exists())
}

/// Build the normalized hook table. A present `hooks:` key takes precedence
/// and top-level hook names are then ignored entirely.
fn normalize_hooks(file: &ConfigFile) -> HookSet {
    let source = file.hooks.as_ref().unwrap_or(&file.rest);

    let mut set = HookSet::default();
    for hook in HookType::iter() {
        let Some(value) = source.get(&hook.to_string()) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        match serde_yaml::from_value::<HookDefinition>(value.clone()) {
            Ok(definition) => set.set(hook, definition.resolve()),
            Err(err) => {
                log::warn!("Ignoring malformed {} hook: {}", hook, err);
            }
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) {
        fs::write(dir.path().join(".worktree.yml"), contents).unwrap();
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path());
        assert_eq!(config.main_branch_name(), "main");
        assert_eq!(config.worktrees_dir(), dir.path().parent().unwrap());
        assert!(config.hooks().is_empty());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "worktrees_dir: [unbalanced");
        let config = Config::load(dir.path());
        assert_eq!(config.main_branch_name(), "main");
        assert!(config.hooks().is_empty());
    }

    #[test]
    fn top_level_keys_are_read() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            "worktrees_dir: ../trees\nmain_branch_name: trunk\npre_add: \"echo hi\"\n",
        );
        let config = Config::load(dir.path());
        assert_eq!(config.main_branch_name(), "trunk");
        assert!(config
            .worktrees_dir()
            .ends_with(Path::new("trees")));
        assert!(config.hooks().get(HookType::PreAdd).is_some());
    }

    #[test]
    fn hooks_key_takes_precedence_over_top_level() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            "pre_add: \"echo top-level\"\nhooks:\n  post_add: \"echo nested\"\n",
        );
        let config = Config::load(dir.path());
        assert!(config.hooks().get(HookType::PreAdd).is_none());
        let post_add = config.hooks().get(HookType::PostAdd).unwrap();
        assert_eq!(post_add.commands, vec!["echo nested"]);
    }

    #[test]
    fn git_dir_fallback_is_used_when_root_file_absent() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(
            dir.path().join(".git/.worktree.yml"),
            "hooks:\n  pre_remove: \"echo git hook\"\n",
        )
        .unwrap();
        let config = Config::load(dir.path());
        assert!(config.hooks().get(HookType::PreRemove).is_some());
    }

    #[test]
    fn root_file_wins_over_git_dir_fallback() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        write_config(&dir, "hooks:\n  pre_add: \"echo root\"\n");
        fs::write(
            dir.path().join(".git/.worktree.yml"),
            "hooks:\n  pre_remove: \"echo fallback\"\n",
        )
        .unwrap();
        let config = Config::load(dir.path());
        assert!(config.hooks().get(HookType::PreAdd).is_some());
        assert!(config.hooks().get(HookType::PreRemove).is_none());
    }

    #[test]
    fn unknown_hook_names_are_ignored() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            "hooks:\n  pre_add: \"echo ok\"\n  post_merge: \"echo never\"\n",
        );
        let config = Config::load(dir.path());
        assert!(config.hooks().get(HookType::PreAdd).is_some());
    }

    #[test]
    fn null_hook_value_is_treated_as_absent() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "hooks:\n  pre_add:\n");
        let config = Config::load(dir.path());
        assert!(config.hooks().get(HookType::PreAdd).is_none());
    }

    #[test]
    fn resolve_worktree_path_rules() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path());
        let root = dir.path();

        // Absolute input unchanged
        assert_eq!(
            config.resolve_worktree_path("/abs/path"),
            PathBuf::from("/abs/path")
        );
        // Separator: relative to repository root
        assert_eq!(
            config.resolve_worktree_path("sub/tree"),
            root.join("sub/tree")
        );
        // Bare name: into the worktrees dir (default: parent of root)
        assert_eq!(
            config.resolve_worktree_path("feature"),
            root.parent().unwrap().join("feature")
        );
    }
}
