//! Hook execution engine
//!
//! Resolves the configured commands for a lifecycle point and runs them in
//! order through the shell, with a computed environment and working
//! directory per command. Output streams to the parent's stdout/stderr while
//! the commands run. Hook command failures never raise; they aggregate into
//! the returned boolean according to the hook's [`FailurePolicy`]. Only
//! spawn-level failures (shell missing, unusable working directory)
//! propagate as errors, since those indicate an environment problem rather
//! than a failing user hook.

use std::path::{Path, PathBuf};

use anyhow::Context;
use color_print::ceprintln;
use indexmap::IndexMap;

use crate::config::{Config, FailurePolicy, HookSet, HookType, ResolvedHook};
use crate::path::absolutize;
use crate::shell_exec::{self, ShellConfig};

/// Runtime key-value data passed into one hook invocation (path, branch,
/// force, success, error, …). Caller-owned; the engine never mutates it.
pub type HookContext = IndexMap<String, String>;

/// Environment variables forwarded from the parent process into hook
/// commands. Everything else is withheld so unrelated secrets don't leak
/// into hook processes.
const BASE_ENV_KEYS: &[&str] = &["PATH", "HOME", "USER", "SHELL"];

/// Sequential hook command runner.
///
/// The repository root, hook table, and environment baseline are fixed at
/// construction and read-only afterwards; the runner is safe to reuse
/// across invocations.
pub struct HookRunner {
    root: PathBuf,
    hooks: HookSet,
    base_env: Vec<(String, String)>,
}

impl HookRunner {
    /// Build a runner from loaded configuration, snapshotting the
    /// environment baseline from the current process.
    pub fn new(config: &Config) -> Self {
        let base_env = BASE_ENV_KEYS
            .iter()
            .filter_map(|key| std::env::var(key).ok().map(|v| (key.to_string(), v)))
            .collect();
        Self::with_base_env(config, base_env)
    }

    /// Build a runner with an explicit environment baseline (used by tests
    /// to pin the hook environment down exactly).
    pub fn with_base_env(config: &Config, base_env: Vec<(String, String)>) -> Self {
        Self {
            root: config.root().to_path_buf(),
            hooks: config.hooks().clone(),
            base_env,
        }
    }

    /// Run the hook configured for `hook`, if any.
    ///
    /// Returns `Ok(true)` without spawning anything when no definition
    /// exists or its command list is empty. Otherwise executes the commands
    /// in order and aggregates per the hook's failure policy.
    pub fn execute(&self, hook: HookType, context: &HookContext) -> anyhow::Result<bool> {
        let Some(resolved) = self.hooks.get(hook) else {
            return Ok(true);
        };
        if resolved.commands.is_empty() {
            return Ok(true);
        }

        log::debug!("Running {} hook ({} command(s))", hook, resolved.commands.len());

        let env = self.build_env(context);
        let cwd = self.working_dir(hook, resolved, context);

        match resolved.policy {
            FailurePolicy::StopOnError => {
                for command in &resolved.commands {
                    if !self.run_hook_command(command, &env, &cwd)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            FailurePolicy::ContinueAlways => {
                for command in &resolved.commands {
                    self.run_hook_command(command, &env, &cwd)?;
                }
                Ok(true)
            }
            FailurePolicy::AllMustSucceed => {
                let mut all_ok = true;
                for command in &resolved.commands {
                    all_ok &= self.run_hook_command(command, &env, &cwd)?;
                }
                Ok(all_ok)
            }
        }
    }

    /// Whether a non-empty hook is configured for `hook`.
    pub fn has_hook(&self, hook: HookType) -> bool {
        self.hooks
            .get(hook)
            .is_some_and(|resolved| !resolved.commands.is_empty())
    }

    fn run_hook_command(
        &self,
        command: &str,
        env: &[(String, String)],
        cwd: &Path,
    ) -> anyhow::Result<bool> {
        let shell = ShellConfig::get();
        if !shell.is_posix {
            log::debug!(
                "Hook commands run via {}; POSIX shell syntax may not apply",
                shell.name
            );
        }
        let mut cmd = shell.command(command);
        cmd.env_clear();
        cmd.envs(env.iter().map(|(k, v)| (k, v)));
        cmd.current_dir(cwd);

        let status = shell_exec::run_streaming(&mut cmd)
            .with_context(|| format!("Failed to launch {} for hook command: {}", shell.name, command))?;
        if !status.success() {
            let code = status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            ceprintln!("<red>Hook command failed (exit {}):</> {}", code, command);
            return Ok(false);
        }
        Ok(true)
    }

    /// Environment for hook commands: the base snapshot, the repository
    /// root markers, one `WORKTREE_<KEY>` per context entry, and the
    /// resolved absolute path when the context carries a `path`.
    fn build_env(&self, context: &HookContext) -> Vec<(String, String)> {
        let root = self.root.display().to_string();
        let mut env = self.base_env.clone();
        env.push(("WORKTREE_MANAGER_ROOT".to_string(), root.clone()));
        env.push(("WORKTREE_MAIN".to_string(), root));
        for (key, value) in context {
            env.push((format!("WORKTREE_{}", key.to_uppercase()), value.clone()));
        }
        if let Some(path) = self.context_absolute_path(context) {
            env.push((
                "WORKTREE_ABSOLUTE_PATH".to_string(),
                path.display().to_string(),
            ));
        }
        env
    }

    fn context_absolute_path(&self, context: &HookContext) -> Option<PathBuf> {
        context
            .get("path")
            .map(|path| absolutize(Path::new(path), &self.root))
    }

    /// Working directory for a hook's commands.
    ///
    /// A configured `pwd` template wins, with `$VARNAME` tokens substituted.
    /// Without one, `post_add` and `pre_remove` run inside the worktree the
    /// context points at (it exists at those points in the lifecycle);
    /// everything else runs at the repository root.
    fn working_dir(&self, hook: HookType, resolved: &ResolvedHook, context: &HookContext) -> PathBuf {
        if let Some(template) = &resolved.pwd {
            let substituted = self.substitute_pwd(template, context);
            return absolutize(Path::new(&substituted), &self.root);
        }

        match hook {
            HookType::PostAdd | HookType::PreRemove => self
                .context_absolute_path(context)
                .unwrap_or_else(|| self.root.clone()),
            HookType::PreAdd | HookType::PostRemove => self.root.clone(),
        }
    }

    /// Substitute `$VARNAME` tokens in a `pwd` template.
    ///
    /// `WORKTREE_ABSOLUTE_PATH` expands to the context path resolved against
    /// the repository root; `WORKTREE_MAIN` and `WORKTREE_MANAGER_ROOT` to
    /// the root itself; any other `WORKTREE_*` token looks up the
    /// de-prefixed, lower-cased key in the context; non-`WORKTREE_` tokens
    /// come from the ambient process environment. Undefined tokens stay
    /// literal.
    fn substitute_pwd(&self, template: &str, context: &HookContext) -> String {
        shellexpand::env_with_context_no_errors(template, |var: &str| -> Option<String> {
            match var {
                "WORKTREE_ABSOLUTE_PATH" => self
                    .context_absolute_path(context)
                    .map(|p| p.display().to_string()),
                "WORKTREE_MAIN" | "WORKTREE_MANAGER_ROOT" => {
                    Some(self.root.display().to_string())
                }
                _ => {
                    if let Some(key) = var.strip_prefix("WORKTREE_") {
                        context.get(&key.to_lowercase()).cloned()
                    } else {
                        std::env::var(var).ok()
                    }
                }
            }
        })
        .into_owned()
    }
}
