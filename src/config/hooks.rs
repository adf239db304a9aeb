//! Hook definition shapes and normalization
//!
//! Configuration accepts three coexisting shapes for a hook value:
//!
//! ```yaml
//! pre_add: "echo one command"          # single string
//! post_add:                            # sequence of strings
//!   - npm install
//!   - npm run build
//! pre_remove:                          # structured mapping
//!   commands: ["make clean"]
//!   pwd: "$WORKTREE_ABSOLUTE_PATH"
//!   stop_on_error: false
//! ```
//!
//! The polymorphism is resolved once at load time into [`ResolvedHook`] so
//! the execution path only ever iterates over a normalized command list.

use serde::Deserialize;
use strum::{Display, EnumIter, EnumString};

/// The closed set of lifecycle points hooks can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum HookType {
    PreAdd,
    PostAdd,
    PreRemove,
    PostRemove,
}

/// Raw hook value as written in the configuration file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum HookDefinition {
    /// `pre_add: "echo hi"`
    Command(String),
    /// `pre_add: ["echo a", "echo b"]`
    Commands(Vec<String>),
    /// `pre_add: { commands: [...], pwd: ..., stop_on_error: ... }`
    Detailed(DetailedHook),
}

/// The structured mapping shape.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DetailedHook {
    /// Ordered command list; preferred over `command`.
    #[serde(default)]
    pub commands: Option<Vec<String>>,
    /// Legacy single-command alternative.
    #[serde(default)]
    pub command: Option<String>,
    /// Working-directory template; may contain `$VARNAME` placeholders.
    #[serde(default)]
    pub pwd: Option<String>,
    /// Stop at the first failing command (default true).
    #[serde(default = "default_true")]
    pub stop_on_error: bool,
}

fn default_true() -> bool {
    true
}

/// How failures aggregate across the commands of one hook.
///
/// The legacy string/sequence shapes and the structured
/// `stop_on_error: true` shape both "stop on failure" conceptually, but
/// their observable behavior differs and is preserved as-is: legacy shapes
/// run every command and succeed only if all did; the structured shape
/// actually short-circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Legacy shapes: run all commands, overall success requires all of
    /// them to succeed.
    AllMustSucceed,
    /// Structured shape, `stop_on_error: true`: stop at the first failure
    /// and report the hook as failed.
    StopOnError,
    /// Structured shape, `stop_on_error: false`: run all commands and
    /// report success regardless of individual failures.
    ContinueAlways,
}

/// Normalized hook ready for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedHook {
    pub commands: Vec<String>,
    pub pwd: Option<String>,
    pub policy: FailurePolicy,
}

impl HookDefinition {
    /// Collapse the raw shape into its normalized form.
    pub fn resolve(&self) -> ResolvedHook {
        match self {
            Self::Command(cmd) => ResolvedHook {
                commands: vec![cmd.clone()],
                pwd: None,
                policy: FailurePolicy::AllMustSucceed,
            },
            Self::Commands(cmds) => ResolvedHook {
                commands: cmds.clone(),
                pwd: None,
                policy: FailurePolicy::AllMustSucceed,
            },
            Self::Detailed(detailed) => {
                let commands = match (&detailed.commands, &detailed.command) {
                    (Some(cmds), _) => cmds.clone(),
                    (None, Some(cmd)) => vec![cmd.clone()],
                    (None, None) => Vec::new(),
                };
                ResolvedHook {
                    commands,
                    pwd: detailed.pwd.clone(),
                    policy: if detailed.stop_on_error {
                        FailurePolicy::StopOnError
                    } else {
                        FailurePolicy::ContinueAlways
                    },
                }
            }
        }
    }
}

/// The normalized hook table: one optional entry per lifecycle point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookSet {
    pre_add: Option<ResolvedHook>,
    post_add: Option<ResolvedHook>,
    pre_remove: Option<ResolvedHook>,
    post_remove: Option<ResolvedHook>,
}

impl HookSet {
    pub(crate) fn set(&mut self, hook: HookType, resolved: ResolvedHook) {
        let slot = match hook {
            HookType::PreAdd => &mut self.pre_add,
            HookType::PostAdd => &mut self.post_add,
            HookType::PreRemove => &mut self.pre_remove,
            HookType::PostRemove => &mut self.post_remove,
        };
        *slot = Some(resolved);
    }

    pub fn get(&self, hook: HookType) -> Option<&ResolvedHook> {
        match hook {
            HookType::PreAdd => self.pre_add.as_ref(),
            HookType::PostAdd => self.post_add.as_ref(),
            HookType::PreRemove => self.pre_remove.as_ref(),
            HookType::PostRemove => self.post_remove.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pre_add.is_none()
            && self.post_add.is_none()
            && self.pre_remove.is_none()
            && self.post_remove.is_none()
    }
}
