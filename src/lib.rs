//! Git worktree management with lifecycle hooks.
//!
//! `wtm` is a CLI tool; the library surface exists for the binary and the
//! integration tests and is not a stable API.

pub mod commands;
pub mod config;
pub mod git;
pub mod hooks;
pub mod path;
pub mod shell_exec;

// Re-exports for the common entry points
pub use config::{Config, HookType};
pub use hooks::{HookContext, HookRunner};
