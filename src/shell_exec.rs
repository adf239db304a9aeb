//! Cross-platform shell execution
//!
//! Provides a unified interface for executing shell commands across
//! platforms:
//! - Unix: uses `sh -c`
//! - Windows: prefers Git Bash if available, falls back to PowerShell
//!
//! Hook commands use the same bash syntax on all platforms as long as Git
//! for Windows is installed. Without Git Bash, PowerShell is used with
//! limitations (no POSIX redirections, different escaping rules).

use std::path::PathBuf;
use std::process::Command;
use std::sync::OnceLock;

/// Cached shell configuration for the current platform
static SHELL_CONFIG: OnceLock<ShellConfig> = OnceLock::new();

/// Shell configuration for command execution
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Path to the shell executable
    pub executable: PathBuf,
    /// Arguments to pass before the command (e.g., ["-c"] for sh)
    pub args: Vec<String>,
    /// Whether this is a POSIX-compatible shell (bash/sh)
    pub is_posix: bool,
    /// Human-readable name for error messages
    pub name: String,
}

impl ShellConfig {
    /// Get the shell configuration for the current platform.
    pub fn get() -> &'static ShellConfig {
        SHELL_CONFIG.get_or_init(detect_shell)
    }

    /// Create a `Command` that passes `shell_command` to the shell for
    /// interpretation, so pipes and redirections in hook strings work.
    pub fn command(&self, shell_command: &str) -> Command {
        let mut cmd = Command::new(&self.executable);
        for arg in &self.args {
            cmd.arg(arg);
        }
        cmd.arg(shell_command);
        cmd
    }
}

/// Detect the best available shell for the current platform
fn detect_shell() -> ShellConfig {
    #[cfg(unix)]
    {
        ShellConfig {
            executable: PathBuf::from("sh"),
            args: vec!["-c".to_string()],
            is_posix: true,
            name: "sh".to_string(),
        }
    }

    #[cfg(windows)]
    {
        detect_windows_shell()
    }
}

/// Detect the best available shell on Windows
///
/// Priority order:
/// 1. Git Bash (if Git for Windows is installed)
/// 2. PowerShell (fallback, with syntax differences)
#[cfg(windows)]
fn detect_windows_shell() -> ShellConfig {
    if let Some(bash_path) = find_git_bash() {
        return ShellConfig {
            executable: bash_path,
            args: vec!["-c".to_string()],
            is_posix: true,
            name: "Git Bash".to_string(),
        };
    }

    ShellConfig {
        executable: PathBuf::from("powershell.exe"),
        args: vec!["-NoProfile".to_string(), "-Command".to_string()],
        is_posix: false,
        name: "PowerShell".to_string(),
    }
}

/// Find Git Bash on Windows.
///
/// Derives the bash.exe location from `git.exe` in PATH first, then checks
/// standard install paths. We avoid `which bash` because on systems with WSL
/// the WSL launcher often shadows Git Bash in PATH.
#[cfg(windows)]
fn find_git_bash() -> Option<PathBuf> {
    if let Ok(git_path) = which::which("git") {
        if let Some(git_dir) = git_path.parent().and_then(|p| p.parent()) {
            let bash_path = git_dir.join("bin").join("bash.exe");
            if bash_path.exists() {
                return Some(bash_path);
            }
            let bash_path = git_dir.join("usr").join("bin").join("bash.exe");
            if bash_path.exists() {
                return Some(bash_path);
            }
        }
    }

    let bash_paths = [
        r"C:\Program Files\Git\bin\bash.exe",
        r"C:\Program Files\Git\usr\bin\bash.exe",
        r"C:\Program Files (x86)\Git\bin\bash.exe",
        r"C:\msys64\usr\bin\bash.exe",
    ];

    bash_paths.iter().map(PathBuf::from).find(|p| p.exists())
}

/// Execute a command with timing and debug logging.
///
/// All captured command execution goes through this function so tracing is
/// consistent:
///
/// ```text
/// $ git worktree list --porcelain
/// [wtm-trace] cmd="..." dur=12.3ms ok=true
/// ```
pub fn run(cmd: &mut Command) -> std::io::Result<std::process::Output> {
    use std::time::Instant;

    let cmd_str = render_command(cmd);
    log::debug!("$ {}", cmd_str);

    let t0 = Instant::now();
    let result = cmd.output();
    let duration_ms = t0.elapsed().as_secs_f64() * 1000.0;

    match &result {
        Ok(output) => {
            log::debug!(
                "[wtm-trace] cmd=\"{}\" dur={:.1}ms ok={}",
                cmd_str,
                duration_ms,
                output.status.success()
            );
        }
        Err(e) => {
            log::debug!(
                "[wtm-trace] cmd=\"{}\" dur={:.1}ms err=\"{}\"",
                cmd_str,
                duration_ms,
                e
            );
        }
    }

    result
}

/// Run a command, streaming its stdout and stderr to the parent's streams
/// line by line, and return the exit status.
///
/// The two pipes are drained by independent reader threads started before
/// `wait()`; draining one stream to completion while the other fills its
/// pipe buffer would deadlock the child. Both readers are joined before the
/// exit status is returned.
pub fn run_streaming(cmd: &mut Command) -> std::io::Result<std::process::ExitStatus> {
    use std::io::{BufRead, BufReader, Write};
    use std::process::Stdio;
    use std::time::Instant;

    let cmd_str = render_command(cmd);
    log::debug!("$ {}", cmd_str);

    let t0 = Instant::now();
    let mut child = cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).spawn()?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let out_reader = std::thread::spawn(move || {
        if let Some(stdout) = stdout {
            let mut sink = std::io::stdout().lock();
            for line in BufReader::new(stdout).lines() {
                match line {
                    Ok(line) => {
                        let _ = writeln!(sink, "{}", line);
                    }
                    Err(_) => break,
                }
            }
        }
    });
    let err_reader = std::thread::spawn(move || {
        if let Some(stderr) = stderr {
            let mut sink = std::io::stderr().lock();
            for line in BufReader::new(stderr).lines() {
                match line {
                    Ok(line) => {
                        let _ = writeln!(sink, "{}", line);
                    }
                    Err(_) => break,
                }
            }
        }
    });

    // Join both readers before consuming the exit status; the reader threads
    // finish when the child closes its ends of the pipes.
    let status = child.wait();
    let _ = out_reader.join();
    let _ = err_reader.join();

    let duration_ms = t0.elapsed().as_secs_f64() * 1000.0;
    match &status {
        Ok(status) => {
            log::debug!(
                "[wtm-trace] cmd=\"{}\" dur={:.1}ms ok={}",
                cmd_str,
                duration_ms,
                status.success()
            );
        }
        Err(e) => {
            log::debug!(
                "[wtm-trace] cmd=\"{}\" dur={:.1}ms err=\"{}\"",
                cmd_str,
                duration_ms,
                e
            );
        }
    }

    status
}

fn render_command(cmd: &Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy()).collect();
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}
