//! Local shell command runner for recon probes
//!
//! Probes hand a complete command line to a [`CommandRunner`] and get text back.
//! The runner never fails: a missing binary, a non-zero exit or a timeout is
//! folded into the returned text as an `Error: ...` line so evidence collection
//! can carry on with whatever the tool managed to print.

use std::borrow::Cow;
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Executes shell command lines and returns their combined output
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command line, returning stdout/stderr text or an inline error marker
    async fn run(&self, command: &str) -> String;
}

/// Captured result of a finished process
#[derive(Debug, Clone)]
pub struct ExecResult {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        }
    }
}

impl ExecResult {
    /// Get combined output
    pub fn output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }

    /// Combined output with an error marker appended for failed processes
    pub fn into_text(self) -> String {
        let output = self.output().trim_end_matches('\n').to_string();
        let marker = match self.exit_code {
            Some(0) => return output,
            Some(code) => format!("Error: command exited with status {code}"),
            None => "Error: command terminated by signal".to_string(),
        };

        if output.is_empty() {
            marker
        } else {
            format!("{output}\n{marker}")
        }
    }
}

/// Runs commands through `sh -c` on the local host
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
    timeout: Option<Duration>,
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellRunner {
    pub fn new() -> Self {
        Self {
            shell: "sh".to_string(),
            timeout: None,
        }
    }

    /// Kill commands that run longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a different POSIX shell binary
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    fn command(&self, command: &str) -> Command {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group, so a timeout can take down the whole pipeline
        #[cfg(unix)]
        cmd.process_group(0);
        cmd
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> String {
        debug!("Executing: {}", command);

        let child = match self.command(command).spawn() {
            Ok(child) => child,
            Err(e) => return format!("Error: failed to spawn {}: {}", self.shell, e),
        };
        let pid = child.id();

        let waited = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(waited) => waited,
                Err(_) => {
                    if let Some(pid) = pid {
                        kill_process_group(pid);
                    }
                    return format!("Error: command timed out after {}s", limit.as_secs_f32());
                }
            },
            None => child.wait_with_output().await,
        };

        match waited {
            Ok(output) => ExecResult::from(output).into_text(),
            Err(e) => format!("Error: failed to collect output: {}", e),
        }
    }
}

/// Kill every process left in the group led by `pid`
#[cfg(unix)]
fn kill_process_group(pid: u32) {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return;
    };
    if let Err(e) = signal::killpg(Pid::from_raw(raw), Signal::SIGKILL) {
        debug!("Process group {} already gone: {}", pid, e);
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: u32) {}

/// Quote a value for interpolation into a `sh -c` command line
///
/// Values made only of URL-safe characters pass through unchanged.
pub fn quote(value: &str) -> Cow<'_, str> {
    let is_safe = |c: char| c.is_ascii_alphanumeric() || "-_./:,@%+=".contains(c);
    if !value.is_empty() && value.chars().all(is_safe) {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("'{}'", value.replace('\'', "'\\''")))
    }
}
