//! git subprocess spawning.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::config::DEFAULT_GIT_TIMEOUT_SECS;
use crate::error::GitError;

/// A single `git` invocation scoped to a working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInvocation {
    pub dir: PathBuf,
    pub args: Vec<String>,
    /// Bytes written to the child's standard input, if any.
    pub stdin: Option<String>,
}

impl GitInvocation {
    pub fn new(dir: impl Into<PathBuf>, args: &[&str]) -> Self {
        Self {
            dir: dir.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            stdin: None,
        }
    }

    pub fn with_stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// The subcommand name, used in logs and timeout errors.
    pub fn operation(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or("")
    }
}

/// Captured result of a finished `git` process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    /// The diagnostic to show the user: stderr, or stdout when git wrote
    /// its complaint there (e.g. "nothing to commit").
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.code {
            Some(code) => format!("git exited with code {code}"),
            None => "git was terminated by a signal".to_string(),
        }
    }
}

/// Trait for running git commands.
///
/// This abstraction allows mocking the git subprocess in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Run git and capture its output. Only spawn failures and timeouts are
    /// errors; a non-zero exit is reported through [`GitOutput::success`].
    async fn run(&self, invocation: GitInvocation) -> Result<GitOutput, GitError>;
}

/// Runner that calls the system `git` binary.
#[derive(Debug, Clone)]
pub struct SystemGit {
    timeout: Duration,
}

impl SystemGit {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_GIT_TIMEOUT_SECS))
    }
}

#[async_trait]
impl GitRunner for SystemGit {
    async fn run(&self, invocation: GitInvocation) -> Result<GitOutput, GitError> {
        debug!(
            "git {} (cwd: {})",
            invocation.args.join(" "),
            invocation.dir.display()
        );

        let operation = invocation.operation().to_string();

        timeout(self.timeout, spawn_and_wait(invocation))
            .await
            .map_err(|_| GitError::Timeout {
                operation,
                timeout: self.timeout,
            })?
    }
}

async fn spawn_and_wait(invocation: GitInvocation) -> Result<GitOutput, GitError> {
    let mut cmd = Command::new("git");
    cmd.args(&invocation.args)
        .current_dir(&invocation.dir)
        .stdin(if invocation.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(GitError::SpawnFailed)?;

    if let Some(input) = invocation.stdin
        && let Some(mut stdin) = child.stdin.take()
    {
        stdin
            .write_all(input.as_bytes())
            .await
            .map_err(GitError::SpawnFailed)?;
        // Dropping the handle closes the pipe so git sees EOF.
        drop(stdin);
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(GitError::SpawnFailed)?;

    debug!("git exited with {:?}", output.status.code());

    Ok(GitOutput {
        success: output.status.success(),
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Check that a `git` executable is installed and runnable.
pub async fn check_git_installed() -> Result<(), GitError> {
    if which::which("git").is_err() {
        return Err(GitError::NotInstalled);
    }

    let version_check = Command::new("git")
        .arg("--version")
        .output()
        .await
        .map_err(GitError::SpawnFailed)?;

    if !version_check.status.success() {
        return Err(GitError::NotInstalled);
    }

    Ok(())
}
