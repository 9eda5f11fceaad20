//! Repository validation, diff acquisition and commit via the git CLI.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::GitError;

use super::runner::{GitInvocation, GitOutput, GitRunner, SystemGit};

/// Plain patch text regardless of `color.ui` or `diff.external` settings.
const STAGED_DIFF_ARGS: &[&str] = &["diff", "--cached", "--no-color", "--no-ext-diff"];
const UNSTAGED_DIFF_ARGS: &[&str] = &["diff", "--no-color", "--no-ext-diff"];

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    /// Trimmed stdout of `git commit`, e.g. `[main 1a2b3c4] feat: add x`.
    pub output: String,
}

/// Version-control operations needed by the session workflow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VcsGateway: Send + Sync {
    /// Ensure `path` exists and lies inside a git working tree.
    async fn check_repository(&self, path: &Path) -> Result<(), GitError>;

    /// Staged diff, or the working-tree diff when nothing is staged.
    ///
    /// Returns `GitError::NoChanges` when both are empty.
    async fn fetch_diff(&self, path: &Path) -> Result<String, GitError>;

    /// Stage everything and commit with `message` as the full message.
    async fn commit(&self, path: &Path, message: &str) -> Result<CommitSummary, GitError>;
}

/// [`VcsGateway`] backed by a [`GitRunner`].
#[derive(Debug, Clone, Default)]
pub struct GitGateway<R = SystemGit> {
    runner: R,
}

impl<R: GitRunner> GitGateway<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    async fn run(&self, path: &Path, args: &[&str]) -> Result<GitOutput, GitError> {
        self.runner.run(GitInvocation::new(path, args)).await
    }

    /// Run a diff subcommand and return its trimmed output.
    async fn diff(&self, path: &Path, args: &[&str]) -> Result<String, GitError> {
        let output = self.run(path, args).await?;
        if !output.success {
            return Err(GitError::DiffCommandFailed {
                stderr: output.diagnostic(),
            });
        }
        Ok(output.stdout.trim().to_string())
    }
}

#[async_trait]
impl<R: GitRunner> VcsGateway for GitGateway<R> {
    async fn check_repository(&self, path: &Path) -> Result<(), GitError> {
        if !path.exists() {
            return Err(GitError::PathNotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(GitError::NotARepository(path.to_path_buf()));
        }

        let output = self
            .run(path, &["rev-parse", "--is-inside-work-tree"])
            .await?;

        // Inside `.git` itself rev-parse succeeds but prints "false".
        if !output.success || output.stdout.trim() != "true" {
            debug!("rev-parse rejected {}: {}", path.display(), output.diagnostic());
            return Err(GitError::NotARepository(path.to_path_buf()));
        }

        Ok(())
    }

    async fn fetch_diff(&self, path: &Path) -> Result<String, GitError> {
        self.check_repository(path).await?;

        let staged = self.diff(path, STAGED_DIFF_ARGS).await?;
        if !staged.is_empty() {
            debug!("Using staged diff ({} chars)", staged.len());
            return Ok(staged);
        }

        let unstaged = self.diff(path, UNSTAGED_DIFF_ARGS).await?;
        if unstaged.is_empty() {
            return Err(GitError::NoChanges);
        }

        debug!("Nothing staged, using working-tree diff ({} chars)", unstaged.len());
        Ok(unstaged)
    }

    async fn commit(&self, path: &Path, message: &str) -> Result<CommitSummary, GitError> {
        let staged = self
            .run(path, &["add", "--all"])
            .await
            .map_err(commit_error)?;
        if !staged.success {
            return Err(GitError::CommitFailed(staged.diagnostic()));
        }

        let committed = self
            .runner
            .run(GitInvocation::new(path, &["commit", "--file=-"]).with_stdin(message))
            .await
            .map_err(commit_error)?;
        if !committed.success {
            return Err(GitError::CommitFailed(committed.diagnostic()));
        }

        let output = committed.stdout.trim().to_string();
        info!("Created commit in {}", path.display());
        Ok(CommitSummary { output })
    }
}

/// Runner failures during commit are commit failures; timeouts keep their kind.
fn commit_error(err: GitError) -> GitError {
    match err {
        GitError::Timeout { .. } | GitError::CommitFailed(_) => err,
        other => GitError::CommitFailed(other.to_string()),
    }
}
