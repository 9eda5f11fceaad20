//! Error types for commit-assist modules using thiserror.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::session::{Action, WorkflowState};

/// Errors from git subprocess operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git executable not found. Install git and make sure it is on your PATH")]
    NotInstalled,

    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("'{}' is not a valid Git repository", .0.display())]
    NotARepository(PathBuf),

    /// Both the staged and the working-tree diff were empty.
    #[error("No changes detected in this repository")]
    NoChanges,

    #[error("Failed to get git diff: {stderr}")]
    DiffCommandFailed { stderr: String },

    #[error("Commit failed: {0}")]
    CommitFailed(String),

    #[error("Failed to spawn git process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("git {operation} timed out after {timeout:?}")]
    Timeout { operation: String, timeout: Duration },
}

impl GitError {
    /// Whether this is an empty result rather than a real failure.
    pub fn is_benign(&self) -> bool {
        matches!(self, GitError::NoChanges)
    }
}

/// Errors from the chat-completions API.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Request to completion API failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Completion API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Completion API timed out after {0:?}")]
    Timeout(Duration),

    #[error("Completion API returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error("Completion API returned no message content")]
    EmptyResponse,
}

/// Errors from configuration resolution.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f32),

    #[error("Max tokens must be greater than zero")]
    InvalidMaxTokens,

    #[error("Base URL must start with http:// or https://, got '{0}'")]
    InvalidBaseUrl(String),
}

/// An input the user must supply before any external call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    RepositoryPath,
    Credential,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputField::RepositoryPath => write!(f, "repository path"),
            InputField::Credential => write!(f, "API key"),
        }
    }
}

/// Errors surfaced by the session workflow.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Please enter your {0}")]
    MissingInput(InputField),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error("Failed to generate commit message: {0}")]
    Generation(#[from] GenerationError),

    #[error("'{action}' is not available while the session is {state}")]
    ActionUnavailable {
        action: Action,
        state: WorkflowState,
    },
}

/// Flat failure taxonomy shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MissingInput,
    PathNotFound,
    NotARepository,
    NoChangesDetected,
    GitUnavailable,
    DiffCommandFailed,
    GenerationFailed,
    CommitFailed,
    Timeout,
    ActionUnavailable,
}

impl WorkflowError {
    pub fn kind(&self) -> FailureKind {
        match self {
            WorkflowError::MissingInput(_) => FailureKind::MissingInput,
            WorkflowError::ActionUnavailable { .. } => FailureKind::ActionUnavailable,
            WorkflowError::Generation(GenerationError::Timeout(_)) => FailureKind::Timeout,
            WorkflowError::Generation(_) => FailureKind::GenerationFailed,
            WorkflowError::Git(err) => match err {
                GitError::PathNotFound(_) => FailureKind::PathNotFound,
                GitError::NotARepository(_) => FailureKind::NotARepository,
                GitError::NoChanges => FailureKind::NoChangesDetected,
                GitError::CommitFailed(_) => FailureKind::CommitFailed,
                GitError::Timeout { .. } => FailureKind::Timeout,
                GitError::NotInstalled => FailureKind::GitUnavailable,
                // The gateway folds commit-side spawn failures into
                // `CommitFailed`, so any left here came from diffing.
                GitError::DiffCommandFailed { .. } | GitError::SpawnFailed(_) => {
                    FailureKind::DiffCommandFailed
                }
            },
        }
    }
}
