//! commit-assist - Generate conventional commit messages from working-tree changes.
//!
//! # Overview
//!
//! commit-assist reads the staged diff of a local git repository (falling back
//! to unstaged changes), asks an OpenAI-compatible chat-completions API for a
//! conventional commit message, and can commit it for you.

pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod session;

// Re-export commonly used types
pub use config::{Config, ConfigOverrides, resolve_credential};
pub use error::{ConfigError, FailureKind, GenerationError, GitError, InputField, WorkflowError};
pub use git::{CommitSummary, GitGateway, VcsGateway};
pub use llm::{CompletionClient, MessageGenerator};
pub use session::{Action, Credential, Outcome, Session, Workflow, WorkflowState};
