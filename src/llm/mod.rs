//! Commit message generation through a chat-completions API.

pub mod client;
pub mod prompt;

pub use client::{CompletionClient, MessageGenerator};
pub use prompt::{MAX_DIFF_LENGTH, build_commit_prompt};
