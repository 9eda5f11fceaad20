//! git CLI integration.

pub mod gateway;
pub mod runner;

pub use gateway::{CommitSummary, GitGateway, VcsGateway};
pub use runner::{GitInvocation, GitOutput, GitRunner, SystemGit, check_git_installed};
