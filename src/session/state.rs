//! Session data and workflow states.

use std::fmt;

/// API key for the completion service. Never printed by `Debug`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("Credential(<empty>)")
        } else {
            f.write_str("Credential(***)")
        }
    }
}

/// Interaction state retained across user actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    repository_path: String,
    credential: Credential,
    last_diff: String,
    last_message: String,
}

impl Session {
    pub fn new(repository_path: impl Into<String>, credential: Credential) -> Self {
        Self {
            repository_path: repository_path.into(),
            credential,
            ..Default::default()
        }
    }

    pub fn repository_path(&self) -> &str {
        &self.repository_path
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn last_diff(&self) -> &str {
        &self.last_diff
    }

    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    pub(crate) fn set_repository_path(&mut self, path: impl Into<String>) {
        self.repository_path = path.into();
    }

    pub(crate) fn set_credential(&mut self, credential: Credential) {
        self.credential = credential;
    }

    pub(crate) fn store_diff(&mut self, diff: String) {
        self.last_diff = diff;
        self.last_message.clear();
    }

    pub(crate) fn store_message(&mut self, message: String) {
        self.last_message = message;
    }

    /// Forget the diff and message, keeping the inputs.
    pub(crate) fn clear_generated(&mut self) {
        self.last_diff.clear();
        self.last_message.clear();
    }
}

/// Where the workflow is between user actions.
///
/// `Diffing`, `Generating` and `Committing` are only held while an external
/// call is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    Diffing,
    Generating,
    Ready,
    Committing,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::Diffing => "collecting the diff",
            WorkflowState::Generating => "generating a message",
            WorkflowState::Ready => "ready",
            WorkflowState::Committing => "committing",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-triggered action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Generate,
    Refresh,
    Commit,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Generate => "generate",
            Action::Refresh => "refresh",
            Action::Commit => "commit",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("sk-test");
        assert_eq!(format!("{:?}", credential), "Credential(***)");
        assert_eq!(credential.expose(), "sk-test");

        let session = Session::new("/tmp/repo", credential);
        assert!(!format!("{:?}", session).contains("sk-test"));
    }

    #[test]
    fn test_credential_trims_input() {
        assert!(Credential::new("   ").is_empty());
        assert_eq!(Credential::new(" sk-1 \n").expose(), "sk-1");
    }

    #[test]
    fn test_store_diff_drops_stale_message() {
        let mut session = Session::new("/tmp/repo", Credential::new("k"));
        session.store_diff("diff one".into());
        session.store_message("feat: one".into());
        session.store_diff("diff two".into());
        assert_eq!(session.last_diff(), "diff two");
        assert_eq!(session.last_message(), "");
    }

    #[test]
    fn test_clear_generated_keeps_inputs() {
        let mut session = Session::new("/tmp/repo", Credential::new("k"));
        session.store_diff("diff".into());
        session.store_message("fix: x".into());
        session.clear_generated();
        assert_eq!(session.last_diff(), "");
        assert_eq!(session.last_message(), "");
        assert_eq!(session.repository_path(), "/tmp/repo");
        assert_eq!(session.credential().expose(), "k");
    }
}
