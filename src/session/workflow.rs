//! The generate / refresh / commit state machine.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::error::{GenerationError, InputField, WorkflowError};
use crate::git::{CommitSummary, VcsGateway};
use crate::llm::MessageGenerator;

use super::state::{Action, Credential, Session, WorkflowState};

/// What a successful action produced, for the UI host to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A fresh message is stored and the session is `Ready`.
    Generated { message: String },
    /// The repository has nothing to commit. Not an error.
    NoChanges,
    /// The commit landed; any displayed diff is stale.
    Committed(CommitSummary),
}

/// Owns the session and sequences the gateway and the generator.
pub struct Workflow<G, M> {
    gateway: G,
    generator: M,
    session: Session,
    state: WorkflowState,
}

impl<G: VcsGateway, M: MessageGenerator> Workflow<G, M> {
    pub fn new(gateway: G, generator: M) -> Self {
        Self::with_session(gateway, generator, Session::default())
    }

    pub fn with_session(gateway: G, generator: M, session: Session) -> Self {
        Self {
            gateway,
            generator,
            session,
            state: WorkflowState::Idle,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn set_repository_path(&mut self, path: impl Into<String>) {
        self.session.set_repository_path(path);
    }

    pub fn set_credential(&mut self, credential: Credential) {
        self.session.set_credential(credential);
    }

    /// Actions the UI should currently offer.
    pub fn available_actions(&self) -> &'static [Action] {
        match self.state {
            WorkflowState::Ready => &[Action::Generate, Action::Refresh, Action::Commit],
            _ => &[Action::Generate],
        }
    }

    /// Route a user action to its transition.
    pub async fn dispatch(&mut self, action: Action) -> Result<Outcome, WorkflowError> {
        debug!("Dispatching '{}' in state {:?}", action, self.state);
        match action {
            Action::Generate => self.on_generate().await,
            Action::Refresh => self.on_refresh().await,
            Action::Commit => self.on_commit().await,
        }
    }

    /// Fetch the diff and generate a message for it.
    pub async fn on_generate(&mut self) -> Result<Outcome, WorkflowError> {
        let path = self.require_inputs()?;
        self.diff_and_generate(path).await
    }

    /// Re-fetch the diff and generate a new message. Only valid when `Ready`.
    ///
    /// Never reuses the stored message, even if the diff is unchanged.
    pub async fn on_refresh(&mut self) -> Result<Outcome, WorkflowError> {
        self.require_ready(Action::Refresh)?;
        let path = self.require_inputs()?;
        self.diff_and_generate(path).await
    }

    /// Commit the stored message. Only valid when `Ready`.
    ///
    /// On failure the session stays `Ready` with the message intact.
    pub async fn on_commit(&mut self) -> Result<Outcome, WorkflowError> {
        self.require_ready(Action::Commit)?;
        let path = self.require_inputs()?;

        self.transition(WorkflowState::Committing);
        match self
            .gateway
            .commit(&path, self.session.last_message())
            .await
        {
            Ok(summary) => {
                self.session.clear_generated();
                self.transition(WorkflowState::Idle);
                info!("Committed: {}", summary.output);
                Ok(Outcome::Committed(summary))
            }
            Err(e) => {
                warn!("Commit failed: {}", e);
                self.transition(WorkflowState::Ready);
                Err(e.into())
            }
        }
    }

    async fn diff_and_generate(&mut self, path: PathBuf) -> Result<Outcome, WorkflowError> {
        self.transition(WorkflowState::Diffing);

        let diff = match self.gateway.fetch_diff(&path).await {
            Ok(diff) => diff,
            Err(e) => {
                self.session.clear_generated();
                self.transition(WorkflowState::Idle);
                if e.is_benign() {
                    info!("No changes in {}", path.display());
                    return Ok(Outcome::NoChanges);
                }
                warn!("Diff failed: {}", e);
                return Err(e.into());
            }
        };

        self.session.store_diff(diff);
        self.transition(WorkflowState::Generating);

        let generated = self
            .generator
            .generate(self.session.last_diff(), self.session.credential().expose())
            .await
            .and_then(|message| {
                let message = message.trim().to_string();
                if message.is_empty() {
                    Err(GenerationError::EmptyResponse)
                } else {
                    Ok(message)
                }
            });

        match generated {
            Ok(message) => {
                self.session.store_message(message.clone());
                self.transition(WorkflowState::Ready);
                Ok(Outcome::Generated { message })
            }
            Err(e) => {
                warn!("Generation failed: {}", e);
                self.transition(WorkflowState::Idle);
                Err(e.into())
            }
        }
    }

    /// Credential and repository path must both be present.
    fn require_inputs(&self) -> Result<PathBuf, WorkflowError> {
        if self.session.credential().is_empty() {
            return Err(WorkflowError::MissingInput(InputField::Credential));
        }
        let path = self.session.repository_path().trim();
        if path.is_empty() {
            return Err(WorkflowError::MissingInput(InputField::RepositoryPath));
        }
        Ok(PathBuf::from(path))
    }

    fn require_ready(&self, action: Action) -> Result<(), WorkflowError> {
        if self.state != WorkflowState::Ready {
            return Err(WorkflowError::ActionUnavailable {
                action,
                state: self.state,
            });
        }
        Ok(())
    }

    fn transition(&mut self, next: WorkflowState) {
        debug!("Workflow {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
