//! Interactive session: state held between user actions and the workflow
//! that drives the git gateway and the message generator.

pub mod state;
pub mod workflow;

pub use state::{Action, Credential, Session, WorkflowState};
pub use workflow::{Outcome, Workflow};
