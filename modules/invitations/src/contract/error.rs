use thiserror::Error;

use crate::contract::model::InvitationStatus;

/// Errors that are safe to expose to other modules.
#[derive(Error, Debug, Clone)]
pub enum InvitationsError {
    /// A business-rule rejection with a caller-actionable message.
    #[error("{message}")]
    Rejected { message: String },

    #[error("Invitation not found")]
    NotFound,

    #[error("Invitation already {status}")]
    AlreadyProcessed { status: InvitationStatus },

    #[error("Invitation has expired")]
    Expired,

    #[error("Internal error")]
    Internal,
}

impl InvitationsError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn already_processed(status: InvitationStatus) -> Self {
        Self::AlreadyProcessed { status }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}
