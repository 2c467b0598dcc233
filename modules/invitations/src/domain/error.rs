use thiserror::Error;
use uuid::Uuid;

use crate::contract::model::InvitationStatus;

/// Domain-specific errors for the invitation lifecycle.
///
/// Business-rule rejections (`SelfInvite` .. `InvitationAlreadySent`) are
/// detected before any mutating call; store and notification failures are
/// unexpected and map to HTTP 500.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("You cannot invite yourself")]
    SelfInvite,

    #[error("Maximum partnerships reached")]
    QuotaExceeded { limit: u64 },

    #[error("Partnership already exists")]
    AlreadyPartnered,

    #[error("Invitation already sent")]
    InvitationAlreadySent,

    #[error("Invitation not found")]
    InvitationNotFound,

    #[error("Invitation already {status}")]
    AlreadyProcessed { status: InvitationStatus },

    #[error("Invitation has expired")]
    Expired,

    #[error("Profile not found: {id}")]
    ProfileNotFound { id: Uuid },

    #[error("{message}")]
    Validation { message: String },

    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Notification error: {message}")]
    Notification { message: String },
}

impl DomainError {
    pub fn quota_exceeded(limit: u64) -> Self {
        Self::QuotaExceeded { limit }
    }

    pub fn already_processed(status: InvitationStatus) -> Self {
        Self::AlreadyProcessed { status }
    }

    pub fn profile_not_found(id: Uuid) -> Self {
        Self::ProfileNotFound { id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    pub fn notification(message: impl Into<String>) -> Self {
        Self::Notification {
            message: message.into(),
        }
    }
}
