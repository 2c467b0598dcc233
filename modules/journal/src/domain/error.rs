use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors for journal operations.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Partnership not found")]
    PartnershipNotFound,

    #[error("You are not a member of this partnership")]
    NotAMember,

    #[error("Question not found: {id}")]
    QuestionNotFound { id: Uuid },

    #[error("Answer not found: {id}")]
    AnswerNotFound { id: Uuid },

    #[error("You can only edit your own answers")]
    NotAnswerOwner,

    #[error("You have already answered this question")]
    AnswerExists,

    #[error("Mood check-in not found: {id}")]
    CheckinNotFound { id: Uuid },

    #[error("You can only edit your own check-ins")]
    NotCheckinOwner,

    #[error("You have already checked in today")]
    CheckinExists,

    #[error("No questions available for assignment")]
    NoQuestionsAvailable,

    #[error("{message}")]
    Validation { message: String },

    #[error("Store error: {message}")]
    Store { message: String },
}

impl DomainError {
    pub fn question_not_found(id: Uuid) -> Self {
        Self::QuestionNotFound { id }
    }

    pub fn answer_not_found(id: Uuid) -> Self {
        Self::AnswerNotFound { id }
    }

    pub fn checkin_not_found(id: Uuid) -> Self {
        Self::CheckinNotFound { id }
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
}
