use thiserror::Error;

/// Errors the journal module exposes to other modules.
#[derive(Error, Debug)]
pub enum JournalError {
    #[error("{message}")]
    Rejected { message: String },

    #[error("Not found")]
    NotFound,

    #[error("Not allowed")]
    Forbidden,

    #[error("Already exists")]
    Conflict,

    #[error("Internal error")]
    Internal,
}

impl JournalError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}
