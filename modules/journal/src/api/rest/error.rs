//! Domain error -> problem document mapping for the journal surface.

use api_problem::{bad_request, conflict, forbidden, internal_error, not_found, ProblemResponse};
use tracing::error;

use crate::domain::error::DomainError;

pub fn problem_from_domain(err: DomainError) -> ProblemResponse {
    match err {
        DomainError::PartnershipNotFound
        | DomainError::QuestionNotFound { .. }
        | DomainError::AnswerNotFound { .. }
        | DomainError::CheckinNotFound { .. }
        | DomainError::NoQuestionsAvailable => not_found(err.to_string()),
        DomainError::NotAMember | DomainError::NotAnswerOwner | DomainError::NotCheckinOwner => {
            forbidden(err.to_string())
        }
        DomainError::AnswerExists | DomainError::CheckinExists => conflict(err.to_string()),
        DomainError::Validation { .. } => bad_request(err.to_string()),
        DomainError::Store { message } => {
            error!(%message, "journal operation failed");
            internal_error("Failed to process request")
        }
    }
}
