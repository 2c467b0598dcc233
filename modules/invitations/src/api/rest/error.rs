//! Domain error -> HTTP mapping.
//!
//! JSON endpoints get RFC 9457 problem documents; the accept/decline link
//! endpoints are opened from an email client and render plain HTML instead.

use api_problem::{bad_request, internal_error, not_found, ProblemResponse};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::error;

use crate::domain::error::DomainError;

pub fn problem_from_domain(err: DomainError) -> ProblemResponse {
    match err {
        DomainError::SelfInvite
        | DomainError::QuotaExceeded { .. }
        | DomainError::AlreadyPartnered
        | DomainError::InvitationAlreadySent
        | DomainError::Expired
        | DomainError::Validation { .. }
        | DomainError::AlreadyProcessed { .. } => bad_request(err.to_string()),
        DomainError::InvitationNotFound => not_found(err.to_string()),
        DomainError::ProfileNotFound { .. } => not_found(err.to_string()),
        DomainError::Store { message } | DomainError::Notification { message } => {
            error!(%message, "invitation operation failed");
            internal_error("Failed to process invitation")
        }
    }
}

/// HTML rendition for the browser-facing link endpoints.
pub fn html_from_domain(err: DomainError) -> Response {
    match err {
        DomainError::InvitationNotFound => {
            (StatusCode::NOT_FOUND, Html("<h1>Invitation not found</h1>".to_string()))
                .into_response()
        }
        DomainError::AlreadyProcessed { status } => (
            StatusCode::BAD_REQUEST,
            Html(format!("<h1>Invitation already {status}</h1>")),
        )
            .into_response(),
        DomainError::Expired => (
            StatusCode::BAD_REQUEST,
            Html("<h1>Invitation has expired</h1>".to_string()),
        )
            .into_response(),
        other => {
            error!(error = %other, "invitation link handling failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Error processing invitation</h1>".to_string()),
            )
                .into_response()
        }
    }
}
