use std::sync::Arc;

use api_problem::ProblemResponse;
use axum::extract::Path;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Extension, Json};
use tracing::instrument;

use auth_gateway::CurrentUser;

use crate::api::rest::dto::{
    CreateInvitationRequest, CreateInvitationResponse, InvitationSummaryDto,
    PartnershipsResponse, PendingInvitationsResponse,
};
use crate::api::rest::error::{html_from_domain, problem_from_domain};
use crate::api::rest::routes::RestConfig;
use crate::contract::model::AcceptOutcome;
use crate::domain::service::Service;

/// `POST /invitations` - create an invitation and email the recipient.
#[instrument(name = "invitations.api.create", skip_all, fields(user_id = %user.id))]
pub async fn create_invitation(
    Extension(service): Extension<Arc<Service>>,
    user: CurrentUser,
    Json(req): Json<CreateInvitationRequest>,
) -> Result<Json<CreateInvitationResponse>, ProblemResponse> {
    let invitee_email = req.invitee_email.trim().to_string();
    let receipt = service
        .create_invitation(user.id, &invitee_email)
        .await
        .map_err(problem_from_domain)?;

    let message = if receipt.email_sent {
        "Invitation sent successfully".to_string()
    } else {
        "Invitation created but the email could not be sent".to_string()
    };
    Ok(Json(CreateInvitationResponse {
        success: true,
        message,
        invitation: InvitationSummaryDto {
            id: receipt.invitation.id,
            to_user_email: invitee_email,
            status: receipt.invitation.status.as_str().to_string(),
        },
    }))
}

/// `GET /invitations/accept/{token}` - browser-facing accept link.
///
/// Unauthenticated; possession of the token authorizes the transition.
#[instrument(name = "invitations.api.accept", skip_all)]
pub async fn accept_invitation(
    Extension(service): Extension<Arc<Service>>,
    Extension(config): Extension<Arc<RestConfig>>,
    Path(token): Path<String>,
) -> Response {
    match service.accept_invitation(&token).await {
        Ok(AcceptOutcome::Completed(_)) => {
            Redirect::to(&format!("{}?partnership_accepted=true", config.app_url())).into_response()
        }
        Ok(AcceptOutcome::NeedsSignup { token, email }) => Redirect::to(&format!(
            "{}{}?invitation={}&email={}",
            config.app_url(),
            config.signup_path,
            token,
            urlencoding::encode(&email)
        ))
        .into_response(),
        Err(err) => html_from_domain(err),
    }
}

/// `GET /invitations/decline/{token}` - browser-facing decline link.
#[instrument(name = "invitations.api.decline", skip_all)]
pub async fn decline_invitation(
    Extension(service): Extension<Arc<Service>>,
    Path(token): Path<String>,
) -> Response {
    match service.decline_invitation(&token).await {
        Ok(()) => Html(
            r#"<html>
  <head><style>body { font-family: Arial; text-align: center; padding: 50px; }</style></head>
  <body>
    <h1>Invitation Declined</h1>
    <p>You have declined the partnership invitation.</p>
  </body>
</html>"#,
        )
        .into_response(),
        Err(err) => html_from_domain(err),
    }
}

/// `GET /invitations/partnerships` - active partnerships of the caller.
#[instrument(name = "invitations.api.partnerships", skip_all, fields(user_id = %user.id))]
pub async fn partnerships(
    Extension(service): Extension<Arc<Service>>,
    user: CurrentUser,
) -> Result<Json<PartnershipsResponse>, ProblemResponse> {
    let views = service
        .partnerships(user.id)
        .await
        .map_err(problem_from_domain)?;
    Ok(Json(PartnershipsResponse {
        partnerships: views.into_iter().map(Into::into).collect(),
    }))
}

/// `GET /invitations/pending` - pending invitations, sent and received.
#[instrument(name = "invitations.api.pending", skip_all, fields(user_id = %user.id))]
pub async fn pending_invitations(
    Extension(service): Extension<Arc<Service>>,
    user: CurrentUser,
) -> Result<Json<PendingInvitationsResponse>, ProblemResponse> {
    let pending = service
        .pending_invitations(user.id)
        .await
        .map_err(problem_from_domain)?;
    Ok(Json(pending.into()))
}
