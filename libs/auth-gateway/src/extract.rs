//! Bearer-token extractor for authenticated JSON endpoints.

use std::sync::Arc;

use api_problem::{internal_error, unauthorized, ProblemResponse};
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;
use uuid::Uuid;

use crate::{AuthError, AuthPort};

/// The authenticated caller, resolved through the `AuthPort` installed as
/// an `Extension<Arc<dyn AuthPort>>`. Rejection is always a 401 problem
/// document; token-verification detail never leaves the server.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let gateway = parts
            .extensions
            .get::<Arc<dyn AuthPort>>()
            .cloned()
            .ok_or_else(|| internal_error("identity gateway is not configured"))?;

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| unauthorized("Missing or invalid authorization header"))?;

        match gateway.authenticate(token).await {
            Ok(user) => Ok(CurrentUser {
                id: user.id,
                email: user.email,
            }),
            Err(AuthError::Unauthorized { reason }) => {
                debug!(%reason, "bearer token rejected");
                Err(unauthorized("Invalid token"))
            }
        }
    }
}
