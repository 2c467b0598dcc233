use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use auth_gateway::AuthPort;

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Settings the REST layer needs to build redirect targets.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Absolute base URL of the web app (no trailing slash required).
    pub public_base_url: String,
    /// Path the unknown-recipient accept flow redirects to.
    pub signup_path: String,
}

impl RestConfig {
    pub fn app_url(&self) -> &str {
        self.public_base_url.trim_end_matches('/')
    }
}

/// Builds the invitations router. Paths are relative so the host can nest
/// the whole module under a prefix such as `/api`.
pub fn router(service: Arc<Service>, auth: Arc<dyn AuthPort>, config: RestConfig) -> Router {
    Router::new()
        .route("/invitations", post(handlers::create_invitation))
        .route(
            "/invitations/accept/{token}",
            get(handlers::accept_invitation),
        )
        .route(
            "/invitations/decline/{token}",
            get(handlers::decline_invitation),
        )
        .route(
            "/invitations/partnerships",
            get(handlers::partnerships),
        )
        .route("/invitations/pending", get(handlers::pending_invitations))
        .layer(Extension(service))
        .layer(Extension(auth))
        .layer(Extension(Arc::new(config)))
}
