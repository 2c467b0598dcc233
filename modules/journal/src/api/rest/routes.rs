use std::sync::Arc;

use auth_gateway::AuthPort;
use axum::routing::{get, post, put};
use axum::{Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Builds the journal router. Paths are relative so the host can nest the
/// whole module under a prefix such as `/api`.
pub fn router(service: Arc<Service>, auth: Arc<dyn AuthPort>) -> Router {
    Router::new()
        .route(
            "/journal/partnerships/{id}/daily-question",
            get(handlers::daily_question),
        )
        .route("/journal/answers", post(handlers::submit_answer))
        .route("/journal/answers/{id}", put(handlers::update_answer))
        .route("/journal/answers/skip", post(handlers::skip_question))
        .route("/journal/moods/today", get(handlers::todays_mood))
        .route("/journal/moods", post(handlers::submit_mood))
        .route("/journal/moods/{id}", put(handlers::update_mood))
        .route("/journal/moods/history", get(handlers::mood_history))
        .layer(Extension(service))
        .layer(Extension(auth))
}
