//! Identity gateway shared by every module with a bearer-authenticated
//! surface: the port, the HTTP implementation against the external auth
//! provider, and the axum extractor.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub mod extract;
pub mod http;

pub use extract::CurrentUser;
pub use http::HttpAuthGateway;

/// Caller identity resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

#[derive(Error, Debug)]
pub enum AuthError {
    /// Missing/malformed header or provider rejection. The reason stays
    /// server-side; callers only see a 401.
    #[error("Invalid token")]
    Unauthorized { reason: String },
}

impl AuthError {
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }
}

/// Identity gateway: validates a bearer credential against the external
/// auth provider. Read-only, no side effects.
#[async_trait]
pub trait AuthPort: Send + Sync {
    async fn authenticate(&self, bearer_token: &str) -> Result<AuthUser, AuthError>;
}
