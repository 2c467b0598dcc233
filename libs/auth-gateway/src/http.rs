//! Bearer-token verification against the external auth provider.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::{AuthError, AuthPort, AuthUser};

/// Resolves bearer tokens by calling the provider's `GET /auth/v1/user`
/// endpoint. Any failure (network, non-2xx, malformed body) collapses to
/// `AuthError::Unauthorized`; the detail is logged, not returned.
pub struct HttpAuthGateway {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

#[derive(Deserialize)]
struct ProviderUser {
    id: Uuid,
    email: String,
}

impl HttpAuthGateway {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            anon_key: anon_key.into(),
        }
    }
}

#[async_trait]
impl AuthPort for HttpAuthGateway {
    async fn authenticate(&self, bearer_token: &str) -> Result<AuthUser, AuthError> {
        let url = format!("{}/auth/v1/user", self.base_url.trim_end_matches('/'));
        let resp = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {bearer_token}"))
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| {
                debug!(error = %e, "auth provider request failed");
                AuthError::unauthorized(format!("auth provider unreachable: {e}"))
            })?;

        if !resp.status().is_success() {
            debug!(status = %resp.status(), "auth provider rejected token");
            return Err(AuthError::unauthorized(format!(
                "auth provider returned {}",
                resp.status()
            )));
        }

        let user: ProviderUser = resp.json().await.map_err(|e| {
            debug!(error = %e, "auth provider returned malformed user payload");
            AuthError::unauthorized(format!("malformed user payload: {e}"))
        })?;

        Ok(AuthUser {
            id: user.id,
            email: user.email,
        })
    }
}
