use serde::{Deserialize, Serialize};

/// Configuration for the invitations module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InvitationsConfig {
    /// Days until a pending invitation expires.
    #[serde(default = "default_expiry_days")]
    pub expiry_days: i64,
    /// Path (relative to the public base URL) the unknown-recipient accept
    /// flow redirects to.
    #[serde(default = "default_signup_path")]
    pub signup_path: String,
}

impl Default for InvitationsConfig {
    fn default() -> Self {
        Self {
            expiry_days: default_expiry_days(),
            signup_path: default_signup_path(),
        }
    }
}

fn default_expiry_days() -> i64 {
    7
}

fn default_signup_path() -> String {
    "/signup".to_string()
}
