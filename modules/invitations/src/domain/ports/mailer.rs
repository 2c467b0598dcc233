use async_trait::async_trait;

use crate::domain::error::DomainError;

/// Output port for the invitation email. Delivery is delegated to an
/// external transactional-email provider; a failure here never rolls back
/// the already-created invitation.
#[async_trait]
pub trait MailerPort: Send + Sync {
    async fn send_invitation(
        &self,
        recipient_email: &str,
        inviter_name: &str,
        accept_url: &str,
        decline_url: &str,
    ) -> Result<(), DomainError>;
}
