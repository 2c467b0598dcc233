use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{AcceptOutcome, PartnerView, PendingInvitations, SendReceipt};

/// Public API trait for the invitations module that other modules can use.
#[async_trait]
pub trait InvitationsApi: Send + Sync {
    /// Run the eligibility checks and create a pending invitation,
    /// sending the invitation email as a side effect.
    async fn send_invitation(
        &self,
        inviter_id: Uuid,
        invitee_email: &str,
    ) -> anyhow::Result<SendReceipt>;

    /// Accept an invitation by its bearer token.
    async fn accept_invitation(&self, token: &str) -> anyhow::Result<AcceptOutcome>;

    /// Decline an invitation by its bearer token.
    async fn decline_invitation(&self, token: &str) -> anyhow::Result<()>;

    /// Active partnerships for a user, partner profile resolved.
    async fn partnerships(&self, user_id: Uuid) -> anyhow::Result<Vec<PartnerView>>;

    /// Pending invitations sent and received by a user.
    async fn pending_invitations(&self, user_id: Uuid) -> anyhow::Result<PendingInvitations>;
}
