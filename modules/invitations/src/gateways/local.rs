use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::InvitationsApi,
    error::InvitationsError,
    model::{AcceptOutcome, PartnerView, PendingInvitations, SendReceipt},
};
use crate::domain::{error::DomainError, service::Service};

/// Local implementation of the InvitationsApi trait that delegates to the
/// domain service.
pub struct InvitationsLocalClient {
    service: Arc<Service>,
}

impl InvitationsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl InvitationsApi for InvitationsLocalClient {
    async fn send_invitation(
        &self,
        inviter_id: Uuid,
        invitee_email: &str,
    ) -> anyhow::Result<SendReceipt> {
        self.service
            .create_invitation(inviter_id, invitee_email)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn accept_invitation(&self, token: &str) -> anyhow::Result<AcceptOutcome> {
        self.service
            .accept_invitation(token)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn decline_invitation(&self, token: &str) -> anyhow::Result<()> {
        self.service
            .decline_invitation(token)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn partnerships(&self, user_id: Uuid) -> anyhow::Result<Vec<PartnerView>> {
        self.service
            .partnerships(user_id)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn pending_invitations(&self, user_id: Uuid) -> anyhow::Result<PendingInvitations> {
        self.service
            .pending_invitations(user_id)
            .await
            .map_err(map_domain_error_to_anyhow)
    }
}

/// Map domain errors to contract errors wrapped in anyhow.
fn map_domain_error_to_anyhow(domain_error: DomainError) -> anyhow::Error {
    let contract_error = match domain_error {
        DomainError::SelfInvite
        | DomainError::QuotaExceeded { .. }
        | DomainError::AlreadyPartnered
        | DomainError::InvitationAlreadySent
        | DomainError::Validation { .. } => InvitationsError::rejected(domain_error.to_string()),
        DomainError::InvitationNotFound => InvitationsError::not_found(),
        DomainError::AlreadyProcessed { status } => InvitationsError::already_processed(status),
        DomainError::Expired => InvitationsError::Expired,
        DomainError::ProfileNotFound { .. }
        | DomainError::Store { .. }
        | DomainError::Notification { .. } => InvitationsError::internal(),
    };

    anyhow::Error::new(contract_error)
}
