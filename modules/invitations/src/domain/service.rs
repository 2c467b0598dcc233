use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::contract::model::{
    AcceptOutcome, Invitation, InvitationStatus, InviteeRef, PartnerView, PendingInvitations,
    Profile, SendReceipt,
};
use crate::domain::error::DomainError;
use crate::domain::ports::MailerPort;
use crate::domain::repo::{InsertInvitationError, InvitationsRepository, MaterializeError};
use crate::domain::token::generate_token;

/// Domain service for the invitation lifecycle: eligibility checks,
/// invitation creation, and partnership materialization. Depends only on
/// the repository and mailer ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn InvitationsRepository>,
    mailer: Arc<dyn MailerPort>,
    config: ServiceConfig,
}

/// Configuration for the domain service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Absolute base URL used to build accept/decline links.
    pub public_base_url: String,
    /// Days until a pending invitation expires.
    pub expiry_days: i64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            public_base_url: "http://localhost:3000".to_string(),
            expiry_days: 7,
        }
    }
}

/// The self-invite invariant, centralized: one predicate invoked at every
/// decision point instead of scattered inline comparisons. It must hold
/// under partially-resolved data, so it checks whichever representations
/// are available: resolved id, and email (case-insensitive).
fn is_self_invite(inviter: &Profile, invitee_id: Option<Uuid>, invitee_email: Option<&str>) -> bool {
    if invitee_id == Some(inviter.id) {
        return true;
    }
    matches!(invitee_email, Some(email) if email.eq_ignore_ascii_case(&inviter.email))
}

impl Service {
    pub fn new(
        repo: Arc<dyn InvitationsRepository>,
        mailer: Arc<dyn MailerPort>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            mailer,
            config,
        }
    }

    /// Run the six eligibility checks in order, create the invitation, and
    /// send the invitation email. Email delivery is reported in the receipt
    /// rather than rolling anything back.
    #[instrument(
        name = "invitations.service.create_invitation",
        skip(self),
        fields(inviter_id = %inviter_id)
    )]
    pub async fn create_invitation(
        &self,
        inviter_id: Uuid,
        invitee_email: &str,
    ) -> Result<SendReceipt, DomainError> {
        let invitee_email = invitee_email.trim();
        if invitee_email.is_empty() {
            return Err(DomainError::validation("invitee_email is required"));
        }

        let inviter = self
            .repo
            .find_profile(inviter_id)
            .await
            .map_err(|e| DomainError::store(e.to_string()))?
            .ok_or_else(|| DomainError::profile_not_found(inviter_id))?;

        // Check 1: self-invite by email.
        if is_self_invite(&inviter, None, Some(invitee_email)) {
            return Err(DomainError::SelfInvite);
        }

        // Check 2: partnership quota.
        let active = self
            .repo
            .count_active_partnerships(inviter_id)
            .await
            .map_err(|e| DomainError::store(e.to_string()))?;
        let quota = inviter.partnership_quota();
        if active >= quota {
            return Err(DomainError::quota_exceeded(quota));
        }

        // Check 3: resolve the invitee. Absence means an email-only invite.
        let invitee = self
            .repo
            .find_profile_by_email(invitee_email)
            .await
            .map_err(|e| DomainError::store(e.to_string()))?;

        if let Some(invitee) = &invitee {
            // Check 4: self-invite by resolved id.
            if is_self_invite(&inviter, Some(invitee.id), Some(invitee_email)) {
                return Err(DomainError::SelfInvite);
            }

            // Check 5: duplicate active partnership, either ordering.
            let existing = self
                .repo
                .active_partnership_between(inviter_id, invitee.id)
                .await
                .map_err(|e| DomainError::store(e.to_string()))?;
            if existing.is_some() {
                return Err(DomainError::AlreadyPartnered);
            }
        }

        // Check 6: duplicate pending invitation, by id when resolved.
        let recipient = match &invitee {
            Some(p) => InviteeRef::Id(p.id),
            None => InviteeRef::Email(invitee_email.to_string()),
        };
        let pending = self
            .repo
            .pending_invitation_exists(inviter_id, &recipient)
            .await
            .map_err(|e| DomainError::store(e.to_string()))?;
        if pending {
            return Err(DomainError::InvitationAlreadySent);
        }

        let now = Utc::now();
        let invitation = Invitation {
            id: Uuid::new_v4(),
            token: generate_token(),
            from_user_id: inviter_id,
            to_user_id: invitee.as_ref().map(|p| p.id),
            to_user_email: match &invitee {
                Some(_) => None,
                None => Some(invitee_email.to_string()),
            },
            status: InvitationStatus::Pending,
            created_at: now,
            expires_at: Some(now + Duration::days(self.config.expiry_days)),
        };

        // Final guard immediately before the insert: the invariant must hold
        // even if identity data went stale between the checks above.
        if is_self_invite(
            &inviter,
            invitation.to_user_id,
            invitation.to_user_email.as_deref(),
        ) {
            return Err(DomainError::SelfInvite);
        }

        match self.repo.insert_invitation(&invitation).await {
            Ok(()) => {}
            // The partial unique index is the authoritative duplicate check.
            Err(InsertInvitationError::DuplicatePending) => {
                return Err(DomainError::InvitationAlreadySent)
            }
            Err(InsertInvitationError::Other(e)) => return Err(DomainError::store(e.to_string())),
        }
        info!(invitation_id = %invitation.id, "Invitation created");

        let accept_url = self.invitation_url("accept", &invitation.token);
        let decline_url = self.invitation_url("decline", &invitation.token);
        let email_sent = match self
            .mailer
            .send_invitation(
                invitee_email,
                &inviter.display_name(),
                &accept_url,
                &decline_url,
            )
            .await
        {
            Ok(()) => true,
            Err(e) => {
                // The invitation stays; the receipt carries the send outcome.
                warn!(invitation_id = %invitation.id, error = %e, "Invitation email failed");
                false
            }
        };

        Ok(SendReceipt {
            invitation,
            email_sent,
        })
    }

    /// Accept an invitation by token: fetch, status/expiry checks, invitee
    /// resolution, then transactional materialization.
    #[instrument(name = "invitations.service.accept_invitation", skip_all)]
    pub async fn accept_invitation(&self, token: &str) -> Result<AcceptOutcome, DomainError> {
        let invitation = self.fetch_pending(token).await?;

        // Resolve the invitee: stored id first, then lookup by email.
        let invitee_id = match invitation.to_user_id {
            Some(id) => Some(id),
            None => match &invitation.to_user_email {
                Some(email) => self
                    .repo
                    .find_profile_by_email(email)
                    .await
                    .map_err(|e| DomainError::store(e.to_string()))?
                    .map(|p| p.id),
                None => None,
            },
        };

        let Some(invitee_id) = invitee_id else {
            // Recipient never signed up: no partnership. The caller routes
            // them through account creation and replays the same token.
            let email = invitation.to_user_email.clone().unwrap_or_default();
            debug!("Invitee unknown, deferring acceptance until signup");
            return Ok(AcceptOutcome::NeedsSignup {
                token: invitation.token,
                email,
            });
        };

        let inviter = self
            .repo
            .find_profile(invitation.from_user_id)
            .await
            .map_err(|e| DomainError::store(e.to_string()))?
            .ok_or_else(|| DomainError::profile_not_found(invitation.from_user_id))?;

        // The invariant holds at every point new identity data appears.
        if is_self_invite(&inviter, Some(invitee_id), invitation.to_user_email.as_deref()) {
            return Err(DomainError::SelfInvite);
        }

        let partnership = match self
            .repo
            .materialize(invitation.id, invitation.from_user_id, invitee_id)
            .await
        {
            Ok(p) => p,
            Err(MaterializeError::NoLongerPending) => {
                return Err(self.current_processed_state(token).await)
            }
            Err(MaterializeError::Other(e)) => return Err(DomainError::store(e.to_string())),
        };

        info!(partnership_id = %partnership.id, "Partnership materialized");
        Ok(AcceptOutcome::Completed(partnership))
    }

    /// Decline an invitation by token. No partnership is created.
    #[instrument(name = "invitations.service.decline_invitation", skip_all)]
    pub async fn decline_invitation(&self, token: &str) -> Result<(), DomainError> {
        let invitation = self.fetch_pending(token).await?;

        let declined = self
            .repo
            .decline_if_pending(invitation.id)
            .await
            .map_err(|e| DomainError::store(e.to_string()))?;
        if !declined {
            // Lost a race against a concurrent accept/decline.
            return Err(self.current_processed_state(token).await);
        }

        info!(invitation_id = %invitation.id, "Invitation declined");
        Ok(())
    }

    #[instrument(name = "invitations.service.partnerships", skip(self), fields(user_id = %user_id))]
    pub async fn partnerships(&self, user_id: Uuid) -> Result<Vec<PartnerView>, DomainError> {
        self.repo
            .list_partnerships(user_id)
            .await
            .map_err(|e| DomainError::store(e.to_string()))
    }

    #[instrument(name = "invitations.service.pending", skip(self), fields(user_id = %user_id))]
    pub async fn pending_invitations(
        &self,
        user_id: Uuid,
    ) -> Result<PendingInvitations, DomainError> {
        let profile = self
            .repo
            .find_profile(user_id)
            .await
            .map_err(|e| DomainError::store(e.to_string()))?
            .ok_or_else(|| DomainError::profile_not_found(user_id))?;

        self.repo
            .list_pending(user_id, &profile.email)
            .await
            .map_err(|e| DomainError::store(e.to_string()))
    }

    /// Shared steps 1-3 of accept/decline: existence, status, expiry.
    async fn fetch_pending(&self, token: &str) -> Result<Invitation, DomainError> {
        let invitation = self
            .repo
            .find_by_token(token)
            .await
            .map_err(|e| DomainError::store(e.to_string()))?
            .ok_or(DomainError::InvitationNotFound)?;

        if invitation.status != InvitationStatus::Pending {
            return Err(DomainError::already_processed(invitation.status));
        }
        if invitation.is_expired(Utc::now()) {
            return Err(DomainError::Expired);
        }
        Ok(invitation)
    }

    /// After a conditional write touched zero rows, re-read the invitation
    /// to report the actual terminal status.
    async fn current_processed_state(&self, token: &str) -> DomainError {
        match self.repo.find_by_token(token).await {
            Ok(Some(inv)) => DomainError::already_processed(inv.status),
            Ok(None) => DomainError::InvitationNotFound,
            Err(e) => DomainError::store(e.to_string()),
        }
    }

    fn invitation_url(&self, action: &str, token: &str) -> String {
        format!(
            "{}/api/invitations/{}/{}",
            self.config.public_base_url.trim_end_matches('/'),
            action,
            token
        )
    }
}
