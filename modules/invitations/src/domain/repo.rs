use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::contract::model::{
    Invitation, InviteeRef, PartnerView, Partnership, PendingInvitations, Profile,
};

/// Insert failure split so the service can treat a store-level uniqueness
/// violation as the authoritative "invitation already sent" answer. The
/// pre-check in the service is only a fast path; under concurrent sends the
/// partial unique index decides.
#[derive(Error, Debug)]
pub enum InsertInvitationError {
    #[error("a pending invitation for this recipient already exists")]
    DuplicatePending,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Materialization failure: the accepted-row guard inside the transaction
/// lost a race against a concurrent accept/decline.
#[derive(Error, Debug)]
pub enum MaterializeError {
    #[error("invitation is no longer pending")]
    NoLongerPending,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Port for the domain layer: every read/write the invitation lifecycle
/// needs against the external store. Object-safe via `async_trait`.
///
/// No caching: every operation re-reads state as needed.
#[async_trait]
pub trait InvitationsRepository: Send + Sync {
    async fn find_profile(&self, id: Uuid) -> anyhow::Result<Option<Profile>>;

    /// Case-insensitive lookup of an identity by email. Absence is not an
    /// error; it means an email-only (pre-signup) invitation.
    async fn find_profile_by_email(&self, email: &str) -> anyhow::Result<Option<Profile>>;

    /// Number of active partnerships the profile participates in, counting
    /// both orderings of the pair.
    async fn count_active_partnerships(&self, profile_id: Uuid) -> anyhow::Result<u64>;

    /// Active partnership between two identities, in either ordering.
    async fn active_partnership_between(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> anyhow::Result<Option<Partnership>>;

    /// Pending invitation from `from` to the given recipient reference.
    async fn pending_invitation_exists(
        &self,
        from: Uuid,
        to: &InviteeRef,
    ) -> anyhow::Result<bool>;

    /// Persist a fully-formed invitation. The service computes id, token,
    /// timestamps and status; the repo only persists.
    async fn insert_invitation(&self, invitation: &Invitation)
        -> Result<(), InsertInvitationError>;

    async fn find_by_token(&self, token: &str) -> anyhow::Result<Option<Invitation>>;

    /// Flip a pending invitation to declined. The UPDATE is guarded by
    /// `status = 'pending'`; returns false when no row changed.
    async fn decline_if_pending(&self, invitation_id: Uuid) -> anyhow::Result<bool>;

    /// Create the partnership and mark the invitation accepted in a single
    /// transaction, so an accepted invitation always corresponds to exactly
    /// one partnership.
    async fn materialize(
        &self,
        invitation_id: Uuid,
        inviter_id: Uuid,
        invitee_id: Uuid,
    ) -> Result<Partnership, MaterializeError>;

    /// Active partnerships for a profile with the partner side resolved.
    async fn list_partnerships(&self, profile_id: Uuid) -> anyhow::Result<Vec<PartnerView>>;

    /// Pending invitations sent by the profile and received by it (matched
    /// by id or by the profile's email), peers resolved where known.
    async fn list_pending(
        &self,
        profile_id: Uuid,
        email: &str,
    ) -> anyhow::Result<PendingInvitations>;
}
