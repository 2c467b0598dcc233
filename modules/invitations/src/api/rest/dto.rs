//! Wire types for the invitations REST surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{
    InvitationWithPeer, PartnerProfile, PartnerView, PendingInvitations,
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(title = "CreateInvitationRequest")]
pub struct CreateInvitationRequest {
    /// Email address of the person to invite.
    pub invitee_email: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(title = "CreateInvitationResponse")]
pub struct CreateInvitationResponse {
    pub success: bool,
    pub message: String,
    pub invitation: InvitationSummaryDto,
}

/// Minimal invitation echo returned to the sender. The token is omitted;
/// it travels only inside the email.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(title = "InvitationSummary")]
pub struct InvitationSummaryDto {
    pub id: Uuid,
    pub to_user_email: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(title = "PartnerProfile")]
pub struct PartnerProfileDto {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub profile_picture_url: Option<String>,
}

impl From<PartnerProfile> for PartnerProfileDto {
    fn from(p: PartnerProfile) -> Self {
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
            profile_picture_url: p.profile_picture_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(title = "Partnership")]
pub struct PartnershipDto {
    pub partnership_id: Uuid,
    pub partner: PartnerProfileDto,
    pub created_at: DateTime<Utc>,
    pub streak_days: i32,
}

impl From<PartnerView> for PartnershipDto {
    fn from(v: PartnerView) -> Self {
        Self {
            partnership_id: v.partnership_id,
            partner: v.partner.into(),
            created_at: v.created_at,
            streak_days: v.streak_days,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(title = "PartnershipsResponse")]
pub struct PartnershipsResponse {
    pub partnerships: Vec<PartnershipDto>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(title = "PendingInvitation")]
pub struct PendingInvitationDto {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Option<Uuid>,
    pub to_user_email: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Profile on the other end of this invitation, when known.
    pub peer: Option<PartnerProfileDto>,
}

impl From<InvitationWithPeer> for PendingInvitationDto {
    fn from(v: InvitationWithPeer) -> Self {
        Self {
            id: v.invitation.id,
            from_user_id: v.invitation.from_user_id,
            to_user_id: v.invitation.to_user_id,
            to_user_email: v.invitation.to_user_email,
            status: v.invitation.status.as_str().to_string(),
            created_at: v.invitation.created_at,
            expires_at: v.invitation.expires_at,
            peer: v.peer.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(title = "PendingInvitationsResponse")]
pub struct PendingInvitationsResponse {
    pub sent: Vec<PendingInvitationDto>,
    pub received: Vec<PendingInvitationDto>,
}

impl From<PendingInvitations> for PendingInvitationsResponse {
    fn from(p: PendingInvitations) -> Self {
        Self {
            sent: p.sent.into_iter().map(Into::into).collect(),
            received: p.received.into_iter().map(Into::into).collect(),
        }
    }
}
