use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Identity record maintained by the external auth/profile system.
/// Immutable id; name and email are editable by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub profile_picture_url: Option<String>,
    /// Active-partnership quota; treated as 1 when unset.
    pub max_partnerships: Option<i32>,
}

impl Profile {
    /// Display name for outgoing emails: profile name, else the local part
    /// of the email, else "Someone".
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref() {
            if !name.trim().is_empty() {
                return name.to_string();
            }
        }
        match self.email.split('@').next() {
            Some(local) if !local.is_empty() => local.to_string(),
            _ => "Someone".to_string(),
        }
    }

    pub fn partnership_quota(&self) -> u64 {
        self.max_partnerships.map(|n| n.max(0) as u64).unwrap_or(1)
    }

    /// The subset of the profile other users may see.
    pub fn partner_profile(&self) -> PartnerProfile {
        PartnerProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            profile_picture_url: self.profile_picture_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "declined" => Some(Self::Declined),
            _ => None,
        }
    }
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token-bearing record proposing a partnership between two identities.
///
/// Exactly one of `to_user_id` / `to_user_email` is set at creation;
/// `to_user_id` is filled in lazily once the recipient is a known identity.
/// Status moves pending -> accepted|declined and never reverses; records are
/// never deleted (audit trail).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    pub id: Uuid,
    /// Unguessable bearer credential (32 random bytes, hex-encoded) that
    /// authorizes the accept/decline transition without authentication.
    pub token: String,
    pub from_user_id: Uuid,
    pub to_user_id: Option<Uuid>,
    pub to_user_email: Option<String>,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Invitation {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(at) if at < now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartnershipStatus {
    Active,
    Archived,
}

impl PartnershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// An accepted, ongoing pairing between two identities. The pair is
/// unordered: (profile1, profile2) and (profile2, profile1) are the same
/// partnership for every lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partnership {
    pub id: Uuid,
    pub profile1_id: Uuid,
    pub profile2_id: Uuid,
    pub status: PartnershipStatus,
    pub streak_days: i32,
    pub created_at: DateTime<Utc>,
}

impl Partnership {
    /// The other member of the pair, from `user_id`'s point of view.
    pub fn partner_of(&self, user_id: Uuid) -> Uuid {
        if self.profile1_id == user_id {
            self.profile2_id
        } else {
            self.profile1_id
        }
    }
}

/// Recipient reference before the invitee is necessarily a known identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InviteeRef {
    Id(Uuid),
    Email(String),
}

/// Public subset of a profile shown to the partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerProfile {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub profile_picture_url: Option<String>,
}

/// A partnership seen from one member's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerView {
    pub partnership_id: Uuid,
    pub partner: PartnerProfile,
    pub created_at: DateTime<Utc>,
    pub streak_days: i32,
}

/// An invitation joined with the profile on the other end, when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationWithPeer {
    pub invitation: Invitation,
    pub peer: Option<PartnerProfile>,
}

#[derive(Debug, Clone, Default)]
pub struct PendingInvitations {
    pub sent: Vec<InvitationWithPeer>,
    pub received: Vec<InvitationWithPeer>,
}

/// Outcome of following an accept link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// Partnership created, invitation flipped to accepted.
    Completed(Partnership),
    /// The recipient has no identity yet; route them through signup and
    /// replay the same token afterwards.
    NeedsSignup { token: String, email: String },
}

/// Result of sending an invitation. Creation and email delivery are
/// reported separately: a failed send does not roll back the invitation.
#[derive(Debug, Clone)]
pub struct SendReceipt {
    pub invitation: Invitation,
    pub email_sent: bool,
}
