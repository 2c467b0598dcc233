use anyhow::{anyhow, Result};

use crate::contract::model::{
    Invitation, InvitationStatus, Partnership, PartnershipStatus, Profile,
};
use crate::infra::storage::entity::{invitation, partnership, profile};

pub fn profile_from_entity(m: profile::Model) -> Profile {
    Profile {
        id: m.id,
        name: m.name,
        email: m.email,
        profile_picture_url: m.profile_picture_url,
        max_partnerships: m.max_partnerships,
    }
}

pub fn partnership_from_entity(m: partnership::Model) -> Result<Partnership> {
    let status = PartnershipStatus::parse(&m.status)
        .ok_or_else(|| anyhow!("unknown partnership status '{}'", m.status))?;
    Ok(Partnership {
        id: m.id,
        profile1_id: m.profile1_id,
        profile2_id: m.profile2_id,
        status,
        streak_days: m.streak_days,
        created_at: m.created_at,
    })
}

pub fn invitation_from_entity(m: invitation::Model) -> Result<Invitation> {
    let status = InvitationStatus::parse(&m.status)
        .ok_or_else(|| anyhow!("unknown invitation status '{}'", m.status))?;
    Ok(Invitation {
        id: m.id,
        token: m.token,
        from_user_id: m.from_user_id,
        to_user_id: m.to_user_id,
        to_user_email: m.to_user_email,
        status,
        created_at: m.created_at,
        expires_at: m.expires_at,
    })
}
