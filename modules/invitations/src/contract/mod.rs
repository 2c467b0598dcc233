pub mod client;
pub mod error;
pub mod model;

pub use error::InvitationsError;
pub use model::{
    AcceptOutcome, Invitation, InvitationStatus, InvitationWithPeer, InviteeRef, PartnerProfile,
    PartnerView, Partnership, PartnershipStatus, PendingInvitations, Profile, SendReceipt,
};
