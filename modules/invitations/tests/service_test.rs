//! Invitation lifecycle tests against an in-memory SQLite store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use invitations::contract::client::InvitationsApi;
use invitations::contract::error::InvitationsError;
use invitations::contract::model::{
    AcceptOutcome, Invitation, InvitationStatus, PartnershipStatus,
};
use invitations::domain::error::DomainError;
use invitations::gateways::InvitationsLocalClient;
use invitations::domain::ports::MailerPort;
use invitations::domain::repo::InvitationsRepository;
use invitations::domain::service::{Service, ServiceConfig};
use invitations::infra::storage::entity::{invitation, partnership, profile};
use invitations::infra::storage::migrations::Migrator;
use invitations::infra::storage::SeaOrmInvitationsRepository;

#[derive(Debug, Clone)]
struct SentMail {
    to: String,
    inviter_name: String,
    accept_url: String,
    decline_url: String,
}

#[derive(Default)]
struct MockMailer {
    fail: bool,
    sent: Mutex<Vec<SentMail>>,
}

impl MockMailer {
    fn failing() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailerPort for MockMailer {
    async fn send_invitation(
        &self,
        recipient_email: &str,
        inviter_name: &str,
        accept_url: &str,
        decline_url: &str,
    ) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::notification("mail provider down"));
        }
        self.sent.lock().unwrap().push(SentMail {
            to: recipient_email.to_string(),
            inviter_name: inviter_name.to_string(),
            accept_url: accept_url.to_string(),
            decline_url: decline_url.to_string(),
        });
        Ok(())
    }
}

struct TestEnv {
    db: DatabaseConnection,
    service: Service,
    mailer: Arc<MockMailer>,
}

async fn env_with_mailer(mailer: MockMailer) -> TestEnv {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("sqlite connect");
    Migrator::up(&db, None).await.expect("migrations");

    let repo = Arc::new(SeaOrmInvitationsRepository::new(db.clone()));
    let mailer = Arc::new(mailer);
    let service = Service::new(
        repo,
        mailer.clone(),
        ServiceConfig {
            public_base_url: "https://app.test".to_string(),
            expiry_days: 7,
        },
    );
    TestEnv {
        db,
        service,
        mailer,
    }
}

async fn env() -> TestEnv {
    env_with_mailer(MockMailer::default()).await
}

async fn seed_profile(db: &DatabaseConnection, email: &str, name: Option<&str>) -> Uuid {
    seed_profile_with_quota(db, email, name, None).await
}

async fn seed_profile_with_quota(
    db: &DatabaseConnection,
    email: &str,
    name: Option<&str>,
    max_partnerships: Option<i32>,
) -> Uuid {
    let id = Uuid::new_v4();
    profile::ActiveModel {
        id: Set(id),
        email: Set(email.to_string()),
        name: Set(name.map(|s| s.to_string())),
        profile_picture_url: Set(None),
        max_partnerships: Set(max_partnerships),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("seed profile");
    id
}

async fn seed_active_partnership(db: &DatabaseConnection, a: Uuid, b: Uuid) {
    partnership::ActiveModel {
        id: Set(Uuid::new_v4()),
        profile1_id: Set(a),
        profile2_id: Set(b),
        status: Set(PartnershipStatus::Active.as_str().to_string()),
        streak_days: Set(0),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("seed partnership");
}

async fn invitation_by_token(db: &DatabaseConnection, token: &str) -> invitation::Model {
    invitation::Entity::find()
        .filter(invitation::Column::Token.eq(token))
        .one(db)
        .await
        .expect("query invitation")
        .expect("invitation exists")
}

#[tokio::test]
async fn send_creates_pending_invitation_and_emails_links() {
    let env = env().await;
    let alice = seed_profile(&env.db, "alice@example.com", Some("Alice")).await;

    let receipt = env
        .service
        .create_invitation(alice, "bob@example.com")
        .await
        .expect("send");

    assert!(receipt.email_sent);
    let inv = &receipt.invitation;
    assert_eq!(inv.status, InvitationStatus::Pending);
    assert_eq!(inv.from_user_id, alice);
    assert_eq!(inv.to_user_id, None);
    assert_eq!(inv.to_user_email.as_deref(), Some("bob@example.com"));
    assert_eq!(inv.token.len(), 64);
    assert!(inv.token.chars().all(|c| c.is_ascii_hexdigit()));
    let expires = inv.expires_at.expect("expiry set");
    let days = (expires - inv.created_at).num_days();
    assert_eq!(days, 7);

    let sent = env.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "bob@example.com");
    assert_eq!(sent[0].inviter_name, "Alice");
    assert_eq!(
        sent[0].accept_url,
        format!("https://app.test/api/invitations/accept/{}", inv.token)
    );
    assert_eq!(
        sent[0].decline_url,
        format!("https://app.test/api/invitations/decline/{}", inv.token)
    );
}

#[tokio::test]
async fn registered_recipient_is_stored_by_id_not_email() {
    let env = env().await;
    let alice = seed_profile(&env.db, "alice@example.com", None).await;
    let bob = seed_profile(&env.db, "bob@example.com", None).await;

    let receipt = env
        .service
        .create_invitation(alice, "Bob@Example.COM")
        .await
        .expect("send");

    assert_eq!(receipt.invitation.to_user_id, Some(bob));
    assert_eq!(receipt.invitation.to_user_email, None);
}

#[tokio::test]
async fn self_invite_is_rejected_case_insensitively() {
    let env = env().await;
    let alice = seed_profile(&env.db, "alice@example.com", None).await;

    let err = env
        .service
        .create_invitation(alice, "ALICE@EXAMPLE.COM")
        .await
        .expect_err("must reject");
    assert!(matches!(err, DomainError::SelfInvite));
    assert!(env.mailer.sent().is_empty());
}

#[tokio::test]
async fn default_quota_is_one_partnership() {
    let env = env().await;
    let alice = seed_profile(&env.db, "alice@example.com", None).await;
    let carol = seed_profile(&env.db, "carol@example.com", None).await;
    seed_active_partnership(&env.db, alice, carol).await;

    let err = env
        .service
        .create_invitation(alice, "bob@example.com")
        .await
        .expect_err("quota");
    assert!(matches!(err, DomainError::QuotaExceeded { limit: 1 }));
}

#[tokio::test]
async fn quota_counts_both_orderings() {
    let env = env().await;
    let alice = seed_profile(&env.db, "alice@example.com", None).await;
    let carol = seed_profile(&env.db, "carol@example.com", None).await;
    // Alice is the second member of the pair here.
    seed_active_partnership(&env.db, carol, alice).await;

    let err = env
        .service
        .create_invitation(alice, "bob@example.com")
        .await
        .expect_err("quota");
    assert!(matches!(err, DomainError::QuotaExceeded { .. }));
}

#[tokio::test]
async fn raised_quota_admits_one_below_the_limit() {
    let env = env().await;
    let alice = seed_profile_with_quota(&env.db, "alice@example.com", None, Some(2)).await;
    let carol = seed_profile(&env.db, "carol@example.com", None).await;
    seed_active_partnership(&env.db, alice, carol).await;

    // One active partnership against a quota of two: still eligible.
    env.service
        .create_invitation(alice, "bob@example.com")
        .await
        .expect("one below the limit");
}

#[tokio::test]
async fn declined_invitation_does_not_block_a_resend() {
    let env = env().await;
    let alice = seed_profile(&env.db, "alice@example.com", None).await;
    seed_profile(&env.db, "bob@example.com", None).await;

    let receipt = env
        .service
        .create_invitation(alice, "bob@example.com")
        .await
        .expect("first send");
    env.service
        .decline_invitation(&receipt.invitation.token)
        .await
        .expect("decline");

    // The pending-uniqueness rule only applies to live invitations.
    env.service
        .create_invitation(alice, "bob@example.com")
        .await
        .expect("resend after decline");
}

#[tokio::test]
async fn existing_partnership_is_rejected_in_either_ordering() {
    let env = env().await;
    let alice = seed_profile_with_quota(&env.db, "alice@example.com", None, Some(5)).await;
    let bob = seed_profile_with_quota(&env.db, "bob@example.com", None, Some(5)).await;
    seed_active_partnership(&env.db, bob, alice).await;

    let err = env
        .service
        .create_invitation(alice, "bob@example.com")
        .await
        .expect_err("already partnered");
    assert!(matches!(err, DomainError::AlreadyPartnered));
}

#[tokio::test]
async fn duplicate_pending_invitation_is_rejected() {
    let env = env().await;
    let alice = seed_profile(&env.db, "alice@example.com", None).await;

    env.service
        .create_invitation(alice, "bob@example.com")
        .await
        .expect("first send");
    let err = env
        .service
        .create_invitation(alice, "bob@example.com")
        .await
        .expect_err("duplicate");
    assert!(matches!(err, DomainError::InvitationAlreadySent));
    assert_eq!(env.mailer.sent().len(), 1);
}

#[tokio::test]
async fn store_uniqueness_backstops_duplicate_inserts() {
    let env = env().await;
    let alice = seed_profile(&env.db, "alice@example.com", None).await;
    let repo = SeaOrmInvitationsRepository::new(env.db.clone());

    let make = |token: &str| Invitation {
        id: Uuid::new_v4(),
        token: token.to_string(),
        from_user_id: alice,
        to_user_id: None,
        to_user_email: Some("bob@example.com".to_string()),
        status: InvitationStatus::Pending,
        created_at: Utc::now(),
        expires_at: Some(Utc::now() + Duration::days(7)),
    };

    repo.insert_invitation(&make("a".repeat(64).as_str()))
        .await
        .expect("first insert");
    let err = repo
        .insert_invitation(&make("b".repeat(64).as_str()))
        .await
        .expect_err("unique index must reject");
    assert!(matches!(
        err,
        invitations::domain::repo::InsertInvitationError::DuplicatePending
    ));
}

#[tokio::test]
async fn mail_failure_keeps_invitation_and_reports_it() {
    let env = env_with_mailer(MockMailer::failing()).await;
    let alice = seed_profile(&env.db, "alice@example.com", None).await;

    let receipt = env
        .service
        .create_invitation(alice, "bob@example.com")
        .await
        .expect("send must still succeed");
    assert!(!receipt.email_sent);

    let stored = invitation_by_token(&env.db, &receipt.invitation.token).await;
    assert_eq!(stored.status, "pending");
}

#[tokio::test]
async fn accept_creates_partnership_and_flips_status() {
    let env = env().await;
    let alice = seed_profile(&env.db, "alice@example.com", None).await;
    let bob = seed_profile(&env.db, "bob@example.com", None).await;

    let receipt = env
        .service
        .create_invitation(alice, "bob@example.com")
        .await
        .expect("send");

    let outcome = env
        .service
        .accept_invitation(&receipt.invitation.token)
        .await
        .expect("accept");
    let partnership = match outcome {
        AcceptOutcome::Completed(p) => p,
        other => panic!("expected completed partnership, got {other:?}"),
    };
    assert_eq!(partnership.profile1_id, alice);
    assert_eq!(partnership.profile2_id, bob);
    assert_eq!(partnership.status, PartnershipStatus::Active);

    let stored = invitation_by_token(&env.db, &receipt.invitation.token).await;
    assert_eq!(stored.status, "accepted");
}

#[tokio::test]
async fn accept_twice_reports_already_accepted_without_second_partnership() {
    let env = env().await;
    let alice = seed_profile(&env.db, "alice@example.com", None).await;
    seed_profile(&env.db, "bob@example.com", None).await;

    let receipt = env
        .service
        .create_invitation(alice, "bob@example.com")
        .await
        .expect("send");
    env.service
        .accept_invitation(&receipt.invitation.token)
        .await
        .expect("first accept");

    let err = env
        .service
        .accept_invitation(&receipt.invitation.token)
        .await
        .expect_err("second accept");
    assert!(matches!(
        err,
        DomainError::AlreadyProcessed {
            status: InvitationStatus::Accepted
        }
    ));

    let partnerships = partnership::Entity::find()
        .all(&env.db)
        .await
        .expect("query partnerships");
    assert_eq!(partnerships.len(), 1);
}

#[tokio::test]
async fn accept_for_unknown_recipient_defers_to_signup() {
    let env = env().await;
    let alice = seed_profile(&env.db, "alice@example.com", None).await;

    let receipt = env
        .service
        .create_invitation(alice, "stranger@example.com")
        .await
        .expect("send");

    let outcome = env
        .service
        .accept_invitation(&receipt.invitation.token)
        .await
        .expect("accept");
    match outcome {
        AcceptOutcome::NeedsSignup { token, email } => {
            assert_eq!(token, receipt.invitation.token);
            assert_eq!(email, "stranger@example.com");
        }
        other => panic!("expected signup deferral, got {other:?}"),
    }

    // Still pending: the same token works again after signup.
    let stored = invitation_by_token(&env.db, &receipt.invitation.token).await;
    assert_eq!(stored.status, "pending");

    // After the recipient registers, the same link completes.
    seed_profile(&env.db, "stranger@example.com", None).await;
    let outcome = env
        .service
        .accept_invitation(&receipt.invitation.token)
        .await
        .expect("accept after signup");
    assert!(matches!(outcome, AcceptOutcome::Completed(_)));
}

#[tokio::test]
async fn decline_flips_status_and_creates_no_partnership() {
    let env = env().await;
    let alice = seed_profile(&env.db, "alice@example.com", None).await;
    seed_profile(&env.db, "bob@example.com", None).await;

    let receipt = env
        .service
        .create_invitation(alice, "bob@example.com")
        .await
        .expect("send");
    env.service
        .decline_invitation(&receipt.invitation.token)
        .await
        .expect("decline");

    let stored = invitation_by_token(&env.db, &receipt.invitation.token).await;
    assert_eq!(stored.status, "declined");
    let partnerships = partnership::Entity::find()
        .all(&env.db)
        .await
        .expect("query partnerships");
    assert!(partnerships.is_empty());

    let err = env
        .service
        .accept_invitation(&receipt.invitation.token)
        .await
        .expect_err("accept after decline");
    assert!(matches!(
        err,
        DomainError::AlreadyProcessed {
            status: InvitationStatus::Declined
        }
    ));
}

#[tokio::test]
async fn unknown_token_is_not_found() {
    let env = env().await;
    let err = env
        .service
        .accept_invitation("deadbeef")
        .await
        .expect_err("unknown token");
    assert!(matches!(err, DomainError::InvitationNotFound));
}

#[tokio::test]
async fn expired_invitation_cannot_be_accepted_or_declined() {
    let env = env().await;
    let alice = seed_profile(&env.db, "alice@example.com", None).await;
    seed_profile(&env.db, "bob@example.com", None).await;
    let repo = SeaOrmInvitationsRepository::new(env.db.clone());

    let token = "c".repeat(64);
    let stale = Invitation {
        id: Uuid::new_v4(),
        token: token.clone(),
        from_user_id: alice,
        to_user_id: None,
        to_user_email: Some("bob@example.com".to_string()),
        status: InvitationStatus::Pending,
        created_at: Utc::now() - Duration::days(10),
        expires_at: Some(Utc::now() - Duration::days(3)),
    };
    repo.insert_invitation(&stale).await.expect("insert");

    let err = env
        .service
        .accept_invitation(&token)
        .await
        .expect_err("expired accept");
    assert!(matches!(err, DomainError::Expired));
    let err = env
        .service
        .decline_invitation(&token)
        .await
        .expect_err("expired decline");
    assert!(matches!(err, DomainError::Expired));
}

#[tokio::test]
async fn partnerships_listing_resolves_the_partner_side() {
    let env = env().await;
    let alice = seed_profile(&env.db, "alice@example.com", Some("Alice")).await;
    let bob = seed_profile(&env.db, "bob@example.com", Some("Bob")).await;
    seed_active_partnership(&env.db, alice, bob).await;

    let for_alice = env.service.partnerships(alice).await.expect("list");
    assert_eq!(for_alice.len(), 1);
    assert_eq!(for_alice[0].partner.id, bob);
    assert_eq!(for_alice[0].partner.name.as_deref(), Some("Bob"));

    let for_bob = env.service.partnerships(bob).await.expect("list");
    assert_eq!(for_bob.len(), 1);
    assert_eq!(for_bob[0].partner.id, alice);
}

#[tokio::test]
async fn pending_listing_matches_email_invites_case_insensitively() {
    let env = env().await;
    let alice = seed_profile(&env.db, "alice@example.com", Some("Alice")).await;
    let repo = SeaOrmInvitationsRepository::new(env.db.clone());

    // Email-only invite sent before Bob registered, with different casing.
    let inv = Invitation {
        id: Uuid::new_v4(),
        token: "d".repeat(64),
        from_user_id: alice,
        to_user_id: None,
        to_user_email: Some("BOB@Example.com".to_string()),
        status: InvitationStatus::Pending,
        created_at: Utc::now(),
        expires_at: Some(Utc::now() + Duration::days(7)),
    };
    repo.insert_invitation(&inv).await.expect("insert");
    let bob = seed_profile(&env.db, "bob@example.com", Some("Bob")).await;

    let for_bob = env.service.pending_invitations(bob).await.expect("pending");
    assert!(for_bob.sent.is_empty());
    assert_eq!(for_bob.received.len(), 1);
    assert_eq!(for_bob.received[0].invitation.id, inv.id);
    assert_eq!(
        for_bob.received[0].peer.as_ref().map(|p| p.id),
        Some(alice)
    );

    let for_alice = env
        .service
        .pending_invitations(alice)
        .await
        .expect("pending");
    assert_eq!(for_alice.sent.len(), 1);
    assert!(for_alice.received.is_empty());
}

#[tokio::test]
async fn local_client_maps_domain_errors_to_contract_errors() {
    let env = env().await;
    let alice = seed_profile(&env.db, "alice@example.com", Some("Alice")).await;
    let client = InvitationsLocalClient::new(Arc::new(env.service.clone()));

    let err = client
        .send_invitation(alice, "alice@example.com")
        .await
        .expect_err("self invite");
    assert!(matches!(
        err.downcast_ref::<InvitationsError>(),
        Some(InvitationsError::Rejected { .. })
    ));

    let err = client
        .accept_invitation(&"e".repeat(64))
        .await
        .expect_err("unknown token");
    assert!(matches!(
        err.downcast_ref::<InvitationsError>(),
        Some(InvitationsError::NotFound)
    ));

    let receipt = client
        .send_invitation(alice, "bob@example.com")
        .await
        .expect("send");
    client
        .decline_invitation(&receipt.invitation.token)
        .await
        .expect("decline");
    let err = client
        .accept_invitation(&receipt.invitation.token)
        .await
        .expect_err("already declined");
    assert!(matches!(
        err.downcast_ref::<InvitationsError>(),
        Some(InvitationsError::AlreadyProcessed {
            status: InvitationStatus::Declined
        })
    ));
}
