//! Journal lifecycle tests against an in-memory SQLite store.

use std::sync::Arc;

use chrono::{Days, Utc};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema, Set,
};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use journal::contract::client::JournalApi;
use journal::contract::error::JournalError;
use journal::contract::model::Visibility;
use journal::domain::error::DomainError;
use journal::domain::service::Service;
use journal::gateways::JournalLocalClient;
use journal::infra::storage::entity::{partnership, question, question_assignment};
use journal::infra::storage::migrations::Migrator;
use journal::infra::storage::SeaOrmJournalRepository;

struct TestEnv {
    db: DatabaseConnection,
    service: Service,
}

async fn env() -> TestEnv {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("sqlite connect");
    Migrator::up(&db, None).await.expect("migrations");

    // The partnerships table belongs to another module's migrations; tests
    // recreate the columns journal reads.
    let schema = Schema::new(db.get_database_backend());
    let stmt = schema.create_table_from_entity(partnership::Entity);
    db.execute(db.get_database_backend().build(&stmt))
        .await
        .expect("create partnerships table");

    let repo = Arc::new(SeaOrmJournalRepository::new(db.clone()));
    let service = Service::new(repo);
    TestEnv { db, service }
}

async fn seed_partnership(db: &DatabaseConnection, a: Uuid, b: Uuid) -> Uuid {
    let id = Uuid::new_v4();
    partnership::ActiveModel {
        id: Set(id),
        profile1_id: Set(a),
        profile2_id: Set(b),
        status: Set("active".to_string()),
    }
    .insert(db)
    .await
    .expect("seed partnership");
    id
}

#[tokio::test]
async fn daily_question_is_assigned_once_per_day() {
    let env = env().await;
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    let pid = seed_partnership(&env.db, alice, bob).await;

    let first = env
        .service
        .daily_question(pid, alice)
        .await
        .expect("first call");
    // The partner asking later the same day sees the same deal.
    let second = env
        .service
        .daily_question(pid, bob)
        .await
        .expect("second call");
    assert_eq!(first.assignment.id, second.assignment.id);
    assert_eq!(first.question.id, second.question.id);

    let assignments = question_assignment::Entity::find()
        .all(&env.db)
        .await
        .expect("query assignments");
    assert_eq!(assignments.len(), 1);
}

#[tokio::test]
async fn daily_question_requires_membership() {
    let env = env().await;
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    let pid = seed_partnership(&env.db, alice, bob).await;

    let err = env
        .service
        .daily_question(pid, Uuid::new_v4())
        .await
        .expect_err("outsider");
    assert!(matches!(err, DomainError::NotAMember));

    let err = env
        .service
        .daily_question(Uuid::new_v4(), alice)
        .await
        .expect_err("unknown partnership");
    assert!(matches!(err, DomainError::PartnershipNotFound));
}

#[tokio::test]
async fn empty_question_pool_is_reported() {
    let env = env().await;
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    let pid = seed_partnership(&env.db, alice, bob).await;

    question::Entity::delete_many()
        .exec(&env.db)
        .await
        .expect("clear questions");

    let err = env
        .service
        .daily_question(pid, alice)
        .await
        .expect_err("no questions");
    assert!(matches!(err, DomainError::NoQuestionsAvailable));
}

#[tokio::test]
async fn both_answers_appear_but_skips_stay_private() {
    let env = env().await;
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    let pid = seed_partnership(&env.db, alice, bob).await;

    let daily = env.service.daily_question(pid, alice).await.expect("deal");
    let qid = daily.question.id;

    env.service
        .submit_answer(alice, qid, "We went hiking.")
        .await
        .expect("alice answers");
    env.service
        .skip_question(bob, qid, Some("too tired"))
        .await
        .expect("bob skips");

    let for_alice = env.service.daily_question(pid, alice).await.expect("view");
    assert_eq!(
        for_alice.user_answer.as_ref().map(|a| a.text.as_str()),
        Some("We went hiking.")
    );
    // Bob's skip is private; Alice sees no partner answer.
    assert!(for_alice.partner_answer.is_none());

    let for_bob = env.service.daily_question(pid, bob).await.expect("view");
    assert!(for_bob.user_answer.as_ref().is_some_and(|a| a.skipped));
    assert_eq!(
        for_bob.user_answer.as_ref().and_then(|a| a.skip_reason.as_deref()),
        Some("too tired")
    );
    assert_eq!(
        for_bob.partner_answer.as_ref().map(|a| a.text.as_str()),
        Some("We went hiking.")
    );
    assert_eq!(
        for_bob.partner_answer.as_ref().map(|a| a.visibility),
        Some(Visibility::Partnership)
    );
}

#[tokio::test]
async fn one_answer_per_user_per_question() {
    let env = env().await;
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    let pid = seed_partnership(&env.db, alice, bob).await;
    let daily = env.service.daily_question(pid, alice).await.expect("deal");

    env.service
        .submit_answer(alice, daily.question.id, "first")
        .await
        .expect("first answer");
    let err = env
        .service
        .submit_answer(alice, daily.question.id, "second")
        .await
        .expect_err("duplicate answer");
    assert!(matches!(err, DomainError::AnswerExists));

    // A skip counts as the one answer too.
    let err = env
        .service
        .skip_question(alice, daily.question.id, None)
        .await
        .expect_err("skip after answer");
    assert!(matches!(err, DomainError::AnswerExists));
}

#[tokio::test]
async fn answers_can_only_be_edited_by_their_author() {
    let env = env().await;
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    let pid = seed_partnership(&env.db, alice, bob).await;
    let daily = env.service.daily_question(pid, alice).await.expect("deal");

    let answer = env
        .service
        .submit_answer(alice, daily.question.id, "draft")
        .await
        .expect("answer");
    assert!(answer.updated_at.is_none());

    let err = env
        .service
        .update_answer(answer.id, bob, "hijacked")
        .await
        .expect_err("not the author");
    assert!(matches!(err, DomainError::NotAnswerOwner));

    let updated = env
        .service
        .update_answer(answer.id, alice, "final version")
        .await
        .expect("edit");
    assert_eq!(updated.text, "final version");
    assert!(updated.updated_at.is_some());
}

#[tokio::test]
async fn empty_answer_text_is_rejected() {
    let env = env().await;
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    let pid = seed_partnership(&env.db, alice, bob).await;
    let daily = env.service.daily_question(pid, alice).await.expect("deal");

    let err = env
        .service
        .submit_answer(alice, daily.question.id, "   ")
        .await
        .expect_err("blank answer");
    assert!(matches!(err, DomainError::Validation { .. }));
}

#[tokio::test]
async fn one_mood_checkin_per_day() {
    let env = env().await;
    let alice = Uuid::new_v4();

    assert!(env
        .service
        .todays_mood(alice)
        .await
        .expect("empty day")
        .is_none());

    let checkin = env
        .service
        .submit_mood(alice, 4, Some("good day"))
        .await
        .expect("check in");
    let err = env
        .service
        .submit_mood(alice, 2, None)
        .await
        .expect_err("second same-day check-in");
    assert!(matches!(err, DomainError::CheckinExists));

    let today = env
        .service
        .todays_mood(alice)
        .await
        .expect("read back")
        .expect("present");
    assert_eq!(today.id, checkin.id);
    assert_eq!(today.mood, 4);
}

#[tokio::test]
async fn mood_is_validated_and_editable_by_owner_only() {
    let env = env().await;
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

    for bad in [0, 6, -1] {
        let err = env
            .service
            .submit_mood(alice, bad, None)
            .await
            .expect_err("out of range");
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    let checkin = env
        .service
        .submit_mood(alice, 3, None)
        .await
        .expect("check in");

    let err = env
        .service
        .update_mood(checkin.id, bob, 5, None)
        .await
        .expect_err("not the owner");
    assert!(matches!(err, DomainError::NotCheckinOwner));

    let updated = env
        .service
        .update_mood(checkin.id, alice, 5, Some("turned out great"))
        .await
        .expect("edit");
    assert_eq!(updated.mood, 5);
    assert_eq!(updated.note.as_deref(), Some("turned out great"));
    assert!(updated.updated_at.is_some());
}

#[tokio::test]
async fn mood_history_covers_the_inclusive_day_range() {
    let env = env().await;
    let alice = Uuid::new_v4();
    env.service
        .submit_mood(alice, 4, None)
        .await
        .expect("check in");

    let today = Utc::now().date_naive();
    let history = env
        .service
        .mood_history(alice, today, today)
        .await
        .expect("history");
    assert_eq!(history.len(), 1);

    let yesterday = today.checked_sub_days(Days::new(1)).unwrap();
    let earlier = env
        .service
        .mood_history(alice, yesterday, yesterday)
        .await
        .expect("history");
    assert!(earlier.is_empty());

    let err = env
        .service
        .mood_history(alice, today, yesterday)
        .await
        .expect_err("inverted range");
    assert!(matches!(err, DomainError::Validation { .. }));
}

#[tokio::test]
async fn local_client_maps_domain_errors_to_contract_errors() {
    let env = env().await;
    let alice = Uuid::new_v4();
    let client = JournalLocalClient::new(Arc::new(env.service.clone()));

    client
        .submit_mood(alice, 3, None)
        .await
        .expect("first check-in");
    let err = client
        .submit_mood(alice, 3, None)
        .await
        .expect_err("conflict");
    assert!(matches!(
        err.downcast_ref::<JournalError>(),
        Some(JournalError::Conflict)
    ));

    let err = client
        .daily_question(Uuid::new_v4(), alice)
        .await
        .expect_err("unknown partnership");
    assert!(matches!(
        err.downcast_ref::<JournalError>(),
        Some(JournalError::NotFound)
    ));
}
