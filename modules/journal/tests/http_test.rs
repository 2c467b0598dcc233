//! Router-level tests for the journal surface.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Schema, Set};
use sea_orm_migration::MigratorTrait;
use tower::ServiceExt;
use uuid::Uuid;

use auth_gateway::{AuthError, AuthPort, AuthUser};
use journal::api::rest::router;
use journal::domain::service::Service;
use journal::infra::storage::entity::partnership;
use journal::infra::storage::migrations::Migrator;
use journal::infra::storage::SeaOrmJournalRepository;

struct StaticAuth {
    users: HashMap<String, AuthUser>,
}

#[async_trait]
impl AuthPort for StaticAuth {
    async fn authenticate(&self, bearer_token: &str) -> Result<AuthUser, AuthError> {
        self.users
            .get(bearer_token)
            .cloned()
            .ok_or_else(|| AuthError::unauthorized("unknown token"))
    }
}

struct TestApp {
    db: DatabaseConnection,
    app: Router,
}

async fn app_with_users(users: Vec<(&str, Uuid, &str)>) -> TestApp {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("sqlite connect");
    Migrator::up(&db, None).await.expect("migrations");
    let schema = Schema::new(db.get_database_backend());
    let stmt = schema.create_table_from_entity(partnership::Entity);
    db.execute(db.get_database_backend().build(&stmt))
        .await
        .expect("create partnerships table");

    let repo = Arc::new(SeaOrmJournalRepository::new(db.clone()));
    let service = Arc::new(Service::new(repo));
    let auth: Arc<dyn AuthPort> = Arc::new(StaticAuth {
        users: users
            .into_iter()
            .map(|(token, id, email)| {
                (
                    token.to_string(),
                    AuthUser {
                        id,
                        email: email.to_string(),
                    },
                )
            })
            .collect(),
    });
    let app = Router::new().nest("/api", router(service, auth));
    TestApp { db, app }
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

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn daily_question_requires_bearer_token() {
    let alice = Uuid::new_v4();
    let t = app_with_users(vec![]).await;
    let pid = seed_partnership(&t.db, alice, Uuid::new_v4()).await;

    let resp = t
        .app
        .oneshot(
            Request::builder()
                .uri(format!("/api/journal/partnerships/{pid}/daily-question"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn daily_question_returns_question_and_assignment() {
    let alice = Uuid::new_v4();
    let t = app_with_users(vec![("tok-alice", alice, "alice@example.com")]).await;
    let pid = seed_partnership(&t.db, alice, Uuid::new_v4()).await;

    let resp = t
        .app
        .oneshot(
            Request::builder()
                .uri(format!("/api/journal/partnerships/{pid}/daily-question"))
                .header(AUTHORIZATION, "Bearer tok-alice")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert!(body["question"]["text"].as_str().is_some());
    assert_eq!(body["assignment"]["partnership_id"], pid.to_string());
    assert!(body["user_answer"].is_null());
    assert!(body["partner_answer"].is_null());
}

#[tokio::test]
async fn outsider_gets_403_for_daily_question() {
    let alice = Uuid::new_v4();
    let mallory = Uuid::new_v4();
    let t = app_with_users(vec![("tok-mallory", mallory, "mallory@example.com")]).await;
    let pid = seed_partnership(&t.db, alice, Uuid::new_v4()).await;

    let resp = t
        .app
        .oneshot(
            Request::builder()
                .uri(format!("/api/journal/partnerships/{pid}/daily-question"))
                .header(AUTHORIZATION, "Bearer tok-mallory")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn duplicate_mood_checkin_is_a_409() {
    let alice = Uuid::new_v4();
    let t = app_with_users(vec![("tok-alice", alice, "alice@example.com")]).await;

    let post_mood = || {
        Request::builder()
            .method("POST")
            .uri("/api/journal/moods")
            .header(AUTHORIZATION, "Bearer tok-alice")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"mood":4,"note":"fine"}"#))
            .expect("request")
    };

    let resp = t.app.clone().oneshot(post_mood()).await.expect("response");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["mood"], 4);

    let resp = t.app.clone().oneshot(post_mood()).await.expect("response");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = t
        .app
        .oneshot(
            Request::builder()
                .uri("/api/journal/moods/today")
                .header(AUTHORIZATION, "Bearer tok-alice")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["checkin"]["note"], "fine");
}

#[tokio::test]
async fn out_of_range_mood_is_a_400() {
    let alice = Uuid::new_v4();
    let t = app_with_users(vec![("tok-alice", alice, "alice@example.com")]).await;

    let resp = t
        .app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/journal/moods")
                .header(AUTHORIZATION, "Bearer tok-alice")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"mood":9}"#))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
