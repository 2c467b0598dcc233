use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::contract::model::{Answer, MoodCheckin, Question, QuestionAssignment};

/// Answer insert failure split so the service can report a store-level
/// uniqueness violation as "already answered".
#[derive(Error, Debug)]
pub enum InsertAnswerError {
    #[error("an answer for this question already exists")]
    Duplicate,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Port for the domain layer: every read/write journal operations need
/// against the external store.
#[async_trait]
pub trait JournalRepository: Send + Sync {
    /// Members of an active partnership, or `None` when the partnership
    /// does not exist or is not active.
    async fn partnership_members(
        &self,
        partnership_id: Uuid,
    ) -> anyhow::Result<Option<(Uuid, Uuid)>>;

    async fn assignment_for_day(
        &self,
        partnership_id: Uuid,
        date: NaiveDate,
    ) -> anyhow::Result<Option<QuestionAssignment>>;

    /// Deal a not-yet-used question to the partnership for the given day.
    /// Insert-on-conflict-do-nothing against the (partnership, day) unique
    /// index: under a concurrent deal exactly one row wins and the loser is
    /// a no-op. Affects zero rows when every question is used up too, so
    /// callers re-read the assignment to tell the two cases apart.
    async fn assign_question_for_day(
        &self,
        partnership_id: Uuid,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()>;

    async fn find_question(&self, id: Uuid) -> anyhow::Result<Option<Question>>;

    /// Both members' answers to a question, author-ordered by the caller.
    async fn answers_for_question(
        &self,
        question_id: Uuid,
        users: (Uuid, Uuid),
    ) -> anyhow::Result<Vec<Answer>>;

    async fn insert_answer(&self, answer: &Answer) -> Result<(), InsertAnswerError>;

    async fn find_answer(&self, id: Uuid) -> anyhow::Result<Option<Answer>>;

    async fn update_answer_text(
        &self,
        id: Uuid,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> anyhow::Result<Answer>;

    /// The user's check-in created at or after `day_start`, newest first.
    async fn checkin_since(
        &self,
        user_id: Uuid,
        day_start: DateTime<Utc>,
    ) -> anyhow::Result<Option<MoodCheckin>>;

    async fn insert_checkin(&self, checkin: &MoodCheckin) -> anyhow::Result<()>;

    async fn find_checkin(&self, id: Uuid) -> anyhow::Result<Option<MoodCheckin>>;

    async fn update_checkin(
        &self,
        id: Uuid,
        mood: i32,
        note: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> anyhow::Result<MoodCheckin>;

    /// Check-ins whose `created_at` falls inside [from, to), newest first.
    async fn checkins_between(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> anyhow::Result<Vec<MoodCheckin>>;
}
