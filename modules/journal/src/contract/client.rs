use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::contract::model::{Answer, DailyQuestion, MoodCheckin};

/// Public API trait for the journal module that other modules can use.
#[async_trait]
pub trait JournalApi: Send + Sync {
    /// Today's question for a partnership, assigning one if needed.
    async fn daily_question(
        &self,
        partnership_id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<DailyQuestion>;

    /// Record a text answer. One answer per user per question.
    async fn submit_answer(
        &self,
        user_id: Uuid,
        question_id: Uuid,
        text: &str,
    ) -> anyhow::Result<Answer>;

    /// Edit an existing answer's text; only the author may edit.
    async fn update_answer(
        &self,
        answer_id: Uuid,
        user_id: Uuid,
        text: &str,
    ) -> anyhow::Result<Answer>;

    /// Record an explicit skip instead of a text answer.
    async fn skip_question(
        &self,
        user_id: Uuid,
        question_id: Uuid,
        reason: Option<&str>,
    ) -> anyhow::Result<Answer>;

    /// Today's mood check-in, if one was submitted.
    async fn todays_mood(&self, user_id: Uuid) -> anyhow::Result<Option<MoodCheckin>>;

    /// Record today's mood check-in. A second submission the same day is a
    /// conflict; callers update the existing one instead.
    async fn submit_mood(
        &self,
        user_id: Uuid,
        mood: i32,
        note: Option<&str>,
    ) -> anyhow::Result<MoodCheckin>;

    /// Edit an existing check-in; only the author may edit.
    async fn update_mood(
        &self,
        checkin_id: Uuid,
        user_id: Uuid,
        mood: i32,
        note: Option<&str>,
    ) -> anyhow::Result<MoodCheckin>;

    /// Check-ins in the inclusive day range, newest first.
    async fn mood_history(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<Vec<MoodCheckin>>;
}
