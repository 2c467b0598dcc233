use std::sync::Arc;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::contract::model::{
    Answer, DailyQuestion, MoodCheckin, Visibility, MOOD_MAX, MOOD_MIN,
};
use crate::domain::error::DomainError;
use crate::domain::repo::{InsertAnswerError, JournalRepository};

/// Domain service for daily questions, answers, and mood check-ins.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn JournalRepository>,
}

fn day_start_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

impl Service {
    pub fn new(repo: Arc<dyn JournalRepository>) -> Self {
        Self { repo }
    }

    /// Today's question for a partnership, dealing one if none is assigned
    /// yet. Only members of the partnership may ask.
    #[instrument(
        name = "journal.service.daily_question",
        skip(self),
        fields(partnership_id = %partnership_id, user_id = %user_id)
    )]
    pub async fn daily_question(
        &self,
        partnership_id: Uuid,
        user_id: Uuid,
    ) -> Result<DailyQuestion, DomainError> {
        let (a, b) = self
            .repo
            .partnership_members(partnership_id)
            .await
            .map_err(|e| DomainError::store(e.to_string()))?
            .ok_or(DomainError::PartnershipNotFound)?;
        if user_id != a && user_id != b {
            return Err(DomainError::NotAMember);
        }
        let partner_id = if a == user_id { b } else { a };

        let today = Utc::now().date_naive();
        let assignment = match self
            .repo
            .assignment_for_day(partnership_id, today)
            .await
            .map_err(|e| DomainError::store(e.to_string()))?
        {
            Some(existing) => existing,
            None => {
                // The conflict target decides races; whoever loses simply
                // reads the winner's row back.
                self.repo
                    .assign_question_for_day(partnership_id, today, Utc::now())
                    .await
                    .map_err(|e| DomainError::store(e.to_string()))?;
                self.repo
                    .assignment_for_day(partnership_id, today)
                    .await
                    .map_err(|e| DomainError::store(e.to_string()))?
                    .ok_or(DomainError::NoQuestionsAvailable)?
            }
        };

        let question = self
            .repo
            .find_question(assignment.question_id)
            .await
            .map_err(|e| DomainError::store(e.to_string()))?
            .ok_or_else(|| DomainError::question_not_found(assignment.question_id))?;

        let answers = self
            .repo
            .answers_for_question(question.id, (user_id, partner_id))
            .await
            .map_err(|e| DomainError::store(e.to_string()))?;
        let user_answer = answers.iter().find(|x| x.user_id == user_id).cloned();
        // Private answers (skips) stay with their author.
        let partner_answer = answers
            .into_iter()
            .find(|x| x.user_id == partner_id && x.visibility == Visibility::Partnership);

        Ok(DailyQuestion {
            question,
            assignment,
            user_answer,
            partner_answer,
        })
    }

    #[instrument(
        name = "journal.service.submit_answer",
        skip(self, text),
        fields(user_id = %user_id, question_id = %question_id)
    )]
    pub async fn submit_answer(
        &self,
        user_id: Uuid,
        question_id: Uuid,
        text: &str,
    ) -> Result<Answer, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::validation("answer text is required"));
        }
        self.require_question(question_id).await?;

        let answer = Answer {
            id: Uuid::new_v4(),
            user_id,
            question_id,
            text: text.to_string(),
            skipped: false,
            skip_reason: None,
            visibility: Visibility::Partnership,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.insert_answer(&answer).await?;
        info!(answer_id = %answer.id, "Answer submitted");
        Ok(answer)
    }

    #[instrument(
        name = "journal.service.skip_question",
        skip(self, reason),
        fields(user_id = %user_id, question_id = %question_id)
    )]
    pub async fn skip_question(
        &self,
        user_id: Uuid,
        question_id: Uuid,
        reason: Option<&str>,
    ) -> Result<Answer, DomainError> {
        self.require_question(question_id).await?;

        let answer = Answer {
            id: Uuid::new_v4(),
            user_id,
            question_id,
            text: String::new(),
            skipped: true,
            skip_reason: reason.map(|r| r.to_string()),
            visibility: Visibility::Private,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.insert_answer(&answer).await?;
        info!(answer_id = %answer.id, "Question skipped");
        Ok(answer)
    }

    /// Edit an answer's text. Only the author may edit.
    #[instrument(
        name = "journal.service.update_answer",
        skip(self, text),
        fields(answer_id = %answer_id, user_id = %user_id)
    )]
    pub async fn update_answer(
        &self,
        answer_id: Uuid,
        user_id: Uuid,
        text: &str,
    ) -> Result<Answer, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::validation("answer text is required"));
        }

        let existing = self
            .repo
            .find_answer(answer_id)
            .await
            .map_err(|e| DomainError::store(e.to_string()))?
            .ok_or_else(|| DomainError::answer_not_found(answer_id))?;
        if existing.user_id != user_id {
            return Err(DomainError::NotAnswerOwner);
        }

        let updated = self
            .repo
            .update_answer_text(answer_id, text, Utc::now())
            .await
            .map_err(|e| DomainError::store(e.to_string()))?;
        Ok(updated)
    }

    #[instrument(name = "journal.service.todays_mood", skip(self), fields(user_id = %user_id))]
    pub async fn todays_mood(&self, user_id: Uuid) -> Result<Option<MoodCheckin>, DomainError> {
        self.repo
            .checkin_since(user_id, day_start_utc(Utc::now().date_naive()))
            .await
            .map_err(|e| DomainError::store(e.to_string()))
    }

    #[instrument(
        name = "journal.service.submit_mood",
        skip(self, note),
        fields(user_id = %user_id, mood = mood)
    )]
    pub async fn submit_mood(
        &self,
        user_id: Uuid,
        mood: i32,
        note: Option<&str>,
    ) -> Result<MoodCheckin, DomainError> {
        validate_mood(mood)?;

        let existing = self.todays_mood(user_id).await?;
        if existing.is_some() {
            return Err(DomainError::CheckinExists);
        }

        let checkin = MoodCheckin {
            id: Uuid::new_v4(),
            user_id,
            mood,
            note: note.map(|n| n.to_string()),
            created_at: Utc::now(),
            updated_at: None,
        };
        self.repo
            .insert_checkin(&checkin)
            .await
            .map_err(|e| DomainError::store(e.to_string()))?;
        info!(checkin_id = %checkin.id, "Mood check-in recorded");
        Ok(checkin)
    }

    #[instrument(
        name = "journal.service.update_mood",
        skip(self, note),
        fields(checkin_id = %checkin_id, user_id = %user_id)
    )]
    pub async fn update_mood(
        &self,
        checkin_id: Uuid,
        user_id: Uuid,
        mood: i32,
        note: Option<&str>,
    ) -> Result<MoodCheckin, DomainError> {
        validate_mood(mood)?;

        let existing = self
            .repo
            .find_checkin(checkin_id)
            .await
            .map_err(|e| DomainError::store(e.to_string()))?
            .ok_or_else(|| DomainError::checkin_not_found(checkin_id))?;
        if existing.user_id != user_id {
            return Err(DomainError::NotCheckinOwner);
        }

        self.repo
            .update_checkin(checkin_id, mood, note, Utc::now())
            .await
            .map_err(|e| DomainError::store(e.to_string()))
    }

    #[instrument(
        name = "journal.service.mood_history",
        skip(self),
        fields(user_id = %user_id, %from, %to)
    )]
    pub async fn mood_history(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<MoodCheckin>, DomainError> {
        if from > to {
            return Err(DomainError::validation("'from' must not be after 'to'"));
        }
        let start = day_start_utc(from);
        let end = day_start_utc(
            to.checked_add_days(Days::new(1))
                .ok_or_else(|| DomainError::validation("'to' is out of range"))?,
        );
        self.repo
            .checkins_between(user_id, start, end)
            .await
            .map_err(|e| DomainError::store(e.to_string()))
    }

    async fn require_question(&self, question_id: Uuid) -> Result<(), DomainError> {
        self.repo
            .find_question(question_id)
            .await
            .map_err(|e| DomainError::store(e.to_string()))?
            .ok_or_else(|| DomainError::question_not_found(question_id))?;
        Ok(())
    }

    async fn insert_answer(&self, answer: &Answer) -> Result<(), DomainError> {
        match self.repo.insert_answer(answer).await {
            Ok(()) => Ok(()),
            Err(InsertAnswerError::Duplicate) => Err(DomainError::AnswerExists),
            Err(InsertAnswerError::Other(e)) => Err(DomainError::store(e.to_string())),
        }
    }
}

fn validate_mood(mood: i32) -> Result<(), DomainError> {
    if !(MOOD_MIN..=MOOD_MAX).contains(&mood) {
        return Err(DomainError::validation(format!(
            "mood must be between {MOOD_MIN} and {MOOD_MAX}"
        )));
    }
    Ok(())
}
