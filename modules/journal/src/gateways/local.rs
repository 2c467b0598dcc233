use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::JournalApi,
    error::JournalError,
    model::{Answer, DailyQuestion, MoodCheckin},
};
use crate::domain::{error::DomainError, service::Service};

/// Local implementation of the JournalApi trait that delegates to the
/// domain service.
pub struct JournalLocalClient {
    service: Arc<Service>,
}

impl JournalLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl JournalApi for JournalLocalClient {
    async fn daily_question(
        &self,
        partnership_id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<DailyQuestion> {
        self.service
            .daily_question(partnership_id, user_id)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn submit_answer(
        &self,
        user_id: Uuid,
        question_id: Uuid,
        text: &str,
    ) -> anyhow::Result<Answer> {
        self.service
            .submit_answer(user_id, question_id, text)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn update_answer(
        &self,
        answer_id: Uuid,
        user_id: Uuid,
        text: &str,
    ) -> anyhow::Result<Answer> {
        self.service
            .update_answer(answer_id, user_id, text)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn skip_question(
        &self,
        user_id: Uuid,
        question_id: Uuid,
        reason: Option<&str>,
    ) -> anyhow::Result<Answer> {
        self.service
            .skip_question(user_id, question_id, reason)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn todays_mood(&self, user_id: Uuid) -> anyhow::Result<Option<MoodCheckin>> {
        self.service
            .todays_mood(user_id)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn submit_mood(
        &self,
        user_id: Uuid,
        mood: i32,
        note: Option<&str>,
    ) -> anyhow::Result<MoodCheckin> {
        self.service
            .submit_mood(user_id, mood, note)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn update_mood(
        &self,
        checkin_id: Uuid,
        user_id: Uuid,
        mood: i32,
        note: Option<&str>,
    ) -> anyhow::Result<MoodCheckin> {
        self.service
            .update_mood(checkin_id, user_id, mood, note)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn mood_history(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<Vec<MoodCheckin>> {
        self.service
            .mood_history(user_id, from, to)
            .await
            .map_err(map_domain_error_to_anyhow)
    }
}

/// Map domain errors to contract errors wrapped in anyhow.
fn map_domain_error_to_anyhow(domain_error: DomainError) -> anyhow::Error {
    let contract_error = match domain_error {
        DomainError::Validation { .. } => JournalError::rejected(domain_error.to_string()),
        DomainError::PartnershipNotFound
        | DomainError::QuestionNotFound { .. }
        | DomainError::AnswerNotFound { .. }
        | DomainError::CheckinNotFound { .. }
        | DomainError::NoQuestionsAvailable => JournalError::NotFound,
        DomainError::NotAMember | DomainError::NotAnswerOwner | DomainError::NotCheckinOwner => {
            JournalError::Forbidden
        }
        DomainError::AnswerExists | DomainError::CheckinExists => JournalError::Conflict,
        DomainError::Store { .. } => JournalError::Internal,
    };

    anyhow::Error::new(contract_error)
}
