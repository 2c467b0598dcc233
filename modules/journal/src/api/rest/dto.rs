//! Wire types for the journal REST surface.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{Answer, DailyQuestion, MoodCheckin, Question, QuestionAssignment};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(title = "Question")]
pub struct QuestionDto {
    pub id: Uuid,
    pub text: String,
    pub category: Option<String>,
}

impl From<Question> for QuestionDto {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            text: q.text,
            category: q.category,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(title = "QuestionAssignment")]
pub struct AssignmentDto {
    pub id: Uuid,
    pub partnership_id: Uuid,
    pub question_id: Uuid,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<QuestionAssignment> for AssignmentDto {
    fn from(a: QuestionAssignment) -> Self {
        Self {
            id: a.id,
            partnership_id: a.partnership_id,
            question_id: a.question_id,
            date: a.date,
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(title = "Answer")]
pub struct AnswerDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub question_id: Uuid,
    pub text: String,
    pub skipped: bool,
    pub skip_reason: Option<String>,
    pub visibility: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Answer> for AnswerDto {
    fn from(a: Answer) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            question_id: a.question_id,
            text: a.text,
            skipped: a.skipped,
            skip_reason: a.skip_reason,
            visibility: a.visibility.as_str().to_string(),
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(title = "DailyQuestionResponse")]
pub struct DailyQuestionResponse {
    pub question: QuestionDto,
    pub assignment: AssignmentDto,
    pub user_answer: Option<AnswerDto>,
    pub partner_answer: Option<AnswerDto>,
}

impl From<DailyQuestion> for DailyQuestionResponse {
    fn from(d: DailyQuestion) -> Self {
        Self {
            question: d.question.into(),
            assignment: d.assignment.into(),
            user_answer: d.user_answer.map(Into::into),
            partner_answer: d.partner_answer.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(title = "SubmitAnswerRequest")]
pub struct SubmitAnswerRequest {
    pub question_id: Uuid,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(title = "UpdateAnswerRequest")]
pub struct UpdateAnswerRequest {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(title = "SkipQuestionRequest")]
pub struct SkipQuestionRequest {
    pub question_id: Uuid,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(title = "MoodCheckin")]
pub struct MoodCheckinDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mood: i32,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<MoodCheckin> for MoodCheckinDto {
    fn from(c: MoodCheckin) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            mood: c.mood,
            note: c.note,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(title = "TodaysMoodResponse")]
pub struct TodaysMoodResponse {
    pub checkin: Option<MoodCheckinDto>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(title = "SubmitMoodRequest")]
pub struct SubmitMoodRequest {
    pub mood: i32,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(title = "UpdateMoodRequest")]
pub struct UpdateMoodRequest {
    pub mood: i32,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoodHistoryQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(title = "MoodHistoryResponse")]
pub struct MoodHistoryResponse {
    pub checkins: Vec<MoodCheckinDto>,
}
