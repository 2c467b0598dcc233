use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// A prompt from the shared question pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: Uuid,
    pub text: String,
    pub category: Option<String>,
}

/// One question dealt to one partnership for one calendar day (UTC).
/// At most one assignment per partnership per day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionAssignment {
    pub id: Uuid,
    pub partnership_id: Uuid,
    pub question_id: Uuid,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Who may read an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Both members of the partnership.
    Partnership,
    /// Only the author; used for skips.
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Partnership => "partnership",
            Self::Private => "private",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "partnership" => Some(Self::Partnership),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

/// A user's response to a question: either text or an explicit skip.
/// One answer per user per question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub question_id: Uuid,
    pub text: String,
    pub skipped: bool,
    pub skip_reason: Option<String>,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Today's question for a partnership, with both members' answers where
/// present. The partner's answer is withheld unless it is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyQuestion {
    pub question: Question,
    pub assignment: QuestionAssignment,
    pub user_answer: Option<Answer>,
    pub partner_answer: Option<Answer>,
}

/// A mood check-in: one per user per calendar day (UTC), editable in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodCheckin {
    pub id: Uuid,
    pub user_id: Uuid,
    /// 1 (lowest) to 5 (highest).
    pub mood: i32,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub const MOOD_MIN: i32 = 1;
pub const MOOD_MAX: i32 = 5;
