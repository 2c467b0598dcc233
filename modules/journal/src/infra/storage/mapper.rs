use anyhow::{anyhow, Result};

use crate::contract::model::{Answer, MoodCheckin, Question, QuestionAssignment, Visibility};
use crate::infra::storage::entity::{answer, mood_checkin, question, question_assignment};

pub fn question_from_entity(m: question::Model) -> Question {
    Question {
        id: m.id,
        text: m.text,
        category: m.category,
    }
}

pub fn assignment_from_entity(m: question_assignment::Model) -> QuestionAssignment {
    QuestionAssignment {
        id: m.id,
        partnership_id: m.partnership_id,
        question_id: m.question_id,
        date: m.date,
        created_at: m.created_at,
    }
}

pub fn answer_from_entity(m: answer::Model) -> Result<Answer> {
    let visibility = Visibility::parse(&m.visibility)
        .ok_or_else(|| anyhow!("unknown answer visibility '{}'", m.visibility))?;
    Ok(Answer {
        id: m.id,
        user_id: m.user_id,
        question_id: m.question_id,
        text: m.text,
        skipped: m.skipped,
        skip_reason: m.skip_reason,
        visibility,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

pub fn checkin_from_entity(m: mood_checkin::Model) -> MoodCheckin {
    MoodCheckin {
        id: m.id,
        user_id: m.user_id,
        mood: m.mood,
        note: m.note,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}
