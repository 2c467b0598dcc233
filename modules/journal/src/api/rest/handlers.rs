use std::sync::Arc;

use api_problem::ProblemResponse;
use auth_gateway::CurrentUser;
use axum::extract::{Path, Query};
use axum::{Extension, Json};
use tracing::instrument;
use uuid::Uuid;

use crate::api::rest::dto::{
    AnswerDto, DailyQuestionResponse, MoodCheckinDto, MoodHistoryQuery, MoodHistoryResponse,
    SkipQuestionRequest, SubmitAnswerRequest, SubmitMoodRequest, TodaysMoodResponse,
    UpdateAnswerRequest, UpdateMoodRequest,
};
use crate::api::rest::error::problem_from_domain;
use crate::domain::service::Service;

/// `GET /journal/partnerships/{id}/daily-question`
#[instrument(name = "journal.api.daily_question", skip_all, fields(user_id = %user.id))]
pub async fn daily_question(
    Extension(service): Extension<Arc<Service>>,
    user: CurrentUser,
    Path(partnership_id): Path<Uuid>,
) -> Result<Json<DailyQuestionResponse>, ProblemResponse> {
    let daily = service
        .daily_question(partnership_id, user.id)
        .await
        .map_err(problem_from_domain)?;
    Ok(Json(daily.into()))
}

/// `POST /journal/answers`
#[instrument(name = "journal.api.submit_answer", skip_all, fields(user_id = %user.id))]
pub async fn submit_answer(
    Extension(service): Extension<Arc<Service>>,
    user: CurrentUser,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<Json<AnswerDto>, ProblemResponse> {
    let answer = service
        .submit_answer(user.id, req.question_id, &req.text)
        .await
        .map_err(problem_from_domain)?;
    Ok(Json(answer.into()))
}

/// `PUT /journal/answers/{id}`
#[instrument(name = "journal.api.update_answer", skip_all, fields(user_id = %user.id))]
pub async fn update_answer(
    Extension(service): Extension<Arc<Service>>,
    user: CurrentUser,
    Path(answer_id): Path<Uuid>,
    Json(req): Json<UpdateAnswerRequest>,
) -> Result<Json<AnswerDto>, ProblemResponse> {
    let answer = service
        .update_answer(answer_id, user.id, &req.text)
        .await
        .map_err(problem_from_domain)?;
    Ok(Json(answer.into()))
}

/// `POST /journal/answers/skip`
#[instrument(name = "journal.api.skip_question", skip_all, fields(user_id = %user.id))]
pub async fn skip_question(
    Extension(service): Extension<Arc<Service>>,
    user: CurrentUser,
    Json(req): Json<SkipQuestionRequest>,
) -> Result<Json<AnswerDto>, ProblemResponse> {
    let answer = service
        .skip_question(user.id, req.question_id, req.reason.as_deref())
        .await
        .map_err(problem_from_domain)?;
    Ok(Json(answer.into()))
}

/// `GET /journal/moods/today`
#[instrument(name = "journal.api.todays_mood", skip_all, fields(user_id = %user.id))]
pub async fn todays_mood(
    Extension(service): Extension<Arc<Service>>,
    user: CurrentUser,
) -> Result<Json<TodaysMoodResponse>, ProblemResponse> {
    let checkin = service
        .todays_mood(user.id)
        .await
        .map_err(problem_from_domain)?;
    Ok(Json(TodaysMoodResponse {
        checkin: checkin.map(Into::into),
    }))
}

/// `POST /journal/moods`
#[instrument(name = "journal.api.submit_mood", skip_all, fields(user_id = %user.id))]
pub async fn submit_mood(
    Extension(service): Extension<Arc<Service>>,
    user: CurrentUser,
    Json(req): Json<SubmitMoodRequest>,
) -> Result<Json<MoodCheckinDto>, ProblemResponse> {
    let checkin = service
        .submit_mood(user.id, req.mood, req.note.as_deref())
        .await
        .map_err(problem_from_domain)?;
    Ok(Json(checkin.into()))
}

/// `PUT /journal/moods/{id}`
#[instrument(name = "journal.api.update_mood", skip_all, fields(user_id = %user.id))]
pub async fn update_mood(
    Extension(service): Extension<Arc<Service>>,
    user: CurrentUser,
    Path(checkin_id): Path<Uuid>,
    Json(req): Json<UpdateMoodRequest>,
) -> Result<Json<MoodCheckinDto>, ProblemResponse> {
    let checkin = service
        .update_mood(checkin_id, user.id, req.mood, req.note.as_deref())
        .await
        .map_err(problem_from_domain)?;
    Ok(Json(checkin.into()))
}

/// `GET /journal/moods/history?from=&to=`
#[instrument(name = "journal.api.mood_history", skip_all, fields(user_id = %user.id))]
pub async fn mood_history(
    Extension(service): Extension<Arc<Service>>,
    user: CurrentUser,
    Query(range): Query<MoodHistoryQuery>,
) -> Result<Json<MoodHistoryResponse>, ProblemResponse> {
    let checkins = service
        .mood_history(user.id, range.from, range.to)
        .await
        .map_err(problem_from_domain)?;
    Ok(Json(MoodHistoryResponse {
        checkins: checkins.into_iter().map(Into::into).collect(),
    }))
}
