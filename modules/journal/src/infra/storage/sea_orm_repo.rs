//! SeaORM-backed repository implementation for the journal port.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::{Expr, Func, OnConflict, Order, Query, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use uuid::Uuid;

use crate::contract::model::{Answer, MoodCheckin, Question, QuestionAssignment};
use crate::domain::repo::{InsertAnswerError, JournalRepository};
use crate::infra::storage::entity::{
    answer, mood_checkin, partnership, question, question_assignment,
};
use crate::infra::storage::mapper;

pub struct SeaOrmJournalRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmJournalRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C> JournalRepository for SeaOrmJournalRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn partnership_members(
        &self,
        partnership_id: Uuid,
    ) -> anyhow::Result<Option<(Uuid, Uuid)>> {
        let found = partnership::Entity::find_by_id(partnership_id)
            .filter(partnership::Column::Status.eq("active"))
            .one(&self.conn)
            .await
            .context("partnership_members failed")?;
        Ok(found.map(|p| (p.profile1_id, p.profile2_id)))
    }

    async fn assignment_for_day(
        &self,
        partnership_id: Uuid,
        date: NaiveDate,
    ) -> anyhow::Result<Option<QuestionAssignment>> {
        let found = question_assignment::Entity::find()
            .filter(question_assignment::Column::PartnershipId.eq(partnership_id))
            .filter(question_assignment::Column::Date.eq(date))
            .one(&self.conn)
            .await
            .context("assignment_for_day failed")?;
        Ok(found.map(mapper::assignment_from_entity))
    }

    async fn assign_question_for_day(
        &self,
        partnership_id: Uuid,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        // INSERT .. SELECT a random question this partnership has not seen,
        // ON CONFLICT (partnership_id, date) DO NOTHING. The unique index is
        // the arbiter under concurrent deals.
        let mut used = Query::select();
        used.column(question_assignment::Column::QuestionId)
            .from(question_assignment::Entity)
            .and_where(question_assignment::Column::PartnershipId.eq(partnership_id));

        let mut pick = Query::select();
        pick.expr(Expr::val(Uuid::new_v4()))
            .expr(Expr::val(partnership_id))
            .expr(Expr::col((question::Entity, question::Column::Id)))
            .expr(Expr::val(date))
            .expr(Expr::val(now))
            .from(question::Entity)
            .and_where(
                Expr::col((question::Entity, question::Column::Id))
                    .not_in_subquery(used.to_owned()),
            )
            .order_by_expr(SimpleExpr::FunctionCall(Func::random()), Order::Asc)
            .limit(1);

        let mut insert = Query::insert();
        insert
            .into_table(question_assignment::Entity)
            .columns([
                question_assignment::Column::Id,
                question_assignment::Column::PartnershipId,
                question_assignment::Column::QuestionId,
                question_assignment::Column::Date,
                question_assignment::Column::CreatedAt,
            ])
            .select_from(pick)
            .map_err(|e| anyhow!("assign_question_for_day: bad select: {e}"))?
            .on_conflict(
                OnConflict::columns([
                    question_assignment::Column::PartnershipId,
                    question_assignment::Column::Date,
                ])
                .do_nothing()
                .to_owned(),
            );

        let backend = self.conn.get_database_backend();
        self.conn
            .execute(backend.build(&insert))
            .await
            .context("assign_question_for_day failed")?;
        Ok(())
    }

    async fn find_question(&self, id: Uuid) -> anyhow::Result<Option<Question>> {
        let found = question::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_question failed")?;
        Ok(found.map(mapper::question_from_entity))
    }

    async fn answers_for_question(
        &self,
        question_id: Uuid,
        users: (Uuid, Uuid),
    ) -> anyhow::Result<Vec<Answer>> {
        let rows = answer::Entity::find()
            .filter(answer::Column::QuestionId.eq(question_id))
            .filter(answer::Column::UserId.is_in([users.0, users.1]))
            .all(&self.conn)
            .await
            .context("answers_for_question failed")?;
        rows.into_iter().map(mapper::answer_from_entity).collect()
    }

    async fn insert_answer(&self, a: &Answer) -> Result<(), InsertAnswerError> {
        let m = answer::ActiveModel {
            id: Set(a.id),
            user_id: Set(a.user_id),
            question_id: Set(a.question_id),
            text: Set(a.text.clone()),
            skipped: Set(a.skipped),
            skip_reason: Set(a.skip_reason.clone()),
            visibility: Set(a.visibility.as_str().to_string()),
            created_at: Set(a.created_at),
            updated_at: Set(a.updated_at),
        };
        match m.insert(&self.conn).await {
            Ok(_) => Ok(()),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(InsertAnswerError::Duplicate),
                _ => Err(InsertAnswerError::Other(
                    anyhow::Error::new(e).context("insert_answer failed"),
                )),
            },
        }
    }

    async fn find_answer(&self, id: Uuid) -> anyhow::Result<Option<Answer>> {
        let found = answer::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_answer failed")?;
        found.map(mapper::answer_from_entity).transpose()
    }

    async fn update_answer_text(
        &self,
        id: Uuid,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> anyhow::Result<Answer> {
        let existing = answer::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("update_answer_text: load failed")?
            .ok_or_else(|| anyhow!("answer {id} disappeared during update"))?;

        let mut am: answer::ActiveModel = existing.into();
        am.text = Set(text.to_string());
        am.skipped = Set(false);
        am.skip_reason = Set(None);
        am.updated_at = Set(Some(updated_at));
        let updated = am
            .update(&self.conn)
            .await
            .context("update_answer_text failed")?;
        mapper::answer_from_entity(updated)
    }

    async fn checkin_since(
        &self,
        user_id: Uuid,
        day_start: DateTime<Utc>,
    ) -> anyhow::Result<Option<MoodCheckin>> {
        let found = mood_checkin::Entity::find()
            .filter(mood_checkin::Column::UserId.eq(user_id))
            .filter(mood_checkin::Column::CreatedAt.gte(day_start))
            .order_by_desc(mood_checkin::Column::CreatedAt)
            .one(&self.conn)
            .await
            .context("checkin_since failed")?;
        Ok(found.map(mapper::checkin_from_entity))
    }

    async fn insert_checkin(&self, c: &MoodCheckin) -> anyhow::Result<()> {
        mood_checkin::ActiveModel {
            id: Set(c.id),
            user_id: Set(c.user_id),
            mood: Set(c.mood),
            note: Set(c.note.clone()),
            created_at: Set(c.created_at),
            updated_at: Set(c.updated_at),
        }
        .insert(&self.conn)
        .await
        .context("insert_checkin failed")?;
        Ok(())
    }

    async fn find_checkin(&self, id: Uuid) -> anyhow::Result<Option<MoodCheckin>> {
        let found = mood_checkin::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_checkin failed")?;
        Ok(found.map(mapper::checkin_from_entity))
    }

    async fn update_checkin(
        &self,
        id: Uuid,
        mood: i32,
        note: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> anyhow::Result<MoodCheckin> {
        let existing = mood_checkin::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("update_checkin: load failed")?
            .ok_or_else(|| anyhow!("mood check-in {id} disappeared during update"))?;

        let mut am: mood_checkin::ActiveModel = existing.into();
        am.mood = Set(mood);
        am.note = Set(note.map(|n| n.to_string()));
        am.updated_at = Set(Some(updated_at));
        let updated = am
            .update(&self.conn)
            .await
            .context("update_checkin failed")?;
        Ok(mapper::checkin_from_entity(updated))
    }

    async fn checkins_between(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> anyhow::Result<Vec<MoodCheckin>> {
        let rows = mood_checkin::Entity::find()
            .filter(mood_checkin::Column::UserId.eq(user_id))
            .filter(mood_checkin::Column::CreatedAt.gte(from))
            .filter(mood_checkin::Column::CreatedAt.lt(to))
            .order_by_desc(mood_checkin::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("checkins_between failed")?;
        Ok(rows.into_iter().map(mapper::checkin_from_entity).collect())
    }
}
