//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait + TransactionTrait`, so it can be
//! constructed with a `DatabaseConnection` in production and in tests.

use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::contract::model::{
    Invitation, InvitationStatus, InvitationWithPeer, InviteeRef, PartnerView, Partnership,
    PartnershipStatus, PendingInvitations, Profile,
};
use crate::domain::repo::{InsertInvitationError, InvitationsRepository, MaterializeError};
use crate::infra::storage::entity::{invitation, partnership, profile};
use crate::infra::storage::mapper;

pub struct SeaOrmInvitationsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmInvitationsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    async fn profiles_by_ids(&self, ids: Vec<Uuid>) -> anyhow::Result<HashMap<Uuid, Profile>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = profile::Entity::find()
            .filter(profile::Column::Id.is_in(ids))
            .all(&self.conn)
            .await
            .context("profiles_by_ids failed")?;
        Ok(rows
            .into_iter()
            .map(|m| (m.id, mapper::profile_from_entity(m)))
            .collect())
    }
}

fn email_matches(col: profile::Column, email: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).eq(email.to_lowercase())
}

#[async_trait]
impl<C> InvitationsRepository for SeaOrmInvitationsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn find_profile(&self, id: Uuid) -> anyhow::Result<Option<Profile>> {
        let found = profile::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_profile failed")?;
        Ok(found.map(mapper::profile_from_entity))
    }

    async fn find_profile_by_email(&self, email: &str) -> anyhow::Result<Option<Profile>> {
        let found = profile::Entity::find()
            .filter(email_matches(profile::Column::Email, email))
            .one(&self.conn)
            .await
            .context("find_profile_by_email failed")?;
        Ok(found.map(mapper::profile_from_entity))
    }

    async fn count_active_partnerships(&self, profile_id: Uuid) -> anyhow::Result<u64> {
        let count = partnership::Entity::find()
            .filter(partnership::Column::Status.eq(PartnershipStatus::Active.as_str()))
            .filter(
                Condition::any()
                    .add(partnership::Column::Profile1Id.eq(profile_id))
                    .add(partnership::Column::Profile2Id.eq(profile_id)),
            )
            .count(&self.conn)
            .await
            .context("count_active_partnerships failed")?;
        Ok(count)
    }

    async fn active_partnership_between(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> anyhow::Result<Option<Partnership>> {
        let found = partnership::Entity::find()
            .filter(partnership::Column::Status.eq(PartnershipStatus::Active.as_str()))
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(partnership::Column::Profile1Id.eq(a))
                            .add(partnership::Column::Profile2Id.eq(b)),
                    )
                    .add(
                        Condition::all()
                            .add(partnership::Column::Profile1Id.eq(b))
                            .add(partnership::Column::Profile2Id.eq(a)),
                    ),
            )
            .one(&self.conn)
            .await
            .context("active_partnership_between failed")?;
        found.map(mapper::partnership_from_entity).transpose()
    }

    async fn pending_invitation_exists(
        &self,
        from: Uuid,
        to: &InviteeRef,
    ) -> anyhow::Result<bool> {
        let mut query = invitation::Entity::find()
            .filter(invitation::Column::FromUserId.eq(from))
            .filter(invitation::Column::Status.eq(InvitationStatus::Pending.as_str()));

        query = match to {
            InviteeRef::Id(id) => query.filter(invitation::Column::ToUserId.eq(*id)),
            InviteeRef::Email(email) => query.filter(
                Expr::expr(Func::lower(Expr::col(invitation::Column::ToUserEmail)))
                    .eq(email.to_lowercase()),
            ),
        };

        let count = query
            .count(&self.conn)
            .await
            .context("pending_invitation_exists failed")?;
        Ok(count > 0)
    }

    async fn insert_invitation(
        &self,
        inv: &Invitation,
    ) -> Result<(), InsertInvitationError> {
        let m = invitation::ActiveModel {
            id: Set(inv.id),
            token: Set(inv.token.clone()),
            from_user_id: Set(inv.from_user_id),
            to_user_id: Set(inv.to_user_id),
            to_user_email: Set(inv.to_user_email.clone()),
            status: Set(inv.status.as_str().to_string()),
            created_at: Set(inv.created_at),
            expires_at: Set(inv.expires_at),
        };

        match m.insert(&self.conn).await {
            Ok(_) => Ok(()),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(InsertInvitationError::DuplicatePending)
                }
                _ => Err(InsertInvitationError::Other(
                    anyhow::Error::new(e).context("insert_invitation failed"),
                )),
            },
        }
    }

    async fn find_by_token(&self, token: &str) -> anyhow::Result<Option<Invitation>> {
        let found = invitation::Entity::find()
            .filter(invitation::Column::Token.eq(token))
            .one(&self.conn)
            .await
            .context("find_by_token failed")?;
        found.map(mapper::invitation_from_entity).transpose()
    }

    async fn decline_if_pending(&self, invitation_id: Uuid) -> anyhow::Result<bool> {
        let res = invitation::Entity::update_many()
            .col_expr(
                invitation::Column::Status,
                Expr::value(InvitationStatus::Declined.as_str()),
            )
            .filter(invitation::Column::Id.eq(invitation_id))
            .filter(invitation::Column::Status.eq(InvitationStatus::Pending.as_str()))
            .exec(&self.conn)
            .await
            .context("decline_if_pending failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn materialize(
        &self,
        invitation_id: Uuid,
        inviter_id: Uuid,
        invitee_id: Uuid,
    ) -> Result<Partnership, MaterializeError> {
        let txn = self
            .conn
            .begin()
            .await
            .context("materialize: begin failed")?;

        // Flip the invitation first; the pending guard makes concurrent
        // accepts lose here and roll back without a partnership.
        let updated = invitation::Entity::update_many()
            .col_expr(
                invitation::Column::Status,
                Expr::value(InvitationStatus::Accepted.as_str()),
            )
            .filter(invitation::Column::Id.eq(invitation_id))
            .filter(invitation::Column::Status.eq(InvitationStatus::Pending.as_str()))
            .exec(&txn)
            .await
            .context("materialize: status update failed")?;

        if updated.rows_affected == 0 {
            txn.rollback()
                .await
                .context("materialize: rollback failed")?;
            return Err(MaterializeError::NoLongerPending);
        }

        let m = partnership::ActiveModel {
            id: Set(Uuid::new_v4()),
            profile1_id: Set(inviter_id),
            profile2_id: Set(invitee_id),
            status: Set(PartnershipStatus::Active.as_str().to_string()),
            streak_days: Set(0),
            created_at: Set(Utc::now()),
        };
        let created = m
            .insert(&txn)
            .await
            .context("materialize: partnership insert failed")?;

        txn.commit().await.context("materialize: commit failed")?;

        Ok(mapper::partnership_from_entity(created)?)
    }

    async fn list_partnerships(&self, profile_id: Uuid) -> anyhow::Result<Vec<PartnerView>> {
        let rows = partnership::Entity::find()
            .filter(partnership::Column::Status.eq(PartnershipStatus::Active.as_str()))
            .filter(
                Condition::any()
                    .add(partnership::Column::Profile1Id.eq(profile_id))
                    .add(partnership::Column::Profile2Id.eq(profile_id)),
            )
            .order_by_desc(partnership::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("list_partnerships failed")?;

        let partner_ids = rows
            .iter()
            .map(|p| {
                if p.profile1_id == profile_id {
                    p.profile2_id
                } else {
                    p.profile1_id
                }
            })
            .collect();
        let profiles = self.profiles_by_ids(partner_ids).await?;

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            let partnership = mapper::partnership_from_entity(row)?;
            let partner_id = partnership.partner_of(profile_id);
            // A partnership whose partner profile vanished is skipped rather
            // than failing the whole listing.
            if let Some(partner) = profiles.get(&partner_id) {
                views.push(PartnerView {
                    partnership_id: partnership.id,
                    partner: partner.partner_profile(),
                    created_at: partnership.created_at,
                    streak_days: partnership.streak_days,
                });
            }
        }
        Ok(views)
    }

    async fn list_pending(
        &self,
        profile_id: Uuid,
        email: &str,
    ) -> anyhow::Result<PendingInvitations> {
        let sent_rows = invitation::Entity::find()
            .filter(invitation::Column::FromUserId.eq(profile_id))
            .filter(invitation::Column::Status.eq(InvitationStatus::Pending.as_str()))
            .order_by_desc(invitation::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("list_pending: sent query failed")?;

        let received_rows = invitation::Entity::find()
            .filter(invitation::Column::Status.eq(InvitationStatus::Pending.as_str()))
            .filter(
                Condition::any()
                    .add(invitation::Column::ToUserId.eq(profile_id))
                    .add(
                        Expr::expr(Func::lower(Expr::col(invitation::Column::ToUserEmail)))
                            .eq(email.to_lowercase()),
                    ),
            )
            .order_by_desc(invitation::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("list_pending: received query failed")?;

        let mut peer_ids: Vec<Uuid> = sent_rows.iter().filter_map(|i| i.to_user_id).collect();
        peer_ids.extend(received_rows.iter().map(|i| i.from_user_id));
        let profiles = self.profiles_by_ids(peer_ids).await?;

        let with_peer = |row: invitation::Model,
                         peer_id: Option<Uuid>|
         -> anyhow::Result<InvitationWithPeer> {
            Ok(InvitationWithPeer {
                invitation: mapper::invitation_from_entity(row)?,
                peer: peer_id
                    .and_then(|id| profiles.get(&id))
                    .map(Profile::partner_profile),
            })
        };

        let mut sent = Vec::with_capacity(sent_rows.len());
        for row in sent_rows {
            let peer = row.to_user_id;
            sent.push(with_peer(row, peer)?);
        }
        let mut received = Vec::with_capacity(received_rows.len());
        for row in received_rows {
            let peer = Some(row.from_user_id);
            received.push(with_peer(row, peer)?);
        }

        Ok(PendingInvitations { sent, received })
    }
}
