use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

/// Invitation rows ("partnership requests"). Never deleted; status moves
/// pending -> accepted|declined exactly once. Partial unique indexes on
/// (from_user_id, to_user_id) and (from_user_id, to_user_email) where
/// status = 'pending' make duplicate sends lose at the store level.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "partnership_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub token: String,
    pub from_user_id: Uuid,
    pub to_user_id: Option<Uuid>,
    pub to_user_email: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
