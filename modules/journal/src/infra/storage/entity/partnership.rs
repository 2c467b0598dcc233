use sea_orm::entity::prelude::*;
use uuid::Uuid;

/// Read-only view of the partnerships table, which is owned (created and
/// migrated) by the invitations module. Only the columns journal queries
/// are mapped.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "partnerships")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub profile1_id: Uuid,
    pub profile2_id: Uuid,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
