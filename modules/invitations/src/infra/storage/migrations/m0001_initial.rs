use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Profiles::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Profiles::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Profiles::Name).string())
                    .col(ColumnDef::new(Profiles::ProfilePictureUrl).string())
                    .col(ColumnDef::new(Profiles::MaxPartnerships).integer())
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Partnerships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Partnerships::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Partnerships::Profile1Id).uuid().not_null())
                    .col(ColumnDef::new(Partnerships::Profile2Id).uuid().not_null())
                    .col(ColumnDef::new(Partnerships::Status).string().not_null())
                    .col(
                        ColumnDef::new(Partnerships::StreakDays)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Partnerships::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PartnershipRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PartnershipRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PartnershipRequests::Token)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PartnershipRequests::FromUserId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PartnershipRequests::ToUserId).uuid())
                    .col(ColumnDef::new(PartnershipRequests::ToUserEmail).string())
                    .col(
                        ColumnDef::new(PartnershipRequests::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PartnershipRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PartnershipRequests::ExpiresAt)
                            .timestamp_with_time_zone(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_partnerships_profile1")
                    .table(Partnerships::Table)
                    .col(Partnerships::Profile1Id)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_partnerships_profile2")
                    .table(Partnerships::Table)
                    .col(Partnerships::Profile2Id)
                    .to_owned(),
            )
            .await?;

        // Partial unique indexes: at most one pending invitation per
        // (sender, recipient), whichever way the recipient is referenced.
        // Under concurrent sends the pre-checks can both pass; these make
        // the second insert fail, which the repo reports as a duplicate.
        let conn = manager.get_connection();
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX idx_requests_pending_to_id \
             ON partnership_requests (from_user_id, to_user_id) \
             WHERE status = 'pending' AND to_user_id IS NOT NULL",
        )
        .await?;
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX idx_requests_pending_to_email \
             ON partnership_requests (from_user_id, lower(to_user_email)) \
             WHERE status = 'pending' AND to_user_email IS NOT NULL",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PartnershipRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Partnerships::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    Email,
    Name,
    ProfilePictureUrl,
    MaxPartnerships,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Partnerships {
    Table,
    Id,
    Profile1Id,
    Profile2Id,
    Status,
    StreakDays,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PartnershipRequests {
    Table,
    Id,
    Token,
    FromUserId,
    ToUserId,
    ToUserEmail,
    Status,
    CreatedAt,
    ExpiresAt,
}
