use chrono::Utc;
use sea_orm_migration::prelude::*;
use uuid::Uuid;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Starter question pool. A fresh deployment can deal a daily question
/// before any editorial content is loaded.
const STARTER_QUESTIONS: &[(&str, &str)] = &[
    ("What made you smile today?", "daily"),
    ("What is one thing your partner did recently that you appreciated?", "gratitude"),
    ("What are you most looking forward to this week?", "daily"),
    ("Describe a moment from today you would like to remember.", "reflection"),
    ("What is something you would like to do together soon?", "plans"),
    ("What was the most challenging part of your day?", "reflection"),
    ("Which small habit of your partner do you secretly enjoy?", "gratitude"),
    ("If today had a soundtrack, what song would it be?", "fun"),
    ("What is one thing you learned recently?", "daily"),
    ("What would make tomorrow feel like a success?", "plans"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Questions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Questions::Text).string().not_null())
                    .col(ColumnDef::new(Questions::Category).string())
                    .col(
                        ColumnDef::new(Questions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuestionAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuestionAssignments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QuestionAssignments::PartnershipId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuestionAssignments::QuestionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(QuestionAssignments::Date).date().not_null())
                    .col(
                        ColumnDef::new(QuestionAssignments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Conflict target for the atomic daily deal.
        manager
            .create_index(
                Index::create()
                    .name("idx_assignments_partnership_date")
                    .table(QuestionAssignments::Table)
                    .col(QuestionAssignments::PartnershipId)
                    .col(QuestionAssignments::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Answers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Answers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Answers::UserId).uuid().not_null())
                    .col(ColumnDef::new(Answers::QuestionId).uuid().not_null())
                    .col(ColumnDef::new(Answers::Text).string().not_null())
                    .col(ColumnDef::new(Answers::Skipped).boolean().not_null())
                    .col(ColumnDef::new(Answers::SkipReason).string())
                    .col(ColumnDef::new(Answers::Visibility).string().not_null())
                    .col(
                        ColumnDef::new(Answers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Answers::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // One answer per user per question.
        manager
            .create_index(
                Index::create()
                    .name("idx_answers_user_question")
                    .table(Answers::Table)
                    .col(Answers::UserId)
                    .col(Answers::QuestionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MoodCheckins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MoodCheckins::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MoodCheckins::UserId).uuid().not_null())
                    .col(ColumnDef::new(MoodCheckins::Mood).integer().not_null())
                    .col(ColumnDef::new(MoodCheckins::Note).string())
                    .col(
                        ColumnDef::new(MoodCheckins::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MoodCheckins::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_checkins_user_created")
                    .table(MoodCheckins::Table)
                    .col(MoodCheckins::UserId)
                    .col(MoodCheckins::CreatedAt)
                    .to_owned(),
            )
            .await?;

        let now = Utc::now();
        let mut seed = Query::insert();
        seed.into_table(Questions::Table).columns([
            Questions::Id,
            Questions::Text,
            Questions::Category,
            Questions::CreatedAt,
        ]);
        for (text, category) in STARTER_QUESTIONS {
            seed.values([
                Uuid::new_v4().into(),
                (*text).into(),
                (*category).into(),
                now.into(),
            ])
            .map_err(|e| DbErr::Migration(e.to_string()))?;
        }
        manager.exec_stmt(seed.to_owned()).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MoodCheckins::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Answers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QuestionAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Questions {
    Table,
    Id,
    Text,
    Category,
    CreatedAt,
}

#[derive(DeriveIden)]
enum QuestionAssignments {
    Table,
    Id,
    PartnershipId,
    QuestionId,
    Date,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Answers {
    Table,
    Id,
    UserId,
    QuestionId,
    Text,
    Skipped,
    SkipReason,
    Visibility,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MoodCheckins {
    Table,
    Id,
    UserId,
    Mood,
    Note,
    CreatedAt,
    UpdatedAt,
}
