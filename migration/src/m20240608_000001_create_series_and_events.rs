use sea_orm_migration::prelude::*;

use crate::enums::*;
use crate::macros::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Series::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Series::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Series::Name).string().not_null())
                    .col(ColumnDef::new(Series::Description).text())
                    .col(ColumnDef::new(Series::StartDate).date().not_null())
                    .col(ColumnDef::new(Series::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(Series::Status)
                            .string_len(16)
                            .not_null()
                            .default("upcoming"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::SeriesId).integer())
                    .col(ColumnDef::new(Events::CourseId).integer().not_null())
                    .col(ColumnDef::new(Events::Name).string().not_null())
                    .col(ColumnDef::new(Events::EventDate).date().not_null())
                    .col(
                        ColumnDef::new(Events::Status)
                            .string_len(16)
                            .not_null()
                            .default("upcoming"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Events::Table, Events::SeriesId)
                            .to(Series::Table, Series::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Events::Table, Events::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SeriesParticipants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SeriesParticipants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SeriesParticipants::SeriesId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SeriesParticipants::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(SeriesParticipants::Status)
                            .string_len(16)
                            .not_null()
                            .default("registered"),
                    )
                    .col(
                        ColumnDef::new(SeriesParticipants::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SeriesParticipants::Table, SeriesParticipants::SeriesId)
                            .to(Series::Table, Series::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(unique_index!(
                "series_participants_series_user_key",
                SeriesParticipants,
                SeriesParticipants::SeriesId,
                SeriesParticipants::UserId
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EventParticipants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventParticipants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EventParticipants::EventId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EventParticipants::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(EventParticipants::Status)
                            .string_len(16)
                            .not_null()
                            .default("registered"),
                    )
                    .col(
                        ColumnDef::new(EventParticipants::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EventParticipants::Table, EventParticipants::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(unique_index!(
                "event_participants_event_user_key",
                EventParticipants,
                EventParticipants::EventId,
                EventParticipants::UserId
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_table!(EventParticipants, manager);
        drop_table!(SeriesParticipants, manager);
        drop_table!(Events, manager);
        drop_table!(Series, manager);
        Ok(())
    }
}
