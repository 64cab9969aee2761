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
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::Username).string().not_null())
                    .col(ColumnDef::new(Profiles::FullName).string())
                    .col(ColumnDef::new(Profiles::Handicap).double())
                    .col(ColumnDef::new(Profiles::HomeCourseId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Profiles::Table, Profiles::HomeCourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Clubs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clubs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Clubs::UserId).uuid().not_null())
                    .col(ColumnDef::new(Clubs::Name).string().not_null())
                    .col(ColumnDef::new(Clubs::ClubType).string_len(16).not_null())
                    .col(ColumnDef::new(Clubs::Brand).string())
                    .col(ColumnDef::new(Clubs::ModelName).string())
                    .col(ColumnDef::new(Clubs::Loft).double())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Bags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bags::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bags::UserId).uuid().not_null())
                    .col(ColumnDef::new(Bags::Name).string().not_null())
                    .col(ColumnDef::new(Bags::Brand).string())
                    .col(ColumnDef::new(Bags::ModelName).string())
                    .col(
                        ColumnDef::new(Bags::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BagClubs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BagClubs::BagId).integer().not_null())
                    .col(ColumnDef::new(BagClubs::ClubId).integer().not_null())
                    .primary_key(Index::create().col(BagClubs::BagId).col(BagClubs::ClubId))
                    .foreign_key(
                        ForeignKey::create()
                            .from(BagClubs::Table, BagClubs::BagId)
                            .to(Bags::Table, Bags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BagClubs::Table, BagClubs::ClubId)
                            .to(Clubs::Table, Clubs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_table!(BagClubs, manager);
        drop_table!(Bags, manager);
        drop_table!(Clubs, manager);
        drop_table!(Profiles, manager);
        Ok(())
    }
}
