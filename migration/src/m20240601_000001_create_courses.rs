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
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::Name).string().not_null())
                    .col(ColumnDef::new(Courses::Location).string().not_null())
                    .col(ColumnDef::new(Courses::City).string())
                    .col(ColumnDef::new(Courses::State).string())
                    .col(
                        ColumnDef::new(Courses::Holes)
                            .integer()
                            .not_null()
                            .default(18),
                    )
                    .col(ColumnDef::new(Courses::Par).integer().not_null().default(72))
                    .col(ColumnDef::new(Courses::Amenities).text())
                    .col(ColumnDef::new(Courses::Website).string())
                    .col(ColumnDef::new(Courses::PhoneNumber).string())
                    .col(
                        ColumnDef::new(Courses::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Courses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeeSets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeeSets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeeSets::CourseId).integer().not_null())
                    .col(ColumnDef::new(TeeSets::Name).string().not_null())
                    .col(ColumnDef::new(TeeSets::Color).string().not_null())
                    .col(ColumnDef::new(TeeSets::Rating).double().not_null())
                    .col(ColumnDef::new(TeeSets::Slope).integer().not_null())
                    .col(ColumnDef::new(TeeSets::Par).integer())
                    .col(ColumnDef::new(TeeSets::Distance).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeeSets::Table, TeeSets::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(unique_index!(
                "tee_sets_course_name_key",
                TeeSets,
                TeeSets::CourseId,
                TeeSets::Name
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Holes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Holes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Holes::CourseId).integer().not_null())
                    .col(ColumnDef::new(Holes::HoleNumber).integer().not_null())
                    .col(ColumnDef::new(Holes::Par).integer().not_null())
                    .col(ColumnDef::new(Holes::HandicapIndex).integer())
                    .col(ColumnDef::new(Holes::Notes).text())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Holes::Table, Holes::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(unique_index!(
                "holes_course_number_key",
                Holes,
                Holes::CourseId,
                Holes::HoleNumber
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeeSetDistances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeeSetDistances::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeeSetDistances::HoleId).integer().not_null())
                    .col(
                        ColumnDef::new(TeeSetDistances::TeeSetId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TeeSetDistances::Length).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeeSetDistances::Table, TeeSetDistances::HoleId)
                            .to(Holes::Table, Holes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeeSetDistances::Table, TeeSetDistances::TeeSetId)
                            .to(TeeSets::Table, TeeSets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(unique_index!(
                "tee_set_distances_hole_tee_key",
                TeeSetDistances,
                TeeSetDistances::HoleId,
                TeeSetDistances::TeeSetId
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_table!(TeeSetDistances, manager);
        drop_table!(Holes, manager);
        drop_table!(TeeSets, manager);
        drop_table!(Courses, manager);
        Ok(())
    }
}
