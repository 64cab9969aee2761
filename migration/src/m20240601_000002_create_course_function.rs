use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// `create_course` is the stored function the course wizard calls first when
/// creating a course. Only Postgres gets it; other backends go straight to
/// the direct insert.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() != DbBackend::Postgres {
            return Ok(());
        }
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            CREATE OR REPLACE FUNCTION create_course(
                p_name text,
                p_location text,
                p_city text,
                p_state text,
                p_holes integer,
                p_par integer,
                p_amenities text,
                p_website text,
                p_phone_number text,
                p_is_active boolean
            ) RETURNS integer
            LANGUAGE sql
            AS $$
                INSERT INTO courses (
                    name, location, city, state, holes, par,
                    amenities, website, phone_number, is_active
                )
                VALUES (
                    p_name, p_location, p_city, p_state, p_holes, p_par,
                    p_amenities, p_website, p_phone_number, p_is_active
                )
                RETURNING id;
            $$;
            "#,
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() != DbBackend::Postgres {
            return Ok(());
        }
        manager
            .get_connection()
            .execute_unprepared(
                "DROP FUNCTION IF EXISTS create_course(text, text, text, text, integer, integer, text, text, text, boolean);",
            )
            .await?;
        Ok(())
    }
}
