pub use sea_orm_migration::prelude::*;
mod enums;
mod m20240601_000001_create_courses;
mod m20240601_000002_create_course_function;
mod m20240608_000001_create_series_and_events;
mod m20240615_000001_create_profiles_and_equipment;
mod macros;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_courses::Migration),
            Box::new(m20240601_000002_create_course_function::Migration),
            Box::new(m20240608_000001_create_series_and_events::Migration),
            Box::new(m20240615_000001_create_profiles_and_equipment::Migration),
        ]
    }
}
