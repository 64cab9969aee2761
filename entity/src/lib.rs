//! SeaORM entities for the canonical course, event and equipment schema.

pub mod prelude;

pub mod bag;
pub mod bag_club;
pub mod club;
pub mod course;
pub mod event;
pub mod event_participant;
pub mod hole;
pub mod profile;
pub mod sea_orm_active_enums;
pub mod series;
pub mod series_participant;
pub mod tee_set;
pub mod tee_set_distance;
