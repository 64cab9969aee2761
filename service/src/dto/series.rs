use chrono::{DateTime, FixedOffset, NaiveDate};
use entity::sea_orm_active_enums::{
    CompetitionStatus as DbCompetitionStatus, ParticipantStatus as DbParticipantStatus,
};
use entity::{event, event_participant, series, series_participant};
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionStatus {
    #[default]
    Upcoming,
    Active,
    Completed,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    #[default]
    Registered,
    Confirmed,
    Withdrawn,
    NoShow,
}

impl From<DbCompetitionStatus> for CompetitionStatus {
    fn from(status: DbCompetitionStatus) -> Self {
        match status {
            DbCompetitionStatus::Upcoming => Self::Upcoming,
            DbCompetitionStatus::Active => Self::Active,
            DbCompetitionStatus::Completed => Self::Completed,
        }
    }
}

impl From<CompetitionStatus> for DbCompetitionStatus {
    fn from(status: CompetitionStatus) -> Self {
        match status {
            CompetitionStatus::Upcoming => Self::Upcoming,
            CompetitionStatus::Active => Self::Active,
            CompetitionStatus::Completed => Self::Completed,
        }
    }
}

impl From<DbParticipantStatus> for ParticipantStatus {
    fn from(status: DbParticipantStatus) -> Self {
        match status {
            DbParticipantStatus::Registered => Self::Registered,
            DbParticipantStatus::Confirmed => Self::Confirmed,
            DbParticipantStatus::Withdrawn => Self::Withdrawn,
            DbParticipantStatus::NoShow => Self::NoShow,
        }
    }
}

impl From<ParticipantStatus> for DbParticipantStatus {
    fn from(status: ParticipantStatus) -> Self {
        match status {
            ParticipantStatus::Registered => Self::Registered,
            ParticipantStatus::Confirmed => Self::Confirmed,
            ParticipantStatus::Withdrawn => Self::Withdrawn,
            ParticipantStatus::NoShow => Self::NoShow,
        }
    }
}

#[derive(Deserialize, JsonSchema, Debug, Clone)]
pub struct SeriesInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(alias = "startDate")]
    pub start_date: NaiveDate,
    #[serde(alias = "endDate")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: CompetitionStatus,
}

impl SeriesInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", "Series name is required"));
        }
        if self.end_date < self.start_date {
            return Err(ValidationError::new(
                "end_date",
                "End date must not be before the start date",
            ));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Series {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: CompetitionStatus,
}

impl From<series::Model> for Series {
    fn from(model: series::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            start_date: model.start_date,
            end_date: model.end_date,
            status: model.status.into(),
        }
    }
}

#[derive(Deserialize, JsonSchema, Debug, Clone)]
pub struct EventInput {
    pub name: String,
    #[serde(alias = "courseId")]
    pub course_id: i32,
    #[serde(alias = "eventDate", alias = "date")]
    pub event_date: NaiveDate,
    #[serde(default)]
    pub status: CompetitionStatus,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Event {
    pub id: i32,
    pub series_id: Option<i32>,
    pub course_id: i32,
    pub name: String,
    pub event_date: NaiveDate,
    pub status: CompetitionStatus,
}

impl From<event::Model> for Event {
    fn from(model: event::Model) -> Self {
        Self {
            id: model.id,
            series_id: model.series_id,
            course_id: model.course_id,
            name: model.name,
            event_date: model.event_date,
            status: model.status.into(),
        }
    }
}

#[derive(Deserialize, JsonSchema, Debug, Clone, Copy)]
pub struct StatusUpdate {
    pub status: CompetitionStatus,
}

#[derive(Deserialize, JsonSchema, Debug, Clone, Copy)]
pub struct ParticipantInput {
    #[serde(alias = "userId")]
    pub user_id: Uuid,
    #[serde(default)]
    pub status: Option<ParticipantStatus>,
}

#[derive(Deserialize, JsonSchema, Debug, Clone, Copy)]
pub struct ParticipantStatusUpdate {
    pub status: ParticipantStatus,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Participant {
    pub id: i32,
    pub user_id: Uuid,
    pub status: ParticipantStatus,
    pub joined_at: DateTime<FixedOffset>,
}

impl From<series_participant::Model> for Participant {
    fn from(model: series_participant::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            status: model.status.into(),
            joined_at: model.joined_at,
        }
    }
}

impl From<event_participant::Model> for Participant {
    fn from(model: event_participant::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            status: model.status.into(),
            joined_at: model.joined_at,
        }
    }
}

/// Which roster a participant operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantScope {
    Series(i32),
    Event(i32),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn statuses_use_snake_case() {
        assert_eq!(serde_json::to_value(ParticipantStatus::NoShow).unwrap(), json!("no_show"));
        assert_eq!(
            serde_json::from_value::<CompetitionStatus>(json!("completed")).unwrap(),
            CompetitionStatus::Completed
        );
    }

    #[test]
    fn series_dates_must_be_ordered() {
        let input: SeriesInput = serde_json::from_value(json!({
            "name": "Summer League",
            "startDate": "2024-07-01",
            "endDate": "2024-06-01"
        }))
        .unwrap();
        assert_eq!(input.status, CompetitionStatus::Upcoming);
        assert_eq!(input.validate().unwrap_err().field, "end_date");
    }
}
