use entity::sea_orm_active_enums::ClubType as DbClubType;
use entity::{bag, club, profile};
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClubType {
    Driver,
    Wood,
    Hybrid,
    Iron,
    Wedge,
    Putter,
}

impl From<DbClubType> for ClubType {
    fn from(kind: DbClubType) -> Self {
        match kind {
            DbClubType::Driver => Self::Driver,
            DbClubType::Wood => Self::Wood,
            DbClubType::Hybrid => Self::Hybrid,
            DbClubType::Iron => Self::Iron,
            DbClubType::Wedge => Self::Wedge,
            DbClubType::Putter => Self::Putter,
        }
    }
}

impl From<ClubType> for DbClubType {
    fn from(kind: ClubType) -> Self {
        match kind {
            ClubType::Driver => Self::Driver,
            ClubType::Wood => Self::Wood,
            ClubType::Hybrid => Self::Hybrid,
            ClubType::Iron => Self::Iron,
            ClubType::Wedge => Self::Wedge,
            ClubType::Putter => Self::Putter,
        }
    }
}

#[derive(Deserialize, JsonSchema, Debug, Clone)]
pub struct ProfileInput {
    pub username: String,
    #[serde(default, alias = "fullName")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub handicap: Option<f64>,
    #[serde(default, alias = "homeCourseId")]
    pub home_course_id: Option<i32>,
}

impl ProfileInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::new("username", "Username is required"));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub handicap: Option<f64>,
    pub home_course_id: Option<i32>,
}

impl From<profile::Model> for Profile {
    fn from(model: profile::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            full_name: model.full_name,
            handicap: model.handicap,
            home_course_id: model.home_course_id,
        }
    }
}

#[derive(Deserialize, JsonSchema, Debug, Clone)]
pub struct ClubInput {
    pub name: String,
    #[serde(alias = "clubType", alias = "type")]
    pub club_type: ClubType,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default, alias = "model")]
    pub model_name: Option<String>,
    #[serde(default)]
    pub loft: Option<f64>,
}

impl ClubInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", "Club name is required"));
        }
        if let Some(loft) = self.loft {
            if !(0.0..=90.0).contains(&loft) {
                return Err(ValidationError::new("loft", "Loft must be between 0 and 90 degrees"));
            }
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Club {
    pub id: i32,
    pub name: String,
    pub club_type: ClubType,
    pub brand: Option<String>,
    pub model_name: Option<String>,
    pub loft: Option<f64>,
}

impl From<club::Model> for Club {
    fn from(model: club::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            club_type: model.club_type.into(),
            brand: model.brand,
            model_name: model.model_name,
            loft: model.loft,
        }
    }
}

#[derive(Deserialize, JsonSchema, Debug, Clone)]
pub struct BagInput {
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default, alias = "model")]
    pub model_name: Option<String>,
    #[serde(default, alias = "isPrimary")]
    pub is_primary: bool,
    #[serde(default, alias = "clubIds", alias = "clubs")]
    pub club_ids: Vec<i32>,
}

impl BagInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", "Bag name is required"));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Bag {
    pub id: i32,
    pub name: String,
    pub brand: Option<String>,
    pub model_name: Option<String>,
    pub is_primary: bool,
    pub club_ids: Vec<i32>,
}

impl Bag {
    pub fn from_model(model: bag::Model, mut club_ids: Vec<i32>) -> Self {
        club_ids.sort_unstable();
        Self {
            id: model.id,
            name: model.name,
            brand: model.brand,
            model_name: model.model_name,
            is_primary: model.is_primary,
            club_ids,
        }
    }
}
