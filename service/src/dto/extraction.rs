use rocket::FromFormField;
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumString};

use super::course::{amenities, CourseFormData, HoleForm, TeeSetForm};

/// What the extraction service should read off the uploaded image.
#[derive(
    Serialize,
    Deserialize,
    JsonSchema,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    FromFormField,
    Display,
    EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ExtractType {
    #[field(value = "courseInfo")]
    CourseInfo,
    #[field(value = "teeSets")]
    TeeSets,
    #[field(value = "scorecard")]
    Scorecard,
    #[field(value = "all")]
    All,
}

/// Course information as read off an image. Only the keys present in the
/// payload are applied to a form.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq)]
pub struct CourseInfoPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "address")]
    pub location: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, alias = "holeCount", alias = "hole_count")]
    pub holes: Option<i32>,
    #[serde(default)]
    pub par: Option<i32>,
    #[serde(default, deserialize_with = "amenities")]
    #[schemars(with = "Option<String>")]
    pub amenities: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, alias = "phone", alias = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(default, alias = "isActive")]
    pub is_active: Option<bool>,
}

impl CourseInfoPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn merge_into(self, form: &mut CourseFormData) {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(location) = self.location {
            form.location = location;
        }
        if self.city.is_some() {
            form.city = self.city;
        }
        if self.state.is_some() {
            form.state = self.state;
        }
        if let Some(holes) = self.holes {
            form.holes = holes;
        }
        if let Some(par) = self.par {
            form.par = par;
        }
        if self.amenities.is_some() {
            form.amenities = self.amenities;
        }
        if self.website.is_some() {
            form.website = self.website;
        }
        if self.phone_number.is_some() {
            form.phone_number = self.phone_number;
        }
        if let Some(active) = self.is_active {
            form.is_active = active;
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TeeSetsPayload {
    List(Vec<TeeSetForm>),
    Wrapped {
        #[serde(alias = "teeSets", alias = "tee_sets")]
        tee_sets: Vec<TeeSetForm>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HolesPayload {
    List(Vec<HoleForm>),
    Wrapped { holes: Vec<HoleForm> },
}

#[derive(Deserialize)]
struct AllPayload {
    #[serde(default, alias = "courseInfo")]
    course_info: Option<CourseInfoPatch>,
    #[serde(default, alias = "teeSets")]
    tee_sets: Option<TeeSetsPayload>,
    #[serde(default, alias = "scorecard")]
    holes: Option<HolesPayload>,
}

impl From<TeeSetsPayload> for Vec<TeeSetForm> {
    fn from(payload: TeeSetsPayload) -> Self {
        match payload {
            TeeSetsPayload::List(list) | TeeSetsPayload::Wrapped { tee_sets: list } => list,
        }
    }
}

impl From<HolesPayload> for Vec<HoleForm> {
    fn from(payload: HolesPayload) -> Self {
        match payload {
            HolesPayload::List(list) | HolesPayload::Wrapped { holes: list } => list,
        }
    }
}

/// Normalised extraction result, whatever was asked for.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq)]
pub struct ExtractedData {
    #[serde(default, alias = "courseInfo")]
    pub course_info: Option<CourseInfoPatch>,
    #[serde(default, alias = "teeSets")]
    pub tee_sets: Option<Vec<TeeSetForm>>,
    #[serde(default)]
    pub holes: Option<Vec<HoleForm>>,
}

impl ExtractedData {
    pub fn from_payload(extract_type: ExtractType, data: Value) -> serde_json::Result<Self> {
        Ok(match extract_type {
            ExtractType::CourseInfo => Self {
                course_info: Some(serde_json::from_value(data)?),
                ..Default::default()
            },
            ExtractType::TeeSets => Self {
                tee_sets: Some(serde_json::from_value::<TeeSetsPayload>(data)?.into()),
                ..Default::default()
            },
            ExtractType::Scorecard => Self {
                holes: Some(serde_json::from_value::<HolesPayload>(data)?.into()),
                ..Default::default()
            },
            ExtractType::All => {
                let all: AllPayload = serde_json::from_value(data)?;
                Self {
                    course_info: all.course_info,
                    tee_sets: all.tee_sets.map(Into::into),
                    holes: all.holes.map(Into::into),
                }
            }
        })
    }

    pub fn is_empty(&self) -> bool {
        self.course_info.as_ref().map_or(true, CourseInfoPatch::is_empty)
            && self.tee_sets.as_ref().map_or(true, Vec::is_empty)
            && self.holes.as_ref().map_or(true, Vec::is_empty)
    }
}

/// Body of `POST /api/scorecard`.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct ScorecardExtraction {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ExtractedData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScorecardExtraction {
    pub fn ok(data: ExtractedData) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}
