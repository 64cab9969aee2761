use std::collections::{BTreeMap, HashSet};

use entity::{course, hole, tee_set, tee_set_distance};
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::wizard::scorecard::ScorecardTotals;

pub const DEFAULT_HOLE_COUNT: i32 = 18;
pub const DEFAULT_COURSE_PAR: i32 = 72;
pub const MAX_HOLE_COUNT: i32 = 36;
/// Longest hole, in yards, the scorecard accepts.
pub const MAX_HOLE_LENGTH: i32 = 1000;

const MIN_SLOPE: i32 = 55;
const MAX_SLOPE: i32 = 155;

/// Course information step of the wizard.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct CourseFormData {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "address")]
    pub location: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default = "default_holes", alias = "holeCount", alias = "hole_count")]
    pub holes: i32,
    #[serde(default = "default_par")]
    pub par: i32,
    /// Free text. A list of strings is accepted and joined.
    #[serde(default, deserialize_with = "amenities")]
    #[schemars(with = "Option<String>")]
    pub amenities: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, alias = "phone", alias = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(default = "default_active", alias = "isActive", alias = "active")]
    pub is_active: bool,
}

fn default_holes() -> i32 {
    DEFAULT_HOLE_COUNT
}

fn default_par() -> i32 {
    DEFAULT_COURSE_PAR
}

fn default_active() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmenitiesInput {
    Text(String),
    List(Vec<String>),
}

pub(crate) fn amenities<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<AmenitiesInput>::deserialize(deserializer)?.and_then(|input| {
            let text = match input {
                AmenitiesInput::Text(text) => text.trim().to_string(),
                AmenitiesInput::List(items) => items
                    .iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(", "),
            };
            (!text.is_empty()).then_some(text)
        }),
    )
}

impl Default for CourseFormData {
    fn default() -> Self {
        Self {
            name: String::new(),
            location: String::new(),
            city: None,
            state: None,
            holes: DEFAULT_HOLE_COUNT,
            par: DEFAULT_COURSE_PAR,
            amenities: None,
            website: None,
            phone_number: None,
            is_active: true,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl CourseFormData {
    /// The location to store: the free-text field when filled in, otherwise
    /// whatever city/state pair was given.
    pub fn effective_location(&self) -> Option<String> {
        let location = self.location.trim();
        if !location.is_empty() {
            return Some(location.to_string());
        }
        match (non_blank(&self.city), non_blank(&self.state)) {
            (Some(city), Some(state)) => Some(format!("{city}, {state}")),
            (Some(city), None) => Some(city.to_string()),
            (None, Some(state)) => Some(state.to_string()),
            (None, None) => None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", "Course name is required"));
        }
        if self.effective_location().is_none() {
            return Err(ValidationError::new("location", "Location is required"));
        }
        if !(1..=MAX_HOLE_COUNT).contains(&self.holes) {
            return Err(ValidationError::new(
                "holes",
                format!("Hole count must be between 1 and {MAX_HOLE_COUNT}"),
            ));
        }
        if self.par <= 0 {
            return Err(ValidationError::new("par", "Par must be positive"));
        }
        Ok(())
    }
}

impl From<&course::Model> for CourseFormData {
    fn from(model: &course::Model) -> Self {
        Self {
            name: model.name.clone(),
            location: model.location.clone(),
            city: model.city.clone(),
            state: model.state.clone(),
            holes: model.holes,
            par: model.par,
            amenities: model.amenities.clone(),
            website: model.website.clone(),
            phone_number: model.phone_number.clone(),
            is_active: model.is_active,
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct TeeSetForm {
    /// Present once persisted. Ignored on save: the list is replaced.
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, alias = "courseRating", alias = "course_rating")]
    pub rating: f64,
    #[serde(default, alias = "slopeRating", alias = "slope_rating")]
    pub slope: i32,
    #[serde(default)]
    pub par: Option<i32>,
    #[serde(
        default,
        alias = "totalDistance",
        alias = "total_distance",
        alias = "yardage"
    )]
    pub distance: Option<i32>,
}

impl From<tee_set::Model> for TeeSetForm {
    fn from(model: tee_set::Model) -> Self {
        Self {
            id: Some(model.id),
            name: model.name,
            color: model.color,
            rating: model.rating,
            slope: model.slope,
            par: model.par,
            distance: model.distance,
        }
    }
}

/// Tee set names are matched without regard to case.
pub fn same_tee(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

pub fn validate_tee_sets(tee_sets: &[TeeSetForm]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for (i, tee) in tee_sets.iter().enumerate() {
        let field = |name: &str| format!("tee_sets[{i}].{name}");
        let name = tee.name.trim();
        if name.is_empty() {
            return Err(ValidationError::new(field("name"), "Tee set name is required"));
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(ValidationError::new(
                field("name"),
                format!("Tee set \"{name}\" appears more than once"),
            ));
        }
        if !(tee.rating.is_finite() && tee.rating > 0.0) {
            return Err(ValidationError::new(field("rating"), "Course rating must be positive"));
        }
        if !(MIN_SLOPE..=MAX_SLOPE).contains(&tee.slope) {
            return Err(ValidationError::new(
                field("slope"),
                format!("Slope rating must be between {MIN_SLOPE} and {MAX_SLOPE}"),
            ));
        }
    }
    Ok(())
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
pub struct HoleForm {
    #[serde(alias = "hole_number", alias = "holeNumber")]
    pub number: i32,
    pub par: i32,
    #[serde(default, alias = "handicapIndex", alias = "handicap")]
    pub handicap_index: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Yards from each tee set, keyed by tee set name.
    #[serde(
        default,
        alias = "tee_set_distances",
        alias = "teeSetDistances",
        alias = "tee_set_lengths",
        alias = "lengths"
    )]
    pub distances: BTreeMap<String, i32>,
}

impl HoleForm {
    /// Blank scorecard: par 4 everywhere, handicap following hole order.
    pub fn defaults(count: i32) -> Vec<Self> {
        (1..=count.clamp(0, MAX_HOLE_COUNT))
            .map(|number| Self {
                number,
                par: 4,
                handicap_index: Some(number),
                notes: None,
                distances: BTreeMap::new(),
            })
            .collect()
    }

    /// Joins stored holes and distance rows back into form rows, naming
    /// each distance after its tee set.
    pub fn assemble(
        holes: Vec<hole::Model>,
        tee_sets: &[tee_set::Model],
        distances: &[tee_set_distance::Model],
    ) -> Vec<Self> {
        holes
            .into_iter()
            .map(|hole| {
                let distances = distances
                    .iter()
                    .filter(|d| d.hole_id == hole.id)
                    .filter_map(|d| {
                        tee_sets
                            .iter()
                            .find(|t| t.id == d.tee_set_id)
                            .map(|t| (t.name.clone(), d.length))
                    })
                    .collect();
                Self {
                    number: hole.hole_number,
                    par: hole.par,
                    handicap_index: hole.handicap_index,
                    notes: hole.notes,
                    distances,
                }
            })
            .collect()
    }

    /// Trims or extends `holes` so they cover hole numbers `1..=count`.
    /// Handicap indexes that no longer fit fall back to the hole number.
    pub fn fit_to(holes: &mut Vec<Self>, count: i32) {
        let count = count.clamp(0, MAX_HOLE_COUNT);
        holes.retain(|h| (1..=count).contains(&h.number));
        for blank in Self::defaults(count) {
            if !holes.iter().any(|h| h.number == blank.number) {
                holes.push(blank);
            }
        }
        holes.sort_by_key(|h| h.number);
        for hole in holes.iter_mut() {
            if hole.handicap_index.is_some_and(|h| !(1..=count).contains(&h)) {
                hole.handicap_index = Some(hole.number);
            }
        }
    }

    pub fn distance(&self, tee: &str) -> Option<i32> {
        self.distances
            .iter()
            .find(|(name, _)| same_tee(name, tee))
            .map(|(_, length)| *length)
    }

    /// Removes every distance keyed to `tee`, whatever its spelling.
    pub fn take_distance(&mut self, tee: &str) -> Option<i32> {
        let keys: Vec<String> = self
            .distances
            .keys()
            .filter(|name| same_tee(name, tee))
            .cloned()
            .collect();
        let mut taken = None;
        for key in keys {
            let length = self.distances.remove(&key);
            taken = taken.or(length);
        }
        taken
    }

    pub fn set_distance(&mut self, tee: &str, length: i32) {
        self.take_distance(tee);
        self.distances.insert(tee.to_string(), length);
    }
}

/// Checks a full scorecard for a course of `hole_count` holes.
pub fn validate_holes(
    holes: &[HoleForm],
    hole_count: i32,
    tee_names: &[String],
) -> Result<(), ValidationError> {
    let count = hole_count;
    if usize::try_from(count).ok() != Some(holes.len()) {
        return Err(ValidationError::new(
            "holes",
            format!("The course has {count} holes but the scorecard has {}", holes.len()),
        ));
    }
    let known: HashSet<String> = tee_names.iter().map(|n| n.to_lowercase()).collect();
    let mut numbers = HashSet::new();
    for (i, hole) in holes.iter().enumerate() {
        let field = |name: &str| format!("holes[{i}].{name}");
        if !(1..=count).contains(&hole.number) {
            return Err(ValidationError::new(
                field("number"),
                format!("Hole number must be between 1 and {count}"),
            ));
        }
        if !numbers.insert(hole.number) {
            return Err(ValidationError::new(
                field("number"),
                format!("Hole {} appears more than once", hole.number),
            ));
        }
        if !(3..=6).contains(&hole.par) {
            return Err(ValidationError::new(field("par"), "Par must be between 3 and 6"));
        }
        if let Some(handicap) = hole.handicap_index {
            if !(1..=count).contains(&handicap) {
                return Err(ValidationError::new(
                    field("handicap_index"),
                    format!("Handicap index must be between 1 and {count}"),
                ));
            }
        }
        let mut tees = HashSet::new();
        for (tee, length) in &hole.distances {
            let key = tee.to_lowercase();
            if !known.contains(&key) {
                return Err(ValidationError::new(
                    field("distances"),
                    format!("Unknown tee set \"{tee}\""),
                ));
            }
            if !tees.insert(key) {
                return Err(ValidationError::new(
                    field("distances"),
                    format!("More than one distance from {tee}"),
                ));
            }
            if !(1..=MAX_HOLE_LENGTH).contains(length) {
                return Err(ValidationError::new(
                    field("distances"),
                    format!("Distance from {tee} must be between 1 and {MAX_HOLE_LENGTH} yards"),
                ));
            }
        }
    }
    Ok(())
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct CourseSummary {
    pub id: i32,
    pub name: String,
    pub location: String,
    pub holes: i32,
    pub par: i32,
    pub is_active: bool,
}

impl From<course::Model> for CourseSummary {
    fn from(model: course::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            location: model.location,
            holes: model.holes,
            par: model.par,
            is_active: model.is_active,
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct CourseDetail {
    pub id: i32,
    pub course: CourseFormData,
    pub tee_sets: Vec<TeeSetForm>,
    pub holes: Vec<HoleForm>,
    pub totals: ScorecardTotals,
}

/// The scorecard as the grid shows it: one distance column per tee set.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct ScorecardView {
    pub course_id: i32,
    pub tee_sets: Vec<String>,
    pub holes: Vec<HoleForm>,
    pub totals: ScorecardTotals,
}

#[derive(Deserialize, JsonSchema, Debug, Clone, Copy)]
pub struct ActiveToggle {
    #[serde(alias = "isActive")]
    pub is_active: bool,
}
