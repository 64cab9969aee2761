use std::collections::HashMap;

use entity::prelude::*;
use entity::*;
use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;

use crate::dto::{
    Bag as BagDto, Club as ClubDto, CourseDetail, CourseFormData, CourseSummary,
    Event as EventDto, Participant, ParticipantScope, Profile as ProfileDto,
    ScorecardView, Series as SeriesDto, TeeSetForm, HoleForm,
};
use crate::error::GenericError;
use crate::store::{load_course_sheet, CourseStore, StoreError};
use crate::wizard::scorecard::ScorecardTotals;
use crate::wizard::{CourseWizard, WizardSettings, WizardState, WizardStep};

/// Courses by name. `active_only` limits the list to the courses offered
/// when creating events.
pub async fn list_courses(
    db: &DatabaseConnection,
    active_only: bool,
) -> Result<Vec<CourseSummary>, GenericError> {
    let mut query = Course::find();
    if active_only {
        query = query.filter(course::Column::IsActive.eq(true));
    }
    Ok(query
        .order_by_asc(course::Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

fn course_not_found(e: StoreError) -> GenericError {
    match e {
        StoreError::CourseNotFound(_) => GenericError::not_found("Course"),
        e => e.into(),
    }
}

pub async fn course_detail<S: CourseStore + ?Sized>(
    store: &S,
    course_id: i32,
) -> Result<CourseDetail, GenericError> {
    let sheet = load_course_sheet(store, course_id)
        .await
        .map_err(course_not_found)?;
    let tee_names: Vec<String> = sheet.tee_sets.iter().map(|t| t.name.clone()).collect();
    let totals = ScorecardTotals::compute(&sheet.holes, &tee_names);
    Ok(CourseDetail {
        id: sheet.course.id,
        course: CourseFormData::from(&sheet.course),
        tee_sets: sheet.tee_sets.into_iter().map(Into::into).collect(),
        holes: sheet.holes,
        totals,
    })
}

pub async fn course_tee_sets<S: CourseStore + ?Sized>(
    store: &S,
    course_id: i32,
) -> Result<Vec<TeeSetForm>, GenericError> {
    if store.fetch_course(course_id).await?.is_none() {
        return Err(GenericError::not_found("Course"));
    }
    Ok(store
        .fetch_tee_sets(course_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn course_holes<S: CourseStore + ?Sized>(
    store: &S,
    course_id: i32,
) -> Result<Vec<HoleForm>, GenericError> {
    Ok(load_course_sheet(store, course_id)
        .await
        .map_err(course_not_found)?
        .holes)
}

pub async fn course_scorecard<S: CourseStore + ?Sized>(
    store: &S,
    course_id: i32,
) -> Result<ScorecardView, GenericError> {
    let sheet = load_course_sheet(store, course_id)
        .await
        .map_err(course_not_found)?;
    let tee_sets: Vec<String> = sheet.tee_sets.into_iter().map(|t| t.name).collect();
    let totals = ScorecardTotals::compute(&sheet.holes, &tee_sets);
    Ok(ScorecardView {
        course_id,
        tee_sets,
        holes: sheet.holes,
        totals,
    })
}

/// Wizard state for editing an existing course, opened at `step`.
pub async fn wizard_state<S: CourseStore + ?Sized>(
    store: &S,
    settings: WizardSettings,
    course_id: i32,
    step: WizardStep,
) -> Result<WizardState, GenericError> {
    Ok(CourseWizard::open(store, settings, course_id, step)
        .await?
        .snapshot())
}

pub async fn list_series(db: &DatabaseConnection) -> Result<Vec<SeriesDto>, GenericError> {
    Ok(Series::find()
        .order_by_desc(series::Column::StartDate)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub(crate) async fn find_series(
    db: &DatabaseConnection,
    series_id: i32,
) -> Result<series::Model, GenericError> {
    Series::find_by_id(series_id)
        .one(db)
        .await?
        .ok_or_else(|| GenericError::not_found("Series"))
}

pub(crate) async fn find_event(
    db: &DatabaseConnection,
    event_id: i32,
) -> Result<event::Model, GenericError> {
    Event::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or_else(|| GenericError::not_found("Event"))
}

pub async fn get_series(db: &DatabaseConnection, series_id: i32) -> Result<SeriesDto, GenericError> {
    Ok(find_series(db, series_id).await?.into())
}

pub async fn list_events(db: &DatabaseConnection, series_id: i32) -> Result<Vec<EventDto>, GenericError> {
    find_series(db, series_id).await?;
    Ok(Event::find()
        .filter(event::Column::SeriesId.eq(series_id))
        .order_by_asc(event::Column::EventDate)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn get_event(db: &DatabaseConnection, event_id: i32) -> Result<EventDto, GenericError> {
    Ok(find_event(db, event_id).await?.into())
}

pub async fn list_participants(
    db: &DatabaseConnection,
    scope: ParticipantScope,
) -> Result<Vec<Participant>, GenericError> {
    Ok(match scope {
        ParticipantScope::Series(series_id) => {
            find_series(db, series_id).await?;
            SeriesParticipant::find()
                .filter(series_participant::Column::SeriesId.eq(series_id))
                .order_by_asc(series_participant::Column::Id)
                .all(db)
                .await?
                .into_iter()
                .map(Into::into)
                .collect()
        }
        ParticipantScope::Event(event_id) => {
            find_event(db, event_id).await?;
            EventParticipant::find()
                .filter(event_participant::Column::EventId.eq(event_id))
                .order_by_asc(event_participant::Column::Id)
                .all(db)
                .await?
                .into_iter()
                .map(Into::into)
                .collect()
        }
    })
}

pub async fn get_profile(db: &DatabaseConnection, user_id: Uuid) -> Result<ProfileDto, GenericError> {
    Profile::find_by_id(user_id)
        .one(db)
        .await?
        .map(Into::into)
        .ok_or_else(|| GenericError::not_found("Profile"))
}

pub async fn list_clubs(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<ClubDto>, GenericError> {
    Ok(Club::find()
        .filter(club::Column::UserId.eq(user_id))
        .order_by_asc(club::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn list_bags(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<BagDto>, GenericError> {
    let bags = Bag::find()
        .filter(bag::Column::UserId.eq(user_id))
        .order_by_asc(bag::Column::Id)
        .all(db)
        .await?;
    let mut clubs_by_bag: HashMap<i32, Vec<i32>> = HashMap::new();
    if !bags.is_empty() {
        for link in BagClub::find()
            .filter(bag_club::Column::BagId.is_in(bags.iter().map(|b| b.id)))
            .all(db)
            .await?
        {
            clubs_by_bag.entry(link.bag_id).or_default().push(link.club_id);
        }
    }
    Ok(bags
        .into_iter()
        .map(|b| {
            let club_ids = clubs_by_bag.remove(&b.id).unwrap_or_default();
            BagDto::from_model(b, club_ids)
        })
        .collect())
}
