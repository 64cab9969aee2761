use chrono::Utc;
use entity::prelude::*;
use entity::*;
use itertools::Itertools;
use log::info;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::*;
use sea_orm::{ConnectionTrait, DatabaseTransaction, IntoActiveModel, TransactionTrait};

use crate::dto::{
    validate_holes, validate_tee_sets, Bag as BagDto, BagInput, Club as ClubDto, ClubInput,
    CourseFormData, CourseSummary, Event as EventDto, EventInput, ExtractType, HoleForm,
    Participant, ParticipantInput, ParticipantScope, ParticipantStatus, Profile as ProfileDto,
    ProfileInput, ScorecardExtraction, Series as SeriesDto, SeriesInput, TeeSetForm,
    CompetitionStatus as StatusDto,
};
use crate::error::{GenericError, ValidationError};
use crate::extraction::ExtractionClient;
use crate::query::{course_holes, find_event, find_series};
use crate::store::CourseStore;
use crate::wizard::{
    CourseWizard, ExtractionMerge, WizardResponse, WizardSettings, WizardState, WizardSubmission,
};

/// One wizard step from a stateless client: rebuild, submit, report.
pub async fn submit_wizard<S: CourseStore + ?Sized>(
    store: &S,
    settings: WizardSettings,
    submission: WizardSubmission,
) -> Result<WizardResponse, GenericError> {
    let mut wizard = CourseWizard::from_submission(store, settings, submission);
    let outcome = wizard.handle_submit().await?;
    Ok(WizardResponse {
        outcome,
        state: wizard.snapshot(),
    })
}

pub fn merge_extraction<S: CourseStore + ?Sized>(
    store: &S,
    settings: WizardSettings,
    merge: ExtractionMerge,
) -> WizardState {
    let mut wizard = CourseWizard::from_submission(store, settings, merge.state);
    wizard.apply_extraction(merge.data);
    wizard.snapshot()
}

pub async fn create_course<S: CourseStore + ?Sized>(
    store: &S,
    form: CourseFormData,
) -> Result<CourseSummary, GenericError> {
    form.validate()?;
    let id = store.save_course(None, &form).await?;
    store
        .fetch_course(id)
        .await?
        .map(Into::into)
        .ok_or_else(|| GenericError::not_found("Course"))
}

pub async fn set_course_active(
    db: &DatabaseConnection,
    course_id: i32,
    is_active: bool,
) -> Result<CourseSummary, GenericError> {
    let course = Course::find_by_id(course_id)
        .one(db)
        .await?
        .ok_or_else(|| GenericError::not_found("Course"))?;
    let mut course = course.into_active_model();
    course.is_active = Set(is_active);
    Ok(course.update(db).await?.into())
}

pub async fn delete_course(db: &DatabaseConnection, course_id: i32) -> Result<(), GenericError> {
    let res = Course::delete_by_id(course_id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(GenericError::not_found("Course"));
    }
    info!("Deleted course {course_id}");
    Ok(())
}

pub async fn replace_tee_sets<S: CourseStore + ?Sized>(
    store: &S,
    course_id: i32,
    tee_sets: Vec<TeeSetForm>,
) -> Result<Vec<TeeSetForm>, GenericError> {
    validate_tee_sets(&tee_sets)?;
    Ok(store
        .save_tee_sets(course_id, &tee_sets)
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn replace_holes<S: CourseStore + ?Sized>(
    store: &S,
    course_id: i32,
    holes: Vec<HoleForm>,
) -> Result<Vec<HoleForm>, GenericError> {
    let course = store
        .fetch_course(course_id)
        .await?
        .ok_or_else(|| GenericError::not_found("Course"))?;
    let tee_names: Vec<String> = store
        .fetch_tee_sets(course_id)
        .await?
        .into_iter()
        .map(|t| t.name)
        .collect();
    validate_holes(&holes, course.holes, &tee_names)?;
    store.save_scorecard(course_id, &holes).await?;
    course_holes(store, course_id).await
}

pub async fn extract_scorecard(
    client: &ExtractionClient,
    bytes: Vec<u8>,
    file_name: String,
    content_type: Option<&str>,
    extract_type: ExtractType,
) -> Result<ScorecardExtraction, GenericError> {
    let data = client
        .extract(bytes, file_name, content_type, extract_type)
        .await?;
    Ok(ScorecardExtraction::ok(data))
}

pub async fn create_series(db: &DatabaseConnection, input: SeriesInput) -> Result<SeriesDto, GenericError> {
    input.validate()?;
    let model = series::ActiveModel {
        id: NotSet,
        name: Set(input.name.trim().to_string()),
        description: Set(input.description),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        status: Set(input.status.into()),
    };
    Ok(model.insert(db).await?.into())
}

pub async fn update_series(
    db: &DatabaseConnection,
    series_id: i32,
    input: SeriesInput,
) -> Result<SeriesDto, GenericError> {
    input.validate()?;
    let existing = find_series(db, series_id).await?;
    let outside = Event::find()
        .filter(event::Column::SeriesId.eq(series_id))
        .filter(
            event::Column::EventDate
                .lt(input.start_date)
                .or(event::Column::EventDate.gt(input.end_date)),
        )
        .count(db)
        .await?;
    if outside > 0 {
        return Err(ValidationError::new(
            "start_date",
            format!("{outside} events of this series fall outside the new dates"),
        )
        .into());
    }
    let mut model = existing.into_active_model();
    model.name = Set(input.name.trim().to_string());
    model.description = Set(input.description);
    model.start_date = Set(input.start_date);
    model.end_date = Set(input.end_date);
    model.status = Set(input.status.into());
    Ok(model.update(db).await?.into())
}

pub async fn delete_series(db: &DatabaseConnection, series_id: i32) -> Result<(), GenericError> {
    let res = Series::delete_by_id(series_id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(GenericError::not_found("Series"));
    }
    Ok(())
}

/// Events live inside their series' dates and only on active courses.
pub async fn create_event(
    db: &DatabaseConnection,
    series_id: i32,
    input: EventInput,
) -> Result<EventDto, GenericError> {
    let series = find_series(db, series_id).await?;
    if input.name.trim().is_empty() {
        return Err(ValidationError::new("name", "Event name is required").into());
    }
    if input.event_date < series.start_date || input.event_date > series.end_date {
        return Err(ValidationError::new(
            "event_date",
            format!(
                "Event date must be between {} and {}",
                series.start_date, series.end_date
            ),
        )
        .into());
    }
    match Course::find_by_id(input.course_id).one(db).await? {
        Some(course) if course.is_active => {}
        Some(_) => {
            return Err(ValidationError::new("course_id", "Course is not active").into())
        }
        None => return Err(ValidationError::new("course_id", "Course does not exist").into()),
    }
    let model = event::ActiveModel {
        id: NotSet,
        series_id: Set(Some(series_id)),
        course_id: Set(input.course_id),
        name: Set(input.name.trim().to_string()),
        event_date: Set(input.event_date),
        status: Set(input.status.into()),
    };
    Ok(model.insert(db).await?.into())
}

pub async fn update_event_status(
    db: &DatabaseConnection,
    event_id: i32,
    status: StatusDto,
) -> Result<EventDto, GenericError> {
    let mut model = find_event(db, event_id).await?.into_active_model();
    model.status = Set(status.into());
    Ok(model.update(db).await?.into())
}

fn already_participating() -> GenericError {
    GenericError::Conflict("User is already a participant".to_string())
}

pub async fn add_participant(
    db: &DatabaseConnection,
    scope: ParticipantScope,
    input: ParticipantInput,
) -> Result<Participant, GenericError> {
    let status: sea_orm_active_enums::ParticipantStatus = input.status.unwrap_or_default().into();
    let joined_at = Utc::now().fixed_offset();
    Ok(match scope {
        ParticipantScope::Series(series_id) => {
            find_series(db, series_id).await?;
            if find_series_participant(db, series_id, input.user_id).await?.is_some() {
                return Err(already_participating());
            }
            series_participant::ActiveModel {
                id: NotSet,
                series_id: Set(series_id),
                user_id: Set(input.user_id),
                status: Set(status),
                joined_at: Set(joined_at),
            }
            .insert(db)
            .await?
            .into()
        }
        ParticipantScope::Event(event_id) => {
            find_event(db, event_id).await?;
            if find_event_participant(db, event_id, input.user_id).await?.is_some() {
                return Err(already_participating());
            }
            event_participant::ActiveModel {
                id: NotSet,
                event_id: Set(event_id),
                user_id: Set(input.user_id),
                status: Set(status),
                joined_at: Set(joined_at),
            }
            .insert(db)
            .await?
            .into()
        }
    })
}

async fn find_series_participant(
    db: &DatabaseConnection,
    series_id: i32,
    user_id: Uuid,
) -> Result<Option<series_participant::Model>, DbErr> {
    SeriesParticipant::find()
        .filter(series_participant::Column::SeriesId.eq(series_id))
        .filter(series_participant::Column::UserId.eq(user_id))
        .one(db)
        .await
}

async fn find_event_participant(
    db: &DatabaseConnection,
    event_id: i32,
    user_id: Uuid,
) -> Result<Option<event_participant::Model>, DbErr> {
    EventParticipant::find()
        .filter(event_participant::Column::EventId.eq(event_id))
        .filter(event_participant::Column::UserId.eq(user_id))
        .one(db)
        .await
}

pub async fn update_participant_status(
    db: &DatabaseConnection,
    scope: ParticipantScope,
    user_id: Uuid,
    status: ParticipantStatus,
) -> Result<Participant, GenericError> {
    let missing = || GenericError::not_found("Participant");
    Ok(match scope {
        ParticipantScope::Series(series_id) => {
            let mut model = find_series_participant(db, series_id, user_id)
                .await?
                .ok_or_else(missing)?
                .into_active_model();
            model.status = Set(status.into());
            model.update(db).await?.into()
        }
        ParticipantScope::Event(event_id) => {
            let mut model = find_event_participant(db, event_id, user_id)
                .await?
                .ok_or_else(missing)?
                .into_active_model();
            model.status = Set(status.into());
            model.update(db).await?.into()
        }
    })
}

pub async fn remove_participant(
    db: &DatabaseConnection,
    scope: ParticipantScope,
    user_id: Uuid,
) -> Result<(), GenericError> {
    let removed = match scope {
        ParticipantScope::Series(series_id) => {
            SeriesParticipant::delete_many()
                .filter(series_participant::Column::SeriesId.eq(series_id))
                .filter(series_participant::Column::UserId.eq(user_id))
                .exec(db)
                .await?
        }
        ParticipantScope::Event(event_id) => {
            EventParticipant::delete_many()
                .filter(event_participant::Column::EventId.eq(event_id))
                .filter(event_participant::Column::UserId.eq(user_id))
                .exec(db)
                .await?
        }
    };
    if removed.rows_affected == 0 {
        return Err(GenericError::not_found("Participant"));
    }
    Ok(())
}

pub async fn upsert_profile(
    db: &DatabaseConnection,
    user_id: Uuid,
    input: ProfileInput,
) -> Result<ProfileDto, GenericError> {
    input.validate()?;
    let existing = Profile::find_by_id(user_id).one(db).await?;
    let is_new = existing.is_none();
    let mut model = match existing {
        Some(profile) => profile.into_active_model(),
        None => profile::ActiveModel {
            id: Set(user_id),
            ..Default::default()
        },
    };
    model.username = Set(input.username.trim().to_string());
    model.full_name = Set(input.full_name);
    model.handicap = Set(input.handicap);
    model.home_course_id = Set(input.home_course_id);
    let saved = if is_new {
        model.insert(db).await?
    } else {
        model.update(db).await?
    };
    Ok(saved.into())
}

async fn owned_club(
    db: &DatabaseConnection,
    user_id: Uuid,
    club_id: i32,
) -> Result<club::Model, GenericError> {
    Club::find_by_id(club_id)
        .filter(club::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| GenericError::not_found("Club"))
}

pub async fn create_club(
    db: &DatabaseConnection,
    user_id: Uuid,
    input: ClubInput,
) -> Result<ClubDto, GenericError> {
    input.validate()?;
    let model = club::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        name: Set(input.name.trim().to_string()),
        club_type: Set(input.club_type.into()),
        brand: Set(input.brand),
        model_name: Set(input.model_name),
        loft: Set(input.loft),
    };
    Ok(model.insert(db).await?.into())
}

pub async fn update_club(
    db: &DatabaseConnection,
    user_id: Uuid,
    club_id: i32,
    input: ClubInput,
) -> Result<ClubDto, GenericError> {
    input.validate()?;
    let mut model = owned_club(db, user_id, club_id).await?.into_active_model();
    model.name = Set(input.name.trim().to_string());
    model.club_type = Set(input.club_type.into());
    model.brand = Set(input.brand);
    model.model_name = Set(input.model_name);
    model.loft = Set(input.loft);
    Ok(model.update(db).await?.into())
}

pub async fn delete_club(db: &DatabaseConnection, user_id: Uuid, club_id: i32) -> Result<(), GenericError> {
    owned_club(db, user_id, club_id).await?;
    Club::delete_by_id(club_id).exec(db).await?;
    Ok(())
}

/// Every id must name one of the caller's clubs.
async fn owned_club_ids(
    db: &DatabaseConnection,
    user_id: Uuid,
    club_ids: &[i32],
) -> Result<Vec<i32>, GenericError> {
    let wanted: Vec<i32> = club_ids.iter().copied().unique().collect();
    if wanted.is_empty() {
        return Ok(wanted);
    }
    let found = Club::find()
        .filter(club::Column::UserId.eq(user_id))
        .filter(club::Column::Id.is_in(wanted.iter().copied()))
        .count(db)
        .await?;
    if found != wanted.len() as u64 {
        return Err(ValidationError::new("club_ids", "Bags can only hold your own clubs").into());
    }
    Ok(wanted)
}

async fn link_clubs(txn: &DatabaseTransaction, bag_id: i32, club_ids: &[i32]) -> Result<(), DbErr> {
    BagClub::delete_many()
        .filter(bag_club::Column::BagId.eq(bag_id))
        .exec(txn)
        .await?;
    for club_id in club_ids {
        bag_club::ActiveModel {
            bag_id: Set(bag_id),
            club_id: Set(*club_id),
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}

async fn clear_primary<C: ConnectionTrait>(db: &C, user_id: Uuid, keep: Option<i32>) -> Result<(), DbErr> {
    let mut query = Bag::update_many()
        .col_expr(bag::Column::IsPrimary, Expr::value(false))
        .filter(bag::Column::UserId.eq(user_id));
    if let Some(keep) = keep {
        query = query.filter(bag::Column::Id.ne(keep));
    }
    query.exec(db).await?;
    Ok(())
}

pub async fn create_bag(db: &DatabaseConnection, user_id: Uuid, input: BagInput) -> Result<BagDto, GenericError> {
    input.validate()?;
    let club_ids = owned_club_ids(db, user_id, &input.club_ids).await?;
    let txn = db.begin().await?;
    if input.is_primary {
        clear_primary(&txn, user_id, None).await?;
    }
    let bag = bag::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        name: Set(input.name.trim().to_string()),
        brand: Set(input.brand),
        model_name: Set(input.model_name),
        is_primary: Set(input.is_primary),
    }
    .insert(&txn)
    .await?;
    link_clubs(&txn, bag.id, &club_ids).await?;
    txn.commit().await?;
    Ok(BagDto::from_model(bag, club_ids))
}

pub async fn update_bag(
    db: &DatabaseConnection,
    user_id: Uuid,
    bag_id: i32,
    input: BagInput,
) -> Result<BagDto, GenericError> {
    input.validate()?;
    let existing = Bag::find_by_id(bag_id)
        .filter(bag::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| GenericError::not_found("Bag"))?;
    let club_ids = owned_club_ids(db, user_id, &input.club_ids).await?;
    let txn = db.begin().await?;
    if input.is_primary {
        clear_primary(&txn, user_id, Some(bag_id)).await?;
    }
    let mut model = existing.into_active_model();
    model.name = Set(input.name.trim().to_string());
    model.brand = Set(input.brand);
    model.model_name = Set(input.model_name);
    model.is_primary = Set(input.is_primary);
    let bag = model.update(&txn).await?;
    link_clubs(&txn, bag.id, &club_ids).await?;
    txn.commit().await?;
    Ok(BagDto::from_model(bag, club_ids))
}

pub async fn delete_bag(db: &DatabaseConnection, user_id: Uuid, bag_id: i32) -> Result<(), GenericError> {
    let res = Bag::delete_many()
        .filter(bag::Column::Id.eq(bag_id))
        .filter(bag::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(GenericError::not_found("Bag"));
    }
    Ok(())
}
