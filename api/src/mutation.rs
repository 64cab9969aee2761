use rocket::response::status::NoContent;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::authenticate::ProfileUser;
use service::config::AppConfig;
use service::dto::{
    ActiveToggle, Bag, BagInput, Club, ClubInput, CourseFormData, CourseSummary, Event,
    EventInput, HoleForm, Participant, ParticipantInput, ParticipantScope,
    ParticipantStatusUpdate, Profile, ProfileInput, Series, SeriesInput, StatusUpdate, TeeSetForm,
};
use service::error::GenericError;
use service::store::DbCourseStore;
use service::wizard::{ExtractionMerge, WizardResponse, WizardState, WizardSubmission};

/// # Create a course outside the wizard
#[openapi(tag = "Courses")]
#[post("/courses", format = "json", data = "<course>")]
pub(crate) async fn create_course(
    store: &State<DbCourseStore>,
    course: Json<CourseFormData>,
) -> Result<Json<CourseSummary>, GenericError> {
    service::create_course(store.inner(), course.into_inner())
        .await
        .map(Json)
}

/// # Submit the current wizard step
///
/// Saves the step the submission is on and answers with the step to show
/// next, or with the redirect once the scorecard is saved. Validation
/// failures are answered with 422 before anything is written.
#[openapi(tag = "Course Wizard")]
#[post("/courses/wizard", format = "json", data = "<submission>")]
pub(crate) async fn submit_wizard(
    store: &State<DbCourseStore>,
    config: &State<AppConfig>,
    submission: Json<WizardSubmission>,
) -> Result<Json<WizardResponse>, GenericError> {
    service::submit_wizard(store.inner(), config.wizard.clone(), submission.into_inner())
        .await
        .map(Json)
}

/// # Merge extracted data into wizard state
///
/// Course information is merged field by field; tee sets and holes are
/// replaced. Nothing is saved.
#[openapi(tag = "Course Wizard")]
#[post("/courses/wizard/extraction", format = "json", data = "<merge>")]
pub(crate) async fn merge_extraction(
    store: &State<DbCourseStore>,
    config: &State<AppConfig>,
    merge: Json<ExtractionMerge>,
) -> Json<WizardState> {
    Json(service::merge_extraction(
        store.inner(),
        config.wizard.clone(),
        merge.into_inner(),
    ))
}

#[openapi(tag = "Courses")]
#[delete("/courses/<id>")]
pub(crate) async fn delete_course(
    db: &State<DatabaseConnection>,
    id: i32,
) -> Result<NoContent, GenericError> {
    service::delete_course(db.inner(), id).await?;
    Ok(NoContent)
}

#[openapi(tag = "Courses")]
#[put("/courses/<id>/active", format = "json", data = "<toggle>")]
pub(crate) async fn set_course_active(
    db: &State<DatabaseConnection>,
    id: i32,
    toggle: Json<ActiveToggle>,
) -> Result<Json<CourseSummary>, GenericError> {
    service::set_course_active(db.inner(), id, toggle.is_active)
        .await
        .map(Json)
}

/// # Replace every tee set of a course
#[openapi(tag = "Courses")]
#[put("/courses/<id>/tee-sets", format = "json", data = "<tee_sets>")]
pub(crate) async fn put_tee_sets(
    store: &State<DbCourseStore>,
    id: i32,
    tee_sets: Json<Vec<TeeSetForm>>,
) -> Result<Json<Vec<TeeSetForm>>, GenericError> {
    service::replace_tee_sets(store.inner(), id, tee_sets.into_inner())
        .await
        .map(Json)
}

/// # Replace every hole of a course, distances included
#[openapi(tag = "Courses")]
#[put("/courses/<id>/holes", format = "json", data = "<holes>")]
pub(crate) async fn put_holes(
    store: &State<DbCourseStore>,
    id: i32,
    holes: Json<Vec<HoleForm>>,
) -> Result<Json<Vec<HoleForm>>, GenericError> {
    service::replace_holes(store.inner(), id, holes.into_inner())
        .await
        .map(Json)
}

#[openapi(tag = "Series")]
#[post("/series", format = "json", data = "<series>")]
pub(crate) async fn create_series(
    db: &State<DatabaseConnection>,
    series: Json<SeriesInput>,
) -> Result<Json<Series>, GenericError> {
    service::create_series(db.inner(), series.into_inner())
        .await
        .map(Json)
}

#[openapi(tag = "Series")]
#[put("/series/<id>", format = "json", data = "<series>")]
pub(crate) async fn update_series(
    db: &State<DatabaseConnection>,
    id: i32,
    series: Json<SeriesInput>,
) -> Result<Json<Series>, GenericError> {
    service::update_series(db.inner(), id, series.into_inner())
        .await
        .map(Json)
}

#[openapi(tag = "Series")]
#[delete("/series/<id>")]
pub(crate) async fn delete_series(
    db: &State<DatabaseConnection>,
    id: i32,
) -> Result<NoContent, GenericError> {
    service::delete_series(db.inner(), id).await?;
    Ok(NoContent)
}

/// # Create an event in a series
///
/// The event date has to fall inside the series and the course has to be
/// active.
#[openapi(tag = "Events")]
#[post("/series/<id>/events", format = "json", data = "<event>")]
pub(crate) async fn create_event(
    db: &State<DatabaseConnection>,
    id: i32,
    event: Json<EventInput>,
) -> Result<Json<Event>, GenericError> {
    service::create_event(db.inner(), id, event.into_inner())
        .await
        .map(Json)
}

#[openapi(tag = "Events")]
#[put("/events/<id>/status", format = "json", data = "<update>")]
pub(crate) async fn update_event_status(
    db: &State<DatabaseConnection>,
    id: i32,
    update: Json<StatusUpdate>,
) -> Result<Json<Event>, GenericError> {
    service::update_event_status(db.inner(), id, update.status)
        .await
        .map(Json)
}

#[openapi(tag = "Participants")]
#[post("/series/<id>/participants", format = "json", data = "<participant>")]
pub(crate) async fn add_series_participant(
    db: &State<DatabaseConnection>,
    id: i32,
    participant: Json<ParticipantInput>,
) -> Result<Json<Participant>, GenericError> {
    service::add_participant(db.inner(), ParticipantScope::Series(id), participant.into_inner())
        .await
        .map(Json)
}

#[openapi(tag = "Participants")]
#[put("/series/<id>/participants/<user_id>", format = "json", data = "<update>")]
pub(crate) async fn update_series_participant(
    db: &State<DatabaseConnection>,
    id: i32,
    user_id: Uuid,
    update: Json<ParticipantStatusUpdate>,
) -> Result<Json<Participant>, GenericError> {
    service::update_participant_status(
        db.inner(),
        ParticipantScope::Series(id),
        user_id,
        update.status,
    )
    .await
    .map(Json)
}

#[openapi(tag = "Participants")]
#[delete("/series/<id>/participants/<user_id>")]
pub(crate) async fn remove_series_participant(
    db: &State<DatabaseConnection>,
    id: i32,
    user_id: Uuid,
) -> Result<NoContent, GenericError> {
    service::remove_participant(db.inner(), ParticipantScope::Series(id), user_id).await?;
    Ok(NoContent)
}

#[openapi(tag = "Participants")]
#[post("/events/<id>/participants", format = "json", data = "<participant>")]
pub(crate) async fn add_event_participant(
    db: &State<DatabaseConnection>,
    id: i32,
    participant: Json<ParticipantInput>,
) -> Result<Json<Participant>, GenericError> {
    service::add_participant(db.inner(), ParticipantScope::Event(id), participant.into_inner())
        .await
        .map(Json)
}

#[openapi(tag = "Participants")]
#[put("/events/<id>/participants/<user_id>", format = "json", data = "<update>")]
pub(crate) async fn update_event_participant(
    db: &State<DatabaseConnection>,
    id: i32,
    user_id: Uuid,
    update: Json<ParticipantStatusUpdate>,
) -> Result<Json<Participant>, GenericError> {
    service::update_participant_status(
        db.inner(),
        ParticipantScope::Event(id),
        user_id,
        update.status,
    )
    .await
    .map(Json)
}

#[openapi(tag = "Participants")]
#[delete("/events/<id>/participants/<user_id>")]
pub(crate) async fn remove_event_participant(
    db: &State<DatabaseConnection>,
    id: i32,
    user_id: Uuid,
) -> Result<NoContent, GenericError> {
    service::remove_participant(db.inner(), ParticipantScope::Event(id), user_id).await?;
    Ok(NoContent)
}

#[openapi(tag = "Profile")]
#[put("/profile", format = "json", data = "<profile>")]
pub(crate) async fn put_profile(
    db: &State<DatabaseConnection>,
    user: ProfileUser,
    profile: Json<ProfileInput>,
) -> Result<Json<Profile>, GenericError> {
    service::upsert_profile(db.inner(), user.0, profile.into_inner())
        .await
        .map(Json)
}

#[openapi(tag = "Equipment")]
#[post("/profile/clubs", format = "json", data = "<club>")]
pub(crate) async fn create_club(
    db: &State<DatabaseConnection>,
    user: ProfileUser,
    club: Json<ClubInput>,
) -> Result<Json<Club>, GenericError> {
    service::create_club(db.inner(), user.0, club.into_inner())
        .await
        .map(Json)
}

#[openapi(tag = "Equipment")]
#[put("/profile/clubs/<id>", format = "json", data = "<club>")]
pub(crate) async fn update_club(
    db: &State<DatabaseConnection>,
    user: ProfileUser,
    id: i32,
    club: Json<ClubInput>,
) -> Result<Json<Club>, GenericError> {
    service::update_club(db.inner(), user.0, id, club.into_inner())
        .await
        .map(Json)
}

#[openapi(tag = "Equipment")]
#[delete("/profile/clubs/<id>")]
pub(crate) async fn delete_club(
    db: &State<DatabaseConnection>,
    user: ProfileUser,
    id: i32,
) -> Result<NoContent, GenericError> {
    service::delete_club(db.inner(), user.0, id).await?;
    Ok(NoContent)
}

/// # Create a bag
///
/// `club_ids` must all be clubs of the caller. Marking the bag primary
/// clears the flag on the caller's other bags.
#[openapi(tag = "Equipment")]
#[post("/profile/bags", format = "json", data = "<bag>")]
pub(crate) async fn create_bag(
    db: &State<DatabaseConnection>,
    user: ProfileUser,
    bag: Json<BagInput>,
) -> Result<Json<Bag>, GenericError> {
    service::create_bag(db.inner(), user.0, bag.into_inner())
        .await
        .map(Json)
}

#[openapi(tag = "Equipment")]
#[put("/profile/bags/<id>", format = "json", data = "<bag>")]
pub(crate) async fn update_bag(
    db: &State<DatabaseConnection>,
    user: ProfileUser,
    id: i32,
    bag: Json<BagInput>,
) -> Result<Json<Bag>, GenericError> {
    service::update_bag(db.inner(), user.0, id, bag.into_inner())
        .await
        .map(Json)
}

#[openapi(tag = "Equipment")]
#[delete("/profile/bags/<id>")]
pub(crate) async fn delete_bag(
    db: &State<DatabaseConnection>,
    user: ProfileUser,
    id: i32,
) -> Result<NoContent, GenericError> {
    service::delete_bag(db.inner(), user.0, id).await?;
    Ok(NoContent)
}
