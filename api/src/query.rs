use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use sea_orm::DatabaseConnection;

use crate::authenticate::ProfileUser;
use service::config::AppConfig;
use service::dto::{
    Bag, Club, CourseDetail, CourseSummary, Event, HoleForm, Participant, ParticipantScope,
    Profile, ScorecardView, Series, TeeSetForm,
};
use service::error::GenericError;
use service::store::DbCourseStore;
use service::wizard::{WizardState, WizardStep};

/// # List courses
///
/// `active=true` limits the list to courses that can host events.
#[openapi(tag = "Courses")]
#[get("/courses?<active>")]
pub(crate) async fn list_courses(
    db: &State<DatabaseConnection>,
    active: Option<bool>,
) -> Result<Json<Vec<CourseSummary>>, GenericError> {
    service::list_courses(db.inner(), active.unwrap_or(false))
        .await
        .map(Json)
}

/// # Course with tee sets, holes and totals
#[openapi(tag = "Courses")]
#[get("/courses/<id>")]
pub(crate) async fn get_course(
    store: &State<DbCourseStore>,
    id: i32,
) -> Result<Json<CourseDetail>, GenericError> {
    service::course_detail(store.inner(), id).await.map(Json)
}

#[openapi(tag = "Courses")]
#[get("/courses/<id>/tee-sets")]
pub(crate) async fn get_tee_sets(
    store: &State<DbCourseStore>,
    id: i32,
) -> Result<Json<Vec<TeeSetForm>>, GenericError> {
    service::course_tee_sets(store.inner(), id).await.map(Json)
}

#[openapi(tag = "Courses")]
#[get("/courses/<id>/holes")]
pub(crate) async fn get_holes(
    store: &State<DbCourseStore>,
    id: i32,
) -> Result<Json<Vec<HoleForm>>, GenericError> {
    service::course_holes(store.inner(), id).await.map(Json)
}

#[openapi(tag = "Courses")]
#[get("/courses/<id>/scorecard")]
pub(crate) async fn get_scorecard(
    store: &State<DbCourseStore>,
    id: i32,
) -> Result<Json<ScorecardView>, GenericError> {
    service::course_scorecard(store.inner(), id).await.map(Json)
}

/// # Open a saved course in the wizard
///
/// `step` is the step index to start at: 0 course info, 1 tee boxes,
/// 2 scorecard.
#[openapi(tag = "Course Wizard")]
#[get("/courses/<id>/wizard?<step>")]
pub(crate) async fn open_wizard(
    store: &State<DbCourseStore>,
    config: &State<AppConfig>,
    id: i32,
    step: Option<usize>,
) -> Result<Json<WizardState>, GenericError> {
    let step = match step {
        None => WizardStep::CourseInfo,
        Some(index) => WizardStep::from_index(index)
            .ok_or_else(|| GenericError::BadRequest(format!("No wizard step {index}")))?,
    };
    service::wizard_state(store.inner(), config.wizard.clone(), id, step)
        .await
        .map(Json)
}

#[openapi(tag = "Series")]
#[get("/series")]
pub(crate) async fn list_series(
    db: &State<DatabaseConnection>,
) -> Result<Json<Vec<Series>>, GenericError> {
    service::list_series(db.inner()).await.map(Json)
}

#[openapi(tag = "Series")]
#[get("/series/<id>")]
pub(crate) async fn get_series(
    db: &State<DatabaseConnection>,
    id: i32,
) -> Result<Json<Series>, GenericError> {
    service::get_series(db.inner(), id).await.map(Json)
}

#[openapi(tag = "Events")]
#[get("/series/<id>/events")]
pub(crate) async fn list_events(
    db: &State<DatabaseConnection>,
    id: i32,
) -> Result<Json<Vec<Event>>, GenericError> {
    service::list_events(db.inner(), id).await.map(Json)
}

#[openapi(tag = "Events")]
#[get("/events/<id>")]
pub(crate) async fn get_event(
    db: &State<DatabaseConnection>,
    id: i32,
) -> Result<Json<Event>, GenericError> {
    service::get_event(db.inner(), id).await.map(Json)
}

#[openapi(tag = "Participants")]
#[get("/series/<id>/participants")]
pub(crate) async fn list_series_participants(
    db: &State<DatabaseConnection>,
    id: i32,
) -> Result<Json<Vec<Participant>>, GenericError> {
    service::list_participants(db.inner(), ParticipantScope::Series(id))
        .await
        .map(Json)
}

#[openapi(tag = "Participants")]
#[get("/events/<id>/participants")]
pub(crate) async fn list_event_participants(
    db: &State<DatabaseConnection>,
    id: i32,
) -> Result<Json<Vec<Participant>>, GenericError> {
    service::list_participants(db.inner(), ParticipantScope::Event(id))
        .await
        .map(Json)
}

#[openapi(tag = "Profile")]
#[get("/profile")]
pub(crate) async fn get_profile(
    db: &State<DatabaseConnection>,
    user: ProfileUser,
) -> Result<Json<Profile>, GenericError> {
    service::get_profile(db.inner(), user.0).await.map(Json)
}

#[openapi(tag = "Equipment")]
#[get("/profile/clubs")]
pub(crate) async fn list_clubs(
    db: &State<DatabaseConnection>,
    user: ProfileUser,
) -> Result<Json<Vec<Club>>, GenericError> {
    service::list_clubs(db.inner(), user.0).await.map(Json)
}

#[openapi(tag = "Equipment")]
#[get("/profile/bags")]
pub(crate) async fn list_bags(
    db: &State<DatabaseConnection>,
    user: ProfileUser,
) -> Result<Json<Vec<Bag>>, GenericError> {
    service::list_bags(db.inner(), user.0).await.map(Json)
}
