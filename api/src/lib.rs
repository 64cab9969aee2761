mod authenticate;
mod mutation;
mod query;
mod upload;

use rocket_okapi::openapi_get_routes;

#[macro_use]
extern crate rocket;

use mutation::*;
use query::*;
use rocket::data::{Limits, ToByteUnit};
use rocket::{Build, Config, Rocket};
use rocket_cors::{AllowedOrigins, CorsOptions};
use sea_orm::DatabaseConnection;
use thiserror::Error;

use rocket_okapi::rapidoc::{make_rapidoc, GeneralConfig, HideShowConfig, RapiDocConfig};
use rocket_okapi::settings::UrlObject;
use rocket_okapi::swagger_ui::{make_swagger_ui, SwaggerUIConfig};
use service::config::AppConfig;
use service::extraction::{ExtractionClient, ExtractionError};
use service::store::DbCourseStore;

pub use authenticate::USER_HEADER;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("invalid CORS configuration: {0}")]
    Cors(#[from] rocket_cors::Error),
    #[error("could not set up the extraction client: {0}")]
    Extraction(#[from] ExtractionError),
}

#[catch(404)]
fn general_not_found() -> &'static str {
    "Api endpoint not found"
}

#[catch(401)]
fn unauthorized() -> &'static str {
    "Missing or invalid X-User-Id header"
}

fn cors(config: &AppConfig) -> Result<rocket_cors::Cors, rocket_cors::Error> {
    let allowed_origins = match &config.cors_allowed_origins {
        Some(origins) => AllowedOrigins::some_exact(origins),
        None => AllowedOrigins::all(),
    };
    CorsOptions {
        allowed_origins,
        ..Default::default()
    }
    .to_cors()
}

/// The full application, ready to launch or to hand to a local client.
pub fn build(db: DatabaseConnection, config: &AppConfig) -> Result<Rocket<Build>, LaunchError> {
    let store = DbCourseStore::new(db.clone(), config.schema_refresh.clone());
    let extraction = ExtractionClient::new(&config.extraction)?;
    let limits = Limits::default()
        .limit("file", 10.mebibytes())
        .limit("data-form", 12.mebibytes());
    let figment = Config::figment().merge(("limits", limits));

    Ok(rocket::custom(figment)
        .manage(db)
        .manage(store)
        .manage(extraction)
        .manage(config.clone())
        .attach(cors(config)?)
        .mount(
            "/api",
            openapi_get_routes![
                list_courses,
                get_course,
                get_tee_sets,
                get_holes,
                get_scorecard,
                open_wizard,
                create_course,
                submit_wizard,
                merge_extraction,
                delete_course,
                set_course_active,
                put_tee_sets,
                put_holes,
                list_series,
                get_series,
                create_series,
                update_series,
                delete_series,
                list_events,
                create_event,
                get_event,
                update_event_status,
                list_series_participants,
                add_series_participant,
                update_series_participant,
                remove_series_participant,
                list_event_participants,
                add_event_participant,
                update_event_participant,
                remove_event_participant,
                get_profile,
                put_profile,
                list_clubs,
                create_club,
                update_club,
                delete_club,
                list_bags,
                create_bag,
                update_bag,
                delete_bag,
            ],
        )
        .mount("/api", routes![upload::extract_scorecard])
        .mount(
            "/api/swagger",
            make_swagger_ui(&SwaggerUIConfig {
                url: "../openapi.json".to_owned(),
                ..Default::default()
            }),
        )
        .mount(
            "/api/",
            make_rapidoc(&RapiDocConfig {
                general: GeneralConfig {
                    spec_urls: vec![UrlObject::new("General", "./openapi.json")],
                    ..Default::default()
                },
                hide_show: HideShowConfig {
                    allow_spec_url_load: false,
                    allow_spec_file_load: false,
                    ..Default::default()
                },
                ..Default::default()
            }),
        )
        .register("/api", catchers![general_not_found, unauthorized]))
}
