use log::error;
use rocket::Responder;
use rocket_okapi::gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::Responses;
use rocket_okapi::okapi::schemars;
use rocket_okapi::okapi::schemars::{JsonSchema, Map};
use rocket_okapi::response::OpenApiResponderInner;
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use std::fmt::Debug;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::store::StoreError;
use crate::wizard::WizardError;

/// Every error the HTTP layer can hand back. The message is the response
/// body, so it is what ends up in the admin's error banner.
#[derive(Serialize, JsonSchema, Debug, Responder, PartialEq)]
pub enum GenericError {
    #[response(status = 400)]
    BadRequest(String),
    #[response(status = 401)]
    Unauthorized(String),
    #[response(status = 404)]
    NotFound(String),
    #[response(status = 409)]
    Conflict(String),
    #[response(status = 422)]
    Validation(String),
    #[response(status = 500)]
    UnknownError(String),
    #[response(status = 502)]
    Extraction(String),
    #[response(status = 503)]
    Unavailable(String),
}

/// A form field that failed local validation. Never reaches the database.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, JsonSchema)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<ValidationError> for GenericError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<DbErr> for GenericError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => Self::Conflict(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => Self::BadRequest(msg),
            _ => {
                error!("Unhandled database error: {:#?}", e);
                Self::UnknownError(e.to_string())
            }
        }
    }
}

impl From<StoreError> for GenericError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Db(e) => e.into(),
            StoreError::SchemaCache(_) => Self::Unavailable(e.to_string()),
            StoreError::CourseNotFound(_) => Self::NotFound(e.to_string()),
            StoreError::UnknownTeeSet(_) | StoreError::UnknownHole(_) => {
                Self::Validation(e.to_string())
            }
        }
    }
}

impl From<WizardError> for GenericError {
    fn from(e: WizardError) -> Self {
        match e {
            WizardError::Validation(e) => e.into(),
            WizardError::MissingCourse(_) => Self::BadRequest(e.to_string()),
            WizardError::CourseNotFound(_) => Self::NotFound(e.to_string()),
            WizardError::Store(e) => e.into(),
        }
    }
}

impl From<ExtractionError> for GenericError {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::NotConfigured => Self::Unavailable(e.to_string()),
            ExtractionError::Rejected(_) | ExtractionError::Payload(_) => {
                Self::Validation(e.to_string())
            }
            ExtractionError::Network(_) | ExtractionError::Http { .. } => {
                Self::Extraction(e.to_string())
            }
        }
    }
}

impl GenericError {
    pub fn not_found(what: &str) -> Self {
        Self::NotFound(format!("{what} not found"))
    }

    /// HTTP status this error is answered with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Validation(_) => 422,
            Self::UnknownError(_) => 500,
            Self::Extraction(_) => 502,
            Self::Unavailable(_) => 503,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(m)
            | Self::Unauthorized(m)
            | Self::NotFound(m)
            | Self::Conflict(m)
            | Self::Validation(m)
            | Self::UnknownError(m)
            | Self::Extraction(m)
            | Self::Unavailable(m) => m,
        }
    }
}

fn describe(code: u16, title: &str, text: &str) -> (String, rocket_okapi::okapi::openapi3::RefOr<rocket_okapi::okapi::openapi3::Response>) {
    use rocket_okapi::okapi::openapi3::{RefOr, Response as OpenApiResponse};
    (
        code.to_string(),
        RefOr::Object(OpenApiResponse {
            description: format!(
                "# [{code} {title}](https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/{code})\n{text}"
            ),
            ..Default::default()
        }),
    )
}

impl OpenApiResponderInner for GenericError {
    fn responses(_: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        let mut responses = Map::new();
        for (code, title, text) in [
            (400, "Bad Request", "The request given is wrongly formatted or refers to data that does not exist."),
            (401, "Unauthorized", "The caller identity header is missing or malformed."),
            (404, "Not Found", "This response is given when you request a resource that does not exist."),
            (409, "Conflict", "This response is given when you try to create a resource that already exists."),
            (422, "Unprocessable Entity", "A field failed validation. The body names the field."),
            (500, "Internal Server Error", "This response is given when something went wrong on the server."),
            (502, "Bad Gateway", "The image extraction service could not be reached or answered with an error."),
            (503, "Service Unavailable", "The database schema cache is stale or extraction is not configured."),
        ] {
            let (key, value) = describe(code, title, text);
            responses.insert(key, value);
        }
        Ok(Responses {
            responses,
            ..Default::default()
        })
    }
}
