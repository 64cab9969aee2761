use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tokio::io::AsyncReadExt;

use service::dto::{ExtractType, ScorecardExtraction};
use service::error::GenericError;
use service::extraction::ExtractionClient;

#[derive(FromForm)]
pub(crate) struct ScorecardUpload<'r> {
    file: TempFile<'r>,
    #[field(name = "extractType")]
    extract_type: ExtractType,
}

type Failure = (Status, Json<ScorecardExtraction>);

fn failure(e: GenericError) -> Failure {
    let status = Status::from_code(e.status_code()).unwrap_or(Status::InternalServerError);
    (
        status,
        Json(ScorecardExtraction {
            success: false,
            data: None,
            error: Some(e.message().to_string()),
        }),
    )
}

fn file_name(file: &TempFile<'_>) -> String {
    let extension = file.content_type().and_then(|c| c.extension());
    match (file.name(), extension) {
        (Some(name), Some(ext)) => format!("{name}.{ext}"),
        (Some(name), None) => name.to_string(),
        (None, Some(ext)) => format!("scorecard.{ext}"),
        (None, None) => "scorecard".to_string(),
    }
}

/// Forwards an uploaded scorecard image to the extraction service. Answers
/// `{success, data}` or `{success: false, error}` with the matching status.
#[post("/scorecard", data = "<upload>")]
pub(crate) async fn extract_scorecard(
    client: &State<ExtractionClient>,
    upload: Form<ScorecardUpload<'_>>,
) -> Result<Json<ScorecardExtraction>, Failure> {
    if !client.is_configured() {
        return Err(failure(
            service::extraction::ExtractionError::NotConfigured.into(),
        ));
    }
    let upload = upload.into_inner();
    let mut bytes = Vec::with_capacity(usize::try_from(upload.file.len()).unwrap_or(0));
    let reader = upload
        .file
        .open()
        .await
        .map_err(|e| failure(GenericError::BadRequest(format!("Unreadable upload: {e}"))))?;
    tokio::pin!(reader);
    reader
        .read_to_end(&mut bytes)
        .await
        .map_err(|e| failure(GenericError::BadRequest(format!("Unreadable upload: {e}"))))?;

    let content_type = upload.file.content_type().map(|c| c.to_string());
    service::extract_scorecard(
        client.inner(),
        bytes,
        file_name(&upload.file),
        content_type.as_deref(),
        upload.extract_type,
    )
    .await
    .map(Json)
    .map_err(failure)
}
