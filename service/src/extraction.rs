//! Client for the image extraction service: an uploaded scorecard photo in,
//! structured course data out.

use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::ExtractionConfig;
use crate::dto::{ExtractType, ExtractedData};

/// Longest slice of an unparseable error body kept in the error message.
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Image extraction is not configured")]
    NotConfigured,
    #[error("Extraction service unreachable: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Extraction service answered {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Extraction failed: {0}")]
    Rejected(String),
    #[error("Extraction returned data in an unexpected shape: {0}")]
    Payload(String),
}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Turns an extraction service answer into form data.
pub fn parse_extraction_response(
    status: u16,
    body: &str,
    extract_type: ExtractType,
) -> Result<ExtractedData, ExtractionError> {
    let parsed = serde_json::from_str::<RawResponse>(body);
    if !(200..300).contains(&status) {
        let body = match parsed {
            Ok(RawResponse {
                error: Some(error), ..
            }) => error,
            _ => body.chars().take(MAX_ERROR_BODY).collect(),
        };
        return Err(ExtractionError::Http { status, body });
    }
    let raw = parsed.map_err(|e| ExtractionError::Payload(e.to_string()))?;
    if raw.success == Some(false) {
        return Err(ExtractionError::Rejected(
            raw.error.unwrap_or_else(|| "no reason given".to_string()),
        ));
    }
    let data = raw
        .data
        .filter(|d| !d.is_null())
        .ok_or_else(|| ExtractionError::Payload("response carried no data".to_string()))?;
    ExtractedData::from_payload(extract_type, data)
        .map_err(|e| ExtractionError::Payload(format!("{extract_type}: {e}")))
}

#[derive(Clone, Debug)]
pub struct ExtractionClient {
    client: Client,
    url: Option<String>,
    api_key: Option<String>,
}

impl ExtractionClient {
    pub fn new(config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// Uploads `bytes` as the `file` part of a multipart form.
    pub async fn extract(
        &self,
        bytes: Vec<u8>,
        file_name: String,
        content_type: Option<&str>,
        extract_type: ExtractType,
    ) -> Result<ExtractedData, ExtractionError> {
        let url = self.url.as_deref().ok_or(ExtractionError::NotConfigured)?;
        debug!("Sending {} bytes to extraction ({extract_type})", bytes.len());

        let mut part = Part::bytes(bytes).file_name(file_name);
        if let Some(content_type) = content_type {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new()
            .part("file", part)
            .text("extractType", extract_type.to_string());

        let mut request = self.client.post(url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await.map_err(|e| {
            warn!("Extraction request failed: {e}");
            ExtractionError::from(e)
        })?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_extraction_response(status, &body, extract_type).map_err(|e| {
            warn!("Extraction rejected: {e}");
            e
        })
    }
}
