//! Runtime configuration, read from the environment (and `.env` through
//! `dotenvy`).

use std::time::Duration;

use thiserror::Error;

use crate::store::SchemaRefreshPolicy;
use crate::wizard::WizardSettings;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("{key} must be {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// Endpoint receiving the multipart image upload. Extraction is
    /// disabled when unset.
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub extraction: ExtractionConfig,
    pub schema_refresh: SchemaRefreshPolicy,
    pub wizard: WizardSettings,
    pub run_migrations: bool,
    /// `None` allows any origin.
    pub cors_allowed_origins: Option<Vec<String>>,
}

const DEFAULT_EXTRACTION_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SCHEMA_REFRESH_ATTEMPTS: u32 = 3;
const DEFAULT_SCHEMA_REFRESH_DELAY_MS: u64 = 1000;
const DEFAULT_REDIRECT_DELAY_MS: u64 = 1500;

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, which keeps parsing
    /// independent from the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let extraction = ExtractionConfig {
            url: get("EXTRACTION_API_URL"),
            api_key: get("EXTRACTION_API_KEY"),
            timeout: Duration::from_secs(parse_or(
                "EXTRACTION_TIMEOUT_SECS",
                get("EXTRACTION_TIMEOUT_SECS"),
                DEFAULT_EXTRACTION_TIMEOUT_SECS,
            )?),
        };

        let schema_refresh = SchemaRefreshPolicy {
            attempts: parse_or(
                "SCHEMA_REFRESH_ATTEMPTS",
                get("SCHEMA_REFRESH_ATTEMPTS"),
                DEFAULT_SCHEMA_REFRESH_ATTEMPTS,
            )?,
            delay: Duration::from_millis(parse_or(
                "SCHEMA_REFRESH_DELAY_MS",
                get("SCHEMA_REFRESH_DELAY_MS"),
                DEFAULT_SCHEMA_REFRESH_DELAY_MS,
            )?),
        };

        let wizard = WizardSettings {
            redirect_delay: Duration::from_millis(parse_or(
                "WIZARD_REDIRECT_DELAY_MS",
                get("WIZARD_REDIRECT_DELAY_MS"),
                DEFAULT_REDIRECT_DELAY_MS,
            )?),
        };

        let run_migrations = match get("RUN_MIGRATIONS") {
            None => false,
            Some(v) => parse_bool("RUN_MIGRATIONS", &v)?,
        };

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS").map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect()
        });

        Ok(Self {
            database_url,
            extraction,
            schema_refresh,
            wizard,
            run_migrations,
            cors_allowed_origins,
        })
    }

    /// Defaults for everything except the database.
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            extraction: ExtractionConfig {
                url: None,
                api_key: None,
                timeout: Duration::from_secs(DEFAULT_EXTRACTION_TIMEOUT_SECS),
            },
            schema_refresh: SchemaRefreshPolicy::default(),
            wizard: WizardSettings::default(),
            run_migrations: false,
            cors_allowed_origins: None,
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            expected: "a non-negative number",
            value: v,
        }),
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            expected: "a boolean",
            value: value.to_string(),
        }),
    }
}
