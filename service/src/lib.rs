pub mod config;
pub mod dto;
pub mod error;
pub mod extraction;
pub mod mutation;
pub mod query;
pub mod store;
pub mod wizard;

#[cfg(test)]
pub(crate) mod test_support;

pub use mutation::*;
pub use query::*;

pub use sea_orm;

use log::LevelFilter;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Opens the pool described by `config`. SQL statement logging is kept at
/// debug level so it only shows up when the log level asks for it.
pub async fn connect(config: &config::AppConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);
    Database::connect(opt).await
}
