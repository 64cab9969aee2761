use std::future::Future;
use std::time::Duration;

use log::{error, warn};
use sea_orm::{ConnectionTrait, DbBackend, DbErr};

use super::StoreError;

/// How hard to try when the database reports that its schema cache does
/// not yet know about a table or column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRefreshPolicy {
    /// Refresh-and-retry rounds after the first failure.
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for SchemaRefreshPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_millis(1000),
        }
    }
}

pub fn is_schema_cache_error(err: &DbErr) -> bool {
    let message = err.to_string().to_lowercase();
    message.contains("schema cache")
        || message.contains("pgrst204")
        || message.contains("pgrst205")
        || message.contains("no such column")
        || (message.contains("column") && message.contains("does not exist"))
}

/// Asks PostgREST-style listeners to reload their schema. Other backends
/// have nothing to reload.
pub(crate) async fn refresh<C: ConnectionTrait>(db: &C) {
    if db.get_database_backend() != DbBackend::Postgres {
        return;
    }
    if let Err(e) = db.execute_unprepared("NOTIFY pgrst, 'reload schema'").await {
        warn!("Schema cache reload request failed: {e}");
    }
}

/// Runs `op`, refreshing the schema cache and retrying while it fails with
/// a schema-cache error, at most `policy.attempts` times.
pub(crate) async fn with_schema_refresh<C, T, F, Fut>(
    db: &C,
    policy: &SchemaRefreshPolicy,
    what: &str,
    mut op: F,
) -> Result<T, StoreError>
where
    C: ConnectionTrait,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut round = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if is_schema_cache_error(&e) => {
                if round >= policy.attempts {
                    error!("{what}: schema cache still stale after {round} refreshes: {e}");
                    return Err(StoreError::SchemaCache(e.to_string()));
                }
                round += 1;
                warn!(
                    "{what}: schema cache error, refreshing ({round}/{}): {e}",
                    policy.attempts
                );
                refresh(db).await;
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::migrated_db;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick(attempts: u32) -> SchemaRefreshPolicy {
        SchemaRefreshPolicy {
            attempts,
            delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn recognises_schema_cache_messages() {
        for message in [
            "Could not find the 'city' column of 'courses' in the schema cache",
            "PGRST204",
            "column \"hole_number\" does not exist",
            "table holes has no such column: notes",
        ] {
            assert!(is_schema_cache_error(&DbErr::Custom(message.to_string())), "{message}");
        }
        assert!(!is_schema_cache_error(&DbErr::Custom(
            "duplicate key value violates unique constraint".to_string()
        )));
    }

    #[tokio::test]
    async fn retries_are_bounded() {
        let db = migrated_db().await;
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_schema_refresh(&db, &quick(3), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DbErr::Custom("schema cache".to_string())) }
        })
        .await;

        assert!(matches!(result, Err(StoreError::SchemaCache(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn recovers_once_cache_catches_up() {
        let db = migrated_db().await;
        let calls = AtomicU32::new(0);
        let result = with_schema_refresh(&db, &quick(3), "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(DbErr::Custom("PGRST205".to_string()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
    }

    #[tokio::test]
    async fn other_errors_are_not_retried() {
        let db = migrated_db().await;
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_schema_refresh(&db, &quick(3), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DbErr::Custom("boom".to_string())) }
        })
        .await;

        assert!(matches!(result, Err(StoreError::Db(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
