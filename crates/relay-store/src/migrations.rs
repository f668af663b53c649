use sqlx::PgPool;
use sqlx::migrate::Migrator;

use crate::error::StoreError;

static MIGRATOR: Migrator = sqlx::migrate!("migrations");

/// Creates the `meta_transaction_processor` schema if absent, then runs
/// any pending migrations against it — mirroring the reference
/// implementation's `goose`-based bootstrap.
pub async fn migrate_up(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query("create schema if not exists meta_transaction_processor")
        .execute(pool)
        .await?;
    MIGRATOR.run(pool).await.map_err(|e| StoreError::Database(sqlx::Error::Migrate(Box::new(e))))
}

pub async fn migrate_down_to(pool: &PgPool, target: i64) -> Result<(), StoreError> {
    MIGRATOR
        .undo(pool, target)
        .await
        .map_err(|e| StoreError::Database(sqlx::Error::Migrate(Box::new(e))))
}
