//! # Schema
//!
//! `crates/crema-db/migrations/*.sql`, compiled into the binary so a fresh
//! kiosk only needs an empty directory. Applied migrations are tracked in
//! `_sqlx_migrations`; changing an applied file makes the next open fail
//! its checksum, so schema changes go in a new `NNN_*.sql` file.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Brings the schema up to date. Safe to call on every open.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(known = MIGRATOR.migrations.len(), "Applying schema migrations");
    MIGRATOR.run(pool).await?;
    info!("Schema migrations applied");
    Ok(())
}

/// `(known, applied)` migration counts.
///
/// A store that has never been migrated reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let known = MIGRATOR.migrations.len();

    let applied = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1",
    )
    .fetch_one(pool)
    .await
    .unwrap_or(0);

    Ok((known, usize::try_from(applied).unwrap_or(0)))
}
