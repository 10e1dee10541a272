//! # Opening the Store
//!
//! A Crema site runs one kiosk and one staff console against the same
//! SQLite file. Both read often; only checkout, order completion and staff
//! edits write.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  DbConfig::new("crema.db")          DbConfig::in_memory()               │
//! │    WAL journal                        one connection, never recycled    │
//! │    busy_timeout for the 2nd writer    (tests, demos)                    │
//! │            │                                   │                        │
//! │            └──────────────┬────────────────────┘                        │
//! │                           ▼                                             │
//! │                 Database::new(config)                                   │
//! │                   1. connect pool                                       │
//! │                   2. apply embedded migrations                          │
//! │                           │                                             │
//! │         ┌─────────────────┼─────────────────┐                           │
//! │         ▼                 ▼                 ▼                           │
//! │   menu_items()     order_history()   discount_codes()                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::discount::DiscountRepository;
use crate::repository::menu::MenuRepository;
use crate::repository::order::OrderRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where the data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    /// Private to the pool; gone when it closes.
    Memory,
}

/// How to open the store.
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/crema/crema.db")
///     .max_connections(2)
///     .busy_timeout(Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: DbLocation,

    /// Kiosk plus staff console plus slack. Default: 4
    pub max_connections: u32,

    /// How long a caller waits for a free connection. Default: 10s
    pub acquire_timeout: Duration,

    /// How long a write waits on the other writer's lock. Default: 5s
    pub busy_timeout: Duration,

    /// Apply pending migrations when opening. Default: true
    pub migrate: bool,
}

impl DbConfig {
    /// A file database, created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: DbLocation::File(path.into()),
            max_connections: 4,
            acquire_timeout: Duration::from_secs(10),
            busy_timeout: Duration::from_secs(5),
            migrate: true,
        }
    }

    /// A throwaway database with the full schema.
    pub fn in_memory() -> Self {
        DbConfig {
            location: DbLocation::Memory,
            // A second connection would see a second, empty database
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            busy_timeout: Duration::ZERO,
            migrate: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max.max(1);
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Opens without touching the schema.
    pub fn skip_migrations(mut self) -> Self {
        self.migrate = false;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.location == DbLocation::Memory
    }

    /// The file path, or `None` in memory.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            DbLocation::File(path) => Some(path),
            DbLocation::Memory => None,
        }
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        let options = match &self.location {
            DbLocation::Memory => SqliteConnectOptions::new().in_memory(true),
            DbLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal),
        };

        // order_items → orders cascade relies on this
        options.foreign_keys(true).busy_timeout(self.busy_timeout)
    }

    fn describe(&self) -> String {
        match &self.location {
            DbLocation::File(path) => path.display().to_string(),
            DbLocation::Memory => ":memory:".to_string(),
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the SQLite store. Clones share one pool.
///
/// Implements [`OrderStore`](crate::OrderStore); the repository accessors
/// are there for queries the trait does not cover.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connects and, unless [`DbConfig::skip_migrations`] was set, brings
    /// the schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let target = config.describe();
        info!(db = %target, "Opening store");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout);

        if config.is_in_memory() {
            pool_options = pool_options
                .min_connections(1)
                .max_lifetime(None)
                .idle_timeout(None);
        }

        let pool = pool_options
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::ConnectionFailed(format!("{}: {}", target, e)))?;
        debug!(db = %target, max_connections = config.max_connections, "Pool ready");

        let db = Database { pool };
        if config.migrate {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    /// Applies pending migrations; already-applied ones are skipped.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await?;
        let (known, applied) = migrations::migration_status(&self.pool).await?;
        info!(known, applied, "Schema up to date");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn menu_items(&self) -> MenuRepository {
        MenuRepository::new(self.pool.clone())
    }

    pub fn order_history(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    pub fn discount_codes(&self) -> DiscountRepository {
        DiscountRepository::new(self.pool.clone())
    }

    /// Waits for in-flight queries, then closes every connection.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Store closed");
    }

    /// `true` while the store answers queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}
