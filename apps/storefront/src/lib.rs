//! # Crema Storefront
//!
//! Application layer for the Crema ordering kiosk and staff console.
//!
//! ## Module Organization
//! ```text
//! crema_storefront/
//! ├── lib.rs          ◄─── You are here (logging, database setup)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── Guest session (cart, code, table)
//! │   └── config.rs   ◄─── StoreConfig from CREMA_* variables
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── checkout.rs ◄─── OrderingFlow
//! │   └── staff.rs    ◄─── AdminGate, StaffConsole
//! ├── error.rs        ◄─── API error type for commands
//! └── main.rs         ◄─── `crema` staff CLI
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()           RUST_LOG or "info,crema=debug,sqlx=warn"   │
//! │  2. StoreConfig::from_env()  CREMA_* over defaults                      │
//! │  3. open_database()          WAL SQLite, migrations applied             │
//! │  4. OrderingFlow::new(db.clone(), CartState::new(), config.clone())     │
//! │     StaffConsole::login(db, config, &gate, password)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crema_db::{Database, DbConfig};
use error::{ApiError, ApiResult};
use state::StoreConfig;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=crema=trace` - Show trace for crema crates only
/// - Default: INFO, DEBUG for crema
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,crema=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Determines the database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.crema.storefront/crema.db`
/// - **Windows**: `%APPDATA%\crema\storefront\data\crema.db`
/// - **Linux**: `~/.local/share/storefront/crema.db`
///
/// `CREMA_DB_PATH` (via [`StoreConfig::db_path`]) takes precedence.
pub fn database_path(config: &StoreConfig) -> ApiResult<PathBuf> {
    if let Some(path) = &config.db_path {
        return Ok(path.clone());
    }

    let proj_dirs = ProjectDirs::from("com", "crema", "storefront")
        .ok_or_else(|| ApiError::internal("Could not determine app data directory"))?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .map_err(|e| ApiError::internal(format!("Could not create {}: {}", data_dir.display(), e)))?;

    Ok(data_dir.join("crema.db"))
}

/// Opens the configured database and applies pending migrations.
pub async fn open_database(config: &StoreConfig) -> ApiResult<Database> {
    let path = database_path(config)?;
    info!(db_path = %path.display(), "Opening database");

    let db = Database::new(DbConfig::new(path)).await?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_override() {
        let config = StoreConfig {
            db_path: Some(PathBuf::from("/tmp/crema-test.db")),
            ..StoreConfig::default()
        };
        assert_eq!(database_path(&config).unwrap(), PathBuf::from("/tmp/crema-test.db"));
    }
}
