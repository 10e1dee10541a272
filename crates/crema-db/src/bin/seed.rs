//! # seed
//!
//! Stocks a store with the house menu and the `WELCOME10` code so a new
//! kiosk has something to sell. Existing menus are left alone.
//!
//! ```bash
//! cargo run -p crema-db --bin seed                      # ./crema_dev.db
//! cargo run -p crema-db --bin seed -- ./data/crema.db
//! CREMA_DB_PATH=/var/lib/crema/crema.db cargo run -p crema-db --bin seed
//! ```

use std::env;
use std::process::ExitCode;

use crema_db::seed::{load_house_menu, WELCOME_CODE};
use crema_db::{Database, DbConfig, DbResult, OrderStore};
use tracing::error;
use tracing_subscriber::EnvFilter;

const DEV_DB_PATH: &str = "./crema_dev.db";

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,crema_db=debug,sqlx=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let arg = env::args().nth(1);
    if matches!(arg.as_deref(), Some("-h" | "--help")) {
        println!("Usage: seed [DB_PATH]");
        println!();
        println!("DB_PATH defaults to $CREMA_DB_PATH, then {}", DEV_DB_PATH);
        return ExitCode::SUCCESS;
    }

    let db_path = arg
        .or_else(|| env::var("CREMA_DB_PATH").ok())
        .unwrap_or_else(|| DEV_DB_PATH.to_string());

    match seed(&db_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(db = %db_path, "Seeding failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn seed(db_path: &str) -> DbResult<()> {
    let db = Database::new(DbConfig::new(db_path)).await?;

    let written = load_house_menu(&db).await?;
    let categories = db.categories().await?;
    let welcome = db.find_active_discount(WELCOME_CODE).await?;
    db.close().await;

    println!("{}", db_path);
    if written == 0 {
        println!("  menu       already stocked, unchanged");
    } else {
        println!("  menu       {} items added", written);
    }
    println!("  categories {}", categories.join(", "));
    match welcome {
        Some(code) => println!("  {:<10} {} off", code.code, code.describe_value()),
        None => println!("  {:<10} inactive", WELCOME_CODE),
    }
    Ok(())
}
