//! # crema: Staff Command Line
//!
//! ## Usage
//! ```bash
//! # Browse and order as a guest
//! crema menu
//! crema order Ana 4 hc-1 hc-1 bak-1 --code WELCOME10
//!
//! # Staff (password checked against CREMA_ADMIN_PASSWORD_HASH)
//! crema hash-password 's3cret'
//! crema stats week --password 's3cret'
//! CREMA_STAFF_PASSWORD='s3cret' crema complete 1a2b3c4d
//!
//! # Machine-readable output for orders, stats and receipt
//! crema stats month --json
//! ```

use std::process::ExitCode;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::error;

use crema_core::{Money, StatsPeriod};
use crema_db::Database;
use crema_storefront::commands::{hash_password, AdminGate, OrderingFlow, StaffConsole};
use crema_storefront::error::{ApiError, ApiResult};
use crema_storefront::state::{CartState, StoreConfig};
use crema_storefront::{init_tracing, open_database};

#[derive(Debug, Parser)]
#[command(name = "crema", about = "Crema ordering kiosk and staff console", long_about = None)]
struct Cli {
    /// Print orders, stats and receipts as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List available items
    Menu,

    /// Place an order (repeat an item id for more than one)
    Order(OrderArgs),

    /// Order history, newest first
    Orders(StaffAuth),

    /// Revenue for a period
    Stats {
        /// day, week, month or year
        #[arg(default_value = "day")]
        period: StatsPeriod,

        #[command(flatten)]
        auth: StaffAuth,
    },

    /// Mark a pending order as completed
    Complete {
        /// Full order id or its first 8+ characters
        order_id: String,

        #[command(flatten)]
        auth: StaffAuth,
    },

    /// Print a receipt
    Receipt {
        /// Full order id or its first 8+ characters
        order_id: String,

        #[command(flatten)]
        auth: StaffAuth,
    },

    /// Print a hash for CREMA_ADMIN_PASSWORD_HASH
    HashPassword {
        password: String,
    },
}

#[derive(Debug, Args)]
struct OrderArgs {
    customer_name: String,

    table_number: String,

    /// Menu item ids
    #[arg(required = true)]
    items: Vec<String>,

    /// Discount code
    #[arg(long, short = 'c')]
    code: Option<String>,
}

#[derive(Debug, Args)]
struct StaffAuth {
    /// Staff password
    #[arg(long, short = 'p', env = "CREMA_STAFF_PASSWORD", hide_env_values = true)]
    password: String,
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn print_json<T: Serialize>(value: &T) -> ApiResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::internal(format!("Failed to encode output: {}", e)))?;
    println!("{}", text);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    if let Command::HashPassword { password } = &cli.command {
        return match hash_password(password) {
            Ok(hash) => {
                println!("{}", hash);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("✗ {}", e.message);
                ExitCode::FAILURE
            }
        };
    }

    let config = StoreConfig::from_env();
    let db = match open_database(&config).await {
        Ok(db) => db,
        Err(e) => {
            error!("{}", e);
            eprintln!("✗ {}", e.message);
            return ExitCode::FAILURE;
        }
    };

    let result = run(cli, &db, config).await;
    db.close().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {}", e.message);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, db: &Database, config: StoreConfig) -> ApiResult<()> {
    let json = cli.json;
    let width = config.receipt_width;

    match cli.command {
        Command::Menu => {
            let flow = OrderingFlow::new(db.clone(), CartState::new(), config);
            let mut current = String::new();
            for item in flow.menu(None).await? {
                if item.category != current {
                    println!();
                    println!("{}", item.category);
                    current = item.category.clone();
                }
                println!("  {:<8} {:<26} {:>8}", item.id, item.name, item.price().to_string());
            }
            Ok(())
        }

        Command::Order(args) => place_order(db, config, args).await,

        Command::Orders(auth) => {
            let staff = login(db, config, &auth)?;
            let orders = staff.orders().await?;
            if json {
                return print_json(&orders);
            }
            for order in orders {
                println!(
                    "{}  {}  table {:<4} {:<16} {:>9}  {}",
                    short_id(&order.id),
                    order.created_at.format("%Y-%m-%d %H:%M"),
                    order.table_number,
                    order.customer_name,
                    order.total().to_string(),
                    order.status
                );
            }
            Ok(())
        }

        Command::Stats { period, auth } => {
            let staff = login(db, config, &auth)?;
            print_stats(&staff, period, json).await
        }

        Command::Complete { order_id, auth } => {
            let staff = login(db, config, &auth)?;
            let order = staff.complete_order(&order_id).await?;
            println!(
                "✓ Order {} for table {} completed ({})",
                short_id(&order.id),
                order.table_number,
                Money::from_cents(order.total_cents)
            );
            Ok(())
        }

        Command::Receipt { order_id, auth } => {
            let staff = login(db, config, &auth)?;
            let receipt = staff.receipt(&order_id).await?;
            if json {
                return print_json(&receipt);
            }
            println!("{}", receipt.render_text(width));
            Ok(())
        }

        // Handled in main before the database is opened
        Command::HashPassword { .. } => Ok(()),
    }
}

fn login(db: &Database, config: StoreConfig, auth: &StaffAuth) -> ApiResult<StaffConsole<Database>> {
    let gate = AdminGate::from_config(&config);
    StaffConsole::login(db.clone(), config, &gate, &auth.password)
}

async fn place_order(db: &Database, config: StoreConfig, args: OrderArgs) -> ApiResult<()> {
    let width = config.receipt_width;
    let flow = OrderingFlow::new(db.clone(), CartState::new(), config);

    flow.welcome(&args.customer_name, &args.table_number)?;
    for item in &args.items {
        flow.add_to_cart(item).await?;
    }
    if let Some(code) = args.code {
        match flow.apply_discount(&code).await? {
            Some(d) => println!("✓ Code {} applied ({} off)", d.code, d.describe_value()),
            None => println!("⚠ Code {} not recognised, charged at full price", code.trim()),
        }
    }

    let placed = flow.checkout().await?;
    println!("{}", placed.receipt.render_text(width));
    Ok(())
}

async fn print_stats(staff: &StaffConsole<Database>, period: StatsPeriod, json: bool) -> ApiResult<()> {
    let dash = staff.dashboard(period, Utc::now()).await?;
    if json {
        return print_json(&dash);
    }
    let s = &dash.stats;

    println!(
        "📊 {:?} {} → {}",
        period,
        dash.period_start.format("%Y-%m-%d"),
        dash.period_end.format("%Y-%m-%d")
    );
    println!("  Revenue         {:>10}", s.total_revenue.to_string());
    println!("  Orders          {:>10}", s.total_orders);
    println!("  Average order   {:>10}", s.average_order_value.to_string());
    println!("  Tax collected   {:>10}", s.tax_collected.to_string());
    println!("  Discounts given {:>10}", s.discounts_given.to_string());
    println!();
    println!("⏳ Pending ({})", dash.pending.len());
    for order in &dash.pending {
        println!(
            "  {}  table {:<4} {:<16} {} items",
            short_id(&order.id),
            order.table_number,
            order.customer_name,
            order.item_count()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_order_with_code() {
        let cli = Cli::try_parse_from(["crema", "order", "Ana", "4", "hc-1", "bak-1", "--code", "welcome10"])
            .unwrap();
        let Command::Order(args) = cli.command else {
            panic!("expected order");
        };
        assert_eq!(args.customer_name, "Ana");
        assert_eq!(args.table_number, "4");
        assert_eq!(args.items, vec!["hc-1", "bak-1"]);
        assert_eq!(args.code.as_deref(), Some("welcome10"));
    }

    #[test]
    fn test_code_flag_without_value_is_an_error() {
        let err = Cli::try_parse_from(["crema", "order", "Ana", "4", "hc-1", "--code"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_order_needs_an_item() {
        assert!(Cli::try_parse_from(["crema", "order", "Ana", "4"]).is_err());
    }

    #[test]
    fn test_stats_period_and_password() {
        let cli = Cli::try_parse_from(["crema", "stats", "week", "-p", "s3cret", "--json"]).unwrap();
        assert!(cli.json);
        let Command::Stats { period, auth } = cli.command else {
            panic!("expected stats");
        };
        assert_eq!(period, StatsPeriod::Week);
        assert_eq!(auth.password, "s3cret");

        assert!(Cli::try_parse_from(["crema", "stats", "fortnight", "-p", "x"]).is_err());
    }
}
