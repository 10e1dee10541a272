//! # Store Configuration
//!
//! Loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`CREMA_*`)
//! 2. Defaults (this file)
//!
//! Read-only after initialization, so no mutex needed.

use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;

use crema_core::validation::validate_tax_rate_bps;
use crema_core::{TaxRate, STANDARD_TAX_RATE};

pub const DEFAULT_STORE_NAME: &str = "Crema Coffee House";

/// Receipt width in characters (typical 80mm thermal roll).
pub const DEFAULT_RECEIPT_WIDTH: usize = 40;

/// Storefront configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Printed at the top of receipts
    pub store_name: String,

    /// Applied to `subtotal - discount` at checkout
    pub tax_rate: TaxRate,

    pub receipt_width: usize,

    /// Explicit database file; `None` means the platform data dir
    pub db_path: Option<PathBuf>,

    /// PHC-format argon2 hash of the staff password.
    /// Never serialized.
    #[serde(skip)]
    pub admin_password_hash: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            store_name: DEFAULT_STORE_NAME.to_string(),
            tax_rate: STANDARD_TAX_RATE,
            receipt_width: DEFAULT_RECEIPT_WIDTH,
            db_path: None,
            admin_password_hash: None,
        }
    }
}

impl StoreConfig {
    /// Creates a StoreConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `CREMA_STORE_NAME`: Override store name
    /// - `CREMA_TAX_RATE`: Override tax rate as a percentage (e.g., "8.25")
    /// - `CREMA_DB_PATH`: Database file path
    /// - `CREMA_ADMIN_PASSWORD_HASH`: argon2 hash from `crema hash-password`
    pub fn from_env() -> Self {
        StoreConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = StoreConfig::default();

        if let Some(store_name) = lookup("CREMA_STORE_NAME").filter(|s| !s.trim().is_empty()) {
            config.store_name = store_name.trim().to_string();
        }

        if let Some(raw) = lookup("CREMA_TAX_RATE") {
            match parse_tax_rate(&raw) {
                Some(rate) => config.tax_rate = rate,
                None => warn!(value = %raw, "Ignoring invalid CREMA_TAX_RATE"),
            }
        }

        if let Some(path) = lookup("CREMA_DB_PATH").filter(|s| !s.is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(hash) = lookup("CREMA_ADMIN_PASSWORD_HASH").filter(|s| !s.is_empty()) {
            config.admin_password_hash = Some(hash);
        }

        config
    }
}

/// Parses a percentage such as `"8.25"` into a rate within 0–100%.
fn parse_tax_rate(raw: &str) -> Option<TaxRate> {
    let pct = raw.trim().parse::<f64>().ok()?;
    if !pct.is_finite() || pct < 0.0 {
        return None;
    }
    let rate = TaxRate::from_percentage(pct);
    validate_tax_rate_bps(rate.bps()).ok()?;
    Some(rate)
}
