//! # Discount Repository
//!
//! Database operations for discount codes. Codes are stored uppercase and
//! are unique across active and inactive codes alike.

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crema_core::pricing::normalize_discount_code;
use crema_core::{DiscountCode, DiscountKind};

#[derive(Debug, FromRow)]
struct DiscountRow {
    id: String,
    code: String,
    kind: DiscountKind,
    value: i64,
    active: bool,
}

impl From<DiscountRow> for DiscountCode {
    fn from(row: DiscountRow) -> Self {
        DiscountCode {
            id: row.id,
            code: row.code,
            kind: row.kind,
            value: row.value,
            active: row.active,
        }
    }
}

/// Repository for discount code operations.
#[derive(Debug, Clone)]
pub struct DiscountRepository {
    pool: SqlitePool,
}

impl DiscountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DiscountRepository { pool }
    }

    /// All codes, active or not, ordered by code.
    pub async fn list(&self) -> DbResult<Vec<DiscountCode>> {
        let rows: Vec<DiscountRow> = sqlx::query_as(
            "SELECT id, code, kind, value, active FROM discount_codes ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DiscountCode::from).collect())
    }

    /// Inserts or replaces a code by id. The stored code is uppercased.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` when another code already uses the text.
    pub async fn upsert(&self, discount: &DiscountCode) -> DbResult<DiscountCode> {
        let mut saved = discount.clone();
        saved.code = normalize_discount_code(&discount.code);

        debug!(id = %saved.id, code = %saved.code, "Saving discount code");

        sqlx::query(
            r#"
            INSERT INTO discount_codes (id, code, kind, value, active, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT (id) DO UPDATE SET
                code = excluded.code,
                kind = excluded.kind,
                value = excluded.value,
                active = excluded.active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&saved.id)
        .bind(&saved.code)
        .bind(saved.kind)
        .bind(saved.value)
        .bind(saved.active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("code", &saved.code),
            other => other,
        })?;

        Ok(saved)
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting discount code");

        let result = sqlx::query("DELETE FROM discount_codes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("DiscountCode", id));
        }

        Ok(())
    }

    /// Looks up an active code, case-insensitively. Unknown or inactive → `None`.
    pub async fn find_active(&self, code: &str) -> DbResult<Option<DiscountCode>> {
        let code = normalize_discount_code(code);
        if code.is_empty() {
            return Ok(None);
        }

        let row: Option<DiscountRow> = sqlx::query_as(
            r#"
            SELECT id, code, kind, value, active
            FROM discount_codes
            WHERE code = ?1 AND active = 1
            "#,
        )
        .bind(&code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DiscountCode::from))
    }
}
