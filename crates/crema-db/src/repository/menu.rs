//! # Menu Repository
//!
//! Database operations for menu items.

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crema_core::MenuItem;

#[derive(Debug, FromRow)]
struct MenuItemRow {
    id: String,
    name: String,
    description: String,
    price_cents: i64,
    category: String,
    image: String,
    calories: Option<i64>,
    available: bool,
}

impl TryFrom<MenuItemRow> for MenuItem {
    type Error = DbError;

    fn try_from(row: MenuItemRow) -> DbResult<Self> {
        let calories = row
            .calories
            .map(u32::try_from)
            .transpose()
            .map_err(|_| DbError::corrupt("menu_items", format!("calories out of range for {}", row.id)))?;

        Ok(MenuItem {
            id: row.id,
            name: row.name,
            description: row.description,
            price_cents: row.price_cents,
            category: row.category,
            image: row.image,
            calories,
            available: row.available,
        })
    }
}

/// Repository for menu item operations.
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    pub fn new(pool: SqlitePool) -> Self {
        MenuRepository { pool }
    }

    /// Full menu, ordered by category then name.
    pub async fn list(&self) -> DbResult<Vec<MenuItem>> {
        let rows: Vec<MenuItemRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, price_cents, category, image, calories, available
            FROM menu_items
            ORDER BY category, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MenuItem::try_from).collect()
    }

    /// Gets a menu item by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<MenuItem>> {
        let row: Option<MenuItemRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, price_cents, category, image, calories, available
            FROM menu_items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MenuItem::try_from).transpose()
    }

    /// Inserts or replaces a menu item by id.
    pub async fn upsert(&self, item: &MenuItem) -> DbResult<()> {
        debug!(id = %item.id, name = %item.name, "Saving menu item");

        sqlx::query(
            r#"
            INSERT INTO menu_items (
                id, name, description, price_cents, category,
                image, calories, available, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                price_cents = excluded.price_cents,
                category = excluded.category,
                image = excluded.image,
                calories = excluded.calories,
                available = excluded.available,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price_cents)
        .bind(&item.category)
        .bind(&item.image)
        .bind(item.calories.map(i64::from))
        .bind(item.available)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a menu item. Past orders keep their line snapshots.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting menu item");

        let result = sqlx::query("DELETE FROM menu_items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", id));
        }

        Ok(())
    }

    /// Distinct categories, sorted.
    pub async fn categories(&self) -> DbResult<Vec<String>> {
        let categories: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT category FROM menu_items ORDER BY category")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
