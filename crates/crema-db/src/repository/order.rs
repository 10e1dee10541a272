//! # Order Repository
//!
//! Database operations for orders and their line snapshots.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. CHECKOUT                                                           │
//! │     └── insert() → orders row + order_items rows (one transaction)     │
//! │                    status = 'pending'                                   │
//! │                                                                         │
//! │  2. FULFILL (staff)                                                    │
//! │     └── complete() → status = 'completed', completed_at = now          │
//! │                                                                         │
//! │  Totals and lines are never rewritten after step 1.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crema_core::{CartLine, CoreError, Order, OrderStatus};

const ORDER_COLUMNS: &str = r#"
    id, created_at, subtotal_cents, discount_code, discount_cents,
    tax_cents, total_cents, table_number, customer_name, status, completed_at
"#;

#[derive(Debug, FromRow)]
struct OrderRow {
    id: String,
    created_at: DateTime<Utc>,
    subtotal_cents: i64,
    discount_code: Option<String>,
    discount_cents: i64,
    tax_cents: i64,
    total_cents: i64,
    table_number: String,
    customer_name: String,
    status: OrderStatus,
    completed_at: Option<DateTime<Utc>>,
}

impl OrderRow {
    fn into_order(self, lines: Vec<CartLine>) -> Order {
        Order {
            id: self.id,
            created_at: self.created_at,
            lines,
            subtotal_cents: self.subtotal_cents,
            discount_code: self.discount_code,
            discount_cents: self.discount_cents,
            tax_cents: self.tax_cents,
            total_cents: self.total_cents,
            table_number: self.table_number,
            customer_name: self.customer_name,
            status: self.status,
            completed_at: self.completed_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
    order_id: String,
    menu_item_id: String,
    name: String,
    unit_price_cents: i64,
    quantity: i64,
}

impl From<OrderItemRow> for CartLine {
    fn from(row: OrderItemRow) -> Self {
        CartLine {
            menu_item_id: row.menu_item_id,
            name: row.name,
            unit_price_cents: row.unit_price_cents,
            quantity: row.quantity,
        }
    }
}

/// Repository for order operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Persists a freshly built order with its lines.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` if the order id already exists; nothing is
    /// written in that case.
    pub async fn insert(&self, order: &Order) -> DbResult<()> {
        debug!(id = %order.id, total_cents = order.total_cents, "Inserting order");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, created_at, subtotal_cents, discount_code, discount_cents,
                tax_cents, total_cents, table_number, customer_name, status, completed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&order.id)
        .bind(order.created_at)
        .bind(order.subtotal_cents)
        .bind(&order.discount_code)
        .bind(order.discount_cents)
        .bind(order.tax_cents)
        .bind(order.total_cents)
        .bind(&order.table_number)
        .bind(&order.customer_name)
        .bind(order.status)
        .bind(order.completed_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("order id", &order.id),
            other => other,
        })?;

        for (position, line) in order.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    order_id, position, menu_item_id, name, unit_price_cents, quantity
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&order.id)
            .bind(position as i64)
            .bind(&line.menu_item_id)
            .bind(&line.name)
            .bind(line.unit_price_cents)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(id = %order.id, lines = order.lines.len(), "Order persisted");
        Ok(())
    }

    /// Gets an order with its lines.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS);
        let Some(row) = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let lines: Vec<OrderItemRow> = sqlx::query_as(
            r#"
            SELECT order_id, menu_item_id, name, unit_price_cents, quantity
            FROM order_items
            WHERE order_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(row.into_order(lines.into_iter().map(CartLine::from).collect())))
    }

    /// All orders, newest first.
    pub async fn list(&self) -> DbResult<Vec<Order>> {
        let sql = format!("SELECT {} FROM orders ORDER BY created_at DESC", ORDER_COLUMNS);
        let rows: Vec<OrderRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        let items: Vec<OrderItemRow> = sqlx::query_as(
            r#"
            SELECT order_id, menu_item_id, name, unit_price_cents, quantity
            FROM order_items
            ORDER BY order_id, position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(attach_lines(rows, items))
    }

    /// Orders created in `[start, end)`, newest first.
    pub async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM orders WHERE created_at >= ?1 AND created_at < ?2 ORDER BY created_at DESC",
            ORDER_COLUMNS
        );
        let rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        let items: Vec<OrderItemRow> = sqlx::query_as(
            r#"
            SELECT oi.order_id, oi.menu_item_id, oi.name, oi.unit_price_cents, oi.quantity
            FROM order_items oi
            INNER JOIN orders o ON o.id = oi.order_id
            WHERE o.created_at >= ?1 AND o.created_at < ?2
            ORDER BY oi.order_id, oi.position
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(attach_lines(rows, items))
    }

    /// Marks a pending order completed and returns it.
    ///
    /// ## Errors
    /// - `DbError::NotFound` for an unknown id
    /// - `DbError::Domain(InvalidOrderStatus)` if it is already completed
    pub async fn complete(&self, id: &str, at: DateTime<Utc>) -> DbResult<Order> {
        let mut order = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))?;

        order.complete(at)?;

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = 'completed',
                completed_at = ?2
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await?;

        // Another connection completed it between the read and the update
        if result.rows_affected() == 0 {
            return Err(CoreError::InvalidOrderStatus {
                order_id: id.to_string(),
                current_status: OrderStatus::Completed.to_string(),
            }
            .into());
        }

        info!(id = %id, "Order completed");
        Ok(order)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn attach_lines(rows: Vec<OrderRow>, items: Vec<OrderItemRow>) -> Vec<Order> {
    let mut lines_by_order: HashMap<String, Vec<CartLine>> = HashMap::new();
    for item in items {
        lines_by_order
            .entry(item.order_id.clone())
            .or_default()
            .push(CartLine::from(item));
    }

    rows.into_iter()
        .map(|row| {
            let lines = lines_by_order.remove(&row.id).unwrap_or_default();
            row.into_order(lines)
        })
        .collect()
}
