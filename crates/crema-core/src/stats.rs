//! # Order Statistics
//!
//! Revenue metrics for the staff dashboard.
//!
//! ## Reporting Windows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Period   Window (UTC, half-open [start, end))                          │
//! │  ──────   ──────────────────────────────────────                        │
//! │  Day      today 00:00        → tomorrow 00:00                           │
//! │  Week     last Sunday 00:00  → next Sunday 00:00                        │
//! │  Month    1st of month 00:00 → 1st of next month 00:00                  │
//! │  Year     Jan 1 00:00        → next Jan 1 00:00                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Order, OrderStatus};

// =============================================================================
// Order Stats
// =============================================================================

/// Aggregates over a set of orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderStats {
    pub total_revenue: Money,
    pub total_orders: usize,
    pub pending_orders: usize,
    pub completed_orders: usize,
    /// Revenue per order, half-up to the cent. Zero with no orders.
    pub average_order_value: Money,
    pub tax_collected: Money,
    pub discounts_given: Money,
}

impl OrderStats {
    pub fn from_orders<'a, I>(orders: I) -> Self
    where
        I: IntoIterator<Item = &'a Order>,
    {
        let mut stats = OrderStats::default();

        for order in orders {
            stats.total_orders += 1;
            stats.total_revenue += order.total();
            stats.tax_collected += order.tax();
            stats.discounts_given += order.discount();
            match order.status {
                OrderStatus::Pending => stats.pending_orders += 1,
                OrderStatus::Completed => stats.completed_orders += 1,
            }
        }

        if stats.total_orders > 0 {
            let n = stats.total_orders as i64;
            let revenue = stats.total_revenue.cents();
            stats.average_order_value = Money::from_cents((revenue + n / 2) / n);
        }

        stats
    }

    /// Stats for the orders created inside `period` as seen at `now`.
    pub fn for_period(orders: &[Order], period: StatsPeriod, now: DateTime<Utc>) -> Self {
        let (start, end) = period.window(now);
        Self::from_orders(
            orders
                .iter()
                .filter(|o| o.created_at >= start && o.created_at < end),
        )
    }
}

// =============================================================================
// Stats Period
// =============================================================================

/// Dashboard reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    Day,
    Week,
    Month,
    Year,
}

impl StatsPeriod {
    /// Half-open UTC window `[start, end)` containing `now`.
    pub fn window(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = now.date_naive();

        let (start, end) = match self {
            StatsPeriod::Day => (today, today + Duration::days(1)),
            StatsPeriod::Week => {
                let start = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
                (start, start + Duration::days(7))
            }
            StatsPeriod::Month => {
                let start = today - Duration::days(i64::from(today.day0()));
                (start, first_of_month(start + Duration::days(32)))
            }
            StatsPeriod::Year => {
                let start = today - Duration::days(i64::from(today.ordinal0()));
                let next = start + Duration::days(366);
                (start, next - Duration::days(i64::from(next.ordinal0())))
            }
        };

        (midnight(start), midnight(end))
    }
}

impl FromStr for StatsPeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" | "today" => Ok(StatsPeriod::Day),
            "week" | "weekly" => Ok(StatsPeriod::Week),
            "month" | "monthly" => Ok(StatsPeriod::Month),
            "year" | "yearly" => Ok(StatsPeriod::Year),
            _ => Err(ValidationError::NotAllowed {
                field: "period".to_string(),
                allowed: vec![
                    "day".to_string(),
                    "week".to_string(),
                    "month".to_string(),
                    "year".to_string(),
                ],
            }),
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

// =============================================================================
// Dashboard Queues
// =============================================================================

/// Pending orders, oldest first (the fulfillment queue).
pub fn pending_queue(orders: &[Order]) -> Vec<&Order> {
    let mut pending: Vec<&Order> = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Pending)
        .collect();
    pending.sort_by_key(|o| o.created_at);
    pending
}

/// Most recently completed orders, newest first.
pub fn recently_completed(orders: &[Order], limit: usize) -> Vec<&Order> {
    let mut done: Vec<&Order> = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Completed)
        .collect();
    done.sort_by(|a, b| {
        let a_at = a.completed_at.unwrap_or(a.created_at);
        let b_at = b.completed_at.unwrap_or(b.created_at);
        b_at.cmp(&a_at)
    });
    done.truncate(limit);
    done
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn order_at(total_cents: i64, status: OrderStatus, created_at: DateTime<Utc>) -> Order {
        Order {
            id: uuid::Uuid::new_v4().to_string(),
            created_at,
            lines: vec![],
            subtotal_cents: total_cents,
            discount_code: None,
            discount_cents: 100,
            tax_cents: 10,
            total_cents,
            table_number: "1".to_string(),
            customer_name: "Ana".to_string(),
            status,
            completed_at: None,
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_stats_from_orders() {
        let now = Utc::now();
        let orders = vec![
            order_at(1000, OrderStatus::Pending, now),
            order_at(2001, OrderStatus::Completed, now),
            order_at(3000, OrderStatus::Completed, now),
        ];

        let stats = OrderStats::from_orders(&orders);
        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.pending_orders, 1);
        assert_eq!(stats.completed_orders, 2);
        assert_eq!(stats.total_revenue.cents(), 6001);
        assert_eq!(stats.average_order_value.cents(), 2000);
        assert_eq!(stats.tax_collected.cents(), 30);
        assert_eq!(stats.discounts_given.cents(), 300);
    }

    #[test]
    fn test_stats_empty() {
        let stats = OrderStats::from_orders(&Vec::<Order>::new());
        assert_eq!(stats, OrderStats::default());
        assert!(stats.average_order_value.is_zero());
    }

    #[test]
    fn test_day_window() {
        let (start, end) = StatsPeriod::Day.window(at(2026, 10, 18, 15));
        assert_eq!(start, at(2026, 10, 18, 0));
        assert_eq!(end, at(2026, 10, 19, 0));
    }

    #[test]
    fn test_week_window_starts_sunday() {
        // 2026-10-18 is a Sunday; 2026-10-21 a Wednesday
        let (start, end) = StatsPeriod::Week.window(at(2026, 10, 21, 9));
        assert_eq!(start, at(2026, 10, 18, 0));
        assert_eq!(end, at(2026, 10, 25, 0));

        let (start, _) = StatsPeriod::Week.window(at(2026, 10, 18, 0));
        assert_eq!(start, at(2026, 10, 18, 0));
    }

    #[test]
    fn test_month_window() {
        let (start, end) = StatsPeriod::Month.window(at(2026, 1, 31, 23));
        assert_eq!(start, at(2026, 1, 1, 0));
        assert_eq!(end, at(2026, 2, 1, 0));

        let (start, end) = StatsPeriod::Month.window(at(2028, 2, 29, 12));
        assert_eq!(start, at(2028, 2, 1, 0));
        assert_eq!(end, at(2028, 3, 1, 0));

        let (_, end) = StatsPeriod::Month.window(at(2026, 12, 5, 0));
        assert_eq!(end, at(2027, 1, 1, 0));
    }

    #[test]
    fn test_year_window() {
        let (start, end) = StatsPeriod::Year.window(at(2028, 12, 31, 23));
        assert_eq!(start, at(2028, 1, 1, 0));
        assert_eq!(end, at(2029, 1, 1, 0));

        let (start, end) = StatsPeriod::Year.window(at(2026, 1, 1, 0));
        assert_eq!(start, at(2026, 1, 1, 0));
        assert_eq!(end, at(2027, 1, 1, 0));
    }

    #[test]
    fn test_for_period_filters_by_created_at() {
        let now = at(2026, 10, 18, 12);
        let orders = vec![
            order_at(1000, OrderStatus::Pending, at(2026, 10, 18, 8)),
            order_at(2000, OrderStatus::Pending, at(2026, 10, 17, 23)),
            order_at(4000, OrderStatus::Pending, at(2026, 10, 19, 0)),
        ];

        let stats = OrderStats::for_period(&orders, StatsPeriod::Day, now);
        assert_eq!(stats.total_orders, 1);
        assert_eq!(stats.total_revenue.cents(), 1000);

        let stats = OrderStats::for_period(&orders, StatsPeriod::Month, now);
        assert_eq!(stats.total_orders, 3);
    }

    #[test]
    fn test_period_from_str() {
        assert_eq!("Week".parse::<StatsPeriod>().unwrap(), StatsPeriod::Week);
        assert_eq!("today".parse::<StatsPeriod>().unwrap(), StatsPeriod::Day);
        assert!("decade".parse::<StatsPeriod>().is_err());
    }

    #[test]
    fn test_dashboard_queues() {
        let mut first = order_at(1000, OrderStatus::Pending, at(2026, 10, 18, 8));
        let second = order_at(1000, OrderStatus::Pending, at(2026, 10, 18, 9));
        let mut done_early = order_at(1000, OrderStatus::Completed, at(2026, 10, 18, 7));
        done_early.completed_at = Some(at(2026, 10, 18, 8));
        let mut done_late = order_at(1000, OrderStatus::Completed, at(2026, 10, 18, 7));
        done_late.completed_at = Some(at(2026, 10, 18, 10));
        first.customer_name = "First".to_string();

        let orders = vec![second, done_early, first, done_late.clone()];

        let queue = pending_queue(&orders);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].customer_name, "First");

        let recent = recently_completed(&orders, 1);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, done_late.id);
    }
}
