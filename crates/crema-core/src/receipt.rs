//! # Receipt
//!
//! The customer-facing view of a placed order, and its plain-text rendering.
//!
//! ```text
//!            Crema Coffee House
//! Order 3f2a9c1e          2026-10-18 09:41
//! Table 4 · Ana
//! ----------------------------------------
//! 2x Espresso Silk                   $7.00
//! 1x Almond Croissant                $4.50
//! ----------------------------------------
//! Subtotal                          $11.50
//! Discount (WELCOME)                -$1.00
//! Tax                                $1.05
//! Total                             $11.55
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Order, OrderStatus};

/// One printed line on the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

/// Receipt shown after checkout and in the order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub store_name: String,
    pub order_id: String,
    pub timestamp: String,
    pub table_number: String,
    pub customer_name: String,
    pub items: Vec<ReceiptLine>,
    pub subtotal_cents: i64,
    pub discount_code: Option<String>,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub status: OrderStatus,
}

impl Receipt {
    pub fn from_order(order: &Order, store_name: &str) -> Self {
        Receipt {
            store_name: store_name.to_string(),
            order_id: order.id.clone(),
            timestamp: order.created_at.to_rfc3339(),
            table_number: order.table_number.clone(),
            customer_name: order.customer_name.clone(),
            items: order
                .lines
                .iter()
                .map(|l| ReceiptLine {
                    name: l.name.clone(),
                    quantity: l.quantity,
                    unit_price_cents: l.unit_price_cents,
                    line_total_cents: l.line_total().cents(),
                })
                .collect(),
            subtotal_cents: order.subtotal_cents,
            discount_code: order.discount_code.clone(),
            discount_cents: order.discount_cents,
            tax_cents: order.tax_cents,
            total_cents: order.total_cents,
            status: order.status,
        }
    }

    /// First eight characters of the order id, as printed.
    pub fn short_id(&self) -> &str {
        self.order_id.get(..8).unwrap_or(&self.order_id)
    }

    /// Renders the receipt as fixed-width text, `width` columns wide.
    pub fn render_text(&self, width: usize) -> String {
        let rule = "-".repeat(width);
        let mut out = Vec::new();

        out.push(center(&self.store_name, width));
        let date = self.timestamp.get(..16).unwrap_or(&self.timestamp).replace('T', " ");
        out.push(columns(&format!("Order {}", self.short_id()), &date, width));
        out.push(format!("Table {} · {}", self.table_number, self.customer_name));
        out.push(rule.clone());

        for item in &self.items {
            out.push(columns(
                &format!("{}x {}", item.quantity, item.name),
                &Money::from_cents(item.line_total_cents).to_string(),
                width,
            ));
        }

        out.push(rule);
        out.push(columns("Subtotal", &Money::from_cents(self.subtotal_cents).to_string(), width));
        if self.discount_cents > 0 {
            let label = match &self.discount_code {
                Some(code) => format!("Discount ({})", code),
                None => "Discount".to_string(),
            };
            out.push(columns(
                &label,
                &format!("-{}", Money::from_cents(self.discount_cents)),
                width,
            ));
        }
        out.push(columns("Tax", &Money::from_cents(self.tax_cents).to_string(), width));
        out.push(columns("Total", &Money::from_cents(self.total_cents).to_string(), width));

        out.join("\n")
    }
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((width - len) / 2), text)
}

fn columns(left: &str, right: &str, width: usize) -> String {
    let used = left.chars().count() + right.chars().count();
    let gap = width.saturating_sub(used).max(1);
    format!("{}{}{}", left, " ".repeat(gap), right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::build_order;
    use crate::types::{CartLine, DiscountCode};

    fn order() -> Order {
        let lines = vec![
            CartLine {
                menu_item_id: "hc-1".to_string(),
                name: "Espresso Silk".to_string(),
                unit_price_cents: 350,
                quantity: 2,
            },
            CartLine {
                menu_item_id: "bak-1".to_string(),
                name: "Almond Croissant".to_string(),
                unit_price_cents: 450,
                quantity: 1,
            },
        ];
        let code = DiscountCode::fixed("WELCOME", Money::from_cents(100));
        build_order(&lines, Some(&code), "Ana", "4").unwrap()
    }

    #[test]
    fn test_receipt_from_order() {
        let order = order();
        let receipt = Receipt::from_order(&order, "Crema Coffee House");

        assert_eq!(receipt.items.len(), 2);
        assert_eq!(receipt.items[0].line_total_cents, 700);
        assert_eq!(receipt.total_cents, order.total_cents);
        assert_eq!(receipt.short_id().len(), 8);
    }

    #[test]
    fn test_render_text() {
        let text = Receipt::from_order(&order(), "Crema").render_text(40);

        assert!(text.contains("2x Espresso Silk"));
        assert!(text.contains("Discount (WELCOME)"));
        assert!(text.contains("-$1.00"));
        let total_line = text.lines().last().unwrap();
        assert!(total_line.starts_with("Total"));
        assert!(total_line.ends_with("$11.55"));
        assert_eq!(total_line.chars().count(), 40);
    }

    #[test]
    fn test_render_text_without_discount_skips_line() {
        let mut order = order();
        order.discount_cents = 0;
        order.discount_code = None;

        let text = Receipt::from_order(&order, "Crema").render_text(40);
        assert!(!text.contains("Discount"));
    }

    #[test]
    fn test_receipt_serializes_camel_case() {
        let json = serde_json::to_value(Receipt::from_order(&order(), "Crema")).unwrap();
        assert!(json.get("totalCents").is_some());
        assert!(json.get("storeName").is_some());
    }
}
