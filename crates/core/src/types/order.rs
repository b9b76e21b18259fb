//! Orders and the statistics derived from an order page.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::OrderId;
use crate::types::money::Amount;
use crate::types::status::OrderStatus;

/// A customer order. Read-only from the account's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: OrderId,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub item_count: u32,
    pub total_amount: Amount,
    /// Absent statuses deserialize as [`OrderStatus::Unknown`].
    #[serde(default)]
    pub status: OrderStatus,
    pub payment_method: Option<String>,
    pub order_type: Option<String>,
}

/// Aggregates derived from one fetched page of orders.
///
/// `total_orders` is the count the server reports for the customer's whole
/// history. The remaining figures only cover the `page_len` orders that were
/// fetched, so a presentation layer must label them as recent activity rather
/// than lifetime totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatistics {
    pub total_orders: u64,
    pub total_spent: Decimal,
    pub pending_orders: usize,
    pub delivered_orders: usize,
    /// Number of orders the page-scoped figures were computed over.
    pub page_len: usize,
}

impl OrderStatistics {
    /// Compute statistics for a fetched page.
    ///
    /// Amounts that cannot be parsed contribute nothing to `total_spent`. A
    /// sum beyond the decimal range saturates at [`Decimal::MAX`].
    #[must_use]
    pub fn from_page(orders: &[Order], server_total: u64) -> Self {
        let total_spent = orders
            .iter()
            .filter_map(|order| order.total_amount.value())
            .try_fold(Decimal::ZERO, Decimal::checked_add)
            .unwrap_or_else(|| {
                tracing::warn!(
                    page_len = orders.len(),
                    "Order total overflowed; saturating total spent"
                );
                Decimal::MAX
            });
        let count = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();

        Self {
            total_orders: server_total,
            total_spent,
            pending_orders: count(OrderStatus::Pending),
            delivered_orders: count(OrderStatus::Delivered),
            page_len: orders.len(),
        }
    }

    /// Whether the page covers the customer's whole history.
    #[must_use]
    pub fn covers_full_history(&self) -> bool {
        u64::try_from(self.page_len).is_ok_and(|len| len >= self.total_orders)
    }
}
