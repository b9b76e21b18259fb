//! Order history controller.
//!
//! Fetches the most recent page of the customer's orders and derives summary
//! statistics from it. A failed fetch keeps whatever was shown before and is
//! only logged.

use std::sync::Arc;

use account_core::{Order, OrderStatistics, format_amount};
use tokio::sync::watch;

use crate::context::AccountContext;
use crate::error::AccountError;
use crate::operation::{Operation, OperationState, with_timeout};

/// Observable state of the order history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderHistoryState {
    /// Orders from the last successful fetch, in server order.
    pub orders: Vec<Order>,
    /// Statistics for `orders`.
    pub stats: OrderStatistics,
    pub operation: Operation,
}

impl OrderHistoryState {
    /// Whether a fetch is in flight (loading indicator).
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.operation.is_in_flight()
    }

    /// `total_spent` formatted with two decimals.
    #[must_use]
    pub fn formatted_total_spent(&self) -> String {
        format_amount(self.stats.total_spent)
    }
}

/// Controller for the order history.
#[derive(Debug)]
pub struct OrderHistoryController {
    ctx: AccountContext,
    page_size: u32,
    state: Arc<watch::Sender<OrderHistoryState>>,
}

impl OrderHistoryController {
    #[must_use]
    pub fn new(ctx: AccountContext, page_size: u32) -> Self {
        let (state, _) = watch::channel(OrderHistoryState::default());
        Self {
            ctx,
            page_size,
            state: Arc::new(state),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> OrderHistoryState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<OrderHistoryState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn stats(&self) -> OrderStatistics {
        self.state.borrow().stats
    }

    #[must_use]
    pub fn operation_state(&self) -> OperationState {
        self.state.borrow().operation.state()
    }

    /// Drop all orders and statistics and forget any in-flight fetch.
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            state.orders.clear();
            state.stats = OrderStatistics::default();
            state.operation.abandon();
        });
    }

    /// Fetch the most recent page of orders and recompute statistics.
    ///
    /// On failure the previous orders and statistics are kept; the failure is
    /// logged and not reported to the customer. Results that arrive after the
    /// session changed are discarded.
    ///
    /// # Errors
    ///
    /// - [`AccountError::Busy`] if a fetch is already in flight
    /// - [`AccountError::NotSignedIn`] without a session
    /// - [`AccountError::Api`] if the fetch failed or timed out
    /// - [`AccountError::Stale`] if the session changed during the fetch
    pub async fn refresh(&self) -> Result<OrderStatistics, AccountError> {
        let (session, generation) = self
            .ctx
            .session()
            .current_with_generation()
            .ok_or(AccountError::NotSignedIn)?;

        let mut begun = Err(AccountError::Busy);
        self.state.send_if_modified(|state| {
            state.operation.acknowledge();
            begun = state.operation.begin();
            begun.is_ok()
        });
        let ticket = begun?;

        let result = with_timeout(
            self.ctx.request_timeout(),
            self.ctx.api().fetch_orders(&session.token, self.page_size),
        )
        .await;

        let current = self.ctx.session().generation() == generation;
        match result {
            Ok(page) if current => {
                let stats = OrderStatistics::from_page(&page.orders, page.pagination.total);
                let mut applied = false;
                self.state.send_modify(|state| {
                    if state.operation.finish(ticket, true) {
                        state.orders = page.orders;
                        state.stats = stats;
                        applied = true;
                    }
                });
                if !applied {
                    return Err(AccountError::Stale);
                }
                tracing::debug!(
                    page_len = stats.page_len,
                    total_orders = stats.total_orders,
                    "Order history refreshed"
                );
                if !stats.covers_full_history() {
                    tracing::debug!("Order statistics cover the most recent page only");
                }
                Ok(stats)
            }
            Ok(_) => {
                self.state.send_modify(|state| {
                    state.operation.finish(ticket, true);
                });
                Err(AccountError::Stale)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to fetch order history");
                self.state.send_modify(|state| {
                    state.operation.finish(ticket, false);
                });
                Err(err.into())
            }
        }
    }
}
