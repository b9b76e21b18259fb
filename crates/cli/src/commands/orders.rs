//! Order history command.

use account_client::AccountSurface;
use account_client::orders::OrderHistoryState;

use super::CommandError;

/// Log the recent orders and their statistics, re-fetching `refresh` times.
///
/// # Errors
///
/// Returns an error if a re-fetch fails.
pub async fn show(account: &AccountSurface, refresh: u32) -> Result<(), CommandError> {
    for _ in 0..refresh {
        account
            .refresh_orders()
            .await
            .map_err(|e| CommandError::account(account, e, "Failed to load orders"))?;
    }

    log_history(&account.orders().snapshot());
    Ok(())
}

fn log_history(history: &OrderHistoryState) {
    let stats = history.stats;
    tracing::info!("Total orders: {}", stats.total_orders);
    if stats.covers_full_history() {
        tracing::info!("Total spent: {}", history.formatted_total_spent());
    } else {
        tracing::info!(
            "Spent across the {} most recent orders: {}",
            stats.page_len,
            history.formatted_total_spent()
        );
    }
    tracing::info!("Pending: {}", stats.pending_orders);
    tracing::info!("Delivered: {}", stats.delivered_orders);

    if history.orders.is_empty() {
        tracing::info!("No orders yet");
        return;
    }
    for order in &history.orders {
        let placed = order
            .created_at
            .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d").to_string());
        let total = order
            .total_amount
            .value()
            .map_or_else(|| order.total_amount.raw().to_string(), account_core::format_amount);
        tracing::info!(
            "#{} {placed} {} item(s) {total} [{}]",
            order.id,
            order.item_count,
            order.status.badge().label
        );
    }
}
