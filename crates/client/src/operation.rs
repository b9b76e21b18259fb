//! Per-controller operation state machine.
//!
//! ```text
//!   Idle ──begin──▶ InFlight ──finish(ok)────────▶ Succeeded ──acknowledge──▶ Idle
//!                      └─────finish(err)/timeout─▶ Failed ─────acknowledge──▶ Idle
//! ```
//!
//! A new operation only starts from `Idle`. A settled operation (`Succeeded`
//! or `Failed`) returns to `Idle` when acknowledged; controllers acknowledge at
//! the start of every user-initiated attempt. Each `begin` hands out a ticket,
//! and `finish` is ignored unless it presents the current ticket, so an
//! abandoned request can never settle a newer one.

use std::future::Future;
use std::time::Duration;

use crate::api::ApiError;
use crate::error::AccountError;

/// Lifecycle state of a controller's network operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// Identifies one started operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Operation state plus the ticket of the operation that owns it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Operation {
    state: OperationState,
    ticket: u64,
}

impl Operation {
    /// Current state.
    #[must_use]
    pub const fn state(&self) -> OperationState {
        self.state
    }

    /// Whether an operation is in flight.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        matches!(self.state, OperationState::InFlight)
    }

    /// Return a settled operation to `Idle`.
    pub const fn acknowledge(&mut self) {
        if matches!(
            self.state,
            OperationState::Succeeded | OperationState::Failed
        ) {
            self.state = OperationState::Idle;
        }
    }

    /// Start an operation. Only allowed from `Idle`.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Busy`] in any other state.
    pub fn begin(&mut self) -> Result<Ticket, AccountError> {
        if !matches!(self.state, OperationState::Idle) {
            return Err(AccountError::Busy);
        }
        self.ticket += 1;
        self.state = OperationState::InFlight;
        Ok(Ticket(self.ticket))
    }

    /// Settle the operation identified by `ticket`.
    ///
    /// Returns `false` (and changes nothing) if the ticket is not current.
    pub const fn finish(&mut self, ticket: Ticket, succeeded: bool) -> bool {
        if ticket.0 != self.ticket || !self.is_in_flight() {
            return false;
        }
        self.state = if succeeded {
            OperationState::Succeeded
        } else {
            OperationState::Failed
        };
        true
    }

    /// Drop whatever is in flight and return to `Idle`.
    ///
    /// The abandoned operation's ticket becomes invalid.
    pub const fn abandon(&mut self) {
        self.ticket += 1;
        self.state = OperationState::Idle;
    }
}

/// Run a network call under `limit`.
///
/// # Errors
///
/// Returns [`ApiError::Timeout`] if the call does not finish in time; the
/// call's own error otherwise.
pub async fn with_timeout<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| ApiError::Timeout(limit))?
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_only_from_idle() {
        let mut op = Operation::default();
        let ticket = op.begin().unwrap();
        assert!(op.is_in_flight());
        assert!(matches!(op.begin(), Err(AccountError::Busy)));

        assert!(op.finish(ticket, true));
        assert_eq!(op.state(), OperationState::Succeeded);
        assert!(matches!(op.begin(), Err(AccountError::Busy)));

        op.acknowledge();
        assert_eq!(op.state(), OperationState::Idle);
        assert!(op.begin().is_ok());
    }

    #[test]
    fn test_finish_failure() {
        let mut op = Operation::default();
        let ticket = op.begin().unwrap();
        assert!(op.finish(ticket, false));
        assert_eq!(op.state(), OperationState::Failed);
    }

    #[test]
    fn test_acknowledge_does_not_cancel_in_flight() {
        let mut op = Operation::default();
        op.begin().unwrap();
        op.acknowledge();
        assert!(op.is_in_flight());
    }

    #[test]
    fn test_abandoned_ticket_cannot_settle() {
        let mut op = Operation::default();
        let stale = op.begin().unwrap();
        op.abandon();
        let fresh = op.begin().unwrap();

        assert!(!op.finish(stale, false));
        assert!(op.is_in_flight());
        assert!(op.finish(fresh, true));
        assert_eq!(op.state(), OperationState::Succeeded);
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result: Result<(), ApiError> = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(ApiError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_with_timeout_passes_result() {
        let result = with_timeout(Duration::from_secs(1), async { Ok::<_, ApiError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
