//! Status reporter: the single error slot and single success slot shown to the
//! customer.

use std::sync::Arc;

use tokio::sync::watch;

/// Messages currently shown to the customer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMessages {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Holds at most one error and one success message.
///
/// Mutating operations call [`StatusReporter::clear`] when they start and
/// report once when they resolve.
#[derive(Clone, Debug)]
pub struct StatusReporter {
    sender: Arc<watch::Sender<StatusMessages>>,
}

impl StatusReporter {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(StatusMessages::default());
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Current messages.
    #[must_use]
    pub fn snapshot(&self) -> StatusMessages {
        self.sender.borrow().clone()
    }

    /// Subscribe to message changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StatusMessages> {
        self.sender.subscribe()
    }

    /// Clear both slots.
    pub fn clear(&self) {
        self.sender.send_if_modified(|messages| {
            let changed = messages.error.is_some() || messages.success.is_some();
            *messages = StatusMessages::default();
            changed
        });
    }

    /// Show an error.
    pub fn report_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.sender.send_modify(|messages| messages.error = Some(message));
    }

    /// Show a success message.
    pub fn report_success(&self, message: impl Into<String>) {
        let message = message.into();
        self.sender.send_modify(|messages| messages.success = Some(message));
    }

    /// Dismiss the error message.
    pub fn dismiss_error(&self) {
        self.sender
            .send_if_modified(|messages| messages.error.take().is_some());
    }

    /// Dismiss the success message.
    pub fn dismiss_success(&self) {
        self.sender
            .send_if_modified(|messages| messages.success.take().is_some());
    }
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_slots() {
        let status = StatusReporter::new();
        status.report_error("first");
        status.report_error("second");

        assert_eq!(status.snapshot().error.as_deref(), Some("second"));
        assert_eq!(status.snapshot().success, None);
    }

    #[test]
    fn test_clear() {
        let status = StatusReporter::new();
        status.report_error("oops");
        status.report_success("done");

        status.clear();

        assert_eq!(status.snapshot(), StatusMessages::default());
    }

    #[test]
    fn test_dismiss_one_slot() {
        let status = StatusReporter::new();
        status.report_error("oops");
        status.report_success("done");

        status.dismiss_error();

        assert_eq!(status.snapshot().error, None);
        assert_eq!(status.snapshot().success.as_deref(), Some("done"));
    }
}
