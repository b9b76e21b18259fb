//! Unified error handling with Sentry integration.
//!
//! Errors come in two tiers:
//! - [`ValidationError`]: detected locally before any network call
//! - [`ApiError`]: the remote call failed or timed out
//!
//! [`AccountError`] wraps both, plus the state-machine rejections, and decides
//! which text reaches the customer through the status reporter.

use thiserror::Error;

use crate::api::ApiError;

/// Minimum accepted length for a new password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Local validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Profile name is blank.
    #[error("Name is required")]
    MissingName,

    /// Profile email is blank.
    #[error("Email is required")]
    MissingEmail,

    /// Profile email is not an email address.
    #[error("Please enter a valid email address")]
    InvalidEmail(#[from] account_core::EmailError),

    /// New password and confirmation differ.
    #[error("New passwords do not match")]
    PasswordMismatch,

    /// New password is shorter than the minimum.
    #[error("New password must be at least {min} characters long")]
    PasswordTooShort { min: usize },
}

/// Account-level error type returned by controller operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Input failed local validation; nothing was sent.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The remote call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The same operation is already in flight.
    #[error("Operation already in progress")]
    Busy,

    /// No authenticated session.
    #[error("Not signed in")]
    NotSignedIn,

    /// The session's profile has no ID to address the update to.
    #[error("Profile has no user ID")]
    MissingUserId,

    /// The session changed while the request was in flight; its result was dropped.
    #[error("Session changed before the response arrived")]
    Stale,
}

impl AccountError {
    /// Text to show the customer.
    ///
    /// Validation errors are shown as-is. Remote failures show the server's
    /// message when it sent one and `fallback` otherwise; transport details
    /// are never exposed.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Api(ApiError::Timeout(_)) => {
                "The request timed out. Please try again.".to_string()
            }
            Self::Api(err) => err
                .server_message()
                .map_or_else(|| fallback.to_string(), str::to_string),
            Self::NotSignedIn | Self::MissingUserId => {
                "Please sign in again to continue".to_string()
            }
            Self::Busy | Self::Stale => fallback.to_string(),
        }
    }

    /// Whether the error was raised before any network call.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Busy | Self::NotSignedIn | Self::MissingUserId
        )
    }
}

/// Result type alias for `AccountError`.
pub type Result<T> = std::result::Result<T, AccountError>;

/// Capture a remote mutation failure to Sentry and log it.
///
/// Server rejections (4xx) are expected customer errors and only logged.
pub fn capture_remote_failure(operation: &str, err: &ApiError) {
    match err {
        ApiError::Api { status, .. } if *status < 500 => {
            tracing::info!(operation, error = %err, "Request rejected by server");
        }
        _ => {
            let event_id = sentry::capture_error(err);
            tracing::error!(
                operation,
                error = %err,
                sentry_event_id = %event_id,
                "Request failed"
            );
        }
    }
}

/// Add a breadcrumb for customer actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const FALLBACK: &str = "Failed to update profile";

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            AccountError::from(ValidationError::PasswordMismatch).user_message(FALLBACK),
            "New passwords do not match"
        );
        assert_eq!(
            AccountError::from(ValidationError::PasswordTooShort { min: 6 })
                .user_message(FALLBACK),
            "New password must be at least 6 characters long"
        );
    }

    #[test]
    fn test_server_message_is_surfaced() {
        let err = AccountError::from(ApiError::Api {
            status: 409,
            message: Some("Email already in use".to_string()),
        });
        assert_eq!(err.user_message(FALLBACK), "Email already in use");
    }

    #[test]
    fn test_generic_fallback() {
        let err = AccountError::from(ApiError::Api {
            status: 500,
            message: None,
        });
        assert_eq!(err.user_message(FALLBACK), FALLBACK);

        let err = AccountError::from(ApiError::Api {
            status: 400,
            message: Some("   ".to_string()),
        });
        assert_eq!(err.user_message(FALLBACK), FALLBACK);
    }

    #[test]
    fn test_timeout_message() {
        let err = AccountError::from(ApiError::Timeout(Duration::from_secs(15)));
        assert_eq!(
            err.user_message(FALLBACK),
            "The request timed out. Please try again."
        );
    }

    #[test]
    fn test_is_local() {
        assert!(AccountError::from(ValidationError::MissingName).is_local());
        assert!(AccountError::Busy.is_local());
        assert!(!AccountError::from(ApiError::Timeout(Duration::from_secs(1))).is_local());
    }
}
