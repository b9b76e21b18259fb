//! Request and response bodies for the account API.

use account_core::{Order, UserProfile};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Orders
// ─────────────────────────────────────────────────────────────────────────────

/// One page of the customer's orders.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrdersPage {
    /// Orders on this page, most recent first.
    #[serde(default)]
    pub orders: Vec<Order>,
    /// Paging information for the customer's whole history.
    #[serde(default)]
    pub pagination: Pagination,
}

/// Paging information returned alongside an order page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct Pagination {
    /// Total number of orders the customer has.
    #[serde(default)]
    pub total: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Password
// ─────────────────────────────────────────────────────────────────────────────

/// A validated password change, ready to send.
///
/// Carries no confirmation field: confirmation is checked locally and never
/// leaves the client.
#[derive(Debug, Clone)]
pub struct PasswordChange {
    pub current_password: SecretString,
    pub new_password: SecretString,
}

/// Wire body for the password change endpoint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PasswordChangeBody<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
}

impl<'a> From<&'a PasswordChange> for PasswordChangeBody<'a> {
    fn from(change: &'a PasswordChange) -> Self {
        Self {
            current_password: change.current_password.expose_secret(),
            new_password: change.new_password.expose_secret(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal Response Types
// ─────────────────────────────────────────────────────────────────────────────

/// Error body returned by the account API on failure.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    pub message: Option<String>,
}

/// Current-user response; some deployments wrap the profile, others do not.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum CurrentUserResponse {
    Wrapped { user: UserProfile },
    Bare(UserProfile),
}

impl CurrentUserResponse {
    pub fn into_user(self) -> UserProfile {
        match self {
            Self::Wrapped { user } | Self::Bare(user) => user,
        }
    }
}
