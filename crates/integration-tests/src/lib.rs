//! Shared fixtures for the account integration tests.
//!
//! Tests run the real [`HttpAccountApi`] against an `httpmock` server; no
//! external services are needed.
//!
//! ```bash
//! cargo test -p account-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::time::Duration;

use account_client::{AccountConfig, AccountSurface, Environment, HttpAccountApi};
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;

/// Token every fixture session uses.
pub const TOKEN: &str = "integration-token";

/// Per-request timeout used by [`surface`].
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(300);

/// Configuration pointing at `base_url`.
///
/// # Panics
///
/// Panics if `base_url` is not a URL.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn config(base_url: &str) -> AccountConfig {
    AccountConfig::new(Environment::Development, Url::parse(base_url).unwrap())
        .with_request_timeout(REQUEST_TIMEOUT)
}

/// A signed-out account surface talking HTTP to `base_url`.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn surface(base_url: &str) -> AccountSurface {
    let config = config(base_url);
    let api = HttpAccountApi::new(&config).unwrap();
    AccountSurface::new(Arc::new(api), &config)
}

#[must_use]
pub fn token() -> SecretString {
    SecretString::from(TOKEN)
}

/// Profile of the fixture customer, as the identity provider returns it.
#[must_use]
pub fn jane_json() -> Value {
    json!({
        "_id": "665f1c2e9b1d4a0012ab34cd",
        "name": "Jane Doe",
        "email": "jane@example.com",
        "phone": "555-0100",
        "dateOfBirth": "1990-04-12T00:00:00.000Z",
        "status": "active",
        "createdAt": "2023-11-05T08:30:00Z",
        "loyaltyTier": "gold"
    })
}

/// One page of three orders out of seven.
#[must_use]
pub fn orders_json() -> Value {
    json!({
        "orders": [
            {"_id": "o-3", "createdAt": "2024-05-03T12:00:00Z", "itemCount": 2, "totalAmount": "10.00", "status": "pending"},
            {"_id": "o-2", "createdAt": "2024-04-20T12:00:00Z", "itemCount": 1, "totalAmount": 5.5, "status": "delivered"},
            {"_id": "o-1", "createdAt": "2024-03-01T12:00:00Z", "itemCount": 1, "totalAmount": "0", "status": "delivered"}
        ],
        "pagination": {"total": 7, "page": 1, "limit": 10}
    })
}
