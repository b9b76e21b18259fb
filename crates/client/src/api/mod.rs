//! Account API client.
//!
//! Talks to the identity provider (profile and password mutations, current
//! user) and the order service (order pages) over HTTP + JSON. Every request
//! carries `Authorization: Bearer <token>`, `Content-Type: application/json`
//! and a fresh `x-request-id`.
//!
//! # Example
//!
//! ```rust,ignore
//! use account_client::api::{AccountApi, HttpAccountApi};
//!
//! let api = HttpAccountApi::new(&config)?;
//! let page = api.fetch_orders(&token, 10).await?;
//! ```

mod types;

pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use account_core::{ProfileDraft, UserId, UserProfile};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::config::AccountConfig;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Errors that can occur when calling the account API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status}{}", .message.as_deref().map(|m| format!(" - {m}")).unwrap_or_default())]
    Api {
        status: u16,
        /// `message` from the error body, if the body had one.
        message: Option<String>,
    },

    /// Response body could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The operation did not complete in time.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// An endpoint URL could not be built.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl ApiError {
    /// The server-provided message, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref().filter(|m| !m.trim().is_empty()),
            _ => None,
        }
    }
}

/// Operations the account surface needs from the remote services.
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Fetch one page of the customer's orders, most recent first.
    async fn fetch_orders(&self, token: &SecretString, limit: u32) -> Result<OrdersPage, ApiError>;

    /// Replace the customer's profile with the given draft.
    async fn update_profile(
        &self,
        token: &SecretString,
        user_id: &UserId,
        draft: &ProfileDraft,
    ) -> Result<(), ApiError>;

    /// Change the customer's password.
    async fn change_password(
        &self,
        token: &SecretString,
        change: &PasswordChange,
    ) -> Result<(), ApiError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP Client
// ─────────────────────────────────────────────────────────────────────────────

/// `reqwest`-backed implementation of [`AccountApi`].
#[derive(Clone)]
pub struct HttpAccountApi {
    inner: Arc<HttpAccountApiInner>,
}

struct HttpAccountApiInner {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpAccountApi {
    /// Create a new account API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &AccountConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("account-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpAccountApiInner {
                client,
                base_url: config.api_base_url.clone(),
                timeout: config.request_timeout,
            }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Fetch the profile of the customer the token belongs to.
    ///
    /// Used to establish a session from a token alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a profile.
    pub async fn current_user(&self, token: &SecretString) -> Result<UserProfile, ApiError> {
        let url = self.endpoint("/api/auth/me")?;
        let response: CurrentUserResponse = self
            .send_json(reqwest::Method::GET, url, token, None::<&()>)
            .await?;
        Ok(response.into_user())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Request Execution
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolve an absolute API path against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidEndpoint(format!("{path}: {e}")))
    }

    /// Send a request and return the successful response.
    async fn send<B: serde::Serialize + Sync>(
        &self,
        method: reqwest::Method,
        url: Url,
        token: &SecretString,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let request_id = Uuid::new_v4().to_string();
        let span = tracing::debug_span!(
            "account_api",
            method = %method,
            path = url.path(),
            request_id = %request_id,
        );

        async move {
            let mut request = self
                .inner
                .client
                .request(method, url)
                .bearer_auth(token.expose_secret())
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .header(REQUEST_ID_HEADER, &request_id);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(self.inner.timeout)
                } else {
                    ApiError::Http(e)
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ErrorBody>(&text)
                    .ok()
                    .and_then(|body| body.message);
                tracing::debug!(status = status.as_u16(), "Account API request failed");
                return Err(ApiError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            tracing::debug!(status = status.as_u16(), "Account API request succeeded");
            Ok(response)
        }
        .instrument(span)
        .await
    }

    /// Send a request and decode the JSON response body.
    async fn send_json<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        method: reqwest::Method,
        url: Url,
        token: &SecretString,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let response = self.send(method, url, token, body).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl AccountApi for HttpAccountApi {
    async fn fetch_orders(&self, token: &SecretString, limit: u32) -> Result<OrdersPage, ApiError> {
        let mut url = self.endpoint("/api/orders")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        self.send_json(reqwest::Method::GET, url, token, None::<&()>)
            .await
    }

    async fn update_profile(
        &self,
        token: &SecretString,
        user_id: &UserId,
        draft: &ProfileDraft,
    ) -> Result<(), ApiError> {
        let mut url = self.endpoint("/api/users/")?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidEndpoint(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .push(user_id.as_str());
        self.send(reqwest::Method::PUT, url, token, Some(draft))
            .await?;
        Ok(())
    }

    async fn change_password(
        &self,
        token: &SecretString,
        change: &PasswordChange,
    ) -> Result<(), ApiError> {
        let url = self.endpoint("/api/auth/change-password")?;
        let body = PasswordChangeBody::from(change);
        self.send(reqwest::Method::PUT, url, token, Some(&body))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::config::Environment;

    fn client(server: &MockServer) -> HttpAccountApi {
        let config = AccountConfig::new(
            Environment::Development,
            Url::parse(&server.base_url()).unwrap(),
        )
        .with_request_timeout(Duration::from_millis(500));
        HttpAccountApi::new(&config).unwrap()
    }

    fn token() -> SecretString {
        SecretString::from("test-token")
    }

    #[tokio::test]
    async fn test_fetch_orders_sends_auth_and_limit() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/orders")
                    .query_param("limit", "10")
                    .header("authorization", "Bearer test-token")
                    .header("content-type", "application/json")
                    .header_exists(REQUEST_ID_HEADER);
                then.status(200).json_body(json!({
                    "orders": [{
                        "id": 1,
                        "createdAt": "2025-03-01T10:00:00Z",
                        "itemCount": 2,
                        "totalAmount": "19.99",
                        "status": "shipped"
                    }],
                    "pagination": { "total": 4 }
                }));
            })
            .await;

        let page = client(&server).fetch_orders(&token(), 10).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.orders.len(), 1);
        assert_eq!(page.pagination.total, 4);
    }

    #[tokio::test]
    async fn test_update_profile_puts_draft() {
        let server = MockServer::start_async().await;
        let draft = ProfileDraft {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            ..ProfileDraft::default()
        };
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/api/users/42")
                    .header("authorization", "Bearer test-token")
                    .json_body(serde_json::to_value(&draft).unwrap());
                then.status(200).json_body(json!({ "success": true }));
            })
            .await;

        client(&server)
            .update_profile(&token(), &UserId::new("42"), &draft)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_body_message_is_parsed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/api/auth/change-password");
                then.status(400)
                    .json_body(json!({ "message": "Current password is incorrect" }));
            })
            .await;

        let change = PasswordChange {
            current_password: SecretString::from("wrong"),
            new_password: SecretString::from("abcdef"),
        };
        let err = client(&server)
            .change_password(&token(), &change)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Api { status: 400, .. }));
        assert_eq!(err.server_message(), Some("Current password is incorrect"));
    }

    #[tokio::test]
    async fn test_error_without_json_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/orders");
                then.status(502).body("Bad Gateway");
            })
            .await;

        let err = client(&server).fetch_orders(&token(), 10).await.unwrap_err();

        assert!(matches!(err, ApiError::Api { status: 502, message: None }));
        assert_eq!(err.server_message(), None);
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/orders");
                then.status(200)
                    .delay(Duration::from_secs(3))
                    .json_body(json!({ "orders": [], "pagination": { "total": 0 } }));
            })
            .await;

        let err = client(&server).fetch_orders(&token(), 10).await.unwrap_err();

        assert!(matches!(err, ApiError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_current_user() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/auth/me")
                    .header("authorization", "Bearer test-token");
                then.status(200)
                    .json_body(json!({ "user": { "id": 42, "name": "Jane", "email": "jane@example.com" } }));
            })
            .await;

        let user = client(&server).current_user(&token()).await.unwrap();

        assert_eq!(user.id, Some(UserId::new("42")));
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Api {
            status: 404,
            message: Some("User not found".to_string()),
        };
        assert_eq!(err.to_string(), "API error: 404 - User not found");

        let err = ApiError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "API error: 500");
    }
}
