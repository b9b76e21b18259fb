//! In-memory [`AccountApi`] for controller tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use account_core::{ProfileDraft, UserId, UserProfile};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::api::{AccountApi, ApiError, OrdersPage, PasswordChange};
use crate::context::AccountContext;
use crate::session::SessionContext;
use crate::status::StatusReporter;

/// A call the fake received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchOrders { limit: u32 },
    UpdateProfile { user_id: UserId, draft: ProfileDraft },
    ChangePassword { current: String, new: String },
}

/// How the fake answers.
#[derive(Debug, Clone)]
pub enum Reply {
    Ok,
    Status(u16, Option<&'static str>),
}

impl Reply {
    fn into_result(self) -> Result<(), ApiError> {
        match self {
            Self::Ok => Ok(()),
            Self::Status(status, message) => Err(ApiError::Api {
                status,
                message: message.map(str::to_string),
            }),
        }
    }
}

#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<Call>>,
    orders: Mutex<Option<OrdersPage>>,
    reply: Mutex<Option<Reply>>,
    delay: Mutex<Duration>,
}

#[allow(clippy::unwrap_used)]
impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Serve this page from now on; `None` makes order fetches fail with 500.
    pub fn set_orders(&self, page: Option<OrdersPage>) {
        *self.orders.lock().unwrap() = page;
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = Some(reply);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    async fn respond(&self, call: Call) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.reply.lock().unwrap().clone().unwrap_or(Reply::Ok).into_result()
    }
}

#[async_trait]
#[allow(clippy::unwrap_used)]
impl AccountApi for FakeApi {
    async fn fetch_orders(&self, _token: &SecretString, limit: u32) -> Result<OrdersPage, ApiError> {
        self.respond(Call::FetchOrders { limit }).await?;
        self.orders.lock().unwrap().clone().ok_or(ApiError::Api {
            status: 500,
            message: None,
        })
    }

    async fn update_profile(
        &self,
        _token: &SecretString,
        user_id: &UserId,
        draft: &ProfileDraft,
    ) -> Result<(), ApiError> {
        self.respond(Call::UpdateProfile {
            user_id: user_id.clone(),
            draft: draft.clone(),
        })
        .await
    }

    async fn change_password(
        &self,
        _token: &SecretString,
        change: &PasswordChange,
    ) -> Result<(), ApiError> {
        self.respond(Call::ChangePassword {
            current: change.current_password.expose_secret().to_string(),
            new: change.new_password.expose_secret().to_string(),
        })
        .await
    }
}

/// A context wired to `api` with a fresh session and status reporter.
pub fn context(api: &Arc<FakeApi>) -> AccountContext {
    AccountContext::new(
        Arc::clone(api) as Arc<dyn AccountApi>,
        SessionContext::new(),
        StatusReporter::new(),
        Duration::from_millis(200),
    )
}

/// A signed-in customer with id `42`, name and email set.
pub fn jane() -> UserProfile {
    serde_json::from_value(serde_json::json!({
        "id": 42,
        "name": "Jane Doe",
        "email": "jane@example.com",
        "status": "active",
        "createdAt": "2024-01-02T03:04:05Z"
    }))
    .unwrap_or_default()
}

pub fn token() -> SecretString {
    SecretString::from("test-token")
}
