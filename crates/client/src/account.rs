//! The account surface: every controller wired to one session.
//!
//! [`AccountSurface`] owns the profile form, password form, order history,
//! preferences and tab controllers, and keeps them consistent with the
//! session. When the session's identity changes the profile draft is
//! re-seeded, the password form is emptied and the order history is fetched
//! again. Switching tabs never touches any of them.

use std::sync::Arc;
use std::time::Duration;

use account_core::{OrderStatistics, UserId, UserProfile};
use secrecy::SecretString;

use crate::api::AccountApi;
use crate::config::AccountConfig;
use crate::context::AccountContext;
use crate::error::AccountError;
use crate::orders::OrderHistoryController;
use crate::password::PasswordChangeController;
use crate::preferences::PreferenceController;
use crate::profile::ProfileFormController;
use crate::session::{SessionChange, SessionContext};
use crate::status::StatusReporter;
use crate::tabs::{AccountTab, TabController};

/// All account controllers sharing one session and one status reporter.
#[derive(Debug)]
pub struct AccountSurface {
    ctx: AccountContext,
    profile: ProfileFormController,
    password: PasswordChangeController,
    orders: OrderHistoryController,
    preferences: PreferenceController,
    tabs: TabController,
}

impl AccountSurface {
    /// Create a signed-out surface.
    #[must_use]
    pub fn new(api: Arc<dyn AccountApi>, config: &AccountConfig) -> Self {
        Self::with_session_context(api, config, SessionContext::new())
    }

    /// Create a surface over an existing session context.
    #[must_use]
    pub fn with_session_context(
        api: Arc<dyn AccountApi>,
        config: &AccountConfig,
        session: SessionContext,
    ) -> Self {
        let ctx = AccountContext::new(
            api,
            session,
            StatusReporter::new(),
            config.request_timeout,
        );
        Self::from_context(ctx, &config.default_country, config.order_page_size)
    }

    fn from_context(ctx: AccountContext, default_country: &str, page_size: u32) -> Self {
        Self {
            profile: ProfileFormController::new(ctx.clone(), default_country),
            password: PasswordChangeController::new(ctx.clone()),
            orders: OrderHistoryController::new(ctx.clone(), page_size),
            preferences: PreferenceController::new(),
            tabs: TabController::new(),
            ctx,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &SessionContext {
        self.ctx.session()
    }

    #[must_use]
    pub const fn status(&self) -> &StatusReporter {
        self.ctx.status()
    }

    #[must_use]
    pub const fn profile(&self) -> &ProfileFormController {
        &self.profile
    }

    #[must_use]
    pub const fn password(&self) -> &PasswordChangeController {
        &self.password
    }

    #[must_use]
    pub const fn orders(&self) -> &OrderHistoryController {
        &self.orders
    }

    #[must_use]
    pub const fn preferences(&self) -> &PreferenceController {
        &self.preferences
    }

    #[must_use]
    pub const fn tabs(&self) -> &TabController {
        &self.tabs
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.ctx.request_timeout()
    }

    /// Install a session and re-initialize dependants if its identity changed.
    ///
    /// On an identity change the draft is seeded before this returns its
    /// first await, so it is never observable with the previous user's
    /// values. A failed order fetch is logged and otherwise ignored.
    pub async fn on_session_replaced(
        &self,
        user: impl Into<Arc<UserProfile>>,
        token: SecretString,
    ) -> SessionChange {
        let user = user.into();
        let change = self.session().replace(Arc::clone(&user), token);
        if !change.is_identity_change() {
            return change;
        }

        self.status().clear();
        self.profile.seed(&user);
        self.password.reset();
        self.orders.reset();
        tracing::info!(
            user_id = user.id.as_ref().map_or("", UserId::as_str),
            "Account session initialized"
        );

        // Failures are already logged by the controller.
        let _ = self.orders.refresh().await;
        change
    }

    /// Clear the session and everything derived from it.
    ///
    /// The active tab and notification preferences are kept.
    pub fn sign_out(&self) {
        if self.session().clear() == SessionChange::SignedOut {
            tracing::info!("Account session cleared");
        }
        self.profile.reset();
        self.password.reset();
        self.orders.reset();
        self.status().clear();
    }

    /// Submit the profile form.
    ///
    /// # Errors
    ///
    /// See [`ProfileFormController::submit`].
    pub async fn submit_profile(&self) -> Result<Arc<UserProfile>, AccountError> {
        self.profile.submit().await
    }

    /// Submit the password form.
    ///
    /// # Errors
    ///
    /// See [`PasswordChangeController::submit`].
    pub async fn change_password(&self) -> Result<(), AccountError> {
        self.password.submit().await
    }

    /// Re-fetch the order history.
    ///
    /// # Errors
    ///
    /// See [`OrderHistoryController::refresh`].
    pub async fn refresh_orders(&self) -> Result<OrderStatistics, AccountError> {
        self.orders.refresh().await
    }

    /// Make `tab` the active section.
    pub fn switch_tab(&self, tab: AccountTab) {
        self.tabs.switch(tab);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use account_core::{NotificationPreference, OrderStatus, ProfileField};
    use url::Url;

    use super::*;
    use crate::api::OrdersPage;
    use crate::config::Environment;
    use crate::password::PasswordField;
    use crate::testing::{self, Call, FakeApi, Reply};

    fn config() -> AccountConfig {
        AccountConfig::new(
            Environment::Development,
            Url::parse("http://localhost:5000").unwrap(),
        )
        .with_request_timeout(Duration::from_millis(200))
    }

    fn page() -> OrdersPage {
        serde_json::from_value(serde_json::json!({
            "orders": [
                {"_id": "a", "itemCount": 2, "totalAmount": "10.00", "status": "pending"},
                {"_id": "b", "itemCount": 1, "totalAmount": 5.5, "status": "delivered"},
                {"_id": "c", "itemCount": 1, "totalAmount": "0", "status": OrderStatus::Delivered}
            ],
            "pagination": {"total": 7}
        }))
        .unwrap()
    }

    fn surface(api: &Arc<FakeApi>) -> AccountSurface {
        api.set_orders(Some(page()));
        AccountSurface::new(Arc::clone(api) as Arc<dyn AccountApi>, &config())
    }

    fn john() -> UserProfile {
        serde_json::from_value(serde_json::json!({
            "id": "u-7", "name": "John Roe", "email": "john@example.com", "country": "Iceland"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_session_seeds_and_fetches() {
        let api = FakeApi::new();
        let account = surface(&api);

        let change = account
            .on_session_replaced(testing::jane(), testing::token())
            .await;

        assert_eq!(change, SessionChange::SignedIn);
        assert_eq!(account.profile().draft().name, "Jane Doe");
        assert_eq!(account.profile().draft().country, "");
        let stats = account.orders().stats();
        assert_eq!(stats.total_orders, 7);
        assert_eq!(account.orders().snapshot().formatted_total_spent(), "15.50");
        assert_eq!(stats.pending_orders, 1);
        assert_eq!(stats.delivered_orders, 2);
        assert_eq!(api.calls(), vec![Call::FetchOrders { limit: 10 }]);
    }

    #[tokio::test]
    async fn test_same_session_keeps_edits() {
        let api = FakeApi::new();
        let account = surface(&api);
        let jane = Arc::new(testing::jane());
        account
            .on_session_replaced(Arc::clone(&jane), testing::token())
            .await;
        account.profile().set_field(ProfileField::City, "Denver");

        let change = account.on_session_replaced(jane, testing::token()).await;

        assert_eq!(change, SessionChange::Unchanged);
        assert_eq!(account.profile().draft().city, "Denver");
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_new_user_reseeds_everything() {
        let api = FakeApi::new();
        let account = surface(&api);
        account
            .on_session_replaced(testing::jane(), testing::token())
            .await;
        account.profile().set_field(ProfileField::City, "Denver");
        account.password().set_field(PasswordField::Current, "half-typed");

        let change = account.on_session_replaced(john(), testing::token()).await;

        assert_eq!(change, SessionChange::Replaced);
        let draft = account.profile().draft();
        assert_eq!(draft.name, "John Roe");
        assert_eq!(draft.city, "");
        assert_eq!(draft.country, "Iceland");
        assert!(account.password().snapshot().is_empty());
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_new_user_can_save_while_previous_save_in_flight() {
        let api = FakeApi::new();
        let account = surface(&api);
        account
            .on_session_replaced(testing::jane(), testing::token())
            .await;
        api.set_delay(Duration::from_millis(100));

        let (jane_result, john_result) = tokio::join!(account.submit_profile(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            account.on_session_replaced(john(), testing::token()).await;
            assert!(!account.profile().snapshot().is_saving());
            account.submit_profile().await
        });

        assert!(matches!(jane_result, Err(AccountError::Stale)));
        let john = john_result.unwrap();
        assert_eq!(john.name.as_deref(), Some("John Roe"));
        assert_eq!(
            account.session().user().unwrap().email.as_deref(),
            Some("john@example.com")
        );
        assert_eq!(
            account.status().snapshot().success.as_deref(),
            Some("Profile updated successfully")
        );
    }

    #[tokio::test]
    async fn test_tab_switch_is_isolated() {
        let api = FakeApi::new();
        let account = surface(&api);
        account
            .on_session_replaced(testing::jane(), testing::token())
            .await;
        account.profile().set_field(ProfileField::Phone, "555-0100");
        account.password().set_field(PasswordField::New, "abc");
        let stats = account.orders().stats();

        account.switch_tab(AccountTab::Orders);
        account.switch_tab(AccountTab::Security);
        account.switch_tab(AccountTab::Profile);

        assert_eq!(account.profile().draft().phone, "555-0100");
        assert!(!account.password().snapshot().is_empty());
        assert_eq!(account.orders().stats(), stats);
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_twice_yields_same_stats() {
        let api = FakeApi::new();
        let account = surface(&api);
        account
            .on_session_replaced(testing::jane(), testing::token())
            .await;

        let first = account.refresh_orders().await.unwrap();
        let second = account.refresh_orders().await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_profile_success_keeps_server_fields() {
        let api = FakeApi::new();
        let account = surface(&api);
        account
            .on_session_replaced(testing::jane(), testing::token())
            .await;
        account.profile().set_field(ProfileField::City, "Boulder");

        let user = account.submit_profile().await.unwrap();

        assert_eq!(user.city.as_deref(), Some("Boulder"));
        assert_eq!(user.status.as_deref(), Some("active"));
        assert!(user.created_at.is_some());
        assert_eq!(account.profile().draft().city, "Boulder");
        assert_eq!(
            account.status().snapshot().success.as_deref(),
            Some("Profile updated successfully")
        );
    }

    #[tokio::test]
    async fn test_timeout_reports_and_unblocks() {
        let api = FakeApi::new();
        let account = surface(&api);
        account
            .on_session_replaced(testing::jane(), testing::token())
            .await;
        api.set_delay(Duration::from_secs(5));

        let err = account.submit_profile().await.unwrap_err();

        assert!(!err.is_local());
        assert_eq!(
            account.status().snapshot().error.as_deref(),
            Some("The request timed out. Please try again.")
        );
        assert!(!account.profile().snapshot().is_saving());
    }

    #[tokio::test]
    async fn test_sign_out_resets_session_state() {
        let api = FakeApi::new();
        let account = surface(&api);
        account
            .on_session_replaced(testing::jane(), testing::token())
            .await;
        account.switch_tab(AccountTab::Preferences);
        account
            .preferences()
            .set(NotificationPreference::SmsNotifications, true);
        api.set_reply(Reply::Status(500, None));
        account.submit_profile().await.unwrap_err();

        account.sign_out();

        assert!(account.session().current().is_none());
        assert_eq!(account.profile().draft(), account_core::ProfileDraft::default());
        assert!(account.orders().snapshot().orders.is_empty());
        assert_eq!(account.status().snapshot().error, None);
        assert_eq!(account.tabs().active(), AccountTab::Preferences);
        assert!(account.preferences().get(NotificationPreference::SmsNotifications));
    }
}
