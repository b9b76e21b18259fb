//! Dependencies shared by every account controller.

use std::sync::Arc;
use std::time::Duration;

use crate::api::AccountApi;
use crate::session::SessionContext;
use crate::status::StatusReporter;

/// The remote API, the session, the status reporter and the request timeout.
///
/// Cheap to clone; every controller holds its own copy.
#[derive(Clone)]
pub struct AccountContext {
    api: Arc<dyn AccountApi>,
    session: SessionContext,
    status: StatusReporter,
    request_timeout: Duration,
}

impl AccountContext {
    #[must_use]
    pub fn new(
        api: Arc<dyn AccountApi>,
        session: SessionContext,
        status: StatusReporter,
        request_timeout: Duration,
    ) -> Self {
        Self {
            api,
            session,
            status,
            request_timeout,
        }
    }

    #[must_use]
    pub fn api(&self) -> &dyn AccountApi {
        self.api.as_ref()
    }

    #[must_use]
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    #[must_use]
    pub const fn status(&self) -> &StatusReporter {
        &self.status
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl std::fmt::Debug for AccountContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountContext")
            .field("session", &self.session)
            .field("status", &self.status)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
