//! Notification preference controller.
//!
//! Preferences are held locally only; nothing is persisted remotely.

use std::sync::Arc;

use account_core::{NotificationPreference, NotificationPreferences};
use tokio::sync::watch;

#[derive(Clone, Debug)]
pub struct PreferenceController {
    state: Arc<watch::Sender<NotificationPreferences>>,
}

impl PreferenceController {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(NotificationPreferences::default());
        Self {
            state: Arc::new(state),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> NotificationPreferences {
        *self.state.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<NotificationPreferences> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn get(&self, key: NotificationPreference) -> bool {
        self.state.borrow().get(key)
    }

    /// Set one toggle. Other toggles keep their values.
    pub fn set(&self, key: NotificationPreference, enabled: bool) {
        self.state.send_if_modified(|prefs| {
            if prefs.get(key) == enabled {
                return false;
            }
            prefs.set(key, enabled);
            true
        });
        tracing::debug!(preference = ?key, enabled, "Notification preference set");
    }

    /// Flip one toggle and return its new value.
    pub fn toggle(&self, key: NotificationPreference) -> bool {
        let enabled = !self.get(key);
        self.set(key, enabled);
        enabled
    }
}

impl Default for PreferenceController {
    fn default() -> Self {
        Self::new()
    }
}
