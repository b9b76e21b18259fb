//! Notification preferences.

use serde::{Deserialize, Serialize};

/// The customer's notification toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub marketing_emails: bool,
    pub order_updates: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email_notifications: true,
            sms_notifications: false,
            marketing_emails: true,
            order_updates: true,
        }
    }
}

/// One notification toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationPreference {
    EmailNotifications,
    SmsNotifications,
    MarketingEmails,
    OrderUpdates,
}

impl NotificationPreferences {
    /// Current value of a toggle.
    #[must_use]
    pub const fn get(&self, key: NotificationPreference) -> bool {
        match key {
            NotificationPreference::EmailNotifications => self.email_notifications,
            NotificationPreference::SmsNotifications => self.sms_notifications,
            NotificationPreference::MarketingEmails => self.marketing_emails,
            NotificationPreference::OrderUpdates => self.order_updates,
        }
    }

    /// Set one toggle, leaving the others untouched.
    pub const fn set(&mut self, key: NotificationPreference, enabled: bool) {
        match key {
            NotificationPreference::EmailNotifications => self.email_notifications = enabled,
            NotificationPreference::SmsNotifications => self.sms_notifications = enabled,
            NotificationPreference::MarketingEmails => self.marketing_emails = enabled,
            NotificationPreference::OrderUpdates => self.order_updates = enabled,
        }
    }
}
