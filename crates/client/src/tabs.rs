//! Account section navigation.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error;

/// The four sections of the account surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccountTab {
    #[default]
    Profile,
    Orders,
    Security,
    Preferences,
}

impl AccountTab {
    pub const ALL: [Self; 4] = [Self::Profile, Self::Orders, Self::Security, Self::Preferences];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Orders => "orders",
            Self::Security => "security",
            Self::Preferences => "preferences",
        }
    }
}

impl fmt::Display for AccountTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid account tab: {s}"))
    }
}

/// Holds the active section. Switching never touches any other controller.
#[derive(Clone, Debug)]
pub struct TabController {
    state: Arc<watch::Sender<AccountTab>>,
}

impl TabController {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(AccountTab::default());
        Self {
            state: Arc::new(state),
        }
    }

    #[must_use]
    pub fn active(&self) -> AccountTab {
        *self.state.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AccountTab> {
        self.state.subscribe()
    }

    /// Make `tab` the active section.
    pub fn switch(&self, tab: AccountTab) {
        let changed = self.state.send_if_modified(|active| {
            let changed = *active != tab;
            *active = tab;
            changed
        });
        if changed {
            error::add_breadcrumb("navigation", "Switched account tab", Some(&[("tab", tab.as_str())]));
        }
    }
}

impl Default for TabController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_profile() {
        assert_eq!(TabController::new().active(), AccountTab::Profile);
    }

    #[test]
    fn test_switch() {
        let tabs = TabController::new();
        tabs.switch(AccountTab::Security);
        assert_eq!(tabs.active(), AccountTab::Security);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Orders".parse::<AccountTab>().unwrap(), AccountTab::Orders);
        assert_eq!(AccountTab::Preferences.to_string(), "preferences");
        assert!("billing".parse::<AccountTab>().is_err());
    }
}
