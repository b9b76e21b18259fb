//! CLI subcommands.
//!
//! Every command signs in with the bearer token first, so it runs against the
//! same [`AccountSurface`] a presentation layer would use.

pub mod orders;
pub mod password;
pub mod profile;

use std::sync::Arc;

use account_client::{
    AccountConfig, AccountError, AccountSurface, ApiError, ConfigError, HttpAccountApi,
};
use secrecy::SecretString;
use thiserror::Error;

/// Errors that can end a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The token could not be exchanged for a profile.
    #[error("Sign-in failed: {0}")]
    SignIn(#[from] ApiError),

    /// Interactive input could not be read.
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// The account operation failed; carries the text shown to the customer.
    #[error("{message}")]
    Account {
        message: String,
        #[source]
        source: AccountError,
    },
}

impl CommandError {
    fn account(account: &AccountSurface, source: AccountError, fallback: &str) -> Self {
        let message = account
            .status()
            .snapshot()
            .error
            .unwrap_or_else(|| source.user_message(fallback));
        Self::Account { message, source }
    }
}

/// Load configuration, resolve the token's profile and open a session.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the token is rejected.
pub async fn connect(token: SecretString) -> Result<AccountSurface, CommandError> {
    let config = AccountConfig::from_env()?;
    let api = HttpAccountApi::new(&config)?;
    tracing::debug!(base_url = %api.base_url(), "Connecting to account API");

    let user = api.current_user(&token).await?;
    let account = AccountSurface::new(Arc::new(api), &config);
    account.on_session_replaced(user, token).await;
    Ok(account)
}
