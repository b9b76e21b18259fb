//! Password commands.

use account_client::AccountSurface;
use account_client::password::PasswordField;
use dialoguer::Password;
use secrecy::{ExposeSecret, SecretString};

use super::CommandError;

pub const CURRENT_PASSWORD_VAR: &str = "ACCOUNT_CURRENT_PASSWORD";
pub const NEW_PASSWORD_VAR: &str = "ACCOUNT_NEW_PASSWORD";
pub const CONFIRM_PASSWORD_VAR: &str = "ACCOUNT_CONFIRM_PASSWORD";

/// The three passwords of a change request.
#[derive(Debug)]
pub struct PasswordInput {
    pub current: SecretString,
    pub new: SecretString,
    pub confirm: SecretString,
}

impl PasswordInput {
    /// Read each password from its environment variable, prompting without
    /// echo for any that is unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a prompt cannot read from the terminal.
    pub fn from_env_or_prompt() -> Result<Self, CommandError> {
        Self::resolve(
            |key| std::env::var(key).ok(),
            |prompt| Password::new().with_prompt(prompt).interact(),
        )
    }

    fn resolve<L, P>(lookup: L, mut prompt: P) -> Result<Self, CommandError>
    where
        L: Fn(&str) -> Option<String>,
        P: FnMut(&str) -> dialoguer::Result<String>,
    {
        let mut read = |key: &str, label: &str| -> Result<SecretString, CommandError> {
            let value = match lookup(key) {
                Some(value) => value,
                None => prompt(label)?,
            };
            Ok(SecretString::from(value))
        };

        Ok(Self {
            current: read(CURRENT_PASSWORD_VAR, "Current password")?,
            new: read(NEW_PASSWORD_VAR, "New password")?,
            confirm: read(CONFIRM_PASSWORD_VAR, "Confirm new password")?,
        })
    }
}

/// Change the password.
///
/// # Errors
///
/// Returns an error if the passwords do not validate or the server rejects
/// the change.
pub async fn change(account: &AccountSurface, input: PasswordInput) -> Result<(), CommandError> {
    let form = account.password();
    form.set_field(PasswordField::Current, input.current.expose_secret());
    form.set_field(PasswordField::New, input.new.expose_secret());
    form.set_field(PasswordField::Confirm, input.confirm.expose_secret());

    account
        .change_password()
        .await
        .map_err(|e| CommandError::account(account, e, "Failed to change password"))?;

    if let Some(message) = account.status().snapshot().success {
        tracing::info!("{message}");
    }
    Ok(())
}
