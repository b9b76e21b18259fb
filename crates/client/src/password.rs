//! Password change controller.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;

use crate::api::PasswordChange;
use crate::context::AccountContext;
use crate::error::{self, AccountError, MIN_PASSWORD_LENGTH, ValidationError};
use crate::operation::{Operation, OperationState, with_timeout};

const SUCCESS_MESSAGE: &str = "Password changed successfully";
const FAILURE_MESSAGE: &str = "Failed to change password";

/// The three inputs of the password form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordField {
    Current,
    New,
    Confirm,
}

/// Per-field visibility toggles. Purely presentational.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordVisibility {
    pub current: bool,
    pub new: bool,
    pub confirm: bool,
}

impl PasswordVisibility {
    #[must_use]
    pub const fn get(&self, field: PasswordField) -> bool {
        match field {
            PasswordField::Current => self.current,
            PasswordField::New => self.new,
            PasswordField::Confirm => self.confirm,
        }
    }

    const fn slot(&mut self, field: PasswordField) -> &mut bool {
        match field {
            PasswordField::Current => &mut self.current,
            PasswordField::New => &mut self.new,
            PasswordField::Confirm => &mut self.confirm,
        }
    }
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

/// Observable state of the password form.
#[derive(Debug, Clone)]
pub struct PasswordFormState {
    pub current_password: SecretString,
    pub new_password: SecretString,
    pub confirm_password: SecretString,
    pub visibility: PasswordVisibility,
    pub operation: Operation,
}

impl Default for PasswordFormState {
    fn default() -> Self {
        Self {
            current_password: empty_secret(),
            new_password: empty_secret(),
            confirm_password: empty_secret(),
            visibility: PasswordVisibility::default(),
            operation: Operation::default(),
        }
    }
}

impl PasswordFormState {
    /// Whether all three inputs are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.current_password,
            &self.new_password,
            &self.confirm_password,
        ]
        .iter()
        .all(|secret| secret.expose_secret().is_empty())
    }

    fn field_mut(&mut self, field: PasswordField) -> &mut SecretString {
        match field {
            PasswordField::Current => &mut self.current_password,
            PasswordField::New => &mut self.new_password,
            PasswordField::Confirm => &mut self.confirm_password,
        }
    }

    fn clear_inputs(&mut self) {
        self.current_password = empty_secret();
        self.new_password = empty_secret();
        self.confirm_password = empty_secret();
    }
}

/// Check a new password and its confirmation.
///
/// A mismatch is reported before a short password. Length is counted in
/// characters.
///
/// # Errors
///
/// Returns [`ValidationError::PasswordMismatch`] or
/// [`ValidationError::PasswordTooShort`].
pub fn validate(new_password: &str, confirm_password: &str) -> Result<(), ValidationError> {
    if new_password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    if new_password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Controller for the password change form.
#[derive(Debug)]
pub struct PasswordChangeController {
    ctx: AccountContext,
    state: Arc<watch::Sender<PasswordFormState>>,
}

impl PasswordChangeController {
    #[must_use]
    pub fn new(ctx: AccountContext) -> Self {
        let (state, _) = watch::channel(PasswordFormState::default());
        Self {
            ctx,
            state: Arc::new(state),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> PasswordFormState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PasswordFormState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn operation_state(&self) -> OperationState {
        self.state.borrow().operation.state()
    }

    #[must_use]
    pub fn is_visible(&self, field: PasswordField) -> bool {
        self.state.borrow().visibility.get(field)
    }

    pub fn set_field(&self, field: PasswordField, value: impl Into<String>) {
        let value = SecretString::from(value.into());
        self.state.send_modify(|state| *state.field_mut(field) = value);
    }

    pub fn toggle_visibility(&self, field: PasswordField) {
        self.state.send_modify(|state| {
            let slot = state.visibility.slot(field);
            *slot = !*slot;
        });
    }

    /// Empty all inputs, hide them, and forget any in-flight change.
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            state.clear_inputs();
            state.visibility = PasswordVisibility::default();
            state.operation.abandon();
        });
    }

    /// Validate the form and ask the identity provider to change the password.
    ///
    /// Only the current and new password are sent. On success all three
    /// inputs are cleared.
    ///
    /// # Errors
    ///
    /// - [`AccountError::Busy`] if a change is already in flight (nothing else happens)
    /// - [`AccountError::Validation`] on mismatch or a short password
    /// - [`AccountError::NotSignedIn`] without a session
    /// - [`AccountError::Api`] if the change failed or timed out
    /// - [`AccountError::Stale`] if the session changed before the response arrived
    pub async fn submit(&self) -> Result<(), AccountError> {
        if self.state.borrow().operation.is_in_flight() {
            return Err(AccountError::Busy);
        }

        let status = self.ctx.status();
        status.clear();

        let change = {
            let state = self.state.borrow();
            validate(
                state.new_password.expose_secret(),
                state.confirm_password.expose_secret(),
            )
            .map(|()| PasswordChange {
                current_password: state.current_password.clone(),
                new_password: state.new_password.clone(),
            })
        };
        let prepared = change.map_err(AccountError::from).and_then(|change| {
            let (session, generation) = self
                .ctx
                .session()
                .current_with_generation()
                .ok_or(AccountError::NotSignedIn)?;
            Ok((change, session.token, generation))
        });
        let (change, token, generation) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => {
                status.report_error(err.user_message(FAILURE_MESSAGE));
                return Err(err);
            }
        };

        let mut begun = Err(AccountError::Busy);
        self.state.send_if_modified(|state| {
            state.operation.acknowledge();
            begun = state.operation.begin();
            begun.is_ok()
        });
        let ticket = begun?;

        error::add_breadcrumb("security", "Submitted password change", None);

        let result = with_timeout(
            self.ctx.request_timeout(),
            self.ctx.api().change_password(&token, &change),
        )
        .await;

        let current = self.ctx.session().generation() == generation;
        match result {
            Ok(()) => {
                self.state.send_modify(|state| {
                    if state.operation.finish(ticket, true) {
                        state.clear_inputs();
                    }
                });
                if !current {
                    return Err(AccountError::Stale);
                }
                tracing::info!("Password changed");
                status.report_success(SUCCESS_MESSAGE);
                Ok(())
            }
            Err(err) => {
                error::capture_remote_failure("change_password", &err);
                self.state.send_modify(|state| {
                    state.operation.finish(ticket, false);
                });
                let err = AccountError::from(err);
                if current {
                    status.report_error(err.user_message(FAILURE_MESSAGE));
                }
                Err(err)
            }
        }
    }
}
