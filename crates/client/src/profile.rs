//! Profile form controller.
//!
//! Owns the editable draft of the customer's profile. The draft is seeded from
//! the session when the session's identity changes and is otherwise only
//! touched by the customer's edits; a successful submit merges it back into
//! the session.

use std::sync::Arc;

use account_core::{Email, ProfileDraft, ProfileField, UserProfile};
use tokio::sync::watch;

use crate::context::AccountContext;
use crate::error::{self, AccountError, ValidationError};
use crate::operation::{Operation, OperationState, with_timeout};

const SUCCESS_MESSAGE: &str = "Profile updated successfully";
const FAILURE_MESSAGE: &str = "Failed to update profile";

/// Observable state of the profile form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFormState {
    pub draft: ProfileDraft,
    pub operation: Operation,
}

impl ProfileFormState {
    /// Whether a save is in flight (the submit control is disabled).
    #[must_use]
    pub const fn is_saving(&self) -> bool {
        self.operation.is_in_flight()
    }
}

/// Controller for the profile form.
#[derive(Debug)]
pub struct ProfileFormController {
    ctx: AccountContext,
    default_country: String,
    state: Arc<watch::Sender<ProfileFormState>>,
}

impl ProfileFormController {
    #[must_use]
    pub fn new(ctx: AccountContext, default_country: impl Into<String>) -> Self {
        let (state, _) = watch::channel(ProfileFormState::default());
        Self {
            ctx,
            default_country: default_country.into(),
            state: Arc::new(state),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> ProfileFormState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProfileFormState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn draft(&self) -> ProfileDraft {
        self.state.borrow().draft.clone()
    }

    #[must_use]
    pub fn operation_state(&self) -> OperationState {
        self.state.borrow().operation.state()
    }

    /// Overwrite the draft with `user`'s current values.
    ///
    /// A save still in flight for the previous draft is abandoned.
    pub fn seed(&self, user: &UserProfile) {
        let draft = ProfileDraft::seeded_from(user, &self.default_country);
        self.state.send_modify(|state| {
            state.draft = draft;
            state.operation.abandon();
        });
    }

    /// Empty the draft and forget any in-flight save.
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            state.draft = ProfileDraft::default();
            state.operation.abandon();
        });
    }

    /// Change one field of the draft.
    pub fn set_field(&self, field: ProfileField, value: impl Into<String>) {
        let value = value.into();
        self.state.send_if_modified(|state| {
            if state.draft.get(field) == value {
                return false;
            }
            state.draft.set(field, value);
            true
        });
    }

    /// Validate the draft and send it to the identity provider.
    ///
    /// On success the session's profile is replaced by the merged profile,
    /// which is also returned.
    ///
    /// # Errors
    ///
    /// - [`AccountError::Busy`] if a save is already in flight (nothing else happens)
    /// - [`AccountError::Validation`] if `name` or `email` is missing or invalid
    /// - [`AccountError::NotSignedIn`] / [`AccountError::MissingUserId`] without a usable session
    /// - [`AccountError::Api`] if the update failed or timed out
    /// - [`AccountError::Stale`] if the session changed before the response arrived
    pub async fn submit(&self) -> Result<Arc<UserProfile>, AccountError> {
        if self.state.borrow().is_saving() {
            return Err(AccountError::Busy);
        }

        let status = self.ctx.status();
        status.clear();

        let draft = self.draft();
        let prepared = validate(&draft).and_then(|()| {
            let (session, generation) = self
                .ctx
                .session()
                .current_with_generation()
                .ok_or(AccountError::NotSignedIn)?;
            let user_id = session.user.id.clone().ok_or(AccountError::MissingUserId)?;
            Ok((session.token, user_id, generation))
        });
        let (token, user_id, generation) = match prepared {
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

        error::add_breadcrumb(
            "profile",
            "Submitted profile update",
            Some(&[("user_id", user_id.as_str())]),
        );

        let result = with_timeout(
            self.ctx.request_timeout(),
            self.ctx.api().update_profile(&token, &user_id, &draft),
        )
        .await;

        match result {
            Ok(()) => {
                let merged = self
                    .ctx
                    .session()
                    .update_user(generation, |user| user.with_draft(&draft));
                self.state.send_modify(|state| {
                    state.operation.finish(ticket, true);
                });

                let Some(user) = merged else {
                    tracing::warn!(user_id = %user_id, "Session changed during profile update");
                    return Err(AccountError::Stale);
                };
                tracing::info!(user_id = %user_id, "Profile updated");
                status.report_success(SUCCESS_MESSAGE);
                Ok(user)
            }
            Err(err) => {
                error::capture_remote_failure("update_profile", &err);
                self.state.send_modify(|state| {
                    state.operation.finish(ticket, false);
                });
                let err = AccountError::from(err);
                if self.ctx.session().generation() == generation {
                    status.report_error(err.user_message(FAILURE_MESSAGE));
                }
                Err(err)
            }
        }
    }
}

/// Required-field and email checks applied before any network call.
fn validate(draft: &ProfileDraft) -> Result<(), AccountError> {
    match draft.missing_required() {
        Some(ProfileField::Name) => return Err(ValidationError::MissingName.into()),
        Some(_) => return Err(ValidationError::MissingEmail.into()),
        None => {}
    }
    Email::parse(&draft.email).map_err(ValidationError::from)?;
    Ok(())
}
