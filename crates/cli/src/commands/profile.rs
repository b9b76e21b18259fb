//! Profile commands.

use account_core::{ProfileField, UserProfile};
use account_client::AccountSurface;

use super::CommandError;

/// Log the session's profile, one field per line.
pub fn show(account: &AccountSurface) {
    let Some(user) = account.session().user() else {
        tracing::warn!("Not signed in");
        return;
    };
    log_profile(&user);
}

/// Apply `assignments` to the draft and save it.
///
/// # Errors
///
/// Returns an error if validation or the update request fails.
pub async fn update(
    account: &AccountSurface,
    assignments: Vec<(ProfileField, String)>,
) -> Result<(), CommandError> {
    let profile = account.profile();
    for (field, value) in assignments {
        profile.set_field(field, value);
    }

    let user = account
        .submit_profile()
        .await
        .map_err(|e| CommandError::account(account, e, "Failed to update profile"))?;

    if let Some(message) = account.status().snapshot().success {
        tracing::info!("{message}");
    }
    log_profile(&user);
    Ok(())
}

fn log_profile(user: &UserProfile) {
    if let Some(id) = &user.id {
        tracing::info!("id: {id}");
    }
    let draft = account_core::ProfileDraft::seeded_from(user, "");
    for field in ProfileField::ALL {
        tracing::info!("{field}: {}", draft.get(field));
    }
    if let Some(status) = &user.status {
        tracing::info!("status: {status}");
    }
    if let Some(created_at) = user.created_at {
        tracing::info!("member since: {}", created_at.format("%Y-%m-%d"));
    }
}
