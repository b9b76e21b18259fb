//! Session context: the authenticated customer and their bearer token.
//!
//! The session is held in a `watch` channel so readers never block and a
//! presentation layer can subscribe to changes. The profile inside a session is
//! shared behind an `Arc` and is only ever replaced as a whole.
//!
//! Every change of identity (sign-in, a different profile object, a different
//! id, sign-out) bumps the session *generation*. Operations capture the
//! generation when they start and drop their results if it moved on.

use std::sync::Arc;

use account_core::UserProfile;
use secrecy::SecretString;
use tokio::sync::watch;

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    /// The customer's profile as last confirmed by the identity provider.
    pub user: Arc<UserProfile>,
    /// Bearer token for API calls.
    pub token: SecretString,
}

/// Snapshot of the session context.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// The current session, if signed in.
    pub session: Option<Session>,
    /// Incremented on every identity change.
    pub generation: u64,
}

/// What a session update amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    /// There was no session before.
    SignedIn,
    /// A different profile object or a different user id.
    Replaced,
    /// Same profile object; at most the token changed.
    Unchanged,
    /// The session was cleared.
    SignedOut,
}

impl SessionChange {
    /// Whether dependants must re-initialize from the new session.
    #[must_use]
    pub const fn is_identity_change(self) -> bool {
        matches!(self, Self::SignedIn | Self::Replaced)
    }
}

/// Thread-safe session store using a watch channel.
#[derive(Clone, Debug)]
pub struct SessionContext {
    sender: Arc<watch::Sender<SessionState>>,
}

impl SessionContext {
    /// Create an empty (signed-out) session context.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(SessionState::default());
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Get the current session, if any.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.sender.borrow().session.clone()
    }

    /// Get the current profile, if signed in.
    #[must_use]
    pub fn user(&self) -> Option<Arc<UserProfile>> {
        self.sender
            .borrow()
            .session
            .as_ref()
            .map(|s| Arc::clone(&s.user))
    }

    /// Current session generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.sender.borrow().generation
    }

    /// Current session together with its generation.
    #[must_use]
    pub fn current_with_generation(&self) -> Option<(Session, u64)> {
        let state = self.sender.borrow();
        state.session.clone().map(|s| (s, state.generation))
    }

    /// Subscribe to session changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.sender.subscribe()
    }

    /// Install a session, reporting whether the identity changed.
    ///
    /// Identity is the profile object itself or its id; two separately
    /// constructed but equal profiles count as a replacement.
    pub fn replace(&self, user: impl Into<Arc<UserProfile>>, token: SecretString) -> SessionChange {
        let user = user.into();
        let mut change = SessionChange::Unchanged;
        self.sender.send_modify(|state| {
            change = match &state.session {
                None => SessionChange::SignedIn,
                Some(previous) if Arc::ptr_eq(&previous.user, &user) => SessionChange::Unchanged,
                Some(_) => SessionChange::Replaced,
            };
            if change.is_identity_change() {
                state.generation += 1;
            }
            state.session = Some(Session { user, token });
        });
        if change.is_identity_change() {
            tracing::debug!(change = ?change, "Session replaced");
        }
        change
    }

    /// Clear the session.
    pub fn clear(&self) -> SessionChange {
        let mut change = SessionChange::Unchanged;
        self.sender.send_if_modified(|state| {
            if state.session.take().is_some() {
                state.generation += 1;
                change = SessionChange::SignedOut;
                true
            } else {
                false
            }
        });
        change
    }

    /// Replace the session's profile with `update(current)`.
    ///
    /// The update is only applied if the session is still at
    /// `expected_generation`. The profile is replaced as a whole and the
    /// generation is not bumped, since identity is unchanged.
    pub fn update_user(
        &self,
        expected_generation: u64,
        update: impl FnOnce(&UserProfile) -> UserProfile,
    ) -> Option<Arc<UserProfile>> {
        let mut updated = None;
        self.sender.send_if_modified(|state| {
            if state.generation != expected_generation {
                return false;
            }
            let Some(session) = state.session.as_mut() else {
                return false;
            };
            let user = Arc::new(update(&session.user));
            session.user = Arc::clone(&user);
            updated = Some(user);
            true
        });
        updated
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
