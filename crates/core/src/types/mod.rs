//! Core types for the customer account.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod order;
pub mod preferences;
pub mod profile;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{Amount, format_amount};
pub use order::{Order, OrderStatistics};
pub use preferences::{NotificationPreference, NotificationPreferences};
pub use profile::{ProfileDraft, ProfileField, UserProfile};
pub use status::*;
