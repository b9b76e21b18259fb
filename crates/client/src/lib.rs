//! Customer account client library.
//!
//! Session context, the account controllers built on it, and the HTTP API
//! they talk to. Controllers hold their state in `watch` channels so a
//! presentation layer can render snapshots and subscribe to changes.
//!
//! Start from [`AccountSurface`], which wires every controller to one
//! [`SessionContext`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod operation;
pub mod orders;
pub mod password;
pub mod preferences;
pub mod profile;
pub mod session;
pub mod status;
pub mod tabs;

#[cfg(test)]
mod testing;

pub use account::AccountSurface;
pub use api::{AccountApi, ApiError, HttpAccountApi};
pub use config::{AccountConfig, ConfigError, Environment};
pub use error::{AccountError, ValidationError};
pub use session::{SessionChange, SessionContext};
