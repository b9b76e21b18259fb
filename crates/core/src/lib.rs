//! Customer Account Core - Shared types library.
//!
//! This crate provides the types used across the customer account components:
//! - `client` - HTTP client, session context and account controllers
//! - `cli` - Command-line access to a customer's account
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Aggregation over an order page and draft/profile merging live here
//! so they can be tested without a runtime.
//!
//! # Modules
//!
//! - [`types`] - IDs, emails, amounts, profiles, orders, statistics and preferences

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
