//! Gadget Cart client library.
//!
//! Talks to the storefront REST API and keeps a local, per-seller view of the
//! cart consistent with it.
//!
//! # Architecture
//!
//! - [`api`] - `CartApi` trait and its `reqwest` implementation
//! - [`cart`] - `CartSync`, the cart state synchronizer (loader, quantity
//!   editor, selection tracker, removal, checkout)
//! - [`notifier`] - shared observable cart summary for badge-style subscribers
//! - [`toast`] - user-facing notices emitted by cart operations
//! - [`config`] - environment-driven configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod notifier;
pub mod toast;

pub use api::{ApiError, CartApi, CartClient};
pub use cart::CartSync;
pub use config::ClientConfig;
pub use error::{CartError, ValidationError};
pub use notifier::{CartNotifier, CartSummary};
pub use toast::{Toast, Toasts};
