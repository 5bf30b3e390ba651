//! Gadget Cart Core - Shared types library.
//!
//! This crate provides the types shared by every Gadget Cart component:
//! - `client` - REST client and cart state synchronizer
//! - `cli` - Terminal front end driving the synchronizer
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no async. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, cart line items, seller groups, money and the API error envelope

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
