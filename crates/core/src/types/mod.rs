//! Core types for Gadget Cart.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod envelope;
pub mod id;
pub mod money;
pub mod status;

pub use cart::{CartLineItem, Seller, SellerGroup};
pub use envelope::{ErrorEnvelope, FALLBACK_ERROR_MESSAGE, Reason};
pub use id::*;
pub use money::{Money, MoneyError};
pub use status::GadgetStatus;
