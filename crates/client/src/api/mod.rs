//! Storefront cart REST API.
//!
//! # Endpoints
//!
//! - `GET /api/cart/sellers` - sellers with items in the cart
//! - `GET /api/cart/seller/{id}` - line items of one seller
//! - `POST /api/cart` - add a gadget
//! - `PUT /api/cart/old` - set the quantity of a gadget already in the cart
//! - `DELETE /api/cart` - remove one gadget
//! - `DELETE /api/cart/seller/{id}` - remove every gadget of a seller
//! - `POST /api/order` - place an order from selected items
//!
//! [`CartApi`] is the seam the synchronizer is generic over; [`CartClient`]
//! is the `reqwest` implementation.

mod client;

use std::future::Future;

use gadget_cart_core::{
    CartLineItem, ErrorEnvelope, FALLBACK_ERROR_MESSAGE, GadgetId, Seller, SellerId,
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::CartClient;

/// Errors that can occur when calling the cart API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connection refused, timeout, TLS...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API rejected request ({status}): {}", .envelope.user_message())]
    Rejected {
        status: StatusCode,
        envelope: ErrorEnvelope,
    },

    /// A success body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Build a rejection from a status and the raw response body.
    #[must_use]
    pub fn rejected(status: StatusCode, body: &str) -> Self {
        Self::Rejected {
            status,
            envelope: ErrorEnvelope::parse(body),
        }
    }

    /// Message to surface to the user: the first API reason, else the fallback.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected { envelope, .. } => envelope.user_message(),
            _ => FALLBACK_ERROR_MESSAGE,
        }
    }

    /// HTTP status of a rejection.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Body of add, update and remove calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    pub gadget_id: GadgetId,
    pub quantity: u32,
}

/// One ordered gadget.
pub type OrderLine = CartItemRequest;

/// Body of `POST /api/order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub list_gadget_items: Vec<OrderLine>,
}

/// A success body, either bare or wrapped as `{ "data": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Payload<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Payload<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// Operations the cart synchronizer needs from the remote cart store.
pub trait CartApi: Send + Sync {
    /// List sellers that have items in the cart.
    fn sellers(&self) -> impl Future<Output = Result<Vec<Seller>, ApiError>> + Send;

    /// List the cart line items listed by one seller.
    fn seller_items(
        &self,
        seller_id: SellerId,
    ) -> impl Future<Output = Result<Vec<CartLineItem>, ApiError>> + Send;

    /// Add `quantity` units of a gadget.
    fn add_item(
        &self,
        gadget_id: GadgetId,
        quantity: u32,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Set the absolute quantity of a gadget already in the cart.
    fn update_quantity(
        &self,
        gadget_id: GadgetId,
        quantity: u32,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Remove a gadget from the cart.
    fn remove_item(
        &self,
        gadget_id: GadgetId,
        quantity: u32,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Remove every gadget listed by a seller.
    fn remove_seller(&self, seller_id: SellerId)
    -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Place an order for the given lines.
    fn place_order(&self, lines: &[OrderLine]) -> impl Future<Output = Result<(), ApiError>> + Send;
}
