//! Errors raised by cart operations.
//!
//! Every variant maps to the text a toast shows through `user_message()`.
//! Errors are reported at the call site; nothing here is retried.

use gadget_cart_core::{GadgetId, SellerId};
use thiserror::Error;

use crate::api::ApiError;

/// A request was rejected before it reached the API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Checkout attempted with nothing selected.
    #[error("No items selected for checkout")]
    EmptySelection,

    /// A selected item is inactive or no longer for sale.
    #[error("Gadget {gadget_id} ({label}) is not available for purchase")]
    Unavailable { gadget_id: GadgetId, label: String },

    /// A selected item still has a quantity change waiting for the server.
    #[error("Gadget {gadget_id} ({label}) has a quantity update in flight")]
    PendingUpdate { gadget_id: GadgetId, label: String },

    /// The referenced line is not in the local cart.
    #[error("Gadget {gadget_id} of seller {seller_id} is not in the cart")]
    NotInCart {
        seller_id: SellerId,
        gadget_id: GadgetId,
    },

    /// The referenced seller has no items in the local cart.
    #[error("Seller {0} has no items in the cart")]
    UnknownSeller(SellerId),

    /// Quantities must be at least one.
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
}

impl ValidationError {
    /// Message to surface to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptySelection => "Vui lòng chọn sản phẩm để thanh toán".to_string(),
            Self::Unavailable { label, .. } => {
                format!("Sản phẩm \"{label}\" hiện không còn được bán")
            }
            Self::PendingUpdate { label, .. } => {
                format!("Sản phẩm \"{label}\" đang được cập nhật, vui lòng thử lại")
            }
            Self::NotInCart { .. } | Self::UnknownSeller(_) => {
                "Sản phẩm không có trong giỏ hàng".to_string()
            }
            Self::InvalidQuantity => "Số lượng phải lớn hơn 0".to_string(),
        }
    }
}

/// Error type for cart synchronizer operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The API call failed (transport or structured rejection).
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The operation was rejected client-side.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl CartError {
    /// Message to surface to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message().to_string(),
            Self::Validation(err) => err.user_message(),
        }
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
