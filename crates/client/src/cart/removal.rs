//! Removing lines from the cart.
//!
//! Both single-item and per-seller removal ask for confirmation first; a
//! declined confirmation sends nothing. After a successful delete the lines
//! leave the seller groups and the selection, and the new count is published.

use gadget_cart_core::{GadgetId, SellerId};
use tracing::instrument;

use super::CartSync;
use crate::api::CartApi;
use crate::error::{Result, ValidationError};
use crate::notifier::ChangeKind;

/// What the user is asked to confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmPrompt {
    RemoveItem { label: String },
    RemoveSeller { shop_name: String, line_count: usize },
}

impl ConfirmPrompt {
    /// Question shown to the user.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::RemoveItem { label } => {
                format!("Bạn có chắc muốn xóa \"{label}\" khỏi giỏ hàng?")
            }
            Self::RemoveSeller {
                shop_name,
                line_count,
            } => format!(
                "Bạn có chắc muốn xóa tất cả {line_count} sản phẩm của cửa hàng \"{shop_name}\"?"
            ),
        }
    }
}

/// Confirmation step before a destructive request.
pub trait Confirm {
    fn confirm(&self, prompt: &ConfirmPrompt) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&ConfirmPrompt) -> bool,
{
    fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        self(prompt)
    }
}

/// Result of a removal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    Removed,
    /// The user declined; nothing was sent.
    Cancelled,
}

impl<A: CartApi> CartSync<A> {
    /// Remove one line after confirmation.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NotInCart` for an unknown line, or
    /// `CartError::Api` if the delete was rejected. Local state is unchanged
    /// on error.
    #[instrument(skip(self, confirm), fields(seller_id = %seller_id, gadget_id = %gadget_id))]
    pub async fn remove_item(
        &mut self,
        seller_id: SellerId,
        gadget_id: GadgetId,
        confirm: &impl Confirm,
    ) -> Result<RemovalOutcome> {
        let Some(line) = self.line(seller_id, gadget_id) else {
            return Err(ValidationError::NotInCart {
                seller_id,
                gadget_id,
            }
            .into());
        };
        let quantity = line.quantity;
        let prompt = ConfirmPrompt::RemoveItem {
            label: line.label(),
        };

        if !confirm.confirm(&prompt) {
            tracing::debug!("Removal cancelled");
            return Ok(RemovalOutcome::Cancelled);
        }

        if let Err(e) = self.api.remove_item(gadget_id, quantity).await {
            tracing::warn!(error = %e, "Failed to remove cart item");
            self.toasts.error(e.user_message());
            return Err(e.into());
        }

        self.forget_line(seller_id, gadget_id);
        self.publish(ChangeKind::Removed, vec![gadget_id]);
        self.toasts.success("Đã xóa sản phẩm khỏi giỏ hàng");
        Ok(RemovalOutcome::Removed)
    }

    /// Remove every line of a seller after confirmation.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownSeller` if the seller has nothing in
    /// the cart, or `CartError::Api` if the delete was rejected. Local state is
    /// unchanged on error.
    #[instrument(skip(self, confirm), fields(seller_id = %seller_id))]
    pub async fn remove_seller(
        &mut self,
        seller_id: SellerId,
        confirm: &impl Confirm,
    ) -> Result<RemovalOutcome> {
        let Some(group) = self.group(seller_id) else {
            return Err(ValidationError::UnknownSeller(seller_id).into());
        };
        let prompt = ConfirmPrompt::RemoveSeller {
            shop_name: group.shop_name.clone(),
            line_count: group.line_items.len(),
        };

        if !confirm.confirm(&prompt) {
            tracing::debug!("Seller removal cancelled");
            return Ok(RemovalOutcome::Cancelled);
        }

        if let Err(e) = self.api.remove_seller(seller_id).await {
            tracing::warn!(error = %e, "Failed to remove seller items");
            self.toasts.error(e.user_message());
            return Err(e.into());
        }

        let removed: Vec<GadgetId> = self
            .group(seller_id)
            .map(|g| g.line_items.iter().map(|l| l.gadget_id).collect())
            .unwrap_or_default();
        self.groups.retain(|g| g.seller_id != seller_id);
        self.lines.retain(|(seller, _), _| *seller != seller_id);
        self.selection.remove_seller(seller_id);

        self.publish(ChangeKind::Removed, removed);
        self.toasts.success("Đã xóa các sản phẩm của cửa hàng khỏi giỏ hàng");
        Ok(RemovalOutcome::Removed)
    }
}
