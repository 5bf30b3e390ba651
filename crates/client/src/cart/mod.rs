//! Cart state synchronizer.
//!
//! [`CartSync`] keeps a per-seller view of the cart consistent with the remote
//! cart store. It owns the seller groups, the local selection and the
//! per-line sync state, and publishes the cart count through a
//! [`CartNotifier`] after every successful mutation.
//!
//! Operations are split across submodules:
//! - loading (this module)
//! - [`quantity`] - optimistic quantity changes with rollback
//! - [`selection`] - checkout selection and derived totals
//! - [`removal`] - confirmed single-item and per-seller removal
//! - [`checkout`] - validated order placement and add-to-cart
//!
//! Every mutating operation takes `&mut self`; the synchronizer has a single
//! owner, so no locking is involved.

pub mod checkout;
pub mod line;
pub mod quantity;
pub mod removal;
pub mod selection;

#[cfg(test)]
pub(crate) mod fake;

use std::collections::HashMap;

use gadget_cart_core::{CartLineItem, GadgetId, Money, SellerGroup, SellerId};
use tracing::instrument;

use crate::api::CartApi;
use crate::error::Result;
use crate::notifier::{CartChange, CartNotifier, CartUpdate, ChangeKind};
use crate::toast::Toasts;

pub use checkout::PlacedOrder;
pub use line::LineSync;
pub use quantity::QuantityUpdate;
pub use removal::{Confirm, ConfirmPrompt, RemovalOutcome};
pub use selection::SelectionSet;

/// Label shown when the cart has nothing to display.
pub const EMPTY_CART_LABEL: &str = "Giỏ hàng trống";

/// Local mirror of the remote cart, grouped by seller.
pub struct CartSync<A> {
    api: A,
    groups: Vec<SellerGroup>,
    lines: HashMap<(SellerId, GadgetId), LineSync>,
    selection: SelectionSet,
    notifier: CartNotifier,
    toasts: Toasts,
}

impl<A: CartApi> CartSync<A> {
    /// Create an empty synchronizer.
    ///
    /// Nothing is fetched until [`load`](Self::load) or
    /// [`refresh`](Self::refresh) is called.
    pub fn new(api: A, notifier: CartNotifier, toasts: Toasts) -> Self {
        Self {
            api,
            groups: Vec::new(),
            lines: HashMap::new(),
            selection: SelectionSet::new(),
            notifier,
            toasts,
        }
    }

    /// Fetch sellers, then each seller's line items, and replace local state.
    ///
    /// Sellers whose item list comes back empty are not kept. The selection is
    /// pruned to lines that still exist. On error, local state is untouched.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Api` if any request fails.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<()> {
        let sellers = self.api.sellers().await?;

        let mut groups = Vec::with_capacity(sellers.len());
        for seller in sellers {
            let items = self.api.seller_items(seller.seller_id).await?;
            if items.is_empty() {
                tracing::debug!(seller_id = %seller.seller_id, "Skipping seller with no cart items");
                continue;
            }
            groups.push(SellerGroup::new(seller, items));
        }

        self.lines = groups
            .iter()
            .flat_map(|g| {
                g.line_items
                    .iter()
                    .map(|l| ((g.seller_id, l.gadget_id), LineSync::Confirmed(l.quantity)))
            })
            .collect();
        self.groups = groups;
        self.selection.retain_existing(&self.groups);

        tracing::info!(
            sellers = self.groups.len(),
            items = self.item_count(),
            "Cart loaded"
        );
        self.notifier.dispatch(CartUpdate::Change {
            count: self.item_count(),
            change: CartChange {
                kind: ChangeKind::Loaded,
                items: Vec::new(),
            },
        });
        Ok(())
    }

    /// Like [`load`](Self::load), but a failure is logged and swallowed.
    ///
    /// Returns whether the cart was reloaded.
    pub async fn refresh(&mut self) -> bool {
        match self.load().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load cart; keeping previous state");
                false
            }
        }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// Seller groups in the order the API listed the sellers.
    #[must_use]
    pub fn groups(&self) -> &[SellerGroup] {
        &self.groups
    }

    /// Group of one seller.
    #[must_use]
    pub fn group(&self, seller_id: SellerId) -> Option<&SellerGroup> {
        self.groups.iter().find(|g| g.seller_id == seller_id)
    }

    /// One line of the cart.
    #[must_use]
    pub fn line(&self, seller_id: SellerId, gadget_id: GadgetId) -> Option<&CartLineItem> {
        self.group(seller_id).and_then(|g| g.line(gadget_id))
    }

    /// Sync state of one line.
    #[must_use]
    pub fn line_sync(&self, seller_id: SellerId, gadget_id: GadgetId) -> Option<LineSync> {
        self.lines.get(&(seller_id, gadget_id)).copied()
    }

    /// Whether there is nothing to display.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// `Some("Giỏ hàng trống")` when the cart is empty.
    #[must_use]
    pub fn empty_label(&self) -> Option<&'static str> {
        self.is_empty().then_some(EMPTY_CART_LABEL)
    }

    /// Total units across the whole cart, saturating at `u32::MAX`.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.groups
            .iter()
            .fold(0, |count, g| count.saturating_add(g.item_count()))
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Price of the selected lines, recomputed on every call.
    #[must_use]
    pub fn total_price(&self) -> Money {
        self.selection.total(&self.groups)
    }

    /// Units in the selected lines.
    #[must_use]
    pub fn selected_quantity(&self) -> u32 {
        self.selection.selected_quantity(&self.groups)
    }

    #[must_use]
    pub const fn notifier(&self) -> &CartNotifier {
        &self.notifier
    }

    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Flip one line. Returns whether it is selected afterwards.
    ///
    /// Lines that are not in the cart are ignored.
    pub fn toggle(&mut self, seller_id: SellerId, gadget_id: GadgetId) -> bool {
        if self.line(seller_id, gadget_id).is_none() {
            return false;
        }
        self.selection.toggle(seller_id, gadget_id)
    }

    /// Select all purchasable lines of a seller, or clear them.
    pub fn toggle_seller(&mut self, seller_id: SellerId) -> bool {
        let Some(group) = self.groups.iter().find(|g| g.seller_id == seller_id) else {
            return false;
        };
        self.selection.toggle_seller(group)
    }

    /// Select all purchasable lines in the cart, or clear them.
    pub fn toggle_all(&mut self) -> bool {
        self.selection.toggle_all(&self.groups)
    }

    /// Forget the selection, e.g. when the cart view is left.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // =========================================================================
    // Internal helpers shared by the operation modules
    // =========================================================================

    fn group_mut(&mut self, seller_id: SellerId) -> Option<&mut SellerGroup> {
        self.groups.iter_mut().find(|g| g.seller_id == seller_id)
    }

    /// Drop a line everywhere it is tracked and prune an emptied group.
    fn forget_line(&mut self, seller_id: SellerId, gadget_id: GadgetId) {
        if let Some(group) = self.group_mut(seller_id) {
            group.line_items.retain(|l| l.gadget_id != gadget_id);
        }
        self.groups.retain(|g| !g.is_empty());
        self.lines.remove(&(seller_id, gadget_id));
        self.selection.remove(seller_id, gadget_id);
    }

    /// Publish the recomputed count together with the change that caused it.
    fn publish(&self, kind: ChangeKind, items: Vec<GadgetId>) {
        self.notifier.dispatch(CartUpdate::Change {
            count: self.item_count(),
            change: CartChange { kind, items },
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::fake::{FakeApi, item, seller};
    use super::*;

    #[tokio::test]
    async fn test_load_skips_sellers_without_items() {
        let api = FakeApi::new()
            .with_seller(seller(1, "Shop A"), vec![item(1, 10, 2, 150_000)])
            .with_seller(seller(2, "Shop B"), vec![]);
        let mut cart = CartSync::new(api, CartNotifier::new(), Toasts::disabled());

        cart.load().await.unwrap();

        assert!(!cart.is_empty());
        assert_eq!(cart.empty_label(), None);
        assert_eq!(cart.groups().len(), 1);
        assert!(cart.group(SellerId::new(2)).is_none());
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.notifier().current().count, 2);
        assert_eq!(
            cart.line_sync(SellerId::new(1), GadgetId::new(10)),
            Some(LineSync::Confirmed(2))
        );
    }

    #[tokio::test]
    async fn test_empty_cart_label() {
        let mut cart = CartSync::new(FakeApi::new(), CartNotifier::new(), Toasts::disabled());
        cart.load().await.unwrap();
        assert_eq!(cart.empty_label(), Some(EMPTY_CART_LABEL));
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_state() {
        let api = FakeApi::new().with_seller(seller(1, "Shop A"), vec![item(1, 10, 1, 1_000)]);
        let mut cart = CartSync::new(api, CartNotifier::new(), Toasts::disabled());
        assert!(cart.refresh().await);

        cart.api().fail("sellers");
        assert!(!cart.refresh().await);

        assert_eq!(cart.groups().len(), 1);
        assert_eq!(cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_partial_fan_out_failure_keeps_previous_state() {
        let api = FakeApi::new()
            .with_seller(seller(1, "Shop A"), vec![item(1, 10, 1, 1_000)])
            .with_seller(seller(2, "Shop B"), vec![item(2, 20, 1, 1_000)]);
        let mut cart = CartSync::new(api, CartNotifier::new(), Toasts::disabled());
        cart.load().await.unwrap();

        cart.api().fail("seller_items");
        assert!(cart.load().await.is_err());
        assert_eq!(cart.groups().len(), 2);
    }

    #[tokio::test]
    async fn test_reload_prunes_stale_selection() {
        let api = FakeApi::new().with_seller(
            seller(1, "Shop A"),
            vec![item(1, 10, 1, 1_000), item(1, 11, 1, 1_000)],
        );
        let mut cart = CartSync::new(api, CartNotifier::new(), Toasts::disabled());
        cart.load().await.unwrap();
        cart.toggle_all();
        assert_eq!(cart.selection().len(), 2);

        cart.api().drop_line(SellerId::new(1), GadgetId::new(11));
        cart.load().await.unwrap();

        assert_eq!(cart.selection().len(), 1);
        assert_eq!(cart.total_price(), Money::from_dong(1_000));
    }

    #[tokio::test]
    async fn test_toggle_ignores_unknown_lines() {
        let api = FakeApi::new().with_seller(seller(1, "Shop A"), vec![item(1, 10, 1, 1_000)]);
        let mut cart = CartSync::new(api, CartNotifier::new(), Toasts::disabled());
        cart.load().await.unwrap();

        assert!(!cart.toggle(SellerId::new(1), GadgetId::new(99)));
        assert!(cart.selection().is_empty());
        assert!(!cart.toggle_seller(SellerId::new(7)));
    }
}
