//! Order placement and add-to-cart.

use gadget_cart_core::{GadgetId, Money, SellerId};
use tracing::instrument;

use super::{CartSync, LineSync};
use crate::api::{CartApi, OrderLine};
use crate::error::{CartError, Result, ValidationError};
use crate::notifier::{CartChange, CartUpdate, ChangeKind};

/// An order the API accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub lines: Vec<OrderLine>,
    pub total: Money,
}

impl<A: CartApi> CartSync<A> {
    /// Order the selected lines.
    ///
    /// The selection must be non-empty and contain only purchasable lines
    /// with no quantity change in flight; this is checked before any request. On success the ordered lines leave
    /// the cart and the selection is cleared.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Validation` when the selection is empty or holds an
    /// unavailable gadget, or `CartError::Api` if the order was rejected. Local
    /// state is unchanged on error.
    #[instrument(skip(self))]
    pub async fn checkout(&mut self) -> Result<PlacedOrder> {
        let ordered = match self.validated_selection() {
            Ok(ordered) => ordered,
            Err(e) => {
                tracing::info!(error = %e, "Checkout rejected before submission");
                self.toasts.error(e.user_message());
                return Err(e.into());
            }
        };
        let lines: Vec<OrderLine> = ordered.iter().map(|(_, line)| *line).collect();
        let total = self.total_price();

        if let Err(e) = self.api.place_order(&lines).await {
            tracing::warn!(error = %e, "Failed to place order");
            self.toasts.error(e.user_message());
            return Err(e.into());
        }

        for (seller_id, line) in &ordered {
            self.forget_line(*seller_id, line.gadget_id);
        }
        self.selection.clear();

        tracing::info!(lines = lines.len(), total = %total, "Order placed");
        self.publish(
            ChangeKind::CheckedOut,
            lines.iter().map(|l| l.gadget_id).collect(),
        );
        self.toasts.success("Đặt hàng thành công");
        Ok(PlacedOrder { lines, total })
    }

    /// Add a gadget from a product page.
    ///
    /// Seller groups are not reloaded; the count is shifted by `quantity`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidQuantity` for a zero quantity, or
    /// `CartError::Api` if the API rejected the request.
    #[instrument(skip(self), fields(gadget_id = %gadget_id))]
    pub async fn add_to_cart(&mut self, gadget_id: GadgetId, quantity: u32) -> Result<()> {
        if quantity == 0 {
            let e = ValidationError::InvalidQuantity;
            self.toasts.error(e.user_message());
            return Err(e.into());
        }

        if let Err(e) = self.api.add_item(gadget_id, quantity).await {
            tracing::warn!(error = %e, "Failed to add item to cart");
            self.toasts.error(e.user_message());
            return Err(CartError::from(e));
        }

        self.notifier.dispatch(CartUpdate::Delta {
            delta: i64::from(quantity),
            change: CartChange {
                kind: ChangeKind::Added,
                items: vec![gadget_id],
            },
        });
        self.toasts.success("Đã thêm sản phẩm vào giỏ hàng");
        Ok(())
    }

    /// Selected lines in seller order, checked for checkout.
    fn validated_selection(
        &self,
    ) -> std::result::Result<Vec<(SellerId, OrderLine)>, ValidationError> {
        if self.selection.is_empty() {
            return Err(ValidationError::EmptySelection);
        }

        let mut ordered = Vec::with_capacity(self.selection.len());
        for line in self.selection.selected_lines(&self.groups) {
            if !line.is_purchasable() {
                return Err(ValidationError::Unavailable {
                    gadget_id: line.gadget_id,
                    label: line.label(),
                });
            }
            if self
                .line_sync(line.seller_id, line.gadget_id)
                .is_some_and(LineSync::is_pending)
            {
                return Err(ValidationError::PendingUpdate {
                    gadget_id: line.gadget_id,
                    label: line.label(),
                });
            }
            ordered.push((
                line.seller_id,
                OrderLine {
                    gadget_id: line.gadget_id,
                    quantity: line.quantity,
                },
            ));
        }

        if ordered.is_empty() {
            return Err(ValidationError::EmptySelection);
        }
        Ok(ordered)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gadget_cart_core::GadgetStatus;

    use super::super::fake::{FakeApi, item, seller};
    use super::*;
    use crate::notifier::CartNotifier;
    use crate::toast::{Toast, ToastLevel, Toasts};

    async fn cart(api: FakeApi) -> (CartSync<FakeApi>, tokio::sync::mpsc::UnboundedReceiver<Toast>) {
        let (toasts, rx) = Toasts::channel();
        let mut cart = CartSync::new(api, CartNotifier::new(), toasts);
        cart.load().await.unwrap();
        (cart, rx)
    }

    fn standard_api() -> FakeApi {
        FakeApi::new()
            .with_seller(
                seller(1, "Shop A"),
                vec![item(1, 10, 2, 100_000), item(1, 11, 1, 50_000)],
            )
            .with_seller(seller(2, "Shop B"), vec![item(2, 20, 1, 300_000)])
    }

    #[tokio::test]
    async fn test_checkout_empty_selection_is_rejected_locally() {
        let (mut cart, mut rx) = cart(standard_api()).await;

        let err = cart.checkout().await.unwrap_err();

        assert!(matches!(
            err,
            CartError::Validation(ValidationError::EmptySelection)
        ));
        assert!(cart.api().orders().is_empty());
        assert_eq!(
            rx.try_recv().unwrap().message,
            "Vui lòng chọn sản phẩm để thanh toán"
        );
    }

    #[tokio::test]
    async fn test_checkout_rejects_unavailable_selection() {
        let mut inactive = item(1, 11, 1, 50_000);
        inactive.status = GadgetStatus::Inactive;
        let api = FakeApi::new().with_seller(
            seller(1, "Shop A"),
            vec![item(1, 10, 2, 100_000), inactive],
        );
        let (mut cart, mut rx) = cart(api).await;
        cart.toggle(SellerId::new(1), GadgetId::new(10));
        cart.toggle(SellerId::new(1), GadgetId::new(11));

        let err = cart.checkout().await.unwrap_err();

        assert!(matches!(
            err,
            CartError::Validation(ValidationError::Unavailable { gadget_id, .. })
                if gadget_id == GadgetId::new(11)
        ));
        assert!(cart.api().orders().is_empty());
        assert_eq!(rx.try_recv().unwrap().level, ToastLevel::Error);
        assert_eq!(cart.selection().len(), 2);
    }

    #[tokio::test]
    async fn test_checkout_waits_for_pending_quantity() {
        let (mut cart, _rx) = cart(standard_api()).await;
        let (s, g) = (SellerId::new(1), GadgetId::new(10));
        cart.toggle(s, g);
        let update = cart.begin_quantity_change(s, g, 1).unwrap();

        let err = cart.checkout().await.unwrap_err();

        assert!(matches!(
            err,
            CartError::Validation(ValidationError::PendingUpdate { gadget_id, .. })
                if gadget_id == g
        ));
        assert!(cart.api().orders().is_empty());

        cart.finish_quantity_change(update, Ok(())).unwrap();
        let order = cart.checkout().await.unwrap();
        assert_eq!(order.lines, vec![OrderLine { gadget_id: g, quantity: 3 }]);
    }

    #[tokio::test]
    async fn test_checkout_orders_selected_lines_and_clears() {
        let (mut cart, mut rx) = cart(standard_api()).await;
        cart.toggle(SellerId::new(1), GadgetId::new(10));
        cart.toggle(SellerId::new(2), GadgetId::new(20));

        let order = cart.checkout().await.unwrap();

        assert_eq!(order.total, Money::from_dong(500_000));
        assert_eq!(
            order.lines,
            vec![
                OrderLine {
                    gadget_id: GadgetId::new(10),
                    quantity: 2
                },
                OrderLine {
                    gadget_id: GadgetId::new(20),
                    quantity: 1
                },
            ]
        );
        assert_eq!(cart.api().orders(), vec![order.lines.clone()]);

        assert!(cart.selection().is_empty());
        assert!(cart.group(SellerId::new(2)).is_none());
        assert_eq!(cart.item_count(), 1);

        let summary = cart.notifier().current();
        assert_eq!(summary.count, 1);
        assert_eq!(
            summary.last_change.map(|c| c.kind),
            Some(ChangeKind::CheckedOut)
        );
        assert_eq!(rx.try_recv().unwrap().level, ToastLevel::Success);
    }

    #[tokio::test]
    async fn test_checkout_failure_keeps_cart() {
        let (mut cart, mut rx) = cart(standard_api()).await;
        cart.toggle_all();
        cart.api().fail_with("place_order", "Số dư ví không đủ");

        assert!(cart.checkout().await.is_err());

        assert_eq!(cart.selection().len(), 3);
        assert_eq!(cart.item_count(), 4);
        assert_eq!(rx.try_recv().unwrap().message, "Số dư ví không đủ");
    }

    #[tokio::test]
    async fn test_add_to_cart_shifts_count() {
        let (mut cart, mut rx) = cart(standard_api()).await;
        assert_eq!(cart.notifier().current().count, 4);

        cart.add_to_cart(GadgetId::new(30), 2).await.unwrap();

        let summary = cart.notifier().current();
        assert_eq!(summary.count, 6);
        assert_eq!(summary.last_change.unwrap().kind, ChangeKind::Added);
        assert_eq!(rx.try_recv().unwrap().level, ToastLevel::Success);
    }

    #[tokio::test]
    async fn test_add_to_cart_rejects_zero_and_failures() {
        let (mut cart, mut rx) = cart(standard_api()).await;

        assert!(matches!(
            cart.add_to_cart(GadgetId::new(30), 0).await,
            Err(CartError::Validation(ValidationError::InvalidQuantity))
        ));
        assert_eq!(rx.try_recv().unwrap().level, ToastLevel::Error);

        cart.api().fail("add_item");
        assert!(cart.add_to_cart(GadgetId::new(30), 1).await.is_err());
        assert_eq!(cart.notifier().current().count, 4);
    }
}
