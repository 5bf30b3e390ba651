//! Optimistic quantity changes.
//!
//! A change is applied locally first, then sent to the API as an absolute
//! quantity. If the API rejects it, the line goes back to the last quantity the
//! server confirmed and an error toast is emitted.
//!
//! [`CartSync::begin_quantity_change`] and [`CartSync::finish_quantity_change`]
//! expose the two halves so callers can render the optimistic window. When
//! updates to the same line overlap, whichever finishes last decides what is
//! shown.

use gadget_cart_core::{GadgetId, SellerId};
use tracing::instrument;

use super::{CartSync, LineSync};
use crate::api::{ApiError, CartApi};
use crate::error::Result;
use crate::notifier::ChangeKind;

/// An optimistic change waiting for the server's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityUpdate {
    pub seller_id: SellerId,
    pub gadget_id: GadgetId,
    /// Quantity displayed before the change.
    pub previous: u32,
    /// Quantity sent to the server.
    pub requested: u32,
}

impl<A: CartApi> CartSync<A> {
    /// Step a line's quantity by `delta` and sync it with the API.
    ///
    /// Quantities never drop below 1: decrementing a line at 1 is a no-op and
    /// sends nothing. Unknown lines are a no-op too.
    ///
    /// Returns the confirmed quantity, or `None` if nothing changed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Api` if the update was rejected; the line has been
    /// rolled back by then.
    #[instrument(skip(self), fields(seller_id = %seller_id, gadget_id = %gadget_id))]
    pub async fn change_quantity(
        &mut self,
        seller_id: SellerId,
        gadget_id: GadgetId,
        delta: i64,
    ) -> Result<Option<u32>> {
        let Some(update) = self.begin_quantity_change(seller_id, gadget_id, delta) else {
            return Ok(None);
        };

        let result = self
            .api
            .update_quantity(update.gadget_id, update.requested)
            .await;

        self.finish_quantity_change(update, result)?;
        Ok(Some(update.requested))
    }

    /// Add one unit.
    ///
    /// # Errors
    ///
    /// See [`change_quantity`](Self::change_quantity).
    pub async fn increment(&mut self, seller_id: SellerId, gadget_id: GadgetId) -> Result<Option<u32>> {
        self.change_quantity(seller_id, gadget_id, 1).await
    }

    /// Remove one unit, never going below 1.
    ///
    /// # Errors
    ///
    /// See [`change_quantity`](Self::change_quantity).
    pub async fn decrement(&mut self, seller_id: SellerId, gadget_id: GadgetId) -> Result<Option<u32>> {
        self.change_quantity(seller_id, gadget_id, -1).await
    }

    /// Apply a change locally and mark the line pending.
    ///
    /// Returns `None` when the clamped quantity equals the current one or the
    /// line is unknown; in that case nothing should be sent.
    pub fn begin_quantity_change(
        &mut self,
        seller_id: SellerId,
        gadget_id: GadgetId,
        delta: i64,
    ) -> Option<QuantityUpdate> {
        let line = self.group_mut(seller_id)?.line_mut(gadget_id)?;
        let previous = line.quantity;
        let requested = clamp_quantity(previous, delta);
        if requested == previous {
            return None;
        }
        line.quantity = requested;

        let sync = self
            .lines
            .entry((seller_id, gadget_id))
            .or_insert(LineSync::Confirmed(previous));
        *sync = sync.begin(requested);

        tracing::debug!(previous, requested, "Optimistic quantity change");
        Some(QuantityUpdate {
            seller_id,
            gadget_id,
            previous,
            requested,
        })
    }

    /// Reconcile a pending change with the server's answer.
    ///
    /// On success the line is confirmed at the requested quantity and the new
    /// count is published. On failure the line returns to its last confirmed
    /// quantity and an error toast is emitted. A line removed in the meantime
    /// is left alone.
    ///
    /// # Errors
    ///
    /// Returns the API error, after rolling back.
    pub fn finish_quantity_change(
        &mut self,
        update: QuantityUpdate,
        result: std::result::Result<(), ApiError>,
    ) -> Result<()> {
        let key = (update.seller_id, update.gadget_id);
        let Some(sync) = self.lines.get(&key).copied() else {
            tracing::debug!(gadget_id = %update.gadget_id, "Line gone before update finished");
            return result.map_err(Into::into);
        };

        match result {
            Ok(()) => {
                self.lines.insert(key, LineSync::confirm(update.requested));
                self.set_displayed(update.seller_id, update.gadget_id, update.requested);
                self.publish(ChangeKind::Updated, vec![update.gadget_id]);
                Ok(())
            }
            Err(e) => {
                let failed = sync.fail(update.requested);
                self.lines.insert(key, failed);
                self.set_displayed(update.seller_id, update.gadget_id, failed.displayed());

                tracing::warn!(
                    error = %e,
                    gadget_id = %update.gadget_id,
                    rolled_back_to = failed.displayed(),
                    "Quantity update rejected; rolled back"
                );
                self.toasts.error(e.user_message());
                Err(e.into())
            }
        }
    }

    fn set_displayed(&mut self, seller_id: SellerId, gadget_id: GadgetId, quantity: u32) {
        if let Some(line) = self
            .group_mut(seller_id)
            .and_then(|g| g.line_mut(gadget_id))
        {
            line.quantity = quantity;
        }
    }
}

/// Apply `delta` to `current`, keeping the result at 1 or more.
fn clamp_quantity(current: u32, delta: i64) -> u32 {
    let next = i64::from(current).saturating_add(delta).max(1);
    u32::try_from(next).unwrap_or(u32::MAX)
}
