//! Shared observable cart summary.
//!
//! Mutation handlers write the summary and any component that displays cart
//! state (a header badge, a mini-cart) subscribes to it. Writes are applied in
//! the order they are made; the last applied count wins.

use std::sync::Arc;

use gadget_cart_core::GadgetId;
use tokio::sync::watch;

/// What kind of change produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Loaded,
    Added,
    Updated,
    Removed,
    CheckedOut,
}

/// A typed change and the gadgets it touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartChange {
    pub kind: ChangeKind,
    pub items: Vec<GadgetId>,
}

/// Current cart summary as seen by subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSummary {
    /// Total number of units in the cart.
    pub count: u32,
    /// The change that produced this summary, if any.
    pub last_change: Option<CartChange>,
}

/// A write to the shared summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartUpdate {
    /// Replace the count with a recomputed total.
    Count { count: u32 },
    /// Shift the count, e.g. after adding from a product page.
    Delta { delta: i64, change: CartChange },
    /// Replace the count and record the change that caused it.
    Change { count: u32, change: CartChange },
}

/// Publisher of the shared [`CartSummary`].
///
/// Clones publish to the same summary.
#[derive(Debug, Clone)]
pub struct CartNotifier {
    tx: Arc<watch::Sender<CartSummary>>,
}

impl Default for CartNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl CartNotifier {
    /// Create a notifier with an empty summary.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(CartSummary::default());
        Self { tx: Arc::new(tx) }
    }

    /// Subscribe to summary changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSummary> {
        self.tx.subscribe()
    }

    /// Snapshot of the current summary.
    #[must_use]
    pub fn current(&self) -> CartSummary {
        self.tx.borrow().clone()
    }

    /// Apply an update and wake subscribers.
    ///
    /// Works whether or not anybody is subscribed.
    pub fn dispatch(&self, update: CartUpdate) {
        self.tx.send_modify(|summary| match update {
            CartUpdate::Count { count } => {
                summary.count = count;
            }
            CartUpdate::Delta { delta, change } => {
                let next = i64::from(summary.count).saturating_add(delta);
                summary.count = u32::try_from(next.max(0)).unwrap_or(u32::MAX);
                summary.last_change = Some(change);
            }
            CartUpdate::Change { count, change } => {
                summary.count = count;
                summary.last_change = Some(change);
            }
        });
        tracing::trace!(count = self.tx.borrow().count, "Cart summary updated");
    }
}
