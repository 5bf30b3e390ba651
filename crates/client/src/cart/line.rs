//! Per-line synchronization state.
//!
//! ```text
//! Confirmed(q) --begin(n)--> Pending { confirmed: q, requested: n }
//! Pending      --confirm(n)-> Confirmed(n)
//! Pending      --fail------> Errored { confirmed: q, attempted: n }
//! Errored      --begin(n)--> Pending { confirmed: q, requested: n }
//! ```
//!
//! The displayed quantity is `requested` while pending and the confirmed
//! quantity otherwise, so a failure always shows the last server-confirmed value.

/// Synchronization state of one cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineSync {
    /// The displayed quantity matches the server.
    Confirmed(u32),
    /// An update is in flight; `requested` is shown optimistically.
    Pending { confirmed: u32, requested: u32 },
    /// The last update failed and was rolled back to `confirmed`.
    Errored { confirmed: u32, attempted: u32 },
}

impl LineSync {
    /// Last quantity the server acknowledged.
    #[must_use]
    pub const fn confirmed(self) -> u32 {
        match self {
            Self::Confirmed(q) | Self::Pending { confirmed: q, .. } | Self::Errored { confirmed: q, .. } => q,
        }
    }

    /// Quantity the UI should show.
    #[must_use]
    pub const fn displayed(self) -> u32 {
        match self {
            Self::Pending { requested, .. } => requested,
            Self::Confirmed(q) | Self::Errored { confirmed: q, .. } => q,
        }
    }

    /// Whether an update is in flight.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// Start an optimistic update to `requested`.
    #[must_use]
    pub const fn begin(self, requested: u32) -> Self {
        Self::Pending {
            confirmed: self.confirmed(),
            requested,
        }
    }

    /// The server accepted `quantity`.
    #[must_use]
    pub const fn confirm(quantity: u32) -> Self {
        Self::Confirmed(quantity)
    }

    /// The server rejected `attempted`; fall back to the confirmed quantity.
    #[must_use]
    pub const fn fail(self, attempted: u32) -> Self {
        Self::Errored {
            confirmed: self.confirmed(),
            attempted,
        }
    }
}
