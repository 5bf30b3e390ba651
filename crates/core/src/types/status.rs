//! Listing status of a gadget.

use serde::{Deserialize, Serialize};

/// Listing status of a gadget as reported by the cart API.
///
/// Only `Inactive` matters to the cart: inactive gadgets are never
/// auto-selected and cannot be checked out. Statuses this client does not
/// know about deserialize as `Other` rather than failing the whole cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GadgetStatus {
    #[default]
    Active,
    Inactive,
    #[serde(other)]
    Other,
}

impl GadgetStatus {
    /// Whether the gadget may be ordered.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Inactive)
    }
}

impl std::fmt::Display for GadgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Inactive => write!(f, "Inactive"),
            Self::Other => write!(f, "Other"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_is_other() {
        let status: GadgetStatus = serde_json::from_str("\"Banned\"").unwrap();
        assert_eq!(status, GadgetStatus::Other);
        assert!(status.is_active());
    }

    #[test]
    fn test_inactive_is_not_active() {
        let status: GadgetStatus = serde_json::from_str("\"Inactive\"").unwrap();
        assert!(!status.is_active());
    }
}
