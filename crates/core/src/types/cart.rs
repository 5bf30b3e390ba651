//! Cart line items and their per-seller grouping.
//!
//! The remote cart store owns these values. The client only mirrors them, so
//! every field mirrors the API's camelCase JSON.

use serde::{Deserialize, Serialize};

use super::{GadgetId, GadgetStatus, Money, SellerId};

/// One gadget in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub gadget_id: GadgetId,
    pub seller_id: SellerId,
    pub quantity: u32,
    pub unit_price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<Money>,
    /// `None` when the API omits the flag, which counts as for sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_for_sale: Option<bool>,
    #[serde(default)]
    pub status: GadgetStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CartLineItem {
    /// Price actually charged per unit: the discounted price when present.
    #[must_use]
    pub fn effective_unit_price(&self) -> Money {
        self.discounted_price.unwrap_or(self.unit_price)
    }

    /// Effective unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.effective_unit_price().times(self.quantity)
    }

    /// Whether this line may be selected automatically and checked out.
    ///
    /// Inactive gadgets and gadgets explicitly withdrawn from sale are not.
    #[must_use]
    pub fn is_purchasable(&self) -> bool {
        self.status.is_active() && self.is_for_sale != Some(false)
    }

    /// Display name, falling back to the gadget ID.
    #[must_use]
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Gadget #{}", self.gadget_id))
    }
}

/// A seller that has at least one item in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub seller_id: SellerId,
    #[serde(default)]
    pub shop_name: String,
    #[serde(default)]
    pub shop_address: String,
}

/// Cart line items bucketed by the seller who listed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerGroup {
    pub seller_id: SellerId,
    pub shop_name: String,
    pub shop_address: String,
    pub line_items: Vec<CartLineItem>,
}

impl SellerGroup {
    /// Build a group from a seller and the line items fetched for it.
    #[must_use]
    pub fn new(seller: Seller, line_items: Vec<CartLineItem>) -> Self {
        Self {
            seller_id: seller.seller_id,
            shop_name: seller.shop_name,
            shop_address: seller.shop_address,
            line_items,
        }
    }

    /// Find a line by gadget.
    #[must_use]
    pub fn line(&self, gadget_id: GadgetId) -> Option<&CartLineItem> {
        self.line_items.iter().find(|l| l.gadget_id == gadget_id)
    }

    /// Find a line by gadget, mutably.
    pub fn line_mut(&mut self, gadget_id: GadgetId) -> Option<&mut CartLineItem> {
        self.line_items.iter_mut().find(|l| l.gadget_id == gadget_id)
    }

    /// Sum of quantities across the group, saturating at `u32::MAX`.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.line_items
            .iter()
            .fold(0, |count, l| count.saturating_add(l.quantity))
    }

    /// Whether the group has nothing left to display.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(json: &str) -> CartLineItem {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_deserialize_minimal_line() {
        let item = line(r#"{"gadgetId":1,"sellerId":2,"quantity":3,"unitPrice":100000}"#);
        assert_eq!(item.gadget_id, GadgetId::new(1));
        assert_eq!(item.seller_id, SellerId::new(2));
        assert_eq!(item.status, GadgetStatus::Active);
        assert_eq!(item.is_for_sale, None);
        assert!(item.is_purchasable());
    }

    #[test]
    fn test_effective_price_prefers_discount() {
        let item = line(
            r#"{"gadgetId":1,"sellerId":2,"quantity":2,"unitPrice":100000,"discountedPrice":80000}"#,
        );
        assert_eq!(item.effective_unit_price(), Money::from_dong(80_000));
        assert_eq!(item.line_total(), Money::from_dong(160_000));
    }

    #[test]
    fn test_not_purchasable_when_inactive_or_withdrawn() {
        let inactive = line(
            r#"{"gadgetId":1,"sellerId":2,"quantity":1,"unitPrice":1,"status":"Inactive"}"#,
        );
        let withdrawn = line(
            r#"{"gadgetId":1,"sellerId":2,"quantity":1,"unitPrice":1,"isForSale":false}"#,
        );
        assert!(!inactive.is_purchasable());
        assert!(!withdrawn.is_purchasable());
    }

    #[test]
    fn test_group_item_count() {
        let group = SellerGroup::new(
            Seller {
                seller_id: SellerId::new(2),
                shop_name: "Shop".to_string(),
                shop_address: String::new(),
            },
            vec![
                line(r#"{"gadgetId":1,"sellerId":2,"quantity":2,"unitPrice":1}"#),
                line(r#"{"gadgetId":3,"sellerId":2,"quantity":5,"unitPrice":1}"#),
            ],
        );
        assert_eq!(group.item_count(), 7);
        assert!(group.line(GadgetId::new(3)).is_some());
        assert!(group.line(GadgetId::new(4)).is_none());
    }
}
