//! Which cart lines are checked for checkout.
//!
//! Selection is local state only. Totals are never stored: they are computed
//! from the selection and the current seller groups every time they are read.

use std::collections::{BTreeMap, BTreeSet};

use gadget_cart_core::{CartLineItem, GadgetId, Money, SellerGroup, SellerId};

/// Selected gadgets, per seller. Sellers with nothing selected have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    sellers: BTreeMap<SellerId, BTreeSet<GadgetId>>,
}

impl SelectionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sellers.is_empty()
    }

    /// Number of selected lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sellers.values().map(BTreeSet::len).sum()
    }

    #[must_use]
    pub fn is_selected(&self, seller_id: SellerId, gadget_id: GadgetId) -> bool {
        self.sellers
            .get(&seller_id)
            .is_some_and(|set| set.contains(&gadget_id))
    }

    /// Whether the seller has any entry at all.
    #[must_use]
    pub fn has_seller(&self, seller_id: SellerId) -> bool {
        self.sellers.contains_key(&seller_id)
    }

    /// All selected `(seller, gadget)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (SellerId, GadgetId)> + '_ {
        self.sellers
            .iter()
            .flat_map(|(seller, set)| set.iter().map(move |gadget| (*seller, *gadget)))
    }

    /// Flip one gadget. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, seller_id: SellerId, gadget_id: GadgetId) -> bool {
        if self.is_selected(seller_id, gadget_id) {
            self.remove(seller_id, gadget_id);
            false
        } else {
            self.sellers.entry(seller_id).or_default().insert(gadget_id);
            true
        }
    }

    /// Drop one gadget, pruning the seller if nothing is left.
    pub fn remove(&mut self, seller_id: SellerId, gadget_id: GadgetId) {
        if let Some(set) = self.sellers.get_mut(&seller_id) {
            set.remove(&gadget_id);
            if set.is_empty() {
                self.sellers.remove(&seller_id);
            }
        }
    }

    /// Drop every gadget of a seller.
    pub fn remove_seller(&mut self, seller_id: SellerId) {
        self.sellers.remove(&seller_id);
    }

    pub fn clear(&mut self) {
        self.sellers.clear();
    }

    /// Keep only selections that still point at a line in `groups`.
    pub fn retain_existing(&mut self, groups: &[SellerGroup]) {
        self.sellers.retain(|seller_id, set| {
            let Some(group) = groups.iter().find(|g| g.seller_id == *seller_id) else {
                return false;
            };
            set.retain(|gadget_id| group.line(*gadget_id).is_some());
            !set.is_empty()
        });
    }

    /// Select every purchasable line of a seller, or clear the seller if they
    /// are all selected already.
    ///
    /// Returns whether the seller ends up selected.
    pub fn toggle_seller(&mut self, group: &SellerGroup) -> bool {
        let valid = purchasable(group);
        let covered = self
            .sellers
            .get(&group.seller_id)
            .is_some_and(|set| valid.is_subset(set));

        if covered || valid.is_empty() {
            self.sellers.remove(&group.seller_id);
            false
        } else {
            self.sellers.insert(group.seller_id, valid);
            true
        }
    }

    /// Select every purchasable line in the cart, or clear everything if they
    /// are all selected already.
    ///
    /// Returns whether the cart ends up selected.
    pub fn toggle_all(&mut self, groups: &[SellerGroup]) -> bool {
        let valid: Vec<(SellerId, BTreeSet<GadgetId>)> = groups
            .iter()
            .map(|g| (g.seller_id, purchasable(g)))
            .filter(|(_, set)| !set.is_empty())
            .collect();

        let covered = valid.iter().all(|(seller_id, set)| {
            self.sellers
                .get(seller_id)
                .is_some_and(|selected| set.is_subset(selected))
        });

        self.sellers.clear();
        if covered || valid.is_empty() {
            return false;
        }
        self.sellers.extend(valid);
        true
    }

    /// Selected lines in seller-group order.
    pub fn selected_lines<'a>(
        &'a self,
        groups: &'a [SellerGroup],
    ) -> impl Iterator<Item = &'a CartLineItem> + 'a {
        groups.iter().flat_map(move |group| {
            group
                .line_items
                .iter()
                .filter(move |line| self.is_selected(group.seller_id, line.gadget_id))
        })
    }

    /// Sum of effective unit price times quantity over selected lines.
    #[must_use]
    pub fn total(&self, groups: &[SellerGroup]) -> Money {
        self.selected_lines(groups).map(CartLineItem::line_total).sum()
    }

    /// Sum of quantities over selected lines, saturating at `u32::MAX`.
    #[must_use]
    pub fn selected_quantity(&self, groups: &[SellerGroup]) -> u32 {
        self.selected_lines(groups)
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }
}

fn purchasable(group: &SellerGroup) -> BTreeSet<GadgetId> {
    group
        .line_items
        .iter()
        .filter(|line| line.is_purchasable())
        .map(|line| line.gadget_id)
        .collect()
}
