//! In-memory [`CartApi`] for unit tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use gadget_cart_core::{CartLineItem, GadgetId, GadgetStatus, Money, Seller, SellerId};
use reqwest::StatusCode;

use crate::api::{ApiError, CartApi, OrderLine};

/// Remote cart store double. Operations named in `fail` answer with a 500
/// (optionally carrying a reason) until `recover` is called.
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

#[derive(Default)]
struct FakeState {
    sellers: Vec<Seller>,
    items: BTreeMap<SellerId, Vec<CartLineItem>>,
    failing: HashMap<&'static str, String>,
    calls: Vec<String>,
    orders: Vec<Vec<OrderLine>>,
}

pub fn seller(id: i64, name: &str) -> Seller {
    Seller {
        seller_id: SellerId::new(id),
        shop_name: name.to_string(),
        shop_address: "Hà Nội".to_string(),
    }
}

pub fn item(seller: i64, gadget: i64, quantity: u32, price: u64) -> CartLineItem {
    CartLineItem {
        gadget_id: GadgetId::new(gadget),
        seller_id: SellerId::new(seller),
        quantity,
        unit_price: Money::from_dong(price),
        discounted_price: None,
        is_for_sale: None,
        status: GadgetStatus::Active,
        name: Some(format!("Gadget {gadget}")),
        image: None,
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seller(self, seller: Seller, items: Vec<CartLineItem>) -> Self {
        {
            let mut state = self.lock();
            state.items.insert(seller.seller_id, items);
            state.sellers.push(seller);
        }
        self
    }

    /// Make `op` fail with a bare 500.
    pub fn fail(&self, op: &'static str) {
        self.fail_with(op, "");
    }

    /// Make `op` fail with a 500 whose envelope carries `reason`.
    pub fn fail_with(&self, op: &'static str, reason: &str) {
        let body = if reason.is_empty() {
            String::new()
        } else {
            serde_json::json!({ "reasons": [{ "message": reason }] }).to_string()
        };
        self.lock().failing.insert(op, body);
    }

    pub fn recover(&self, op: &'static str) {
        self.lock().failing.remove(op);
    }

    /// Calls seen so far, e.g. `"update_quantity 10 2"`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn orders(&self) -> Vec<Vec<OrderLine>> {
        self.lock().orders.clone()
    }

    /// Remove a line behind the client's back.
    pub fn drop_line(&self, seller_id: SellerId, gadget_id: GadgetId) {
        if let Some(items) = self.lock().items.get_mut(&seller_id) {
            items.retain(|l| l.gadget_id != gadget_id);
        }
    }

    pub fn stored_quantity(&self, gadget_id: GadgetId) -> Option<u32> {
        self.lock()
            .items
            .values()
            .flatten()
            .find(|l| l.gadget_id == gadget_id)
            .map(|l| l.quantity)
    }

    #[allow(clippy::unwrap_used)]
    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    fn record(&self, op: &'static str, detail: String) -> Result<(), ApiError> {
        let mut state = self.lock();
        state.calls.push(format!("{op} {detail}").trim_end().to_string());
        match state.failing.get(op) {
            Some(body) => Err(ApiError::rejected(StatusCode::INTERNAL_SERVER_ERROR, body)),
            None => Ok(()),
        }
    }
}

impl CartApi for FakeApi {
    async fn sellers(&self) -> Result<Vec<Seller>, ApiError> {
        self.record("sellers", String::new())?;
        Ok(self.lock().sellers.clone())
    }

    async fn seller_items(&self, seller_id: SellerId) -> Result<Vec<CartLineItem>, ApiError> {
        self.record("seller_items", seller_id.to_string())?;
        Ok(self
            .lock()
            .items
            .get(&seller_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_item(&self, gadget_id: GadgetId, quantity: u32) -> Result<(), ApiError> {
        self.record("add_item", format!("{gadget_id} {quantity}"))
    }

    async fn update_quantity(&self, gadget_id: GadgetId, quantity: u32) -> Result<(), ApiError> {
        self.record("update_quantity", format!("{gadget_id} {quantity}"))?;
        let mut state = self.lock();
        if let Some(line) = state
            .items
            .values_mut()
            .flatten()
            .find(|l| l.gadget_id == gadget_id)
        {
            line.quantity = quantity;
        }
        Ok(())
    }

    async fn remove_item(&self, gadget_id: GadgetId, quantity: u32) -> Result<(), ApiError> {
        self.record("remove_item", format!("{gadget_id} {quantity}"))?;
        for items in self.lock().items.values_mut() {
            items.retain(|l| l.gadget_id != gadget_id);
        }
        Ok(())
    }

    async fn remove_seller(&self, seller_id: SellerId) -> Result<(), ApiError> {
        self.record("remove_seller", seller_id.to_string())?;
        self.lock().items.remove(&seller_id);
        Ok(())
    }

    async fn place_order(&self, lines: &[OrderLine]) -> Result<(), ApiError> {
        self.record("place_order", lines.len().to_string())?;
        self.lock().orders.push(lines.to_vec());
        Ok(())
    }
}
