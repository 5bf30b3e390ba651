//! Integration tests for Gadget Cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gadget-cart-integration-tests
//! ```
//!
//! # Test Harness
//!
//! [`MockServer`] serves an in-memory copy of the storefront cart REST API
//! with `axum` on an ephemeral localhost port. Tests point the real
//! `reqwest`-backed `CartClient` at it, so requests go over the wire.
//! Individual endpoints can be made to fail with a status and a JSON body.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use gadget_cart_client::ClientConfig;
use gadget_cart_client::api::{CartItemRequest, OrderRequest};
use gadget_cart_core::{CartLineItem, GadgetId, GadgetStatus, Money, Seller, SellerId};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

type Reply = Result<Json<Value>, (StatusCode, Json<Value>)>;

/// Server-side cart store.
#[derive(Debug, Default)]
pub struct MockState {
    pub sellers: Vec<Seller>,
    pub items: BTreeMap<SellerId, Vec<CartLineItem>>,
    /// Endpoints that currently fail, by operation name.
    pub failing: HashMap<&'static str, (StatusCode, Value)>,
    pub orders: Vec<OrderRequest>,
    /// `Authorization` header of every request, in order.
    pub auth_headers: Vec<Option<String>>,
}

impl MockState {
    #[must_use]
    pub fn with_seller(mut self, seller: Seller, items: Vec<CartLineItem>) -> Self {
        self.items.insert(seller.seller_id, items);
        self.sellers.push(seller);
        self
    }

    /// Make `op` answer with `status` and an envelope holding `reason`.
    pub fn fail(&mut self, op: &'static str, status: StatusCode, reason: Option<&str>) {
        let body = reason.map_or_else(
            || json!({}),
            |message| json!({ "reasons": [{ "message": message }] }),
        );
        self.failing.insert(op, (status, body));
    }

    pub fn quantity_of(&self, gadget_id: GadgetId) -> Option<u32> {
        self.items
            .values()
            .flatten()
            .find(|l| l.gadget_id == gadget_id)
            .map(|l| l.quantity)
    }
}

type Shared = Arc<Mutex<MockState>>;

/// A running mock API.
pub struct MockServer {
    base_url: String,
    state: Shared,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Serve `state` on `127.0.0.1` with an OS-assigned port.
    pub async fn start(state: MockState) -> Self {
        let state: Shared = Arc::new(Mutex::new(state));

        let app = Router::new()
            .route("/api/cart/sellers", get(sellers))
            .route(
                "/api/cart/seller/{id}",
                get(seller_items).delete(remove_seller),
            )
            .route("/api/cart", post(add_item).delete(remove_item))
            .route("/api/cart/old", put(update_quantity))
            .route("/api/order", post(place_order))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().expect("Mock server has no address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock server error");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            handle,
        }
    }

    /// Client configuration pointing at this server.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::for_base_url(&self.base_url).unwrap()
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn seller(id: i64, name: &str) -> Seller {
    Seller {
        seller_id: SellerId::new(id),
        shop_name: name.to_string(),
        shop_address: "Quận 1, TP. Hồ Chí Minh".to_string(),
    }
}

pub fn item(seller: i64, gadget: i64, quantity: u32, price: u64) -> CartLineItem {
    CartLineItem {
        gadget_id: GadgetId::new(gadget),
        seller_id: SellerId::new(seller),
        quantity,
        unit_price: Money::from_dong(price),
        discounted_price: None,
        is_for_sale: Some(true),
        status: GadgetStatus::Active,
        name: Some(format!("Gadget {gadget}")),
        image: None,
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn guard(state: &Shared, op: &'static str, headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
    let mut state = state.lock().unwrap();
    state.auth_headers.push(
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    );
    match state.failing.get(op) {
        Some((status, body)) => Err((*status, Json(body.clone()))),
        None => Ok(()),
    }
}

fn ok() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn sellers(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    guard(&state, "sellers", &headers)?;
    let sellers = state.lock().unwrap().sellers.clone();
    // Wrapped to exercise the `{ "data": ... }` form
    Ok(Json(json!({ "data": sellers })))
}

async fn seller_items(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Reply {
    guard(&state, "seller_items", &headers)?;
    let items = state
        .lock()
        .unwrap()
        .items
        .get(&SellerId::new(id))
        .cloned()
        .unwrap_or_default();
    Ok(Json(json!(items)))
}

async fn add_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<CartItemRequest>,
) -> Reply {
    guard(&state, "add_item", &headers)?;
    let mut state = state.lock().unwrap();
    if let Some(line) = state
        .items
        .values_mut()
        .flatten()
        .find(|l| l.gadget_id == body.gadget_id)
    {
        line.quantity += body.quantity;
    }
    Ok(ok())
}

async fn update_quantity(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<CartItemRequest>,
) -> Reply {
    guard(&state, "update_quantity", &headers)?;
    let mut state = state.lock().unwrap();
    match state
        .items
        .values_mut()
        .flatten()
        .find(|l| l.gadget_id == body.gadget_id)
    {
        Some(line) => {
            line.quantity = body.quantity;
            Ok(ok())
        }
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "reasons": [{ "message": "Sản phẩm không có trong giỏ hàng" }] })),
        )),
    }
}

async fn remove_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<CartItemRequest>,
) -> Reply {
    guard(&state, "remove_item", &headers)?;
    for items in state.lock().unwrap().items.values_mut() {
        items.retain(|l| l.gadget_id != body.gadget_id);
    }
    Ok(ok())
}

async fn remove_seller(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Reply {
    guard(&state, "remove_seller", &headers)?;
    let mut state = state.lock().unwrap();
    let seller_id = SellerId::new(id);
    state.items.remove(&seller_id);
    state.sellers.retain(|s| s.seller_id != seller_id);
    Ok(ok())
}

async fn place_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<OrderRequest>,
) -> Reply {
    guard(&state, "place_order", &headers)?;
    let mut state = state.lock().unwrap();
    for line in &body.list_gadget_items {
        for items in state.items.values_mut() {
            items.retain(|l| l.gadget_id != line.gadget_id);
        }
    }
    state.orders.push(body);
    Ok(Json(json!({ "data": { "orderId": 1 } })))
}
