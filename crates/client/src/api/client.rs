//! `reqwest` implementation of [`CartApi`].

use std::sync::Arc;

use gadget_cart_core::{CartLineItem, GadgetId, Seller, SellerId};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, CartApi, CartItemRequest, OrderLine, OrderRequest, Payload};
use crate::config::ClientConfig;

/// Upstream bodies are cut to this many characters in logs.
const LOG_BODY_LIMIT: usize = 500;

/// Client for the storefront cart REST API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct CartClient {
    inner: Arc<CartClientInner>,
}

struct CartClientInner {
    client: reqwest::Client,
    base_url: Url,
    api_token: Option<SecretString>,
}

impl CartClient {
    /// Create a new cart API client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(CartClientInner {
                client: builder.build()?,
                base_url: config.base_url.clone(),
                api_token: config.api_token.clone(),
            }),
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.inner.base_url.join(path)?;
        let request_id = uuid::Uuid::new_v4().to_string();

        let mut builder = self
            .inner
            .client
            .request(method, url)
            .header("X-Request-Id", request_id);

        if let Some(token) = &self.inner.api_token
            && let Ok(mut value) =
                HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
        {
            value.set_sensitive(true);
            builder = builder.header(AUTHORIZATION, value);
        }

        Ok(builder)
    }

    /// Send a request and return the body of a successful response.
    async fn execute(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %truncate(&body),
                "Cart API returned non-success status"
            );
            return Err(ApiError::rejected(status, &body));
        }

        Ok(body)
    }

    /// Send a request and decode the (possibly wrapped) JSON body.
    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let body = self.execute(builder).await?;

        match serde_json::from_str::<Payload<T>>(&body) {
            Ok(payload) => Ok(payload.into_inner()),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %truncate(&body),
                    "Failed to parse cart API response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }
}

impl CartApi for CartClient {
    #[instrument(skip(self))]
    async fn sellers(&self) -> Result<Vec<Seller>, ApiError> {
        let sellers: Vec<Seller> = self
            .fetch(self.request(Method::GET, "api/cart/sellers")?)
            .await?;
        debug!(count = sellers.len(), "Fetched cart sellers");
        Ok(sellers)
    }

    #[instrument(skip(self), fields(seller_id = %seller_id))]
    async fn seller_items(&self, seller_id: SellerId) -> Result<Vec<CartLineItem>, ApiError> {
        let items: Vec<CartLineItem> = self
            .fetch(self.request(Method::GET, &format!("api/cart/seller/{seller_id}"))?)
            .await?;
        debug!(count = items.len(), "Fetched seller line items");
        Ok(items)
    }

    #[instrument(skip(self), fields(gadget_id = %gadget_id))]
    async fn add_item(&self, gadget_id: GadgetId, quantity: u32) -> Result<(), ApiError> {
        let body = CartItemRequest {
            gadget_id,
            quantity,
        };
        self.execute(self.request(Method::POST, "api/cart")?.json(&body))
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(gadget_id = %gadget_id))]
    async fn update_quantity(&self, gadget_id: GadgetId, quantity: u32) -> Result<(), ApiError> {
        let body = CartItemRequest {
            gadget_id,
            quantity,
        };
        self.execute(self.request(Method::PUT, "api/cart/old")?.json(&body))
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(gadget_id = %gadget_id))]
    async fn remove_item(&self, gadget_id: GadgetId, quantity: u32) -> Result<(), ApiError> {
        let body = CartItemRequest {
            gadget_id,
            quantity,
        };
        self.execute(self.request(Method::DELETE, "api/cart")?.json(&body))
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(seller_id = %seller_id))]
    async fn remove_seller(&self, seller_id: SellerId) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, &format!("api/cart/seller/{seller_id}"))?)
            .await?;
        Ok(())
    }

    #[instrument(skip(self, lines), fields(line_count = lines.len()))]
    async fn place_order(&self, lines: &[OrderLine]) -> Result<(), ApiError> {
        let body = OrderRequest {
            list_gadget_items: lines.to_vec(),
        };
        self.execute(self.request(Method::POST, "api/order")?.json(&body))
            .await?;
        Ok(())
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}
