//! Persisted cart format and order receipts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{domain::CartItem, error::CartError, pricing::CartTotals};

/// Local-storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "cart";

pub fn encode_cart(items: &[CartItem]) -> Result<String, CartError> {
    Ok(serde_json::to_string(items)?)
}

/// Decodes a stored cart. A missing value or a stored `null` is an empty cart;
/// anything else that is not a JSON array of items is an error.
pub fn decode_cart(raw: Option<&str>) -> Result<Vec<CartItem>, CartError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    let items: Option<Vec<CartItem>> = serde_json::from_str(raw)?;
    Ok(items.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub order_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

impl PlacedOrder {
    pub fn new(items: Vec<CartItem>, totals: CartTotals) -> Self {
        Self {
            order_id: Uuid::new_v4(),
            placed_at: Utc::now(),
            items,
            totals,
        }
    }
}
