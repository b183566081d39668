use serde::{Deserialize, Serialize};

use crate::error::CartError;

pub const DEFAULT_PRODUCT_NAME: &str = "Unnamed Product";
pub const DEFAULT_PRODUCT_IMAGE: &str = "images/default.jpg";
pub const CURRENCY_SYMBOL: char = '₹';

/// One product line in the cart. `name` is the line's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub image: String,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// A product as handed to the cart by a card's add button.
///
/// The price is optional because callers may fail to resolve one; the cart
/// rejects such products instead of storing them.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub name: String,
    pub price: Option<f64>,
    pub quantity: u32,
    pub image: String,
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price: Some(price),
            quantity,
            image: DEFAULT_PRODUCT_IMAGE.to_string(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Checks name and price and turns the product into a cart line.
    /// The quantity is taken as given, zero included.
    pub fn into_cart_item(self) -> Result<CartItem, CartError> {
        if self.name.is_empty() {
            return Err(CartError::InvalidProduct {
                reason: "missing name".into(),
            });
        }
        let price = match self.price {
            None => {
                return Err(CartError::InvalidProduct {
                    reason: format!("missing price for '{}'", self.name),
                })
            }
            Some(price) if !price.is_finite() || price <= 0.0 => {
                return Err(CartError::InvalidProduct {
                    reason: format!("unusable price {price} for '{}'", self.name),
                })
            }
            Some(price) => price,
        };

        Ok(CartItem {
            name: self.name,
            price,
            quantity: self.quantity,
            image: self.image,
        })
    }
}

/// Structured snapshot of a product card, as listed in a catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

impl ProductDescriptor {
    pub fn to_product(&self) -> Product {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_PRODUCT_NAME)
            .to_string();
        let image = self
            .image
            .as_deref()
            .filter(|image| !image.is_empty())
            .unwrap_or(DEFAULT_PRODUCT_IMAGE)
            .to_string();
        let price = self.discounted_price.or(self.original_price).unwrap_or(0.0);

        Product {
            name,
            price: Some(price),
            quantity: self.quantity.unwrap_or(1),
            image,
        }
    }
}

/// Parses a rendered price label such as `₹1,299.00`.
pub fn parse_price_label(label: &str) -> Option<f64> {
    let cleaned: String = label
        .chars()
        .filter(|c| *c != CURRENCY_SYMBOL && *c != ',')
        .collect();
    cleaned.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Shipping details collected by the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub full_name: String,
    pub email: String,
    pub address: String,
}

impl ShippingDetails {
    pub fn is_complete(&self) -> bool {
        !self.full_name.is_empty() && !self.email.is_empty() && !self.address.is_empty()
    }
}
