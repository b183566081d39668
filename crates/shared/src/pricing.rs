use serde::{Deserialize, Serialize};

use crate::domain::CartItem;

pub const TAX_RATE: f64 = 0.10;
pub const SHIPPING_FEE: f64 = 0.0;
pub const COUPON_DISCOUNT_RATE: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: f64,
    pub discount: f64,
    pub tax: f64,
    pub shipping: f64,
    pub total: f64,
}

impl CartTotals {
    /// Undiscounted totals: tax is 10% of the subtotal and shipping is free.
    pub fn for_items(items: &[CartItem]) -> Self {
        let subtotal = items
            .iter()
            .map(CartItem::line_total)
            .fold(0.0, |acc, line| acc + line);
        Self {
            subtotal,
            discount: 0.0,
            tax: subtotal * TAX_RATE,
            shipping: SHIPPING_FEE,
            total: subtotal * (1.0 + TAX_RATE),
        }
    }

    /// Totals after the coupon discount. Tax is charged on the discounted
    /// subtotal.
    pub fn discounted(subtotal: f64, shipping: f64) -> Self {
        let discount = subtotal * COUPON_DISCOUNT_RATE;
        let tax = (subtotal - discount) * TAX_RATE;
        Self {
            subtotal,
            discount,
            tax,
            shipping,
            total: subtotal - discount + tax + shipping,
        }
    }
}

pub fn format_money(amount: f64) -> String {
    // Negative zero would print as "-0.00".
    let amount = if amount == 0.0 { 0.0 } else { amount };
    format!("{amount:.2}")
}

pub fn item_count(items: &[CartItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}
