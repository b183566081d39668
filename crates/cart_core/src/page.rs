//! In-process stand-in for the cart page's document.
//!
//! Elements are addressed by id. Only the state the widget reads or writes is
//! modelled: text content, input values, list children, colour and
//! visibility with an optional auto-hide deadline.

use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

pub mod ids {
    pub const CART_TOTAL: &str = "cart-total";
    pub const CART_ITEMS: &str = "cart-items";
    pub const CART_TOTAL_PRICE: &str = "cart-total-price";
    pub const SUMMARY_SUBTOTAL: &str = "summary-subtotal";
    pub const SUMMARY_TAX: &str = "summary-tax";
    pub const SUMMARY_SHIPPING: &str = "summary-shipping";
    pub const SUMMARY_TOTAL: &str = "summary-total";
    pub const COUPON_CODE: &str = "coupon-code";
    pub const COUPON_MESSAGE: &str = "coupon-message";
    pub const CART_POPUP: &str = "cart-popup";
    pub const FULL_NAME: &str = "full-name";
    pub const EMAIL: &str = "email";
    pub const ADDRESS: &str = "address";

    pub const QUANTITY_INPUT_PREFIX: &str = "qty-";

    pub fn quantity_input(name: &str) -> String {
        format!("{QUANTITY_INPUT_PREFIX}{name}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub text: String,
    pub value: String,
    pub children: Vec<String>,
    pub color: Option<String>,
    pub hidden: bool,
    hide_at: Option<Instant>,
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    elements: BTreeMap<String, Element>,
}

impl Page {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The cart page: header badge, cart list, order summary, coupon form,
    /// checkout form and the (initially hidden) popup.
    pub fn cart_page() -> Self {
        let mut page = Self::empty();
        for id in [
            ids::CART_TOTAL,
            ids::CART_ITEMS,
            ids::CART_TOTAL_PRICE,
            ids::SUMMARY_SUBTOTAL,
            ids::SUMMARY_TAX,
            ids::SUMMARY_SHIPPING,
            ids::SUMMARY_TOTAL,
            ids::COUPON_CODE,
            ids::COUPON_MESSAGE,
            ids::FULL_NAME,
            ids::EMAIL,
            ids::ADDRESS,
        ] {
            page.insert(id);
        }
        page.insert(ids::CART_POPUP).hidden = true;
        page
    }

    /// A product listing page: only the header badge and the popup.
    pub fn listing_page() -> Self {
        let mut page = Self::empty();
        page.insert(ids::CART_TOTAL);
        page.insert(ids::CART_POPUP).hidden = true;
        page
    }

    pub fn insert(&mut self, id: &str) -> &mut Element {
        self.elements.entry(id.to_string()).or_default()
    }

    pub fn remove(&mut self, id: &str) -> Option<Element> {
        self.elements.remove(id)
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.element(id).map(|el| el.text.as_str())
    }

    /// Writes text content. Returns false when the element does not exist.
    pub fn set_text(&mut self, id: &str, text: impl Into<String>) -> bool {
        match self.element_mut(id) {
            Some(el) => {
                el.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn value(&self, id: &str) -> Option<&str> {
        self.element(id).map(|el| el.value.as_str())
    }

    pub fn set_value(&mut self, id: &str, value: impl Into<String>) -> bool {
        match self.element_mut(id) {
            Some(el) => {
                el.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Ids of every element whose id starts with `prefix`.
    pub fn ids_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.elements
            .keys()
            .filter(|id| id.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Makes an element visible until `now + duration`.
    pub fn show_for(&mut self, id: &str, now: Instant, duration: Duration) -> bool {
        match self.element_mut(id) {
            Some(el) => {
                el.hidden = false;
                el.hide_at = Some(now + duration);
                true
            }
            None => false,
        }
    }

    /// Runs due auto-hide timers.
    pub fn advance_to(&mut self, now: Instant) {
        for el in self.elements.values_mut() {
            if el.hide_at.is_some_and(|deadline| deadline <= now) {
                el.hidden = true;
                el.hide_at = None;
            }
        }
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.element(id).is_some_and(|el| !el.hidden)
    }
}

/// Integer-prefix parse of a form field: optional leading whitespace, an
/// optional sign, then decimal digits. Trailing junk is ignored; no digits
/// means no number.
pub fn parse_int_input(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Float-prefix parse of displayed text; unparsable text reads as zero.
pub(crate) fn parse_float_text(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let end = trimmed
        .char_indices()
        .find(|(i, c)| {
            !(c.is_ascii_digit() || *c == '.' || ((*c == '-' || *c == '+') && *i == 0))
        })
        .map_or(trimmed.len(), |(i, _)| i);
    trimmed[..end].parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
