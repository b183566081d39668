//! Draws cart state onto a [`Page`].

use std::time::{Duration, Instant};

use shared::{
    domain::{CartItem, CURRENCY_SYMBOL},
    pricing::{format_money, CartTotals},
};

use crate::{
    coupon::{CouponOutcome, CouponState},
    page::{ids, parse_float_text, Page},
};

pub const DEFAULT_POPUP_MESSAGE: &str = "✅ Item added to cart!";
pub const POPUP_DURATION: Duration = Duration::from_millis(2500);
pub const INVALID_COUPON_COLOR: &str = "red";

/// What the last render put on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

/// Rebuilds the cart list and the order summary from `items`.
///
/// Tax is 10% of the subtotal and shipping is free; once the session's coupon
/// is applied the discounted totals are shown instead.
pub fn render_cart_items(page: &mut Page, items: Vec<CartItem>, coupon: &CouponState) -> CartView {
    let undiscounted = CartTotals::for_items(&items);
    let totals = if coupon.is_applied() {
        CartTotals::discounted(undiscounted.subtotal, undiscounted.shipping)
    } else {
        undiscounted
    };

    for stale in page.ids_with_prefix(ids::QUANTITY_INPUT_PREFIX) {
        page.remove(&stale);
    }
    let children: Vec<String> = items.iter().map(render_line).collect();
    if let Some(list) = page.element_mut(ids::CART_ITEMS) {
        list.children = children;
    }
    for item in &items {
        page.insert(&ids::quantity_input(&item.name)).value = item.quantity.to_string();
    }

    page.set_text(ids::CART_TOTAL_PRICE, format_money(totals.subtotal));
    page.set_text(ids::SUMMARY_SUBTOTAL, format_money(totals.subtotal));
    page.set_text(ids::SUMMARY_TAX, format_money(totals.tax));
    page.set_text(ids::SUMMARY_SHIPPING, "0");
    page.set_text(ids::SUMMARY_TOTAL, format_money(totals.total));

    CartView { items, totals }
}

/// Markup of one cart list entry. Handlers address the line by name.
pub fn render_line(item: &CartItem) -> String {
    let name = escape_html(&item.name);
    let image = escape_html(&item.image);
    let name_arg = escape_html(&js_string(&item.name));
    let input_id = escape_html(&ids::quantity_input(&item.name));
    format!(
        r#"<li class="cart-item">
  <div class="cart-left">
    <img src="{image}" alt="{name}" />
    <div>
      <strong>{name}</strong>
      <p>Price: {CURRENCY_SYMBOL}{price} × {quantity}</p>
    </div>
  </div>
  <div class="cart-right">
    <input type="number" min="1" id="{input_id}" value="{quantity}" onchange="updateCartItem({name_arg})" />
    <button onclick="removeFromCart({name_arg})">Delete</button>
  </div>
</li>"#,
        price = format_money(item.price),
        quantity = item.quantity,
    )
}

/// Writes the header badge. Pages without a badge are left alone.
pub fn update_cart_count(page: &mut Page, count: u64) {
    page.set_text(ids::CART_TOTAL, count.to_string());
}

/// Applies the code typed into the coupon field against the displayed
/// summary.
pub fn apply_coupon(page: &mut Page, coupon: &mut CouponState) -> CouponOutcome {
    let code = page
        .value(ids::COUPON_CODE)
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    let subtotal = page
        .text(ids::SUMMARY_SUBTOTAL)
        .map_or(0.0, parse_float_text);
    let shipping = page
        .text(ids::SUMMARY_SHIPPING)
        .map_or(0.0, parse_float_text);

    let outcome = coupon.apply(&code, subtotal, shipping);
    if let CouponOutcome::Applied(totals) = outcome {
        page.set_text(ids::SUMMARY_TAX, format_money(totals.tax));
        page.set_text(ids::SUMMARY_TOTAL, format_money(totals.total));
    }
    if let Some(message) = page.element_mut(ids::COUPON_MESSAGE) {
        message.text = outcome.message().to_string();
        match outcome {
            CouponOutcome::Invalid => message.color = Some(INVALID_COUPON_COLOR.to_string()),
            CouponOutcome::Applied(_) => message.color = None,
            CouponOutcome::AlreadyApplied => {}
        }
    }
    outcome
}

/// Shows `message` in the popup and schedules it to hide after `duration`.
pub fn show_popup(page: &mut Page, message: &str, now: Instant, duration: Duration) {
    if page.set_text(ids::CART_POPUP, message) {
        page.show_for(ids::CART_POPUP, now, duration);
    }
}

fn js_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
