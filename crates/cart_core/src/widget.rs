use std::time::{Duration, Instant};

use shared::{
    domain::{Product, ProductDescriptor, ShippingDetails},
    error::CartError,
    pricing::CartTotals,
    protocol::PlacedOrder,
};
use storage::KeyValueStore;
use tracing::{debug, info, warn};

use crate::{
    coupon::{CouponOutcome, CouponState},
    page::{ids, parse_int_input, Page},
    store::CartStore,
    view::{self, CartView, POPUP_DURATION},
};

pub const ORDER_PLACED_ALERT: &str = "Order placed successfully!";

/// The cart widget as the page sees it: one handler per button, all sharing
/// the store, the page and the session's coupon state.
///
/// Shopper-facing failures are queued as alerts; storage and decoding
/// failures are returned to the caller.
pub struct CartWidget<S> {
    store: CartStore<S>,
    page: Page,
    coupon: CouponState,
    alerts: Vec<String>,
    popup_duration: Duration,
}

impl<S: KeyValueStore> CartWidget<S> {
    /// Loads the persisted cart and fills in the header badge.
    pub async fn mount(storage: S, page: Page) -> Result<Self, CartError> {
        let store = CartStore::load(storage).await?;
        let mut widget = Self {
            store,
            page,
            coupon: CouponState::default(),
            alerts: Vec::new(),
            popup_duration: POPUP_DURATION,
        };
        widget.update_cart_count();
        Ok(widget)
    }

    pub fn with_popup_duration(mut self, popup_duration: Duration) -> Self {
        self.popup_duration = popup_duration;
        self
    }

    pub fn store(&self) -> &CartStore<S> {
        &self.store
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn coupon(&self) -> &CouponState {
        &self.coupon
    }

    /// Alerts raised since the last call, oldest first.
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    pub async fn add_to_cart(&mut self, product: Product) -> Result<bool, CartError> {
        let result = self.store.add(product).await;
        let added = self.alert_on_rejection(result)?;
        if added.is_some() {
            self.update_cart_count();
        }
        Ok(added.is_some())
    }

    pub async fn remove_from_cart(&mut self, name: &str) -> Result<CartView, CartError> {
        self.store.remove(name).await?;
        self.update_cart_count();
        self.render_cart_items().await
    }

    /// Reads the line's quantity input and applies it if it is a whole
    /// number of at least one. Anything else is ignored without feedback.
    pub async fn update_cart_item(&mut self, name: &str) -> Result<Option<CartView>, CartError> {
        let input_id = ids::quantity_input(name);
        let parsed = self.page.value(&input_id).and_then(parse_int_input);
        let Some(quantity) = parsed.filter(|q| *q >= 1).and_then(|q| u32::try_from(q).ok())
        else {
            debug!(name, raw = ?self.page.value(&input_id), "ignoring quantity input");
            return Ok(None);
        };

        self.store.set_quantity(name, quantity).await?;
        self.update_cart_count();
        self.render_cart_items().await.map(Some)
    }

    /// Redraws the list and summary from persisted storage.
    pub async fn render_cart_items(&mut self) -> Result<CartView, CartError> {
        let items = self.store.load_persisted().await?;
        if items.as_slice() != self.store.items() {
            warn!(
                persisted = items.len(),
                in_memory = self.store.items().len(),
                "persisted cart differs from in-memory cart"
            );
        }
        Ok(view::render_cart_items(&mut self.page, items, &self.coupon))
    }

    pub fn update_cart_count(&mut self) {
        view::update_cart_count(&mut self.page, self.store.count());
    }

    /// The card button handler: add the described product, then confirm with
    /// a popup.
    pub async fn handle_add_to_cart(
        &mut self,
        descriptor: &ProductDescriptor,
    ) -> Result<bool, CartError> {
        self.handle_add_to_cart_at(descriptor, Instant::now()).await
    }

    pub async fn handle_add_to_cart_at(
        &mut self,
        descriptor: &ProductDescriptor,
        now: Instant,
    ) -> Result<bool, CartError> {
        let product = descriptor.to_product();
        let name = product.name.clone();
        let added = self.add_to_cart(product).await?;
        self.show_popup_at(&format!("{name} added to cart"), now);
        Ok(added)
    }

    pub fn apply_coupon(&mut self) -> CouponOutcome {
        view::apply_coupon(&mut self.page, &mut self.coupon)
    }

    pub fn show_popup(&mut self, message: &str) {
        self.show_popup_at(message, Instant::now());
    }

    pub fn show_popup_at(&mut self, message: &str, now: Instant) {
        view::show_popup(&mut self.page, message, now, self.popup_duration);
    }

    /// Fires any popup hide that is due at `now`.
    pub fn tick(&mut self, now: Instant) {
        self.page.advance_to(now);
    }

    /// Checks the checkout form and, if complete, empties the cart.
    pub async fn place_order(&mut self) -> Result<Option<PlacedOrder>, CartError> {
        let details = self.shipping_details();
        if !details.is_complete() {
            self.alert_on_rejection::<()>(Err(CartError::MissingShippingInfo))?;
            return Ok(None);
        }

        let totals = if self.coupon.is_applied() {
            let plain = CartTotals::for_items(self.store.items());
            CartTotals::discounted(plain.subtotal, plain.shipping)
        } else {
            CartTotals::for_items(self.store.items())
        };
        let items = self.store.clear().await?;
        let order = PlacedOrder::new(items, totals);
        info!(
            order_id = %order.order_id,
            lines = order.items.len(),
            total = order.totals.total,
            "order placed"
        );
        self.alerts.push(ORDER_PLACED_ALERT.to_string());

        self.update_cart_count();
        self.render_cart_items().await?;
        Ok(Some(order))
    }

    pub fn shipping_details(&self) -> ShippingDetails {
        let field = |id: &str| self.page.value(id).unwrap_or_default().to_string();
        ShippingDetails {
            full_name: field(ids::FULL_NAME),
            email: field(ids::EMAIL),
            address: field(ids::ADDRESS),
        }
    }

    pub fn fill_shipping_details(&mut self, details: &ShippingDetails) {
        self.page.set_value(ids::FULL_NAME, details.full_name.clone());
        self.page.set_value(ids::EMAIL, details.email.clone());
        self.page.set_value(ids::ADDRESS, details.address.clone());
    }

    /// Turns shopper-facing errors into alerts; everything else propagates.
    fn alert_on_rejection<T>(&mut self, result: Result<T, CartError>) -> Result<Option<T>, CartError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) => match err.alert_message() {
                Some(message) => {
                    warn!(error = %err, "rejected cart action");
                    self.alerts.push(message.to_string());
                    Ok(None)
                }
                None => Err(err),
            },
        }
    }
}

#[cfg(test)]
#[path = "tests/widget_tests.rs"]
mod tests;
