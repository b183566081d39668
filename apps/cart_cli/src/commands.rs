//! Cart actions shared by one-shot invocations and interactive sessions.

use std::{io::Write, time::Instant};

use anyhow::{anyhow, Result};
use cart_core::{ids, CartView, CartWidget, CouponOutcome};
use clap::Subcommand;
use shared::{
    domain::{parse_price_label, Product, ProductDescriptor, ShippingDetails, DEFAULT_PRODUCT_IMAGE},
    pricing::format_money,
    protocol::PlacedOrder,
};
use storage::KeyValueStore;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Action {
    /// Add a product by hand. Prices may be written as labels, e.g. "₹1,299".
    Add {
        name: String,
        price: String,
        #[arg(long, short, default_value_t = 1)]
        quantity: u32,
        #[arg(long)]
        image: Option<String>,
    },
    /// Add a catalog product, as its card's "Add to cart" button would.
    Buy {
        product: String,
        #[arg(long, short)]
        quantity: Option<u32>,
    },
    /// List the catalog.
    Catalog,
    Remove {
        name: String,
    },
    /// Type a quantity into a line's input and commit it.
    SetQty {
        name: String,
        quantity: String,
    },
    Show,
    Count,
    Coupon {
        code: String,
    },
    Order {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        address: String,
    },
}

#[derive(Debug, Default)]
pub struct Outcome {
    pub view: Option<CartView>,
    pub coupon: Option<CouponOutcome>,
    pub order: Option<PlacedOrder>,
    pub count: Option<u64>,
    pub lines: Vec<String>,
}

pub async fn run_action<S: KeyValueStore>(
    widget: &mut CartWidget<S>,
    catalog: &[ProductDescriptor],
    action: Action,
) -> Result<Outcome> {
    let mut outcome = Outcome::default();
    match action {
        Action::Add {
            name,
            price,
            quantity,
            image,
        } => {
            let product = Product {
                name,
                price: parse_price_label(&price),
                quantity,
                image: image.unwrap_or_else(|| DEFAULT_PRODUCT_IMAGE.to_string()),
            };
            let added_name = product.name.clone();
            if widget.add_to_cart(product).await? {
                widget.show_popup(&format!("{added_name} added to cart"));
            }
            outcome.count = Some(widget.store().count());
        }
        Action::Buy { product, quantity } => {
            let mut descriptor = find_product(catalog, &product)?.clone();
            if quantity.is_some() {
                descriptor.quantity = quantity;
            }
            widget.handle_add_to_cart(&descriptor).await?;
            outcome.count = Some(widget.store().count());
        }
        Action::Catalog => {
            outcome.lines = catalog.iter().map(describe_catalog_entry).collect();
        }
        Action::Remove { name } => {
            outcome.view = Some(widget.remove_from_cart(&name).await?);
        }
        Action::SetQty { name, quantity } => {
            widget
                .page_mut()
                .insert(&ids::quantity_input(&name))
                .value = quantity;
            outcome.view = widget.update_cart_item(&name).await?;
        }
        Action::Show => {
            outcome.view = Some(widget.render_cart_items().await?);
        }
        Action::Count => {
            widget.update_cart_count();
            outcome.count = Some(widget.store().count());
        }
        Action::Coupon { code } => {
            // The coupon reads the displayed subtotal, which goes stale after
            // any add since the last render.
            widget.render_cart_items().await?;
            widget.page_mut().set_value(ids::COUPON_CODE, code);
            outcome.coupon = Some(widget.apply_coupon());
        }
        Action::Order {
            name,
            email,
            address,
        } => {
            widget.fill_shipping_details(&ShippingDetails {
                full_name: name,
                email,
                address,
            });
            outcome.order = widget.place_order().await?;
        }
    }
    Ok(outcome)
}

fn find_product<'a>(
    catalog: &'a [ProductDescriptor],
    name: &str,
) -> Result<&'a ProductDescriptor> {
    catalog
        .iter()
        .find(|p| {
            p.name
                .as_deref()
                .is_some_and(|n| n.trim().eq_ignore_ascii_case(name.trim()))
        })
        .ok_or_else(|| anyhow!("no catalog product named '{name}'"))
}

fn describe_catalog_entry(descriptor: &ProductDescriptor) -> String {
    let product = descriptor.to_product();
    let price = product.price.map(format_money).unwrap_or_default();
    match (descriptor.discounted_price, descriptor.original_price) {
        (Some(_), Some(original)) => format!(
            "{}  ₹{price} (was ₹{})",
            product.name,
            format_money(original)
        ),
        _ => format!("{}  ₹{price}", product.name),
    }
}

/// Prints queued alerts, the action's result and any visible popup.
pub fn report<S: KeyValueStore>(
    out: &mut impl Write,
    widget: &mut CartWidget<S>,
    outcome: &Outcome,
) -> Result<()> {
    for alert in widget.take_alerts() {
        writeln!(out, "[alert] {alert}")?;
    }
    for line in &outcome.lines {
        writeln!(out, "{line}")?;
    }
    if let Some(view) = &outcome.view {
        write_view(out, view)?;
    }
    if let Some(coupon) = &outcome.coupon {
        writeln!(out, "{}", coupon.message())?;
        let page = widget.page();
        writeln!(
            out,
            "tax {}  total {}",
            page.text(ids::SUMMARY_TAX).unwrap_or_default(),
            page.text(ids::SUMMARY_TOTAL).unwrap_or_default()
        )?;
    }
    if let Some(order) = &outcome.order {
        writeln!(
            out,
            "order {} placed at {} for ₹{} ({} lines)",
            order.order_id,
            order.placed_at.to_rfc3339(),
            format_money(order.totals.total),
            order.items.len()
        )?;
    }
    if let Some(count) = outcome.count {
        writeln!(out, "items in cart: {count}")?;
    }

    widget.tick(Instant::now());
    if widget.page().is_visible(ids::CART_POPUP) {
        writeln!(
            out,
            "[popup] {}",
            widget.page().text(ids::CART_POPUP).unwrap_or_default()
        )?;
    }
    Ok(())
}

fn write_view(out: &mut impl Write, view: &CartView) -> Result<()> {
    if view.items.is_empty() {
        writeln!(out, "cart is empty")?;
    }
    for item in &view.items {
        writeln!(
            out,
            "{}  ₹{} × {}  = ₹{}",
            item.name,
            format_money(item.price),
            item.quantity,
            format_money(item.line_total())
        )?;
    }
    let totals = &view.totals;
    writeln!(out, "subtotal  {}", format_money(totals.subtotal))?;
    if totals.discount > 0.0 {
        writeln!(out, "discount  -{}", format_money(totals.discount))?;
    }
    writeln!(out, "tax       {}", format_money(totals.tax))?;
    writeln!(out, "shipping  0")?;
    writeln!(out, "total     {}", format_money(totals.total))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
