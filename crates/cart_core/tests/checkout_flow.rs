use cart_core::{ids, CartWidget, CouponOutcome, Page};
use shared::domain::{Product, ProductDescriptor, ShippingDetails};
use storage::{KeyValueStore, Storage};

#[tokio::test]
async fn listing_to_checkout_over_sqlite() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");

    let mut listing = CartWidget::mount(storage.clone(), Page::listing_page())
        .await
        .expect("mount listing");
    let lamp = ProductDescriptor {
        name: Some("Brass Lamp".into()),
        original_price: Some(1200.0),
        ..ProductDescriptor::default()
    };
    listing.handle_add_to_cart(&lamp).await.expect("add lamp");
    listing.handle_add_to_cart(&lamp).await.expect("add lamp again");
    listing
        .add_to_cart(Product::new("Jute Rug", 800.0, 1).with_image("images/rug.jpg"))
        .await
        .expect("add rug");
    assert_eq!(listing.page().text(ids::CART_TOTAL), Some("3"));

    // The cart page is a fresh mount over the same storage.
    let mut cart = CartWidget::mount(storage.clone(), Page::cart_page())
        .await
        .expect("mount cart");
    let view = cart.render_cart_items().await.expect("render");
    assert_eq!(view.items.len(), 2);
    assert_eq!(cart.page().text(ids::SUMMARY_SUBTOTAL), Some("3200.00"));
    assert_eq!(cart.page().text(ids::SUMMARY_TOTAL), Some("3520.00"));

    cart.page_mut().set_value(ids::COUPON_CODE, "SHOP10");
    assert!(matches!(cart.apply_coupon(), CouponOutcome::Applied(_)));
    // 1.1 x (3200 x 0.9)
    assert_eq!(cart.page().text(ids::SUMMARY_TOTAL), Some("3168.00"));

    cart.fill_shipping_details(&ShippingDetails {
        full_name: "Ravi Kumar".into(),
        email: "ravi@example.com".into(),
        address: "4 MG Road, Bengaluru".into(),
    });
    let order = cart
        .place_order()
        .await
        .expect("place")
        .expect("order placed");
    assert_eq!(order.items.len(), 2);
    assert_eq!(storage.get_item("cart").await.expect("get"), None);
}
