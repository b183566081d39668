use super::*;
use cart_core::Page;
use storage::MemoryStore;

fn catalog() -> Vec<ProductDescriptor> {
    vec![
        ProductDescriptor {
            name: Some("Brass Lamp".into()),
            original_price: Some(1200.0),
            ..ProductDescriptor::default()
        },
        ProductDescriptor {
            name: Some("Jute Rug".into()),
            image: Some("images/rug.jpg".into()),
            original_price: Some(999.0),
            discounted_price: Some(799.0),
            quantity: None,
        },
    ]
}

async fn widget() -> CartWidget<MemoryStore> {
    CartWidget::mount(MemoryStore::new(), Page::cart_page())
        .await
        .expect("mount")
}

fn rendered(widget: &mut CartWidget<MemoryStore>, outcome: &Outcome) -> String {
    let mut out = Vec::new();
    report(&mut out, widget, outcome).expect("report");
    String::from_utf8(out).expect("utf8")
}

#[tokio::test]
async fn add_accepts_price_labels() {
    let mut widget = widget().await;
    let outcome = run_action(
        &mut widget,
        &[],
        Action::Add {
            name: "Kurta".into(),
            price: "₹1,299".into(),
            quantity: 2,
            image: None,
        },
    )
    .await
    .expect("add");

    assert_eq!(widget.store().items()[0].price, 1299.0);
    let text = rendered(&mut widget, &outcome);
    assert!(text.contains("items in cart: 2"), "{text}");
    assert!(text.contains("[popup] Kurta added to cart"), "{text}");
}

#[tokio::test]
async fn add_with_unreadable_price_alerts() {
    let mut widget = widget().await;
    let outcome = run_action(
        &mut widget,
        &[],
        Action::Add {
            name: "Kurta".into(),
            price: "free".into(),
            quantity: 1,
            image: None,
        },
    )
    .await
    .expect("handled");

    let text = rendered(&mut widget, &outcome);
    assert!(
        text.contains("[alert] Product data is invalid. Please try again."),
        "{text}"
    );
    assert!(!text.contains("[popup]"), "{text}");
}

#[tokio::test]
async fn buy_finds_catalog_product_case_insensitively() {
    let mut widget = widget().await;
    run_action(
        &mut widget,
        &catalog(),
        Action::Buy {
            product: "jute rug".into(),
            quantity: Some(3),
        },
    )
    .await
    .expect("buy");

    let line = &widget.store().items()[0];
    assert_eq!(line.name, "Jute Rug");
    assert_eq!(line.price, 799.0);
    assert_eq!(line.quantity, 3);

    let missing = run_action(
        &mut widget,
        &catalog(),
        Action::Buy {
            product: "Teapot".into(),
            quantity: None,
        },
    )
    .await;
    assert!(missing.is_err());
}

#[tokio::test]
async fn catalog_lists_discounts() {
    let mut widget = widget().await;
    let outcome = run_action(&mut widget, &catalog(), Action::Catalog)
        .await
        .expect("catalog");
    assert_eq!(
        outcome.lines,
        vec![
            "Brass Lamp  ₹1200.00".to_string(),
            "Jute Rug  ₹799.00 (was ₹999.00)".to_string(),
        ]
    );
}

#[tokio::test]
async fn coupon_in_fresh_invocation_renders_summary_first() {
    let mut widget = widget().await;
    widget
        .add_to_cart(Product::new("A", 100.0, 2))
        .await
        .expect("add");

    let outcome = run_action(
        &mut widget,
        &[],
        Action::Coupon {
            code: "SHOP10".into(),
        },
    )
    .await
    .expect("coupon");

    let text = rendered(&mut widget, &outcome);
    assert!(text.contains("Coupon applied! You saved 10%"), "{text}");
    assert!(text.contains("tax 18.00  total 198.00"), "{text}");
}

#[tokio::test]
async fn set_qty_and_show_print_the_cart() {
    let mut widget = widget().await;
    widget
        .add_to_cart(Product::new("A", 100.0, 2))
        .await
        .expect("add");

    let outcome = run_action(
        &mut widget,
        &[],
        Action::SetQty {
            name: "A".into(),
            quantity: "4".into(),
        },
    )
    .await
    .expect("set qty");
    let text = rendered(&mut widget, &outcome);
    assert!(text.contains("A  ₹100.00 × 4  = ₹400.00"), "{text}");
    assert!(text.contains("total     440.00"), "{text}");

    let ignored = run_action(
        &mut widget,
        &[],
        Action::SetQty {
            name: "A".into(),
            quantity: "zero".into(),
        },
    )
    .await
    .expect("ignored");
    assert!(ignored.view.is_none());
    assert_eq!(widget.store().items()[0].quantity, 4);
}

#[tokio::test]
async fn order_requires_every_shipping_field() {
    let mut widget = widget().await;
    widget
        .add_to_cart(Product::new("A", 100.0, 2))
        .await
        .expect("add");

    let outcome = run_action(
        &mut widget,
        &[],
        Action::Order {
            name: "Asha".into(),
            email: String::new(),
            address: "Kolkata".into(),
        },
    )
    .await
    .expect("handled");
    assert!(outcome.order.is_none());
    let text = rendered(&mut widget, &outcome);
    assert!(text.contains("[alert] Please fill out the required shipping information."));

    let outcome = run_action(
        &mut widget,
        &[],
        Action::Order {
            name: "Asha".into(),
            email: "asha@example.com".into(),
            address: "Kolkata".into(),
        },
    )
    .await
    .expect("placed");
    let text = rendered(&mut widget, &outcome);
    assert!(text.contains("[alert] Order placed successfully!"), "{text}");
    assert!(text.contains("for ₹220.00 (1 lines)"), "{text}");
    assert!(widget.store().items().is_empty());
}
