//! End-to-end tests for the session cart.

use reqwest::StatusCode;

use cart_widget_integration_tests::{TestContext, new_client};

fn total_of(body: &str) -> &str {
    let start = body
        .find(r#"<span id="cart-total">"#)
        .expect("cart page has no total")
        + r#"<span id="cart-total">"#.len();
    let rest = body.get(start..).expect("total out of range");
    rest.split('<').next().expect("unterminated total")
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_home_renders_add_buttons() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("add-to-cart-btn"));
    assert!(body.contains(r#"data-id="p1""#));
    assert!(body.contains(r#"data-price="24.5""#));
    assert!(body.contains("$24.50"));
    assert!(body.contains(r#"id="view-cart-button""#));
    assert!(body.contains("View cart (0)"));
}

#[tokio::test]
async fn test_add_same_product_twice_merges_line() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.add_to_cart("p1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Widget has been added to the cart!"));

    let (_, body) = ctx.add_to_cart("p1").await;
    assert!(body.contains("View cart (2)"));

    let (status, cart) = ctx.get("/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(total_of(&cart), "19.98");
    assert_eq!(cart.matches(r#"class="cart-row""#).count(), 1);
    assert!(cart.contains(r#"name="quantity" value="2""#));
    // Notices are shown once.
    assert!(!cart.contains("has been added to the cart!"));
}

#[tokio::test]
async fn test_add_with_missing_data_is_rejected() {
    let ctx = TestContext::new().await;
    let (status, _) = ctx
        .post_form("/cart/add", &[("id", "p1"), ("name", "Widget")])
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, cart) = ctx.get("/cart").await;
    assert!(cart.contains("Your cart is empty."));
    assert_eq!(total_of(&cart), "0.00");
}

#[tokio::test]
async fn test_update_quantity_and_remove() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart("p1").await;
    ctx.add_to_cart("p2").await;

    let (status, cart) = ctx
        .post_form("/cart/update", &[("id", "p1"), ("quantity", "3")])
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(total_of(&cart), "54.47");

    let (_, cart) = ctx
        .post_form("/cart/update", &[("id", "p2"), ("quantity", "0")])
        .await;
    assert!(!cart.contains("Gadget"));
    assert_eq!(total_of(&cart), "29.97");

    let (_, cart) = ctx.post_form("/cart/remove", &[("id", "p1")]).await;
    assert!(cart.contains("Your cart is empty."));
    assert_eq!(total_of(&cart), "0.00");
}

#[tokio::test]
async fn test_update_with_unparseable_quantity_keeps_line() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart("p1").await;

    let (status, cart) = ctx
        .post_form("/cart/update", &[("id", "p1"), ("quantity", "lots")])
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(total_of(&cart), "9.99");

    let (_, cart) = ctx
        .post_form("/cart/update", &[("id", "p1"), ("quantity", "4 boxes")])
        .await;
    assert_eq!(total_of(&cart), "39.96");
}

#[tokio::test]
async fn test_checkout_empty_cart_shows_notice() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.post_form("/checkout", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Your cart is empty. Add some products before checking out."));
}

#[tokio::test]
async fn test_checkout_reports_total_and_clears_cart() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart("p1").await;
    ctx.add_to_cart("p1").await;

    let (status, body) = ctx.post_form("/checkout", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Total to pay: $19.98. Thank you for your purchase!"));
    assert!(body.contains("Your cart is empty."));
    assert_eq!(total_of(&body), "0.00");
    assert!(body.contains("View cart (0)"));
}

#[tokio::test]
async fn test_huge_price_is_rejected_without_breaking_cart() {
    let ctx = TestContext::new().await;
    let vault = [
        ("id", "max"),
        ("name", "Vault"),
        ("price", "79228162514264337593543950335"),
        ("image", "/static/images/widget.svg"),
    ];

    let (status, _) = ctx.post_form("/cart/add", &vault).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx.post_form("/cart/add", &vault).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, cart) = ctx.get("/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert!(cart.contains(r#"name="quantity" value="1""#));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let ctx = TestContext::new().await;
    let (status, _) = ctx.get("/no-such-page").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_carts_are_per_session() {
    let ctx = TestContext::new().await;
    ctx.add_to_cart("p1").await;

    let other = new_client();
    let body = other
        .get(ctx.url("/cart"))
        .send()
        .await
        .expect("Request failed")
        .text()
        .await
        .expect("Failed to read response");
    assert!(body.contains("Your cart is empty."));

    let (_, mine) = ctx.get("/cart").await;
    assert_eq!(total_of(&mine), "9.99");
}
