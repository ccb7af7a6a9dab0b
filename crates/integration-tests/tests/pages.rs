//! Integration tests for pages, middleware and session reset.

use axum::http::StatusCode;
use fusion_integration_tests::{TestContext, assert_redirect_home, body_text};

#[tokio::test]
async fn test_health() {
    let mut ctx = TestContext::new();
    let response = ctx.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_home_lists_menu_by_category() {
    let mut ctx = TestContext::new();
    let page = ctx.get_text("/").await;

    assert!(page.contains("<h1>Fusion Food Lab</h1>"));
    for heading in ["Mains", "Salads", "Sides", "Drinks"] {
        assert!(page.contains(&format!("<h3>{heading}</h3>")), "{heading}");
    }
    assert!(page.contains("Quantum Burger"));
    assert!(page.contains("$12.99"));
    assert!(page.contains("Your cart is empty."));
    assert!(page.contains("orders are logged only"));
}

#[tokio::test]
async fn test_home_shows_cart_lines() {
    let mut ctx = TestContext::new();
    ctx.post_form("/cart/add", "item_id=6&quantity=2").await;

    let page = ctx.get_text("/").await;
    assert!(page.contains("Truffle Fries"));
    assert!(page.contains("Total: $16.00"));
    assert!(page.contains("action=\"/checkout\""));
}

#[tokio::test]
async fn test_security_headers_present() {
    let mut ctx = TestContext::new();
    let response = ctx.get("/").await;
    let headers = response.headers();

    assert_eq!(headers.get("x-frame-options").expect("frame options"), "DENY");
    assert_eq!(
        headers
            .get("x-content-type-options")
            .expect("content type options"),
        "nosniff"
    );
    let csp = headers
        .get("content-security-policy")
        .and_then(|value| value.to_str().ok())
        .expect("csp header");
    assert!(csp.contains("default-src 'none'"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let mut ctx = TestContext::new();
    let response = ctx.get("/health").await;
    let id = response
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .expect("request id header");
    assert!(!id.is_empty());
}

#[tokio::test]
async fn test_session_reset_forgets_cart() {
    let mut ctx = TestContext::new();
    ctx.post_form("/cart/add", "item_id=1&quantity=3").await;

    let response = ctx.post_form("/session/reset", "").await;
    assert_redirect_home(&response);

    let state = ctx.get_json("/api/state").await;
    assert_eq!(state["cart"]["is_empty"], true);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let mut ctx = TestContext::new();
    let response = ctx.get("/products").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_browsing_does_not_create_session() {
    let mut ctx = TestContext::new();

    let response = ctx.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("set-cookie").is_none());
    ctx.get_json("/api/state").await;
    assert!(!ctx.has_cookie());

    ctx.post_form("/cart/add", "item_id=1").await;
    assert!(ctx.has_cookie());
}
