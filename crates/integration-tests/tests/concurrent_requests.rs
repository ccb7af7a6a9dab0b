//! Integration tests for overlapping requests from one guest.

use std::sync::Arc;
use std::time::Duration;

use fusion_integration_tests::{
    StubChat, TestContext, TestOptions, assert_redirect_home, configured_messaging,
};

#[tokio::test]
async fn test_cart_change_during_slow_chat_turn_is_kept() {
    let chat = StubChat::with_replies(vec![Ok("Let me think about that.".to_string())])
        .with_delay(Duration::from_millis(300));
    let mut ctx = TestContext::with_options(TestOptions {
        chat: Some(Arc::new(chat)),
        ..TestOptions::default()
    });
    ctx.get_text("/").await;
    assert!(ctx.has_cookie());
    let mut other_tab = ctx.same_guest();

    let chat_turn = ctx.post_form("/chat", "message=What+is+good+today%3F");
    let cart_add = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        other_tab.post_form("/cart/add", "item_id=1").await
    };
    let (chat_response, add_response) = tokio::join!(chat_turn, cart_add);
    assert_redirect_home(&chat_response);
    assert_redirect_home(&add_response);

    let state = ctx.get_json("/api/state").await;
    assert_eq!(state["cart"]["item_count"], 1);
    let chat = state["chat"].as_array().expect("chat array");
    assert_eq!(
        chat.last().and_then(|message| message["content"].as_str()),
        Some("Let me think about that.")
    );
}

#[tokio::test]
async fn test_double_checkout_sends_once() {
    let mut ctx = TestContext::with_options(TestOptions {
        messaging: Some(configured_messaging()),
        ..TestOptions::default()
    });
    ctx.post_form("/cart/add", "item_id=1&quantity=2").await;
    let mut other_tab = ctx.same_guest();

    let (first, second) = tokio::join!(
        ctx.post_form("/checkout", ""),
        other_tab.post_form("/checkout", "")
    );
    assert_redirect_home(&first);
    assert_redirect_home(&second);

    assert_eq!(ctx.transport.calls(), 1);
    let state = ctx.get_json("/api/state").await;
    assert_eq!(state["cart"]["is_empty"], true);
}

#[tokio::test]
async fn test_other_guests_are_not_blocked() {
    let chat = StubChat::default().with_delay(Duration::from_millis(500));
    let mut ctx = TestContext::with_options(TestOptions {
        chat: Some(Arc::new(chat)),
        ..TestOptions::default()
    });
    ctx.get_text("/").await;
    let mut stranger = ctx.same_guest();
    stranger.drop_cookie();

    let chat_turn = ctx.post_form("/chat", "message=Hello");
    let stranger_add = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        tokio::time::timeout(
            Duration::from_millis(300),
            stranger.post_form("/cart/add", "item_id=2"),
        )
        .await
    };
    let (chat_response, add_result) = tokio::join!(chat_turn, stranger_add);
    assert_redirect_home(&chat_response);
    let add_response = add_result.expect("other guest was not held up");
    assert_redirect_home(&add_response);
}
