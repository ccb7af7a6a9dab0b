//! Integration tests for the AI waiter chat.

#![allow(clippy::indexing_slicing)]

use std::sync::Arc;

use fusion_core::ChatRole;
use fusion_integration_tests::{
    StubChat, TestContext, TestOptions, assert_redirect_home, configured_messaging,
};
use fusion_storefront::gemini::GeminiError;

fn with_chat(replies: Vec<Result<String, GeminiError>>, configured: bool) -> TestContext {
    TestContext::with_options(TestOptions {
        chat: Some(Arc::new(StubChat::with_replies(replies))),
        messaging: configured.then(configured_messaging),
        ..TestOptions::default()
    })
}

fn chat_contents(state: &serde_json::Value) -> Vec<String> {
    state["chat"]
        .as_array()
        .expect("chat array")
        .iter()
        .filter_map(|message| message["content"].as_str().map(String::from))
        .collect()
}

#[tokio::test]
async fn test_first_visit_shows_greeting() {
    let mut ctx = with_chat(vec![], false);

    let page = ctx.get_text("/").await;
    assert!(page.contains("Welcome to Fusion Food Lab!"));

    let state = ctx.get_json("/api/state").await;
    assert_eq!(state["chat_enabled"], true);
    let chat = state["chat"].as_array().expect("chat array");
    assert_eq!(chat.len(), 1);
    assert_eq!(chat[0]["role"], "assistant");
}

#[tokio::test]
async fn test_chat_turn_sends_full_history() {
    let mut ctx = with_chat(vec![Ok("The Quantum Burger is our bestseller.".to_string())], false);

    let response = ctx
        .post_form("/chat", "message=What+do+you+recommend%3F")
        .await;
    assert_redirect_home(&response);

    let chat = ctx.chat.clone().expect("stub chat");
    assert_eq!(chat.calls(), 1);
    let history = chat.last_history();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].role, ChatRole::User);
    assert!(history[0].content.contains("[ORDER_COMPLETE:"));
    assert!(history[0].content.contains("Quantum Burger ($12.99)"));
    assert_eq!(history[1].role, ChatRole::Assistant);
    assert_eq!(history[2].content, "What do you recommend?");

    let state = ctx.get_json("/api/state").await;
    let contents = chat_contents(&state);
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[1], "What do you recommend?");
    assert_eq!(contents[2], "The Quantum Burger is our bestseller.");
}

#[tokio::test]
async fn test_marker_reply_dispatches_order() {
    let mut ctx = with_chat(
        vec![Ok("Coming right up! \
                 [ORDER_COMPLETE: 2x Quantum Burger ($12.99), Total: $25.98]"
            .to_string())],
        true,
    );
    ctx.post_form("/cart/add", "item_id=8").await;

    ctx.post_form("/chat", "message=Two+burgers+please").await;

    assert_eq!(ctx.transport.calls(), 1);
    let sent = ctx.transport.sent();
    let body = &sent.first().expect("one message").body;
    assert!(body.starts_with("New Fusion Food Lab Order:\n2x Quantum Burger ($12.99), Total: $25.98"));

    let state = ctx.get_json("/api/state").await;
    let contents = chat_contents(&state);
    assert_eq!(contents.last().map(String::as_str), Some("Coming right up!"));
    assert_eq!(state["notice"]["level"], "success");
    assert_eq!(
        state["notice"]["text"],
        "Order placed! The kitchen has your order."
    );
    assert_eq!(state["cart"]["is_empty"], true);
}

#[tokio::test]
async fn test_marker_without_credentials_is_not_sent() {
    let mut ctx = with_chat(
        vec![Ok("Done! [ORDER_COMPLETE: 1x Nano Salad ($8.99), Total: $8.99]".to_string())],
        false,
    );
    ctx.post_form("/cart/add", "item_id=2").await;

    ctx.post_form("/chat", "message=One+salad").await;

    assert_eq!(ctx.transport.calls(), 0);
    let state = ctx.get_json("/api/state").await;
    assert_eq!(state["notice"]["level"], "error");
    assert_eq!(
        state["notice"]["text"],
        "Ordering via WhatsApp is not configured yet; please order at the counter."
    );
    assert_eq!(state["cart"]["item_count"], 1);
    assert_eq!(chat_contents(&state).last().map(String::as_str), Some("Done!"));
}

#[tokio::test]
async fn test_reply_without_marker_sends_nothing() {
    let mut ctx = with_chat(vec![Ok("Would you like a drink with that?".to_string())], true);

    ctx.post_form("/chat", "message=A+burger").await;

    assert_eq!(ctx.transport.calls(), 0);
    let state = ctx.get_json("/api/state").await;
    assert!(state["notice"].is_null());
}

#[tokio::test]
async fn test_model_failure_keeps_guest_message() {
    let mut ctx = with_chat(vec![Err(GeminiError::RateLimited)], true);

    let response = ctx.post_form("/chat", "message=Hello").await;
    assert_redirect_home(&response);

    let state = ctx.get_json("/api/state").await;
    let contents = chat_contents(&state);
    assert_eq!(contents.len(), 2);
    assert_eq!(contents[1], "Hello");
    assert_eq!(state["notice"]["level"], "error");
    assert_eq!(ctx.transport.calls(), 0);
}

#[tokio::test]
async fn test_blank_message_is_ignored() {
    let mut ctx = with_chat(vec![], false);

    let response = ctx.post_form("/chat", "message=+++").await;
    assert_redirect_home(&response);

    assert_eq!(ctx.chat.clone().expect("stub chat").calls(), 0);
}

#[tokio::test]
async fn test_chat_disabled_without_model() {
    let mut ctx = TestContext::new();

    let page = ctx.get_text("/").await;
    assert!(page.contains("The waiter is off duty."));

    let response = ctx.post_form("/chat", "message=Hello").await;
    assert_redirect_home(&response);

    let state = ctx.get_json("/api/state").await;
    assert_eq!(state["chat_enabled"], false);
    assert!(state["chat"].as_array().expect("chat array").is_empty());
    assert_eq!(state["notice"]["level"], "info");
    assert!(
        state["notice"]["text"]
            .as_str()
            .expect("notice text")
            .contains("GEMINI_API_KEY")
    );
}
