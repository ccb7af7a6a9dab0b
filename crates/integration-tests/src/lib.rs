//! Integration tests for Fusion Food Lab.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fusion-integration-tests
//! ```
//!
//! Tests drive the full storefront router in-process with stub chat and
//! messaging backends, so no network access or API keys are needed.
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart forms and the JSON views
//! - `checkout` - WhatsApp dispatch with and without credentials
//! - `waiter_chat` - AI waiter turns and marker-driven orders
//! - `pages` - Health, pages, headers and session reset
//! - `concurrent_requests` - Overlapping requests from one guest

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use fusion_core::{ConversationMessage, MenuCatalog, WhatsAppAddress};
use fusion_storefront::config::{FusionConfig, MessagingConfig};
use fusion_storefront::gemini::{ChatCompletion, GeminiError};
use fusion_storefront::state::AppState;
use fusion_storefront::twilio::{MessageTransport, OutboundMessage, TwilioAccount, TwilioError};
use secrecy::SecretString;
use tower::ServiceExt;

/// Chat model stub replaying canned replies.
#[derive(Default)]
pub struct StubChat {
    replies: Mutex<VecDeque<Result<String, GeminiError>>>,
    calls: AtomicUsize,
    last_history: Mutex<Vec<ConversationMessage>>,
    delay: Option<Duration>,
}

impl StubChat {
    /// Queue replies in the order they should be returned.
    #[must_use]
    pub fn with_replies(replies: Vec<Result<String, GeminiError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    /// Wait this long before answering each completion.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of completions requested.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// History passed to the most recent completion.
    pub fn last_history(&self) -> Vec<ConversationMessage> {
        self.last_history.lock().expect("history lock").clone()
    }
}

#[async_trait]
impl ChatCompletion for StubChat {
    async fn complete(&self, history: &[ConversationMessage]) -> Result<String, GeminiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_history.lock().expect("history lock") = history.to_vec();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| Ok("Anything else?".to_string()))
    }
}

/// Messaging stub recording every send.
#[derive(Default)]
pub struct StubTransport {
    calls: AtomicUsize,
    sent: Mutex<Vec<OutboundMessage>>,
    reject_with: Option<String>,
}

impl StubTransport {
    /// A transport whose provider rejects every message.
    #[must_use]
    pub fn rejecting(message: &str) -> Self {
        Self {
            reject_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Number of send attempts.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Messages handed to the transport, in order.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().expect("sent lock").clone()
    }
}

#[async_trait]
impl MessageTransport for StubTransport {
    async fn send(
        &self,
        _account: &TwilioAccount,
        message: &OutboundMessage,
    ) -> Result<String, TwilioError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().expect("sent lock").push(message.clone());
        match &self.reject_with {
            Some(reason) => Err(TwilioError::Api {
                code: Some(63016),
                message: reason.clone(),
            }),
            None => Ok("SM0123456789".to_string()),
        }
    }
}

/// Complete Twilio credentials pointing at test numbers.
///
/// # Panics
///
/// Panics if the hard-coded numbers stop parsing.
#[must_use]
pub fn configured_messaging() -> MessagingConfig {
    MessagingConfig {
        account_sid: Some("AC0000000000".to_string()),
        auth_token: Some(SecretString::from("test-token")),
        from_number: Some(WhatsAppAddress::parse("+14155238886").expect("valid sender")),
        to_number: Some(WhatsAppAddress::parse("+919876543210").expect("valid restaurant")),
    }
}

/// Options for building a [`TestContext`].
#[derive(Default)]
pub struct TestOptions {
    pub chat: Option<Arc<StubChat>>,
    pub transport: Option<Arc<StubTransport>>,
    pub messaging: Option<MessagingConfig>,
}

/// An in-process storefront plus one guest's session cookie.
pub struct TestContext {
    router: Router,
    cookie: Option<String>,
    pub chat: Option<Arc<StubChat>>,
    pub transport: Arc<StubTransport>,
}

impl TestContext {
    /// Storefront with chat disabled and messaging not configured.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(TestOptions::default())
    }

    /// Storefront built from explicit stubs and credentials.
    #[must_use]
    pub fn with_options(options: TestOptions) -> Self {
        let transport = options.transport.unwrap_or_default();
        let config = FusionConfig {
            messaging: options.messaging.unwrap_or_default(),
            ..FusionConfig::default()
        };
        let chat: Option<Arc<dyn ChatCompletion>> = options
            .chat
            .clone()
            .map(|chat| chat as Arc<dyn ChatCompletion>);

        let state = AppState::with_backends(
            config,
            MenuCatalog::fusion_food_lab(),
            chat,
            transport.clone(),
        );

        Self {
            router: fusion_storefront::app(state),
            cookie: None,
            chat: options.chat,
            transport,
        }
    }

    /// Send a GET request as this guest.
    pub async fn get(&mut self, path: &str) -> Response<Body> {
        let request = self
            .request("GET", path)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }

    /// Send a form POST as this guest.
    pub async fn post_form(&mut self, path: &str, form: &str) -> Response<Body> {
        let request = self
            .request("POST", path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .expect("valid request");
        self.send(request).await
    }

    /// GET a path and return the body as text, asserting 200.
    pub async fn get_text(&mut self, path: &str) -> String {
        let response = self.get(path).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {path}");
        body_text(response).await
    }

    /// GET a path and parse the body as JSON, asserting 200.
    pub async fn get_json(&mut self, path: &str) -> serde_json::Value {
        let text = self.get_text(path).await;
        serde_json::from_str(&text).expect("valid JSON body")
    }

    /// A second handle on the same guest, as another browser tab would be.
    ///
    /// Both handles share the router, the stubs and the current cookie, so
    /// their requests can run concurrently.
    #[must_use]
    pub fn same_guest(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: self.cookie.clone(),
            chat: self.chat.clone(),
            transport: self.transport.clone(),
        }
    }

    /// Whether this guest holds a session cookie.
    #[must_use]
    pub const fn has_cookie(&self) -> bool {
        self.cookie.is_some()
    }

    /// Forget the session cookie, as a new browser would.
    pub fn drop_cookie(&mut self) {
        self.cookie = None;
    }

    fn request(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(path);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> Response<Body> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
        {
            let pair = set_cookie.split(';').next().unwrap_or_default().trim();
            if pair.ends_with('=') {
                self.cookie = None;
            } else {
                self.cookie = Some(pair.to_string());
            }
        }

        response
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect a response body as UTF-8 text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    String::from_utf8(bytes.to_vec()).expect("UTF-8 body")
}

/// Assert a redirect back to the ordering page.
///
/// # Panics
///
/// Panics if the response is not a 303 to `/`.
pub fn assert_redirect_home(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some("/")
    );
}
