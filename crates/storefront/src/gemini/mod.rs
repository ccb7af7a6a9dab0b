//! Gemini integration for the AI waiter.
//!
//! This module provides:
//! - [`ChatCompletion`], the seam the waiter service talks to
//! - [`GeminiClient`], its implementation over the `generateContent` API
//! - Request and response types for that API

mod client;
mod error;
mod types;

use async_trait::async_trait;
use fusion_core::ConversationMessage;

pub use client::GeminiClient;
pub use error::{ApiError, ApiErrorResponse, GeminiError};
pub use types::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
    UsageMetadata,
};

/// A chat model that turns a conversation into the next assistant reply.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Produce the assistant's reply to the full history.
    async fn complete(&self, history: &[ConversationMessage]) -> Result<String, GeminiError>;
}
