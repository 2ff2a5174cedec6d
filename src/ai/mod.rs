//! AI service integration for streamed content generation
//!
//! Provides the provider-agnostic generation trait, the Gemini
//! implementation, and a scriptable mock for tests.

pub mod gemini;
pub mod media;
pub mod mock;

pub use gemini::GeminiGenerationClient;
pub use mock::MockGenerationClient;

use crate::models::GenerationRequest;
use crate::Result;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// A finite, single-pass stream of generated text fragments.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Open a streaming generation call for the given request.
    ///
    /// Errors raised while opening the stream carry the provider's status
    /// code when one is available, so callers can classify rate limiting.
    async fn stream_generate(&self, request: &GenerationRequest) -> Result<TextStream>;
}
