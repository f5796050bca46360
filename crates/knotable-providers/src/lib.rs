//! Provider adapters for external LLM services.
//!
//! Each adapter performs exactly one request/response round trip against
//! its vendor and normalizes the outcome: generated text on success, a
//! classified taxonomy error on failure. Retry across providers is the
//! routing policy's job, never the adapter's.

/// Shared vendor failure classification.
mod classify;
/// Anthropic Claude provider implementation.
pub mod claude;
/// Google Gemini provider implementation.
pub mod gemini;
/// Groq provider implementation.
pub mod groq;
/// Mock provider for tests.
pub mod mock;
/// OpenAI provider implementation.
pub mod openai;

pub use claude::ClaudeProvider;
pub use gemini::GeminiProvider;
pub use groq::GroqProvider;
pub use mock::{MOCK_LATENCY_MS, MockProvider};
pub use openai::OpenAiProvider;
