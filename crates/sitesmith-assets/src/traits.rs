//! Trait definitions for generative services.

use async_trait::async_trait;

/// Raw image returned by a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// MIME type reported by the service, if any
    pub mime_type: String,

    /// Encoded image bytes
    pub bytes: Vec<u8>,
}

/// Errors that can occur when calling a generative service.
///
/// None of these are fatal to a bootstrap run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("No API key configured (set GEMINI_API_KEY or GOOGLE_API_KEY)")]
    MissingCredential,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Could not decode image: {0}")]
    Decode(String),
}

/// A service that turns text prompts into images or text.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Generate one image for `prompt`.
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, GenerateError>;

    /// Generate text for `prompt`.
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerateError>;
}
