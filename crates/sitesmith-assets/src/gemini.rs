//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::traits::{GenerateError, GeneratedImage, GenerativeClient};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// Credentials and model names, read once from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub image_model: String,
    pub text_model: String,
    pub timeout: Duration,
}

impl GeminiSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. The first non-empty key wins.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| lookup(key))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };

        let timeout = pick(&["GEMINI_TIMEOUT_SECS"])
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            api_key: pick(&["GEMINI_API_KEY", "GOOGLE_API_KEY"]),
            endpoint: pick(&["GEMINI_ENDPOINT"]).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            image_model: pick(&["GEMINI_IMAGE_MODEL", "GEMINI_MODEL_IMAGE"])
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            text_model: pick(&["GEMINI_TEXT_MODEL", "GEMINI_MODEL_TEXT", "GEMINI_MODEL"])
                .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            timeout: Duration::from_secs(timeout),
        }
    }
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: String,
    data: String,
}

impl GenerateResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
    }
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: Client,
    api_key: String,
    settings: GeminiSettings,
}

impl GeminiClient {
    /// Fails with [`GenerateError::MissingCredential`] when no key is configured.
    pub fn new(settings: GeminiSettings) -> Result<Self, GenerateError> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or(GenerateError::MissingCredential)?;

        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| GenerateError::Request(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            settings,
        })
    }

    pub fn settings(&self) -> &GeminiSettings {
        &self.settings
    }

    fn url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.endpoint.trim_end_matches('/'),
            model
        )
    }

    async fn generate(
        &self,
        model: &str,
        payload: Value,
    ) -> Result<GenerateResponse, GenerateError> {
        let response = self
            .http
            .post(self.url(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| GenerateError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Status {
                status: status.as_u16(),
                body: truncate(&body, 320),
            });
        }

        response
            .json::<GenerateResponse>()
            .await
            .map_err(|e| GenerateError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, GenerateError> {
        let payload = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] }
        });

        let response = self.generate(&self.settings.image_model, payload).await?;
        let inline = response
            .parts()
            .find_map(|p| p.inline_data.as_ref())
            .ok_or_else(|| GenerateError::Malformed("no inline image data".to_string()))?;

        let bytes = STANDARD
            .decode(inline.data.trim())
            .map_err(|e| GenerateError::Decode(e.to_string()))?;

        Ok(GeneratedImage {
            mime_type: inline.mime_type.clone(),
            bytes,
        })
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, GenerateError> {
        let payload = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        let response = self.generate(&self.settings.text_model, payload).await?;
        let text = response
            .parts()
            .filter_map(|p| p.text.as_deref())
            .map(str::trim)
            .find(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or_else(|| GenerateError::Malformed("no text in response".to_string()));
        text
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
