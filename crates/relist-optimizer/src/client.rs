//! HTTP client for the generative text/image service.
//!
//! Speaks the `generateContent` REST shape: a prompt (plus optional
//! inline reference image) goes in as content parts, and the response
//! carries candidate parts that are either text or inline base64 image
//! data. Both endpoints are rate limited; every call runs under the
//! crate's [`RetryPolicy`], and a short fixed delay follows every
//! successful call so the next one does not trip the limiter.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::OptimizerError;
use crate::retry::RetryPolicy;

/// An inline image payload: base64 data plus its MIME type.
#[derive(Debug, Clone)]
pub struct InlinePart {
    pub mime_type: String,
    /// Base64-encoded binary.
    pub data: String,
}

/// Client for the generative content/image service.
pub struct GenAiClient {
    http: Client,
    api_key: String,
    base_url: String,
    text_model: String,
    image_model: String,
    policy: RetryPolicy,
    post_call_delay_ms: u64,
}

impl GenAiClient {
    /// Creates a client.
    ///
    /// `base_url` is the service root (point it at a mock server in
    /// tests); `api_key` must be non-empty.
    ///
    /// # Errors
    ///
    /// - [`OptimizerError::MissingApiKey`] — empty `api_key`.
    /// - [`OptimizerError::Http`] — the underlying `reqwest::Client`
    ///   cannot be constructed.
    pub fn new(
        api_key: &str,
        base_url: &str,
        text_model: &str,
        image_model: &str,
        timeout_secs: u64,
        policy: RetryPolicy,
        post_call_delay_ms: u64,
    ) -> Result<Self, OptimizerError> {
        if api_key.is_empty() {
            return Err(OptimizerError::MissingApiKey);
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            text_model: text_model.to_owned(),
            image_model: image_model.to_owned(),
            policy,
            post_call_delay_ms,
        })
    }

    /// Builds a client from the application config.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizerError::MissingApiKey`] when no key is
    /// configured — callers surface this before processing any product.
    pub fn from_app_config(config: &relist_core::AppConfig) -> Result<Self, OptimizerError> {
        let api_key = config
            .ai_api_key
            .as_deref()
            .ok_or(OptimizerError::MissingApiKey)?;
        Self::new(
            api_key,
            &config.ai_base_url,
            &config.ai_text_model,
            &config.ai_image_model,
            config.ai_request_timeout_secs,
            RetryPolicy::new(config.ai_max_retries, config.ai_retry_backoff_base_ms),
            config.ai_post_call_delay_ms,
        )
    }

    /// Generates text for a single prompt.
    ///
    /// Concatenates every text part of the first candidate.
    ///
    /// # Errors
    ///
    /// - [`OptimizerError::RateLimited`] — HTTP 429 after all retries.
    /// - [`OptimizerError::Api`] — any other non-2xx status after retries.
    /// - [`OptimizerError::Deserialize`] — unexpected response shape.
    /// - [`OptimizerError::EmptyResponse`] — no candidate text came back.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, OptimizerError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        let response = self
            .policy
            .run(|| self.post_generate(&self.text_model, &body, "text generation"))
            .await?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(OptimizerError::EmptyResponse {
                context: "text generation".to_owned(),
            });
        }

        self.cooperative_delay().await;
        Ok(text)
    }

    /// Generates (or edits) an image for a prompt, optionally seeded
    /// with an inline reference image. Returns every inline image part
    /// of the first candidate.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::generate_text`];
    /// [`OptimizerError::EmptyResponse`] when no image parts came back.
    pub async fn generate_image(
        &self,
        prompt: &str,
        reference: Option<&InlinePart>,
    ) -> Result<Vec<InlinePart>, OptimizerError> {
        let mut parts = vec![json!({ "text": prompt })];
        if let Some(image) = reference {
            parts.push(json!({
                "inlineData": { "mimeType": image.mime_type, "data": image.data }
            }));
        }
        let body = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] }
        });

        let response = self
            .policy
            .run(|| self.post_generate(&self.image_model, &body, "image generation"))
            .await?;

        let images: Vec<InlinePart> = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.inline_data)
                    .map(|d| InlinePart {
                        mime_type: d.mime_type,
                        data: d.data,
                    })
                    .collect()
            })
            .unwrap_or_default();

        if images.is_empty() {
            return Err(OptimizerError::EmptyResponse {
                context: "image generation".to_owned(),
            });
        }

        self.cooperative_delay().await;
        Ok(images)
    }

    /// One POST to a model's `generateContent` endpoint with typed
    /// status handling.
    async fn post_generate(
        &self,
        model: &str,
        body: &serde_json::Value,
        context: &str,
    ) -> Result<GenerateContentResponse, OptimizerError> {
        let url = format!("{}/models/{model}:generateContent", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(30);
            return Err(OptimizerError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OptimizerError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<GenerateContentResponse>(&body).map_err(|e| {
            OptimizerError::Deserialize {
                context: context.to_owned(),
                source: e,
            }
        })
    }

    /// Fixed pause after a successful call. The service meters requests
    /// per minute; spacing calls out proactively avoids burning the
    /// retry budget on self-inflicted 429s.
    async fn cooperative_delay(&self) {
        if self.post_call_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.post_call_delay_ms)).await;
        }
    }
}

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Part {
    text: Option<String>,
    #[serde(rename = "inlineData")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}
