//! Gemini API client
//!
//! One outbound generateContent call per classified message, no retries, no
//! streaming. Failures are classified into [`GenerationError`] kinds so the
//! web layer can answer each one distinctly.
//! Uses a long-lived reqwest::Client for connection pooling.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

/// Model used when GEMINI_MODEL is not set.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Round-trip deadline for one generation call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Classified failure from the generation API.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request timed out")]
    Timeout,

    #[error("generation API rejected credentials: {0}")]
    Auth(String),

    #[error("generation API quota exhausted: {0}")]
    Quota(String),

    #[error("generation API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("failed to reach generation API: {0}")]
    Transport(String),

    #[error("malformed generation response: {0}")]
    MalformedResponse(String),
}

/// Seam for the generation call, so the pipeline can be exercised without
/// network access.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Reusable Gemini client (connection-pooled).
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL.to_string())
    }

    pub fn with_model(api_key: String, model: String) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if self.api_key.is_empty() {
            return Err(GenerationError::Auth(
                "GEMINI_API_KEY not configured".to_string(),
            ));
        }

        let url = format!(
            "{}/{}:generateContent?key={}",
            BASE_URL, self.model, self.api_key
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.3,
                top_p: 0.9,
                top_k: 40,
                max_output_tokens: 1024,
            },
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: SYSTEM_PROMPT.to_string(),
                }],
            },
        };

        info!(model = %self.model, "calling Gemini API");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Gemini API error response ({}): {}", status, body);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::Auth(body),
                StatusCode::TOO_MANY_REQUESTS => GenerationError::Quota(body),
                _ => GenerationError::Api {
                    status: status.as_u16(),
                    message: body,
                },
            });
        }

        let decoded: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        let answer = decoded
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.clone())
            .ok_or_else(|| {
                GenerationError::MalformedResponse("no candidates returned".to_string())
            })?;

        info!(chars = answer.len(), "Gemini response received");

        Ok(answer)
    }
}

fn classify_transport(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Timeout
    } else {
        error!("Gemini API request failed: {}", err);
        GenerationError::Transport(err.to_string())
    }
}

const SYSTEM_PROMPT: &str = "You are a personal budgeting assistant.\n\
\n\
Guidelines:\n\
- Give practical, itemized financial guidance\n\
- Be structured and concise\n\
- Use plain language and concrete numbers where possible\n\
- Never present projections as guaranteed outcomes\n\
\n\
Format: Provide structured answers suitable for everyday financial decisions.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    system_instruction: SystemInstruction,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: i32,
    max_output_tokens: i32,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}
