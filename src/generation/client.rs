use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::error_handling::types::GenerationError;

/// One structured-output request: a prompt carrying its own schema
/// description plus sampling parameters.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub stop_sequences: Vec<String>,
}

/// Interface to the external text-completion provider.
///
/// Implementations return the raw model text; callers are responsible for
/// parsing it as JSON matching the schema the prompt requested.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}

// Wire types for the Gemini generateContent REST protocol.

#[derive(Debug, Serialize)]
struct GenerateContentBody {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    stop_sequences: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

fn response_text(response: GenerateContentResponse) -> Result<String, GenerationError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();
    if text.is_empty() {
        return Err(GenerationError::BadResponse(
            "response carried no candidate text".into(),
        ));
    }
    Ok(text)
}

/// Gemini `generateContent` client.
///
/// The per-call deadline is enforced here; the original design relied only on
/// the provider's output-length cap and could hang a request indefinitely.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(endpoint: String, model: String, api_key: String, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            model,
            api_key,
            timeout,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let body = GenerateContentBody {
            contents: vec![Content {
                role: "user".into(),
                parts: vec![Part {
                    text: request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
                stop_sequences: request.stop_sequences,
            },
        };

        // The deadline covers the whole exchange, body read included; a
        // backend that answers headers and then stalls the body still times
        // out.
        let call = async {
            let response = self
                .http
                .post(self.url())
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| {
                    error!("Generation request failed: {}", e);
                    GenerationError::RequestFailed(e.to_string())
                })?;

            let status = response.status();
            if !status.is_success() {
                error!("Generation backend answered HTTP {}", status);
                return Err(GenerationError::RequestFailed(format!("HTTP {}", status)));
            }

            response
                .json::<GenerateContentResponse>()
                .await
                .map_err(|e| GenerationError::BadResponse(e.to_string()))
        };
        let parsed = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| GenerationError::Timeout)??;
        let text = response_text(parsed)?;
        debug!("Generation returned {} char(s)", text.len());
        Ok(text)
    }
}
