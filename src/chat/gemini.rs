//! Minimal client for the Gemini `generateContent` API.
//!
//! One stateless request per turn: the combined prompt goes out as a single
//! user content part and the reply is the first candidate's first text part.
//! The absence of a configured key is a terminal, non-retryable condition for
//! a call; no network attempt is made.

use serde::{Deserialize, Serialize};

use crate::chat::config::GeminiConfig;
use crate::chat::errors::{ChatError, ChatResult};

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .flatten()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts)
            .into_iter()
            .flatten()
            .find_map(|part| part.text)
            .filter(|text| !text.is_empty())
    }
}

/// Async Gemini client for single-prompt text generation.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a client from generation settings.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> ChatResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// True if an API key is configured.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.config
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    /// Generate a reply for one combined prompt.
    ///
    /// # Errors
    /// Returns an error if no key is configured, the request fails, the
    /// endpoint answers with a non-success status, or the payload carries no
    /// candidate text.
    pub async fn generate(&self, prompt: &str) -> ChatResult<String> {
        let Some(api_key) = self.config.api_key.as_deref().filter(|key| !key.trim().is_empty())
        else {
            return Err(ChatError::MissingApiKey);
        };

        let url = format!(
            "{base}/v1beta/models/{model}:generateContent?key={api_key}",
            base = self.config.base_url.trim_end_matches('/'),
            model = self.config.model,
        );
        let request = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::HttpStatusNotOk(status.as_u16()));
        }

        let payload = response.json::<GenerateContentResponse>().await?;
        payload.into_text().ok_or(ChatError::EmptyResponse)
    }
}
