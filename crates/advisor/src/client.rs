use async_trait::async_trait;
use moonwallet_core::HandlerError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed completion parameters for advice generation.
const MODEL: &str = "gpt-4o-mini";
const MAX_TOKENS: u32 = 50;
const TEMPERATURE: f32 = 0.7;

const DEFAULT_API_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Completion API error: {0}")]
    Api(String),
    #[error("Completion response contained no choices")]
    EmptyCompletion,
}

impl From<AdvisorError> for HandlerError {
    fn from(e: AdvisorError) -> Self {
        HandlerError::Provider(e.to_string())
    }
}

/// Abstraction over the chat-completion provider, mirroring the banking
/// client seam: the HTTP client for real use, canned responders in tests.
#[async_trait]
pub trait ChatCompletions: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, AdvisorError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// OpenAI chat-completions client.
pub struct OpenAiChat {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiChat {
    pub fn new(api_key: String) -> Self {
        OpenAiChat {
            http: reqwest::Client::new(),
            base_url: DEFAULT_API_URL.to_string(),
            api_key,
        }
    }

    /// Point the client at a non-default endpoint (proxy, test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ChatCompletions for OpenAiChat {
    async fn complete(&self, system: &str, user: &str) -> Result<String, AdvisorError> {
        let request = ChatCompletionRequest {
            model: MODEL,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(match response.json::<ApiErrorEnvelope>().await {
                Ok(envelope) => AdvisorError::Api(envelope.error.message),
                Err(_) => AdvisorError::Api(format!("unexpected status {status}")),
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(AdvisorError::EmptyCompletion)
    }
}
