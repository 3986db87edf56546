//! Fix suggestion backends.
//!
//! [`FixSuggester`] is the seam between the fix workflow and whatever
//! generates code. The shipped backend talks to any OpenAI-compatible
//! `/chat/completions` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::schema::ModelConfig;
use crate::error::{Result, TesterError};

/// Produces replacement source text for a fix prompt.
#[async_trait]
pub trait FixSuggester: Send + Sync {
    async fn suggest_fix(&self, prompt: &str) -> Result<String>;
}

const SYSTEM_PROMPT: &str = "You are a senior Java engineer fixing failing unit tests. \
Reply with the complete corrected source file and nothing else.";

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completions client.
#[derive(Clone)]
pub struct ChatCompletionSuggester {
    http: reqwest::Client,
    config: ModelConfig,
    api_key: Option<String>,
}

impl std::fmt::Debug for ChatCompletionSuggester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionSuggester")
            .field("endpoint", &self.config.endpoint)
            .field("model", &self.config.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

impl ChatCompletionSuggester {
    /// Build a client from config, reading the API key from the configured
    /// environment variable. A missing key is allowed (local servers).
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.is_empty());
        Self::new(config.clone(), api_key)
    }

    pub fn new(config: ModelConfig, api_key: Option<String>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| TesterError::Model(format!("HTTP client setup failed: {e}")))?;
        Ok(Self {
            http,
            config,
            api_key,
        })
    }
}

#[async_trait]
impl FixSuggester for ChatCompletionSuggester {
    async fn suggest_fix(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
        };

        let mut req = self.http.post(&self.config.endpoint).json(&request);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req
            .send()
            .await
            .map_err(|e| TesterError::Model(format!("HTTP request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TesterError::Model(format!("API error ({status}): {body}")));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| TesterError::Model(format!("Failed to parse response: {e}")))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| TesterError::Model("No response from model".into()))
    }
}
