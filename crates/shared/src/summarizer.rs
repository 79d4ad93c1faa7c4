use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::prompts::truncate_chars;

const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
/// Error bodies end up in the consolidation prompt; HTML error pages are long
const ERROR_BODY_CHARS: usize = 200;
const SYSTEM_PROMPT: &str =
    "You are a senior financial analyst. Provide concise, actionable trading insights.";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SummarizeError {
    #[error("rate limited by the model API")]
    RateLimited,
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("model returned no choices")]
    EmptyResponse,
    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<SummarizeError>,
    },
}

impl SummarizeError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, SummarizeError::RateLimited)
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            SummarizeError::RateLimited | SummarizeError::Transport(_) => true,
            SummarizeError::Api { status, .. } => *status >= 500,
            SummarizeError::EmptyResponse | SummarizeError::RetriesExhausted { .. } => false,
        }
    }
}

/// Anything that turns a prompt into a completion
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, SummarizeError>;
}

/// How often and how long to wait between attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Multiplied by the attempt number after each rate-limit response
    pub rate_limit_backoff: Duration,
    pub transport_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            rate_limit_backoff: Duration::from_secs(15),
            transport_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Delay before the next attempt after `attempt` (1-based) failed with
    /// `error`, or `None` to stop retrying.
    pub fn delay_after(&self, attempt: u32, error: &SummarizeError) -> Option<Duration> {
        if attempt >= self.max_attempts || !error.is_retryable() {
            return None;
        }
        if error.is_rate_limit() {
            Some(self.rate_limit_backoff * attempt)
        } else {
            Some(self.transport_backoff)
        }
    }
}

/// A chat model wrapped with a retry policy and a courtesy delay between
/// batch calls
pub struct Summarizer<M> {
    model: M,
    policy: RetryPolicy,
    inter_call_delay: Duration,
}

impl<M: ChatModel> Summarizer<M> {
    pub fn new(model: M, policy: RetryPolicy, inter_call_delay: Duration) -> Self {
        Self {
            model,
            policy,
            inter_call_delay,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub async fn summarize(&self, prompt: &str) -> Result<String, SummarizeError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.model.complete(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) => match self.policy.delay_after(attempt, &e) {
                    Some(backoff) => {
                        if e.is_rate_limit() {
                            warn!(attempt, ?backoff, "rate limit hit, backing off");
                        } else {
                            warn!(attempt, ?backoff, error = %e, "request failed, retrying");
                        }
                        tokio::time::sleep(backoff).await;
                    }
                    None if e.is_retryable() => {
                        error!(attempt, error = %e, "giving up on summary request");
                        return Err(SummarizeError::RetriesExhausted {
                            attempts: attempt,
                            last: Box::new(e),
                        });
                    }
                    None => {
                        error!(attempt, error = %e, "summary request failed");
                        return Err(e);
                    }
                },
            }
        }
    }

    pub async fn pause_between_calls(&self) {
        if !self.inter_call_delay.is_zero() {
            tokio::time::sleep(self.inter_call_delay).await;
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

fn api_error(status: StatusCode, body: &str) -> SummarizeError {
    SummarizeError::Api {
        status: status.as_u16(),
        body: truncate_chars(body.trim(), ERROR_BODY_CHARS).to_string(),
    }
}

/// Groq's OpenAI-compatible chat completions endpoint
pub struct GroqClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GroqClient {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            endpoint: GROQ_CHAT_URL.to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl ChatModel for GroqClient {
    async fn complete(&self, prompt: &str) -> Result<String, SummarizeError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.3,
            max_tokens: 800,
            top_p: 0.8,
        };

        debug!(model = %self.model, prompt_chars = prompt.len(), "sending chat completion");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SummarizeError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SummarizeError::RateLimited);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            return Err(api_error(status, &body));
        }

        let chat_response = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| SummarizeError::Transport(format!("invalid response body: {}", e)))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or(SummarizeError::EmptyResponse)
    }
}
