use async_trait::async_trait;
use consensus::{Vote, VoteCaster};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use subscout_core::{ConfigError, CoreError, LlmError};
use tracing::{debug, error};

const OPENAI_API_BASE: &str = "https://api.openai.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const SYSTEM_INSTRUCTION: &str = "You are a strict classifier. Answer the question about the \
     text that follows with a single word: yes or no.";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
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

/// Vote caster backed by the OpenAI chat completions API.
///
/// Each vote is one independent completion request. Temperature stays
/// at 1.0 so repeated votes for the same prompt remain independent
/// samples rather than near-deterministic repeats.
#[derive(Debug)]
pub struct OpenAiVoteCaster {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiVoteCaster {
    pub fn new(api_key: String, model: String) -> Result<Self, CoreError> {
        Self::with_base_url(api_key, model, OPENAI_API_BASE)
    }

    /// Caster against a non-default base URL.
    pub fn with_base_url(
        api_key: String,
        model: String,
        base_url: impl Into<String>,
    ) -> Result<Self, CoreError> {
        if api_key.trim().is_empty() {
            return Err(CoreError::Llm(LlmError::InvalidApiKey));
        }

        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            model,
            base_url: base_url.into(),
        })
    }

    /// Caster with the key taken from `OPENAI_API_KEY`.
    pub fn from_env(model: String) -> Result<Self, CoreError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            CoreError::Config(ConfigError::MissingEnvironmentVariable {
                var_name: "OPENAI_API_KEY".to_string(),
            })
        })?;
        Self::new(api_key, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl VoteCaster for OpenAiVoteCaster {
    async fn cast_vote(&self, question: &str, text: &str) -> Result<Vote, CoreError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_INSTRUCTION.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!("{question}\n\n{text}"),
                },
            ],
            temperature: 1.0,
            max_tokens: 8,
        };

        let url = format!("{}/v1/chat/completions", self.base_url);
        let response = match self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Network error casting vote: {}", e);
                if e.is_timeout() {
                    return Err(CoreError::Llm(LlmError::RequestTimeout));
                }
                return Err(CoreError::Network(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            error!("Vote request failed with status: {}", status);
            return Err(match status.as_u16() {
                401 | 403 => CoreError::Llm(LlmError::InvalidApiKey),
                429 => {
                    let retry_after = response
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(60);
                    CoreError::Llm(LlmError::RateLimitExceeded { retry_after })
                }
                code if status.is_server_error() => {
                    CoreError::Llm(LlmError::ServiceUnavailable { status_code: code })
                }
                code => CoreError::Llm(LlmError::InvalidResponseFormat {
                    details: format!("unexpected status {code}"),
                }),
            });
        }

        let completion: ChatResponse = response.json().await.map_err(|e| {
            error!("Failed to parse chat completion: {}", e);
            CoreError::Llm(LlmError::InvalidResponseFormat {
                details: "Failed to parse chat completion".to_string(),
            })
        })?;

        let answer = completion
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or_default();

        let verdict = parse_verdict(answer).ok_or_else(|| {
            CoreError::Llm(LlmError::AmbiguousVerdict {
                answer: answer.to_string(),
            })
        })?;

        debug!(verdict, "vote cast");
        Ok(Vote::new(verdict))
    }
}

/// Extract a yes/no verdict from a model answer.
///
/// Accepts the bare word with surrounding punctuation or a short
/// sentence containing exactly one of the two. Answers containing both
/// words or neither are ambiguous and yield `None` — an ambiguous
/// answer must surface as an error, not get silently counted as a vote.
pub fn parse_verdict(answer: &str) -> Option<bool> {
    let upper = answer.to_uppercase();
    let has_word = |target: &str| {
        upper
            .split(|c: char| !c.is_ascii_alphabetic())
            .any(|w| w == target)
    };
    let has_yes = has_word("YES");
    let has_no = has_word("NO");

    match (has_yes, has_no) {
        (true, false) => Some(true),
        (false, true) => Some(false),
        _ => None,
    }
}
