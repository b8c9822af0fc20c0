use crate::error::*;
use tracing::error;

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn user_friendly_message(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::SearchApi(e) => {
                error!("Search API error details: {:?}", e);
            }
            CoreError::Llm(e) => {
                error!("LLM error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::SearchApi(SearchApiError::RateLimitExceeded { retry_after }) => {
                format!(
                    "The search API is rate limiting us. Try again in {retry_after} seconds."
                )
            }
            CoreError::SearchApi(SearchApiError::RequestTimeout)
            | CoreError::Llm(LlmError::RequestTimeout) => {
                "A request timed out. Check your network connection and try again.".to_string()
            }
            CoreError::SearchApi(_) => {
                "The subreddit search API returned an error. Try again later.".to_string()
            }
            CoreError::Llm(LlmError::InvalidApiKey) => {
                "The LLM API key is invalid or missing. Check OPENAI_API_KEY.".to_string()
            }
            CoreError::Llm(LlmError::RateLimitExceeded { retry_after }) => {
                format!("The LLM provider is rate limiting us. Try again in {retry_after} seconds.")
            }
            CoreError::Llm(_) => {
                "The LLM vote caster failed. No report was written.".to_string()
            }
            CoreError::Config(e) => format!("Configuration problem: {e}"),
            CoreError::Io(e) => format!("File operation failed: {e}"),
            CoreError::Network(_) => {
                "A network request failed. Check your connection and try again.".to_string()
            }
            _ => format!("{self}"),
        }
    }
}
