use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use subscout_core::{CoreError, SearchApiError};
use tracing::{debug, error, info};

const ARCTIC_SHIFT_API_BASE: &str = "https://arctic-shift.photon-reddit.com/api";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Response envelope shared by the Arctic Shift search endpoints.
#[derive(Debug, Clone, Deserialize)]
struct DataEnvelope {
    #[serde(default)]
    data: Vec<Value>,
}

/// HTTP client for the Arctic Shift aggregation API.
///
/// Constructed once per pipeline run and passed by reference; holds no
/// session state beyond the underlying connection pool. Items come back
/// as raw JSON objects so every source field survives into the report.
#[derive(Debug)]
pub struct ArcticShiftClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ArcticShiftClient {
    pub fn new(user_agent: String) -> Result<Self, CoreError> {
        Self::with_base_url(user_agent, ARCTIC_SHIFT_API_BASE)
    }

    /// Client against a non-default base URL.
    pub fn with_base_url(
        user_agent: String,
        base_url: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let http_client = reqwest::Client::builder()
            .user_agent(&user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
        })
    }

    /// Search subreddits whose name starts with `prefix`, returning up
    /// to `limit` raw subreddit objects.
    pub async fn search_subreddits(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<Value>, CoreError> {
        let limit_s = limit.to_string();
        let items = self
            .get_data(
                "/subreddits/search",
                &[("subreddit_prefix", prefix), ("limit", &limit_s)],
            )
            .await?;

        info!(
            "Retrieved {} subreddits for prefix {:?}",
            items.len(),
            prefix
        );
        Ok(items)
    }

    /// Fetch up to `limit` raw post objects for one subreddit, in the
    /// order the API returns them.
    pub async fn search_top_posts(
        &self,
        subreddit: &str,
        limit: usize,
    ) -> Result<Vec<Value>, CoreError> {
        let limit_s = limit.to_string();
        let items = self
            .get_data(
                "/posts/search",
                &[("subreddit", subreddit), ("limit", &limit_s)],
            )
            .await?;

        debug!("Retrieved {} posts from r/{}", items.len(), subreddit);
        Ok(items)
    }

    async fn get_data(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
    ) -> Result<Vec<Value>, CoreError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Making search API request: GET {}", endpoint);

        let response = match self.http_client.get(&url).query(query_params).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Network error for GET {}: {}", endpoint, e);
                if e.is_timeout() {
                    return Err(CoreError::SearchApi(SearchApiError::RequestTimeout));
                }
                return Err(CoreError::Network(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            error!("Request failed with status: {} for {}", status, endpoint);

            if status.as_u16() == 429 {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);
                return Err(CoreError::SearchApi(SearchApiError::RateLimitExceeded {
                    retry_after,
                }));
            }
            if status.is_server_error() {
                return Err(CoreError::SearchApi(SearchApiError::ServerError {
                    status_code: status.as_u16(),
                }));
            }
            return Err(CoreError::SearchApi(SearchApiError::RequestFailed {
                endpoint: endpoint.to_string(),
                status_code: status.as_u16(),
            }));
        }

        let envelope: DataEnvelope = response.json().await.map_err(|e| {
            error!("Failed to parse search API response: {}", e);
            CoreError::SearchApi(SearchApiError::InvalidResponse {
                details: format!("Failed to parse response for {endpoint}"),
            })
        })?;

        Ok(envelope.data)
    }
}
