//! Consumer-side port for the subreddit search interface.

use arctic_client::ArcticShiftClient;
use async_trait::async_trait;
use serde_json::Value;
use subscout_core::CoreError;

/// The two queries the collector needs from a search backend.
///
/// Production runs use [`ArcticShiftClient`]; tests substitute an
/// in-memory fake.
#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn search_subreddits(&self, prefix: &str, limit: usize)
        -> Result<Vec<Value>, CoreError>;

    async fn search_top_posts(
        &self,
        subreddit: &str,
        limit: usize,
    ) -> Result<Vec<Value>, CoreError>;
}

#[async_trait]
impl SearchApi for ArcticShiftClient {
    async fn search_subreddits(
        &self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<Value>, CoreError> {
        ArcticShiftClient::search_subreddits(self, prefix, limit).await
    }

    async fn search_top_posts(
        &self,
        subreddit: &str,
        limit: usize,
    ) -> Result<Vec<Value>, CoreError> {
        ArcticShiftClient::search_top_posts(self, subreddit, limit).await
    }
}
