//! Candidate discovery: subreddit search and top-post attachment.

use crate::progress::ProgressSink;
use crate::search::SearchApi;
use std::collections::HashSet;
use subscout_core::{PostRecord, SubredditRecord};
use tracing::{debug, warn};

/// Builds the initial population of subreddit records for one run.
///
/// Collection is partial-failure tolerant throughout: a failed keyword
/// search or post fetch is logged and skipped, never fatal. Annotation
/// downstream is the fail-fast stage.
pub struct Collector<'a> {
    search: &'a dyn SearchApi,
    progress: &'a dyn ProgressSink,
}

impl<'a> Collector<'a> {
    pub fn new(search: &'a dyn SearchApi, progress: &'a dyn ProgressSink) -> Self {
        Self { search, progress }
    }

    /// Search every keyword and return the deduplicated records in
    /// first-seen order: keyword order, then result order within a
    /// keyword. The first record collected for a name wins; later
    /// duplicates are dropped silently.
    pub async fn collect_subreddits(
        &self,
        keywords: &[String],
        top_n: usize,
    ) -> Vec<SubredditRecord> {
        let mut seen = HashSet::new();
        let mut records = Vec::new();

        for keyword in keywords {
            let items = match self.search.search_subreddits(keyword, top_n).await {
                Ok(items) => items,
                Err(e) => {
                    warn!("Subreddit search failed for keyword {:?}: {}", keyword, e);
                    continue;
                }
            };

            self.progress.on_keyword_searched(keyword, items.len());

            for item in items {
                let Some(record) = SubredditRecord::from_raw(item) else {
                    debug!("Skipping subreddit result without a name");
                    continue;
                };
                if seen.insert(record.name.clone()) {
                    records.push(record);
                }
            }
        }

        records
    }

    /// Fetch up to `top_k` posts per record and attach them in source
    /// order. A failed fetch leaves that record with no posts; malformed
    /// items inside a successful response are dropped individually.
    pub async fn collect_top_posts(&self, records: &mut [SubredditRecord], top_k: usize) {
        for record in records.iter_mut() {
            let items = match self.search.search_top_posts(&record.name, top_k).await {
                Ok(items) => items,
                Err(e) => {
                    warn!("Post search failed for r/{}: {}", record.name, e);
                    continue;
                }
            };

            record.top_posts = items.into_iter().filter_map(PostRecord::from_raw).collect();
            self.progress
                .on_posts_fetched(&record.name, record.top_posts.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::{HashMap, HashSet};
    use subscout_core::{CoreError, SearchApiError};

    #[derive(Default)]
    struct FakeSearch {
        subreddits: HashMap<String, Vec<Value>>,
        posts: HashMap<String, Vec<Value>>,
        failing_keywords: HashSet<String>,
        failing_subreddits: HashSet<String>,
    }

    #[async_trait]
    impl SearchApi for FakeSearch {
        async fn search_subreddits(
            &self,
            prefix: &str,
            limit: usize,
        ) -> Result<Vec<Value>, CoreError> {
            if self.failing_keywords.contains(prefix) {
                return Err(CoreError::SearchApi(SearchApiError::ServerError {
                    status_code: 500,
                }));
            }
            let mut items = self.subreddits.get(prefix).cloned().unwrap_or_default();
            items.truncate(limit);
            Ok(items)
        }

        async fn search_top_posts(
            &self,
            subreddit: &str,
            limit: usize,
        ) -> Result<Vec<Value>, CoreError> {
            if self.failing_subreddits.contains(subreddit) {
                return Err(CoreError::SearchApi(SearchApiError::RequestTimeout));
            }
            let mut items = self.posts.get(subreddit).cloned().unwrap_or_default();
            items.truncate(limit);
            Ok(items)
        }
    }

    fn sub(name: &str) -> Value {
        json!({ "display_name": name, "subscribers": 100 })
    }

    #[tokio::test]
    async fn test_dedup_first_seen_wins() {
        let mut search = FakeSearch::default();
        search.subreddits.insert(
            "a".to_string(),
            vec![json!({ "display_name": "X", "title": "from a" })],
        );
        search.subreddits.insert(
            "b".to_string(),
            vec![json!({ "display_name": "X", "title": "from b" }), sub("Y")],
        );

        let collector = Collector::new(&search, &NoProgress);
        let records = collector
            .collect_subreddits(&["a".to_string(), "b".to_string()], 10)
            .await;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "X");
        // The keyword searched first supplied the surviving record.
        assert_eq!(records[0].title, "from a");
        assert_eq!(records[1].name, "Y");
    }

    #[tokio::test]
    async fn test_failed_keyword_is_skipped() {
        let mut search = FakeSearch::default();
        search.failing_keywords.insert("bad".to_string());
        search
            .subreddits
            .insert("good".to_string(), vec![sub("found")]);

        let collector = Collector::new(&search, &NoProgress);
        let records = collector
            .collect_subreddits(&["bad".to_string(), "good".to_string()], 10)
            .await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "found");
    }

    #[tokio::test]
    async fn test_top_n_limits_results_per_keyword() {
        let mut search = FakeSearch::default();
        search
            .subreddits
            .insert("kw".to_string(), vec![sub("one"), sub("two"), sub("three")]);

        let collector = Collector::new(&search, &NoProgress);
        let records = collector.collect_subreddits(&["kw".to_string()], 2).await;

        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_nameless_results_are_dropped() {
        let mut search = FakeSearch::default();
        search.subreddits.insert(
            "kw".to_string(),
            vec![json!({ "title": "no name here" }), sub("named")],
        );

        let collector = Collector::new(&search, &NoProgress);
        let records = collector.collect_subreddits(&["kw".to_string()], 10).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "named");
    }

    #[tokio::test]
    async fn test_posts_attached_in_source_order() {
        let mut search = FakeSearch::default();
        search.subreddits.insert("kw".to_string(), vec![sub("s")]);
        search.posts.insert(
            "s".to_string(),
            vec![
                json!({ "id": "p1", "title": "first", "score": 10 }),
                json!({ "id": "p2", "title": "second", "score": 5 }),
            ],
        );

        let collector = Collector::new(&search, &NoProgress);
        let mut records = collector.collect_subreddits(&["kw".to_string()], 10).await;
        collector.collect_top_posts(&mut records, 5).await;

        let posts = &records[0].top_posts;
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, "p1");
        assert_eq!(posts[1].id, "p2");
    }

    #[tokio::test]
    async fn test_failed_post_fetch_leaves_record_without_posts() {
        let mut search = FakeSearch::default();
        search
            .subreddits
            .insert("kw".to_string(), vec![sub("ok"), sub("broken")]);
        search
            .posts
            .insert("ok".to_string(), vec![json!({ "id": "p", "title": "t" })]);
        search.failing_subreddits.insert("broken".to_string());

        let collector = Collector::new(&search, &NoProgress);
        let mut records = collector.collect_subreddits(&["kw".to_string()], 10).await;
        collector.collect_top_posts(&mut records, 3).await;

        assert_eq!(records[0].top_posts.len(), 1);
        assert!(records[1].top_posts.is_empty());
    }

    #[tokio::test]
    async fn test_top_k_bounds_post_count() {
        let mut search = FakeSearch::default();
        search.subreddits.insert("kw".to_string(), vec![sub("s")]);
        search.posts.insert(
            "s".to_string(),
            (0..10)
                .map(|i| json!({ "id": format!("p{i}"), "title": "t" }))
                .collect(),
        );

        let collector = Collector::new(&search, &NoProgress);
        let mut records = collector.collect_subreddits(&["kw".to_string()], 10).await;
        collector.collect_top_posts(&mut records, 4).await;

        assert_eq!(records[0].top_posts.len(), 4);
    }
}
