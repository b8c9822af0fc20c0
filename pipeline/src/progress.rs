//! Progress side-channel.
//!
//! Core components notify the sink as they advance but never depend on
//! it for control flow; a sink must not influence the labels produced.

use subscout_core::RelevanceLabel;
use tracing::info;

/// Observer notified as the pipeline advances.
pub trait ProgressSink: Send + Sync {
    fn on_stage_start(&self, _stage: &str, _total: usize) {}
    fn on_keyword_searched(&self, _keyword: &str, _found: usize) {}
    fn on_posts_fetched(&self, _subreddit: &str, _count: usize) {}
    fn on_subreddit_labeled(&self, _subreddit: &str, _label: RelevanceLabel) {}
    fn on_stage_complete(&self, _stage: &str) {}
}

/// Sink that drops every notification.
pub struct NoProgress;

impl ProgressSink for NoProgress {}

/// Sink that reports through the tracing subscriber.
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn on_stage_start(&self, stage: &str, total: usize) {
        info!("[*] {} ({} items)", stage, total);
    }

    fn on_keyword_searched(&self, keyword: &str, found: usize) {
        info!("Keyword {:?}: {} subreddits", keyword, found);
    }

    fn on_posts_fetched(&self, subreddit: &str, count: usize) {
        info!("r/{}: {} posts", subreddit, count);
    }

    fn on_subreddit_labeled(&self, subreddit: &str, label: RelevanceLabel) {
        info!("r/{}: {}", subreddit, label);
    }

    fn on_stage_complete(&self, stage: &str) {
        info!("[+] {} complete", stage);
    }
}
