//! Pipeline orchestration: collect, annotate, persist.

use crate::annotator::Annotator;
use crate::collector::Collector;
use crate::config::RunConfig;
use crate::progress::ProgressSink;
use crate::report;
use crate::search::SearchApi;
use consensus::VoteCaster;
use std::time::Instant;
use subscout_core::CoreError;
use tracing::info;

/// Runs the discovery-and-labeling pipeline end to end for one
/// validated configuration.
pub struct SubredditFinder {
    config: RunConfig,
}

impl SubredditFinder {
    /// Validates the configuration eagerly; a bad policy or empty
    /// keyword list never reaches the network.
    pub fn new(config: RunConfig) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Execute the full pipeline and write the report.
    ///
    /// Collection tolerates per-item search failures; annotation does
    /// not — the first vote-caster error aborts the run, and no report
    /// file is written.
    pub async fn run(
        &self,
        search: &dyn SearchApi,
        caster: &dyn VoteCaster,
        progress: &dyn ProgressSink,
    ) -> Result<(), CoreError> {
        let started = Instant::now();
        info!(
            "Starting subreddit discovery for keywords: {:?}",
            self.config.keywords
        );

        let collector = Collector::new(search, progress);

        progress.on_stage_start("Searching keywords", self.config.keywords.len());
        let mut records = collector
            .collect_subreddits(&self.config.keywords, self.config.top_n)
            .await;
        progress.on_stage_complete("Searching keywords");
        info!("Collected {} unique subreddits", records.len());

        progress.on_stage_start("Fetching posts per subreddit", records.len());
        collector
            .collect_top_posts(&mut records, self.config.top_k)
            .await;
        progress.on_stage_complete("Fetching posts per subreddit");

        progress.on_stage_start("Relevance classification", records.len());
        let annotator = Annotator::new(
            caster,
            self.config.consensus,
            &self.config.question,
            progress,
        );
        annotator.annotate_all(&mut records).await?;
        progress.on_stage_complete("Relevance classification");

        report::write_report(&records, &self.config.output_path)?;

        info!("All done in {:.2} seconds", started.elapsed().as_secs_f64());
        Ok(())
    }
}
