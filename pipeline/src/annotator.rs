//! Relevance annotation: prompt construction and consensus invocation.

use crate::progress::ProgressSink;
use consensus::{decide, ConsensusPolicy, VoteCaster};
use subscout_core::{CoreError, RelevanceLabel, SubredditRecord};
use tracing::debug;

const QUESTION_PREFIX: &str = "Using subreddit title, description and top posts, answer: ";

/// Labels collected records through the consensus decision procedure,
/// one decision per record.
pub struct Annotator<'a> {
    caster: &'a dyn VoteCaster,
    policy: ConsensusPolicy,
    question: String,
    progress: &'a dyn ProgressSink,
}

impl<'a> Annotator<'a> {
    pub fn new(
        caster: &'a dyn VoteCaster,
        policy: ConsensusPolicy,
        question: &str,
        progress: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            caster,
            policy,
            question: format!("{QUESTION_PREFIX}{question}"),
            progress,
        }
    }

    /// The full question handed to the decision procedure.
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Judgment prompt: one field per line — title label, display name,
    /// description label, resolved description, then each post's title
    /// and selftext in attachment order.
    pub fn build_prompt(record: &SubredditRecord) -> String {
        let mut parts = vec![
            "subreddit title:".to_string(),
            record.prompt_title().to_string(),
            "subreddit description:".to_string(),
            record.resolved_description().to_string(),
        ];
        for post in &record.top_posts {
            parts.push(post.title.clone());
            parts.push(post.selftext.clone());
        }
        parts.join("\n")
    }

    /// Decide and attach the label for one record. Invokes the decision
    /// procedure exactly once; a caster failure propagates and leaves
    /// the record unannotated.
    pub async fn annotate(&self, record: &mut SubredditRecord) -> Result<(), CoreError> {
        let text = Self::build_prompt(record);
        let relevant = decide(&self.question, &text, &self.policy, self.caster).await?;

        record.relevance = RelevanceLabel::from_verdict(relevant);
        self.progress
            .on_subreddit_labeled(&record.name, record.relevance);
        debug!(subreddit = %record.name, label = %record.relevance, "record annotated");
        Ok(())
    }

    pub async fn annotate_all(&self, records: &mut [SubredditRecord]) -> Result<(), CoreError> {
        for record in records.iter_mut() {
            self.annotate(record).await?;
        }
        Ok(())
    }
}
