//! The consensus decision procedure.
//!
//! Aggregates repeated independent yes/no judgments into one boolean
//! label under the selected [`ConsensusPolicy`]. The procedure is
//! deterministic given a sequence of vote outcomes; all randomness
//! lives in the [`VoteCaster`] implementation.

use crate::policy::ConsensusPolicy;
use crate::vote::{Vote, VoteTally};
use async_trait::async_trait;
use subscout_core::CoreError;
use tracing::debug;

/// Issues one independent probabilistic yes/no judgment.
///
/// Implementations must be stateless across calls: no memory is shared
/// between votes beyond the fixed (question, text) pair.
#[async_trait]
pub trait VoteCaster: Send + Sync {
    async fn cast_vote(&self, question: &str, text: &str) -> Result<Vote, CoreError>;
}

/// Decide a single boolean label for a (question, text) pair by polling
/// `caster` under `policy`.
///
/// Votes are cast strictly one at a time. Under `ConfidenceThreshold`
/// each vote's necessity depends on the tally so far, so the loop never
/// looks ahead; at least `min_votes` and at most `max_votes` are cast.
/// Even splits resolve to `false` under both policies: relevance
/// requires a strict majority.
///
/// A caster failure propagates immediately and no label is produced.
pub async fn decide(
    question: &str,
    text: &str,
    policy: &ConsensusPolicy,
    caster: &dyn VoteCaster,
) -> Result<bool, CoreError> {
    if question.trim().is_empty() {
        return Err(CoreError::InvalidInput {
            message: "consensus question is empty".to_string(),
        });
    }
    if text.trim().is_empty() {
        return Err(CoreError::InvalidInput {
            message: "consensus evidence text is empty".to_string(),
        });
    }
    policy.validate()?;

    match *policy {
        ConsensusPolicy::FixedVoteCount { n_votes } => {
            let mut tally = VoteTally::new();
            for round in 1..=n_votes {
                let vote = caster.cast_vote(question, text).await?;
                tally.record(vote.verdict);
                debug!(round, n_votes, verdict = vote.verdict, "vote recorded");
            }
            Ok(tally.majority())
        }
        ConsensusPolicy::ConfidenceThreshold {
            target,
            min_votes,
            max_votes,
        } => {
            let mut tally = VoteTally::new();
            while tally.total() < max_votes {
                let vote = caster.cast_vote(question, text).await?;
                tally.record(vote.verdict);
                debug!(
                    total = tally.total(),
                    share = tally.majority_share(),
                    verdict = vote.verdict,
                    "vote recorded"
                );
                if tally.total() >= min_votes && tally.majority_share() >= target {
                    debug!(total = tally.total(), "confidence target reached, stopping");
                    break;
                }
            }
            Ok(tally.majority())
        }
    }
}
