//! Consensus policy selection
//!
//! A policy fully determines the stopping and aggregation behavior of
//! one run's relevance decisions.

use serde::{Deserialize, Serialize};
use subscout_core::ConfigError;

/// Stopping/aggregation policy for the consensus decision procedure.
///
/// Selected once per pipeline run and applied uniformly to every
/// subreddit decision. In the TOML run configuration:
///
/// ```toml
/// [consensus]
/// method = "majority"
/// n_votes = 5
/// ```
///
/// or
///
/// ```toml
/// [consensus]
/// method = "confidence"
/// target = 0.8
/// min_votes = 5
/// max_votes = 11
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum ConsensusPolicy {
    /// Cast exactly `n_votes` votes and take the strict majority.
    #[serde(rename = "majority")]
    FixedVoteCount { n_votes: usize },

    /// Cast votes one at a time; once `min_votes` are in, stop as soon
    /// as the running majority share reaches `target`, otherwise run to
    /// `max_votes` and take the majority there.
    #[serde(rename = "confidence")]
    ConfidenceThreshold {
        target: f64,
        min_votes: usize,
        max_votes: usize,
    },
}

impl Default for ConsensusPolicy {
    fn default() -> Self {
        ConsensusPolicy::FixedVoteCount { n_votes: 5 }
    }
}

impl ConsensusPolicy {
    pub fn fixed(n_votes: usize) -> Self {
        ConsensusPolicy::FixedVoteCount { n_votes }
    }

    pub fn confidence(target: f64, min_votes: usize, max_votes: usize) -> Self {
        ConsensusPolicy::ConfidenceThreshold {
            target,
            min_votes,
            max_votes,
        }
    }

    /// Reject invalid parameters before any vote is cast.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            ConsensusPolicy::FixedVoteCount { n_votes } => {
                if n_votes < 1 {
                    return Err(ConfigError::InvalidValue {
                        field: "n_votes".to_string(),
                        value: n_votes.to_string(),
                    });
                }
                Ok(())
            }
            ConsensusPolicy::ConfidenceThreshold {
                target,
                min_votes,
                max_votes,
            } => {
                if min_votes < 1 {
                    return Err(ConfigError::InvalidValue {
                        field: "min_votes".to_string(),
                        value: min_votes.to_string(),
                    });
                }
                if min_votes > max_votes {
                    return Err(ConfigError::ValidationFailed {
                        reason: format!(
                            "min_votes ({min_votes}) exceeds max_votes ({max_votes})"
                        ),
                    });
                }
                if !(target > 0.0 && target <= 1.0) {
                    return Err(ConfigError::InvalidValue {
                        field: "target".to_string(),
                        value: target.to_string(),
                    });
                }
                Ok(())
            }
        }
    }

    /// Upper bound on votes this policy may cast per decision.
    pub fn max_votes(&self) -> usize {
        match *self {
            ConsensusPolicy::FixedVoteCount { n_votes } => n_votes,
            ConsensusPolicy::ConfidenceThreshold { max_votes, .. } => max_votes,
        }
    }
}

impl std::fmt::Display for ConsensusPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            ConsensusPolicy::FixedVoteCount { n_votes } => {
                write!(f, "majority of {n_votes} votes")
            }
            ConsensusPolicy::ConfidenceThreshold {
                target,
                min_votes,
                max_votes,
            } => {
                write!(
                    f,
                    "confidence {target:.2} within {min_votes}..={max_votes} votes"
                )
            }
        }
    }
}
