//! Voting primitives for the consensus decision procedure.

use serde::{Deserialize, Serialize};

/// One independent boolean judgment from the probabilistic judge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub verdict: bool,
    /// Self-reported confidence (0.0 to 1.0), when the judge provides one.
    pub confidence: Option<f64>,
}

impl Vote {
    pub fn new(verdict: bool) -> Self {
        Self {
            verdict,
            confidence: None,
        }
    }

    pub fn yes() -> Self {
        Self::new(true)
    }

    pub fn no() -> Self {
        Self::new(false)
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }
}

/// Running tally of yes/no votes.
///
/// The majority is strict: a positive label requires more yes than no
/// votes, so an even split resolves to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    yes: usize,
    no: usize,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, verdict: bool) {
        if verdict {
            self.yes += 1;
        } else {
            self.no += 1;
        }
    }

    pub fn yes_count(&self) -> usize {
        self.yes
    }

    pub fn no_count(&self) -> usize {
        self.no
    }

    pub fn total(&self) -> usize {
        self.yes + self.no
    }

    /// The current majority label. Ties resolve to `false`.
    pub fn majority(&self) -> bool {
        self.yes > self.no
    }

    /// Share of votes agreeing with the current majority label: the
    /// confidence figure the adaptive policy compares against its
    /// target. An empty tally has share 0.0; a dead-even one has 0.5.
    pub fn majority_share(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.yes.max(self.no) as f64 / self.total() as f64
        }
    }

    pub fn is_unanimous(&self) -> bool {
        self.total() > 0 && (self.yes == 0 || self.no == 0)
    }
}

impl std::fmt::Display for VoteTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} yes / {} no", self.yes, self.no)
    }
}
