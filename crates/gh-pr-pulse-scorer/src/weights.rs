//! Signal weights
//!
//! The ordering of the defaults encodes how much each signal matters:
//! backlog size first, merge queue latency last.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default weight for the number of open pull requests
pub const DEFAULT_BACKLOG_WEIGHT: f64 = 2.0;

/// Default weight for the hours since the last merge
pub const DEFAULT_ACTIVITY_WEIGHT: f64 = 1.5;

/// Default weight for the age of the oldest PR awaiting approval
pub const DEFAULT_DELAY_WEIGHT: f64 = 1.5;

/// Default weight for the age of the oldest PR ready for merge
pub const DEFAULT_QUEUE_WEIGHT: f64 = 1.0;

/// Errors raised when a weighting is not usable
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightError {
    #[error("weight `{name}` must be a finite number greater than zero, got {value}")]
    NotPositive { name: &'static str, value: f64 },
}

/// Relative importance of the four review-pipeline signals
///
/// All weights must be finite and strictly positive. Deserialized values are
/// not checked automatically; call [`ScoreWeights::validate`] after loading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight of the open pull request count
    #[serde(rename = "backlog", default = "default_backlog_weight")]
    pub backlog_weight: f64,

    /// Weight of the hours since the last merge
    #[serde(rename = "activity", default = "default_activity_weight")]
    pub activity_weight: f64,

    /// Weight of the oldest PR awaiting approval
    #[serde(rename = "delay", default = "default_delay_weight")]
    pub delay_weight: f64,

    /// Weight of the oldest PR ready for merge
    #[serde(rename = "queue", default = "default_queue_weight")]
    pub queue_weight: f64,
}

fn default_backlog_weight() -> f64 {
    DEFAULT_BACKLOG_WEIGHT
}

fn default_activity_weight() -> f64 {
    DEFAULT_ACTIVITY_WEIGHT
}

fn default_delay_weight() -> f64 {
    DEFAULT_DELAY_WEIGHT
}

fn default_queue_weight() -> f64 {
    DEFAULT_QUEUE_WEIGHT
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            backlog_weight: DEFAULT_BACKLOG_WEIGHT,
            activity_weight: DEFAULT_ACTIVITY_WEIGHT,
            delay_weight: DEFAULT_DELAY_WEIGHT,
            queue_weight: DEFAULT_QUEUE_WEIGHT,
        }
    }
}

impl ScoreWeights {
    /// Create a validated weighting
    pub fn new(
        backlog_weight: f64,
        activity_weight: f64,
        delay_weight: f64,
        queue_weight: f64,
    ) -> Result<Self, WeightError> {
        let weights = Self {
            backlog_weight,
            activity_weight,
            delay_weight,
            queue_weight,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Check that every weight is finite and strictly positive
    pub fn validate(&self) -> Result<(), WeightError> {
        for (name, value) in self.named() {
            if !value.is_finite() || value <= 0.0 {
                return Err(WeightError::NotPositive { name, value });
            }
        }
        Ok(())
    }

    /// Sum of all weights
    ///
    /// This is the weighted score attained when every signal is exactly zero.
    pub fn total(&self) -> f64 {
        self.backlog_weight + self.activity_weight + self.delay_weight + self.queue_weight
    }

    /// Multiply every weight by the same factor
    pub fn scaled(&self, factor: f64) -> Result<Self, WeightError> {
        Self::new(
            self.backlog_weight * factor,
            self.activity_weight * factor,
            self.delay_weight * factor,
            self.queue_weight * factor,
        )
    }

    fn named(&self) -> [(&'static str, f64); 4] {
        [
            ("backlog", self.backlog_weight),
            ("activity", self.activity_weight),
            ("delay", self.delay_weight),
            ("queue", self.queue_weight),
        ]
    }
}
