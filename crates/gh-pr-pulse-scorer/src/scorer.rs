//! Risk basis and confidence percentage

use crate::{ScoreWeights, Signals};
use serde::Serialize;

/// Result of scoring one set of signals
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
    /// Unbounded weighted sum of the raw signals
    pub risk_basis: f64,
    /// Inverse-weighted score relative to the all-zero best case, in percent
    pub confidence_percentage: f64,
}

/// Scores review-pipeline signals with a fixed weighting
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Scorer {
    weights: ScoreWeights,
}

impl Scorer {
    /// Create a scorer
    ///
    /// The weights are expected to be validated (see [`ScoreWeights::new`] and
    /// [`ScoreWeights::validate`]).
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// The weighting used by this scorer
    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Compute both metrics
    pub fn evaluate(&self, signals: &Signals) -> Score {
        Score {
            risk_basis: self.compute_risk_basis(signals),
            confidence_percentage: self.compute_confidence_percentage(signals),
        }
    }

    /// Weighted sum of the raw signals
    ///
    /// `backlog·open_prs + activity·since_merge + delay·waiting_age + queue·ready_age`
    pub fn compute_risk_basis(&self, signals: &Signals) -> f64 {
        self.weight_values()
            .iter()
            .zip(signals.values())
            .map(|(weight, value)| weight * value)
            .sum()
    }

    /// Inverse-weighted score normalized to a percentage
    ///
    /// Every signal contributes `weight / value`, or the full `weight` when the
    /// value is exactly zero. The sum is divided by the total weight, which is
    /// the score of the all-zero case, so `(0, 0, 0, 0)` yields exactly 100.
    ///
    /// Values between 0 and 1 contribute more than the zero case does; the
    /// result is not capped.
    pub fn compute_confidence_percentage(&self, signals: &Signals) -> f64 {
        let weighted_score: f64 = self
            .weight_values()
            .iter()
            .zip(signals.values())
            .map(|(weight, value)| weight * inverse_or_best(value))
            .sum();

        weighted_score / self.weights.total() * 100.0
    }

    fn weight_values(&self) -> [f64; 4] {
        [
            self.weights.backlog_weight,
            self.weights.activity_weight,
            self.weights.delay_weight,
            self.weights.queue_weight,
        ]
    }
}

/// `1 / value`, with zero treated as the best case
fn inverse_or_best(value: f64) -> f64 {
    if value > 0.0 {
        1.0 / value
    } else {
        1.0
    }
}
