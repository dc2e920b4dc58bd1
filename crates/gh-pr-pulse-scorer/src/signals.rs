//! Validated review-pipeline observations

use serde::Serialize;
use thiserror::Error;

/// Rejected signal input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    #[error("signal `{name}` must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("signal `{name}` must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f64 },
}

/// The four observations of one evaluation cycle
///
/// Hours are elapsed wall-clock time. An age of `0.0` means either "just now"
/// or "no such pull request exists"; both are the best possible outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Signals {
    open_pr_count: u64,
    time_since_last_merge: f64,
    oldest_waiting_age: f64,
    oldest_ready_age: f64,
}

impl Signals {
    /// Validate and bundle raw observations
    ///
    /// Negative, NaN and infinite hour values are rejected. Values are never
    /// clamped.
    pub fn new(
        open_pr_count: u64,
        time_since_last_merge: f64,
        oldest_waiting_age: f64,
        oldest_ready_age: f64,
    ) -> Result<Self, SignalError> {
        Ok(Self {
            open_pr_count,
            time_since_last_merge: check_hours("time_since_last_merge", time_since_last_merge)?,
            oldest_waiting_age: check_hours("oldest_waiting_age", oldest_waiting_age)?,
            oldest_ready_age: check_hours("oldest_ready_age", oldest_ready_age)?,
        })
    }

    /// Number of currently open pull requests
    pub fn open_pr_count(&self) -> u64 {
        self.open_pr_count
    }

    /// Hours since the most recent merge
    pub fn time_since_last_merge(&self) -> f64 {
        self.time_since_last_merge
    }

    /// Age in hours of the oldest PR awaiting approval
    pub fn oldest_waiting_age(&self) -> f64 {
        self.oldest_waiting_age
    }

    /// Age in hours of the oldest PR ready for merge
    pub fn oldest_ready_age(&self) -> f64 {
        self.oldest_ready_age
    }

    /// All four signals as reals, in weight order (backlog, activity, delay, queue)
    pub(crate) fn values(&self) -> [f64; 4] {
        [
            self.open_pr_count as f64,
            self.time_since_last_merge,
            self.oldest_waiting_age,
            self.oldest_ready_age,
        ]
    }
}

fn check_hours(name: &'static str, value: f64) -> Result<f64, SignalError> {
    if !value.is_finite() {
        return Err(SignalError::NotFinite { name, value });
    }
    if value < 0.0 {
        return Err(SignalError::Negative { name, value });
    }
    Ok(value)
}
