//! Review-pipeline scoring for pull request signals
//!
//! This crate turns four raw observations about a repository's pull request
//! queue into two metrics:
//!
//! - **Risk basis**: an unbounded weighted sum of the raw signals. Higher is worse.
//! - **Confidence percentage**: an inverse-weighted score normalized against the
//!   best possible case (every signal at zero). Higher is healthier.
//!
//! The crate is pure: no I/O, no global state. Weights are carried in
//! [`ScoreWeights`] and handed to a [`Scorer`] at construction time, inputs are
//! validated once by [`Signals::new`].
//!
//! # Example
//!
//! ```
//! use gh_pr_pulse_scorer::{ScoreWeights, Scorer, Signals};
//!
//! let weights = ScoreWeights::new(4.0, 1.0, 3.0, 2.0)?;
//! let scorer = Scorer::new(weights);
//!
//! let signals = Signals::new(5, 5.0, 5.0, 5.0)?;
//! let score = scorer.evaluate(&signals);
//!
//! assert_eq!(score.risk_basis, 50.0);
//! assert!((score.confidence_percentage - 20.0).abs() < 1e-9);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod scorer;
mod signals;
mod weights;

pub use scorer::{Score, Scorer};
pub use signals::{SignalError, Signals};
pub use weights::{ScoreWeights, WeightError};
