//! Built-in what-if scenarios
//!
//! A fixed table of signal combinations around a 5/5/5/5 baseline, useful to
//! see how a weighting reacts before pointing it at a live repository.

use crate::report;
use gh_pr_pulse_scorer::{Score, Scorer, SignalError, Signals};

/// A named combination of raw signal values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scenario {
    pub name: &'static str,
    pub open_pr_count: u64,
    pub time_since_last_merge: f64,
    pub oldest_waiting_age: f64,
    pub oldest_ready_age: f64,
}

const fn scenario(
    name: &'static str,
    open_pr_count: u64,
    time_since_last_merge: f64,
    oldest_waiting_age: f64,
    oldest_ready_age: f64,
) -> Scenario {
    Scenario {
        name,
        open_pr_count,
        time_since_last_merge,
        oldest_waiting_age,
        oldest_ready_age,
    }
}

pub const SCENARIOS: [Scenario; 13] = [
    scenario("baseline", 5, 5.0, 5.0, 5.0),
    scenario("more open PRs", 10, 5.0, 5.0, 5.0),
    scenario("fewer open PRs", 2, 5.0, 5.0, 5.0),
    scenario("longer since last merge", 5, 10.0, 5.0, 5.0),
    scenario("shorter since last merge", 5, 2.0, 5.0, 5.0),
    scenario("older awaiting approval", 5, 5.0, 10.0, 5.0),
    scenario("younger awaiting approval", 5, 5.0, 2.0, 5.0),
    scenario("older ready for merge", 5, 5.0, 5.0, 10.0),
    scenario("younger ready for merge", 5, 5.0, 5.0, 2.0),
    scenario("all dimensions more", 10, 10.0, 10.0, 10.0),
    scenario("all dimensions less", 2, 2.0, 2.0, 2.0),
    scenario("mixed backlog and delay", 10, 2.0, 10.0, 2.0),
    scenario("mixed activity and queue", 2, 10.0, 2.0, 10.0),
];

impl Scenario {
    pub fn signals(&self) -> Result<Signals, SignalError> {
        Signals::new(
            self.open_pr_count,
            self.time_since_last_merge,
            self.oldest_waiting_age,
            self.oldest_ready_age,
        )
    }
}

/// Score every scenario
pub fn evaluate_all(scorer: &Scorer) -> Result<Vec<(Scenario, Signals, Score)>, SignalError> {
    SCENARIOS
        .iter()
        .map(|scenario| -> Result<_, SignalError> {
            let signals = scenario.signals()?;
            Ok((*scenario, signals, scorer.evaluate(&signals)))
        })
        .collect()
}

/// Render every scenario as a numbered report
pub fn render_all(scorer: &Scorer) -> Result<String, SignalError> {
    let mut out = String::new();
    for (index, (scenario, signals, score)) in evaluate_all(scorer)?.iter().enumerate() {
        out.push_str(&format!("Scenario {} ({}):\n", index + 1, scenario.name));
        out.push_str(&report::render(signals, score));
        out.push('\n');
    }
    Ok(out)
}
