//! Console rendering of a score
//!
//! Rounding happens here only; logged and returned values keep full precision.

use crate::score_log::{ScoreRecord, RECORD_TIME_FORMAT};
use gh_pr_pulse_scorer::{Score, Signals};

/// Render one value per line
pub fn render(signals: &Signals, score: &Score) -> String {
    format!(
        "{} open PRs\n\
         Last Merge {:.1}h\n\
         Oldest Awaiting Approval {:.1}h\n\
         Oldest Ready For Merge {:.1}h\n\
         Risk Basis: {:.2}\n\
         Confidence: {:.2}%\n",
        signals.open_pr_count(),
        signals.time_since_last_merge(),
        signals.oldest_waiting_age(),
        signals.oldest_ready_age(),
        score.risk_basis,
        score.confidence_percentage,
    )
}

/// Render a log record as a single history line
pub fn render_history_line(record: &ScoreRecord) -> String {
    format!(
        "{}  {:>3} open  merge {:>6.1}h  waiting {:>6.1}h  ready {:>6.1}h  risk {:>8.2}  confidence {:>6.2}%",
        record.timestamp.format(RECORD_TIME_FORMAT),
        record.signals.open_pr_count(),
        record.signals.time_since_last_merge(),
        record.signals.oldest_waiting_age(),
        record.signals.oldest_ready_age(),
        record.score.risk_basis,
        record.score.confidence_percentage,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_rounds_for_display() {
        let signals = Signals::new(5, 5.04, 12.27, 0.0).unwrap();
        let score = Score {
            risk_basis: 35.456,
            confidence_percentage: 19.999,
        };

        assert_eq!(
            render(&signals, &score),
            "5 open PRs\n\
             Last Merge 5.0h\n\
             Oldest Awaiting Approval 12.3h\n\
             Oldest Ready For Merge 0.0h\n\
             Risk Basis: 35.46\n\
             Confidence: 20.00%\n"
        );
    }

    #[test]
    fn test_render_history_line() {
        let record = ScoreRecord::new(
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            Signals::new(12, 3.26, 48.0, 7.5).unwrap(),
            Score {
                risk_basis: 123.4567,
                confidence_percentage: 8.126,
            },
        );

        assert_eq!(
            render_history_line(&record),
            "2024-03-01 08:00:00   12 open  merge    3.3h  waiting   48.0h  ready    7.5h  risk   123.46  confidence   8.13%"
        );
    }
}
