//! CSV score log
//!
//! One row per evaluation, appended in the order runs complete. The header
//! row is written only when the file is new or empty.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use gh_pr_pulse_scorer::{Score, Signals};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Timestamp layout of the first column
pub const RECORD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column names, in file order
pub const HEADER: [&str; 7] = [
    "Timestamp",
    "Open PRs",
    "Hours Since Last Merge",
    "Oldest Awaiting Approval (h)",
    "Oldest Ready For Merge (h)",
    "Risk Basis",
    "Confidence (%)",
];

/// One evaluation: inputs, outputs and when it ran
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub timestamp: NaiveDateTime,
    pub signals: Signals,
    pub score: Score,
}

impl ScoreRecord {
    pub fn new(timestamp: NaiveDateTime, signals: Signals, score: Score) -> Self {
        Self {
            timestamp,
            signals,
            score,
        }
    }

    fn to_row(&self) -> [String; 7] {
        [
            self.timestamp.format(RECORD_TIME_FORMAT).to_string(),
            self.signals.open_pr_count().to_string(),
            self.signals.time_since_last_merge().to_string(),
            self.signals.oldest_waiting_age().to_string(),
            self.signals.oldest_ready_age().to_string(),
            self.score.risk_basis.to_string(),
            self.score.confidence_percentage.to_string(),
        ]
    }

    fn from_row(row: &csv::StringRecord) -> Result<Self> {
        if row.len() != HEADER.len() {
            anyhow::bail!("expected {} columns, found {}", HEADER.len(), row.len());
        }

        let float = |index: usize| -> Result<f64> {
            row[index]
                .parse()
                .with_context(|| format!("invalid {} '{}'", HEADER[index], &row[index]))
        };

        let timestamp = NaiveDateTime::parse_from_str(&row[0], RECORD_TIME_FORMAT)
            .with_context(|| format!("invalid timestamp '{}'", &row[0]))?;
        let open_pr_count = row[1]
            .parse()
            .with_context(|| format!("invalid {} '{}'", HEADER[1], &row[1]))?;
        let signals = Signals::new(open_pr_count, float(2)?, float(3)?, float(4)?)?;
        let score = Score {
            risk_basis: float(5)?,
            confidence_percentage: float(6)?,
        };

        Ok(Self::new(timestamp, signals, score))
    }
}

/// Append-only CSV file of score records
#[derive(Debug, Clone)]
pub struct ScoreLog {
    path: PathBuf,
}

impl ScoreLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, writing the header first if the file is new
    pub fn append(&self, record: &ScoreRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let needs_header = fs::metadata(&self.path)
            .map(|meta| meta.len() == 0)
            .unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open score log {}", self.path.display()))?;

        let mut writer = csv::Writer::from_writer(file);
        if needs_header {
            writer.write_record(HEADER)?;
        }
        writer.write_record(record.to_row())?;
        writer
            .flush()
            .with_context(|| format!("Failed to write score log {}", self.path.display()))?;

        log::info!("Appended score record to {}", self.path.display());
        Ok(())
    }

    /// Read the last `limit` records, oldest first
    ///
    /// A missing file has no records.
    pub fn read_recent(&self, limit: usize) -> Result<Vec<ScoreRecord>> {
        if !self.path.exists() {
            log::debug!("No score log at {}", self.path.display());
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open score log {}", self.path.display()))?;

        let mut records = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let row = row?;
            // line 1 is the header
            let record = ScoreRecord::from_row(&row)
                .with_context(|| format!("Malformed score log line {}", index + 2))?;
            records.push(record);
        }

        let start = records.len().saturating_sub(limit);
        Ok(records.split_off(start))
    }
}
