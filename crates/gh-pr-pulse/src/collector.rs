//! Signal collection
//!
//! Turns pull request metadata into the four review-pipeline signals.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use gh_client::{PullRequestSource, PullRequestSummary, RepoRef};
use gh_pr_pulse_scorer::Signals;
use log::{debug, warn};

/// Gathers one evaluation cycle's signals from a pull request source
pub struct SignalCollector {
    source: Box<dyn PullRequestSource>,
    repo: RepoRef,
    awaiting_approval_label: String,
    ready_for_merge_label: String,
}

impl SignalCollector {
    pub fn new(
        source: Box<dyn PullRequestSource>,
        repo: RepoRef,
        awaiting_approval_label: impl Into<String>,
        ready_for_merge_label: impl Into<String>,
    ) -> Self {
        Self {
            source,
            repo,
            awaiting_approval_label: awaiting_approval_label.into(),
            ready_for_merge_label: ready_for_merge_label.into(),
        }
    }

    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    /// Fetch metadata and derive the signals as of `now`
    ///
    /// A repository without any merged pull request is an error, since the
    /// time since the last merge is undefined.
    pub async fn collect(&self, now: DateTime<Utc>) -> Result<Signals> {
        let last_merged = self
            .source
            .fetch_last_merged(&self.repo)
            .await?
            .with_context(|| {
                format!(
                    "Failed to get last merged PR time for {} (base {})",
                    self.repo.slug(),
                    self.repo.base_branch
                )
            })?;
        debug!(
            "Last merged PR #{} at {}",
            last_merged.number, last_merged.merged_at
        );

        let open_pr_count = self.source.fetch_open_pull_requests(&self.repo).await?.len() as u64;

        let oldest_waiting_age = self.oldest_age(&self.awaiting_approval_label, now).await?;
        let oldest_ready_age = self.oldest_age(&self.ready_for_merge_label, now).await?;

        Signals::new(
            open_pr_count,
            hours_since(last_merged.merged_at, now),
            oldest_waiting_age,
            oldest_ready_age,
        )
        .context("Collected signals are out of range")
    }

    /// Age in hours of the oldest open PR carrying `label`, 0 if there is none
    async fn oldest_age(&self, label: &str, now: DateTime<Utc>) -> Result<f64> {
        let prs = self
            .source
            .fetch_labeled_pull_requests(&self.repo, label)
            .await?;

        Ok(oldest(&prs)
            .map(|pr| {
                debug!("Oldest PR labeled '{}' is #{}", label, pr.number);
                hours_since(pr.created_at, now)
            })
            .unwrap_or(0.0))
    }
}

fn oldest(prs: &[PullRequestSummary]) -> Option<&PullRequestSummary> {
    prs.iter().min_by_key(|pr| pr.created_at)
}

/// Elapsed hours from `then` to `now`
///
/// Timestamps in the future (clock skew) count as zero elapsed time.
pub fn hours_since(then: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - then).num_milliseconds();
    if millis < 0 {
        warn!("Timestamp {} lies in the future, treating as 0h", then);
        return 0.0;
    }
    millis as f64 / 3_600_000.0
}
