//! Pull request data transfer objects
//!
//! These types carry only what the review-pipeline signals need. They are
//! intentionally separate from the gh CLI and octocrab representations.

use chrono::{DateTime, NaiveDateTime, Utc};
use gh_pr_pulse_config::DEFAULT_HOST;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Timestamp layout used by GitHub (`2024-03-01T12:00:00Z`)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A timestamp did not match [`TIMESTAMP_FORMAT`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timestamp '{input}', expected YYYY-MM-DDTHH:MM:SSZ")]
pub struct TimestampError {
    pub input: String,
}

/// Parse a GitHub UTC timestamp
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, TimestampError> {
    NaiveDateTime::parse_from_str(input.trim(), TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| TimestampError {
            input: input.to_string(),
        })
}

/// A repository slug could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoRefError {
    #[error("invalid repository '{0}', expected OWNER/NAME")]
    InvalidSlug(String),

    #[error("base branch must not be empty")]
    EmptyBranch,
}

/// A repository and the branch its pull requests target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    /// GitHub organization or user name
    pub owner: String,
    /// Repository name
    pub name: String,
    /// Base branch (e.g., "main")
    pub base_branch: String,
    /// GitHub host (None = github.com)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl RepoRef {
    /// Parse `OWNER/NAME` into a repository reference
    pub fn parse(
        slug: &str,
        base_branch: impl Into<String>,
        host: Option<String>,
    ) -> Result<Self, RepoRefError> {
        let mut parts = slug.trim().split('/');
        let (owner, name) = match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                (owner, name)
            }
            _ => return Err(RepoRefError::InvalidSlug(slug.to_string())),
        };

        let base_branch = base_branch.into();
        if base_branch.trim().is_empty() {
            return Err(RepoRefError::EmptyBranch);
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            base_branch,
            // Normalize github.com to None
            host: host.filter(|h| h != DEFAULT_HOST && !h.is_empty()),
        })
    }

    /// `OWNER/NAME`
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Check if this is a github.com repository
    pub fn is_github_com(&self) -> bool {
        self.host.is_none()
    }
}

/// An open pull request, reduced to what the signals need
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestSummary {
    /// PR number (e.g., 123)
    pub number: u64,
    /// When the PR was created
    pub created_at: DateTime<Utc>,
}

/// A merged pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedPullRequest {
    /// PR number
    pub number: u64,
    /// When the PR was merged
    pub merged_at: DateTime<Utc>,
}
