//! Pull request source trait
//!
//! This module defines the `PullRequestSource` trait that every metadata
//! backend must satisfy.

use crate::types::{MergedPullRequest, PullRequestSummary, RepoRef};
use async_trait::async_trait;
use log::warn;

/// Read-only access to the pull request metadata behind the review signals
///
/// Implementations can shell out to the `gh` CLI or talk to the GitHub API
/// directly. All queries are scoped to the repository's base branch.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::{PullRequestSource, RepoRef};
///
/// async fn backlog(source: &dyn PullRequestSource, repo: &RepoRef) -> anyhow::Result<usize> {
///     Ok(source.fetch_open_pull_requests(repo).await?.len())
/// }
/// ```
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    /// Fetch the most recently merged pull request
    ///
    /// # Returns
    ///
    /// `None` if nothing has been merged into the base branch yet.
    async fn fetch_last_merged(&self, repo: &RepoRef) -> anyhow::Result<Option<MergedPullRequest>>;

    /// Fetch open pull requests against the base branch
    async fn fetch_open_pull_requests(
        &self,
        repo: &RepoRef,
    ) -> anyhow::Result<Vec<PullRequestSummary>>;

    /// Fetch open pull requests against the base branch that carry `label`
    ///
    /// # Arguments
    ///
    /// * `repo` - Repository and base branch
    /// * `label` - Exact label name (e.g., "Ready For Merge")
    async fn fetch_labeled_pull_requests(
        &self,
        repo: &RepoRef,
        label: &str,
    ) -> anyhow::Result<Vec<PullRequestSummary>>;
}

/// Warn when a query returned exactly `limit` results
///
/// The result was most likely cut off, so counts and ages derived from it
/// only cover the first `limit` pull requests. Returns whether it was.
pub(crate) fn warn_if_truncated(len: usize, limit: u32, what: &str, repo: &RepoRef) -> bool {
    let truncated = len as u64 >= u64::from(limit);
    if truncated {
        warn!(
            "Fetched {} {} for {}, the fetch limit; results may be incomplete (raise fetch_limit)",
            len,
            what,
            repo.slug()
        );
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_if_truncated() {
        let repo = RepoRef::parse("octocat/Hello-World", "main", None).unwrap();
        assert!(warn_if_truncated(100, 100, "open PRs", &repo));
        assert!(!warn_if_truncated(99, 100, "open PRs", &repo));
        assert!(!warn_if_truncated(0, 100, "open PRs", &repo));
    }
}
