//! Octocrab-based pull request source
//!
//! Talks to the GitHub REST API directly. Useful where the `gh` CLI is not
//! installed but a token is available.

use crate::client::{warn_if_truncated, PullRequestSource};
use crate::token::TokenResolver;
use crate::types::{MergedPullRequest, PullRequestSummary, RepoRef};
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use octocrab::models::pulls::PullRequest as ApiPullRequest;
use octocrab::{params, Octocrab};
use std::sync::Arc;

/// Largest page GitHub serves
const MAX_PER_PAGE: u32 = 100;

/// Pull request source using octocrab
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
    limit: u32,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance
    ///
    /// `limit` caps the number of pull requests fetched per query.
    pub fn new(octocrab: Arc<Octocrab>, limit: u32) -> Self {
        Self { octocrab, limit }
    }

    /// Resolve a token and build a client for the given host (None = github.com)
    pub async fn connect(host: Option<&str>, limit: u32) -> Result<Self> {
        let token = TokenResolver::new().get_token(host).await?;

        let mut builder = Octocrab::builder().personal_token(token);
        if let Some(h) = host {
            let uri = format!("https://{}/api/v3", h);
            builder = builder.base_uri(&uri).context("Failed to set base URI")?;
        }

        let octocrab = builder.build().context("Failed to build Octocrab client")?;
        info!(
            "GitHub API client created for host: {}",
            host.unwrap_or(gh_pr_pulse_config::DEFAULT_HOST)
        );
        Ok(Self::new(Arc::new(octocrab), limit))
    }

    /// Fetch pull requests against the base branch
    ///
    /// Without a label the newest activity comes first. With a label the
    /// oldest pull requests come first, only those carrying the label are
    /// kept, and paging continues until `limit` of them are found.
    async fn list_pulls(
        &self,
        repo: &RepoRef,
        open: bool,
        label: Option<&str>,
    ) -> Result<Vec<ApiPullRequest>> {
        let limit = self.limit as usize;
        let per_page = self.limit.min(MAX_PER_PAGE) as u8;
        let mut prs = Vec::new();
        let mut page_num = 1u32;

        loop {
            let state = if open {
                params::State::Open
            } else {
                params::State::Closed
            };
            let (sort, direction) = list_order(label);
            let page = self
                .octocrab
                .pulls(&repo.owner, &repo.name)
                .list()
                .state(state)
                .base(repo.base_branch.as_str())
                .sort(sort)
                .direction(direction)
                .per_page(per_page)
                .page(page_num)
                .send()
                .await
                .with_context(|| format!("Failed to list pull requests for {}", repo.slug()))?;

            let page_is_empty = page.items.is_empty();
            let wanted = limit - prs.len();
            prs.extend(
                page.items
                    .into_iter()
                    .filter(|pr| label.is_none_or(|l| has_label(pr, l)))
                    .take(wanted),
            );

            if prs.len() >= limit || page_is_empty {
                break;
            }
            page_num += 1;
        }

        Ok(prs)
    }
}

#[async_trait]
impl PullRequestSource for OctocrabClient {
    async fn fetch_last_merged(&self, repo: &RepoRef) -> Result<Option<MergedPullRequest>> {
        debug!("Fetching merged PRs for {}", repo.slug());
        let closed = self.list_pulls(repo, false, None).await?;
        Ok(latest_merged(&closed))
    }

    async fn fetch_open_pull_requests(&self, repo: &RepoRef) -> Result<Vec<PullRequestSummary>> {
        debug!("Fetching open PRs for {}", repo.slug());
        let open = self.list_pulls(repo, true, None).await?;
        warn_if_truncated(open.len(), self.limit, "open PRs", repo);
        Ok(open.iter().filter_map(convert_pull_request).collect())
    }

    async fn fetch_labeled_pull_requests(
        &self,
        repo: &RepoRef,
        label: &str,
    ) -> Result<Vec<PullRequestSummary>> {
        debug!("Fetching open PRs labeled '{}' for {}", label, repo.slug());
        let labeled = self.list_pulls(repo, true, Some(label)).await?;
        warn_if_truncated(
            labeled.len(),
            self.limit,
            &format!("PRs labeled '{}'", label),
            repo,
        );
        Ok(labeled.iter().filter_map(convert_pull_request).collect())
    }
}

/// Sort order of a listing: oldest first for label queries
fn list_order(label: Option<&str>) -> (params::pulls::Sort, params::Direction) {
    match label {
        Some(_) => (params::pulls::Sort::Created, params::Direction::Ascending),
        None => (params::pulls::Sort::Updated, params::Direction::Descending),
    }
}

/// The pull request with the latest merge time, ignoring closed-unmerged ones
fn latest_merged(prs: &[ApiPullRequest]) -> Option<MergedPullRequest> {
    prs.iter()
        .filter_map(|pr| {
            pr.merged_at.map(|merged_at| MergedPullRequest {
                number: pr.number,
                merged_at,
            })
        })
        .max_by_key(|pr| pr.merged_at)
}

/// Convert an octocrab pull request, skipping entries without a creation time
fn convert_pull_request(pr: &ApiPullRequest) -> Option<PullRequestSummary> {
    pr.created_at.map(|created_at| PullRequestSummary {
        number: pr.number,
        created_at,
    })
}

fn has_label(pr: &ApiPullRequest, label: &str) -> bool {
    pr.labels
        .as_ref()
        .is_some_and(|labels| labels.iter().any(|l| l.name == label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// Build an API pull request the way GitHub serializes it
    fn api_pr(
        number: u64,
        created_at: Option<&str>,
        merged_at: Option<&str>,
        labels: &[&str],
    ) -> ApiPullRequest {
        let labels: Vec<_> = labels
            .iter()
            .enumerate()
            .map(|(i, name)| {
                json!({
                    "id": i + 1,
                    "node_id": format!("LA_{}", i + 1),
                    "url": format!("https://api.github.com/repos/octocat/Hello-World/labels/{}", i + 1),
                    "name": name,
                    "description": null,
                    "color": "ededed",
                    "default": false
                })
            })
            .collect();
        let branch = |name: &str| {
            json!({
                "label": format!("octocat:{}", name),
                "ref": name,
                "sha": "6dcb09b5b57875f334f61aebed695e2e4193db5e"
            })
        };

        serde_json::from_value(json!({
            "url": format!("https://api.github.com/repos/octocat/Hello-World/pulls/{}", number),
            "id": 1000 + number,
            "node_id": format!("PR_{}", number),
            "number": number,
            "state": if merged_at.is_some() { "closed" } else { "open" },
            "title": format!("Change {}", number),
            "created_at": created_at,
            "updated_at": created_at,
            "merged_at": merged_at,
            "labels": labels,
            "head": branch("feature"),
            "base": branch("main")
        }))
        .unwrap()
    }

    #[test]
    fn test_convert_pull_request() {
        let pr = api_pr(42, Some("2024-03-01T12:00:00Z"), None, &[]);
        assert_eq!(
            convert_pull_request(&pr),
            Some(PullRequestSummary {
                number: 42,
                created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            })
        );
    }

    #[test]
    fn test_convert_pull_request_without_creation_time() {
        let pr = api_pr(42, None, None, &[]);
        assert_eq!(convert_pull_request(&pr), None);
    }

    #[test]
    fn test_has_label_matches_exact_name() {
        let pr = api_pr(
            7,
            Some("2024-03-01T12:00:00Z"),
            None,
            &["bug", "Awaiting Approval"],
        );
        assert!(has_label(&pr, "Awaiting Approval"));
        assert!(!has_label(&pr, "awaiting approval"));
        assert!(!has_label(&pr, "Ready For Merge"));
    }

    #[test]
    fn test_has_label_without_labels() {
        let pr = api_pr(7, Some("2024-03-01T12:00:00Z"), None, &[]);
        assert!(!has_label(&pr, "Ready For Merge"));
    }

    #[test]
    fn test_latest_merged_picks_max_merge_time() {
        let prs = vec![
            api_pr(1, Some("2024-02-01T00:00:00Z"), Some("2024-03-01T10:00:00Z"), &[]),
            api_pr(2, Some("2024-02-02T00:00:00Z"), Some("2024-03-03T09:30:00Z"), &[]),
            // closed without merging
            api_pr(3, Some("2024-02-03T00:00:00Z"), None, &[]),
            api_pr(4, Some("2024-02-04T00:00:00Z"), Some("2024-03-02T18:00:00Z"), &[]),
        ];
        assert_eq!(
            latest_merged(&prs),
            Some(MergedPullRequest {
                number: 2,
                merged_at: Utc.with_ymd_and_hms(2024, 3, 3, 9, 30, 0).unwrap(),
            })
        );
    }

    #[test]
    fn test_latest_merged_none_when_nothing_merged() {
        let prs = vec![api_pr(3, Some("2024-02-03T00:00:00Z"), None, &[])];
        assert_eq!(latest_merged(&prs), None);
        assert_eq!(latest_merged(&[]), None);
    }

    #[test]
    fn test_label_queries_list_oldest_first() {
        assert!(matches!(
            list_order(Some("Ready For Merge")),
            (params::pulls::Sort::Created, params::Direction::Ascending)
        ));
        assert!(matches!(
            list_order(None),
            (params::pulls::Sort::Updated, params::Direction::Descending)
        ));
    }
}
