//! `gh` CLI-backed pull request source
//!
//! Runs `gh pr list ... --json ...` and parses the JSON it prints. The `gh`
//! installation handles authentication and enterprise hosts.

use crate::client::{warn_if_truncated, PullRequestSource};
use crate::types::{parse_timestamp, MergedPullRequest, PullRequestSummary, RepoRef};
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

const DEFAULT_PROGRAM: &str = "gh";

/// `--json` fields of the open and labeled queries
const OPEN_FIELDS: &str = "number,createdAt";

/// `--json` fields of the merged query
const MERGED_FIELDS: &str = "number,mergedAt";

/// Search qualifier that lists the oldest pull requests first
const OLDEST_FIRST: &str = "sort:created-asc";

/// Pull request states understood by `gh pr list --state`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListState {
    Open,
    Merged,
}

impl ListState {
    fn as_arg(self) -> &'static str {
        match self {
            ListState::Open => "open",
            ListState::Merged => "merged",
        }
    }
}

/// Raw entry of `gh pr list --json number,createdAt,mergedAt`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GhPullRequest {
    number: u64,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    merged_at: Option<String>,
}

/// Pull request source that shells out to the `gh` CLI
#[derive(Debug, Clone)]
pub struct GhCliClient {
    program: String,
    limit: u32,
}

impl GhCliClient {
    /// Create a client that runs `gh` from `PATH`
    ///
    /// `limit` is passed as `--limit` to every query.
    pub fn new(limit: u32) -> Self {
        Self::with_program(DEFAULT_PROGRAM, limit)
    }

    /// Create a client that runs a specific executable
    pub fn with_program(program: impl Into<String>, limit: u32) -> Self {
        Self {
            program: program.into(),
            limit,
        }
    }

    /// Build the argument list for one `gh pr list` call
    fn list_args(
        &self,
        repo: &RepoRef,
        state: ListState,
        fields: &str,
        label: Option<&str>,
    ) -> Vec<String> {
        let repo_arg = match &repo.host {
            Some(host) => format!("{}/{}", host, repo.slug()),
            None => repo.slug(),
        };

        let mut args = vec![
            "pr".to_string(),
            "list".to_string(),
            "--repo".to_string(),
            repo_arg,
            "--base".to_string(),
            repo.base_branch.clone(),
            "--state".to_string(),
            state.as_arg().to_string(),
            "--limit".to_string(),
            self.limit.to_string(),
            "--json".to_string(),
            fields.to_string(),
        ];

        // gh lists newest first; a cut-off label query must keep the oldest
        if let Some(label) = label {
            args.push("--label".to_string());
            args.push(label.to_string());
            args.push("--search".to_string());
            args.push(OLDEST_FIRST.to_string());
        }

        args
    }

    /// Run the CLI and return its stdout
    async fn run(&self, args: &[String]) -> Result<String> {
        let command_line = format!("{} {}", self.program, args.join(" "));
        debug!("Running {}", command_line);

        let output = tokio::process::Command::new(&self.program)
            .args(args)
            .output()
            .await
            .with_context(|| format!("Failed to run '{}'", command_line))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Command '{}' failed: {}", command_line, stderr.trim());
        }

        String::from_utf8(output.stdout)
            .with_context(|| format!("Invalid UTF-8 in output of '{}'", command_line))
    }
}

#[async_trait]
impl PullRequestSource for GhCliClient {
    async fn fetch_last_merged(&self, repo: &RepoRef) -> Result<Option<MergedPullRequest>> {
        let args = self.list_args(repo, ListState::Merged, MERGED_FIELDS, None);
        let stdout = self.run(&args).await?;
        let merged = parse_merged_list(&stdout)?;

        debug!("Fetched {} merged PRs for {}", merged.len(), repo.slug());
        Ok(merged.into_iter().max_by_key(|pr| pr.merged_at))
    }

    async fn fetch_open_pull_requests(&self, repo: &RepoRef) -> Result<Vec<PullRequestSummary>> {
        let args = self.list_args(repo, ListState::Open, OPEN_FIELDS, None);
        let stdout = self.run(&args).await?;
        let prs = parse_pull_request_list(&stdout)?;

        debug!("Fetched {} open PRs for {}", prs.len(), repo.slug());
        warn_if_truncated(prs.len(), self.limit, "open PRs", repo);
        Ok(prs)
    }

    async fn fetch_labeled_pull_requests(
        &self,
        repo: &RepoRef,
        label: &str,
    ) -> Result<Vec<PullRequestSummary>> {
        let args = self.list_args(repo, ListState::Open, OPEN_FIELDS, Some(label));
        let stdout = self.run(&args).await?;
        let prs = parse_pull_request_list(&stdout)?;

        debug!(
            "Fetched {} open PRs labeled '{}' for {}",
            prs.len(),
            label,
            repo.slug()
        );
        warn_if_truncated(prs.len(), self.limit, &format!("PRs labeled '{}'", label), repo);
        Ok(prs)
    }
}

/// Parse `gh pr list --json number,createdAt` output
pub fn parse_pull_request_list(json: &str) -> Result<Vec<PullRequestSummary>> {
    let raw: Vec<GhPullRequest> = parse_json(json)?;
    raw.into_iter()
        .map(|pr| -> Result<PullRequestSummary> {
            let created_at = pr
                .created_at
                .with_context(|| format!("PR #{} has no createdAt", pr.number))?;
            Ok(PullRequestSummary {
                number: pr.number,
                created_at: parse_timestamp(&created_at)
                    .with_context(|| format!("Failed to parse createdAt of PR #{}", pr.number))?,
            })
        })
        .collect()
}

/// Parse `gh pr list --json number,mergedAt` output
///
/// Entries without a merge time are skipped.
pub fn parse_merged_list(json: &str) -> Result<Vec<MergedPullRequest>> {
    let raw: Vec<GhPullRequest> = parse_json(json)?;
    raw.into_iter()
        .filter_map(|pr| pr.merged_at.map(|merged_at| (pr.number, merged_at)))
        .map(|(number, merged_at)| -> Result<MergedPullRequest> {
            Ok(MergedPullRequest {
                number,
                merged_at: parse_timestamp(&merged_at)
                    .with_context(|| format!("Failed to parse mergedAt of PR #{}", number))?,
            })
        })
        .collect()
}

fn parse_json(json: &str) -> Result<Vec<GhPullRequest>> {
    // gh prints nothing at all for some empty results
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(json).with_context(|| format!("Error parsing JSON: {}", json.trim()))
}
