//! Pull request metadata sources
//!
//! This crate provides a trait-based source of the pull request metadata that
//! feeds the review-pipeline signals, with two interchangeable backends.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │            PullRequestSource trait               │
//! │  - fetch_last_merged()                           │
//! │  - fetch_open_pull_requests()                    │
//! │  - fetch_labeled_pull_requests()                 │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌─────────────────────┐
//! │ GhCliClient     │         │ OctocrabClient      │
//! │ (gh pr list)    │         │ (REST API + token)  │
//! └─────────────────┘         └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_client::{GhCliClient, PullRequestSource, RepoRef};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let repo = RepoRef::parse("rust-lang/rust", "master", None)?;
//! let client = GhCliClient::new(100);
//!
//! let open = client.fetch_open_pull_requests(&repo).await?;
//! println!("{} open PRs", open.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod gh_cli_client;
pub mod octocrab_client;
pub mod token;
pub mod types;

pub use client::PullRequestSource;
pub use gh_cli_client::GhCliClient;
pub use octocrab_client::OctocrabClient;
pub use token::TokenResolver;
pub use types::{
    parse_timestamp, MergedPullRequest, PullRequestSummary, RepoRef, RepoRefError,
    TimestampError, TIMESTAMP_FORMAT,
};
