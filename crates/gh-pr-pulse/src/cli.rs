//! Command line interface

use clap::{Parser, Subcommand};
use gh_pr_pulse_config::{AppConfig, SourceKind};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gh-pr-pulse",
    version,
    about = "Pulse-check a repository's pull request review pipeline",
    long_about = "Combines the open PR count, the time since the last merge and the age of \
                  the oldest PRs awaiting approval and ready for merge into a risk basis and \
                  a confidence percentage, prints them and appends them to a CSV log."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Explicit config file (default: ./.gh-pr-pulse.toml, then ~/.gh-pr-pulse.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Repository to evaluate
    #[arg(short, long, global = true, value_name = "OWNER/NAME")]
    pub repo: Option<String>,

    /// Base branch the pull requests target
    #[arg(short, long, global = true, value_name = "BRANCH")]
    pub base: Option<String>,

    /// GitHub host for enterprise installations
    #[arg(long, global = true, value_name = "HOST")]
    pub host: Option<String>,

    /// Data source: gh or api
    #[arg(long, global = true, value_name = "SOURCE")]
    pub source: Option<SourceKind>,

    /// CSV score log
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Do not append to the CSV score log
    #[arg(long, global = true)]
    pub no_log: bool,

    /// Re-run every MINUTES minutes until interrupted (at most one week)
    #[arg(
        long,
        global = true,
        value_name = "MINUTES",
        value_parser = clap::value_parser!(u64).range(1..=10_080)
    )]
    pub interval: Option<u64>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch signals, score, print and append to the log (default)
    Run,
    /// Score the built-in what-if scenarios with the configured weights
    Scenarios,
    /// Print the most recent score log records
    History {
        /// Number of records to show
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
}

impl Cli {
    /// The selected command, `run` when none was given
    pub fn selected_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }

    /// Let command line flags take precedence over the config file
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(repo) = &self.repo {
            config.repository = Some(repo.clone());
        }
        if let Some(base) = &self.base {
            config.base_branch = base.clone();
        }
        if let Some(host) = &self.host {
            config.set_host(Some(host.clone()));
        }
        if let Some(source) = self.source {
            config.source = source;
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = Some(log_file.clone());
        }
    }
}
