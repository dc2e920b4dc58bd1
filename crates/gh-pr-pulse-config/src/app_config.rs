//! Application configuration
//!
//! Configuration loaded from `.gh-pr-pulse.toml`.

use crate::{load_config_file, DEFAULT_HOST};
use anyhow::{Context, Result};
use gh_pr_pulse_scorer::ScoreWeights;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Where pull request metadata comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// The `gh` command line tool
    #[default]
    Gh,
    /// The GitHub REST API
    Api,
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gh" => Ok(SourceKind::Gh),
            "api" => Ok(SourceKind::Api),
            other => Err(format!("unknown source '{}', expected 'gh' or 'api'", other)),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Gh => f.write_str("gh"),
            SourceKind::Api => f.write_str("api"),
        }
    }
}

/// Application configuration loaded from `.gh-pr-pulse.toml`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Repository to evaluate as `owner/name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Branch the pull requests target
    #[serde(default = "default_base_branch")]
    pub base_branch: String,

    /// GitHub host (None = github.com)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Data source for pull request metadata
    #[serde(default)]
    pub source: SourceKind,

    /// Maximum number of pull requests fetched per query
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: u32,

    /// Label marking pull requests that wait for approval
    #[serde(default = "default_awaiting_approval_label")]
    pub awaiting_approval_label: String,

    /// Label marking pull requests that are approved and ready for merge
    #[serde(default = "default_ready_for_merge_label")]
    pub ready_for_merge_label: String,

    /// CSV score log (default: data directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Signal weights
    #[serde(default)]
    pub weights: ScoreWeights,
}

fn default_base_branch() -> String {
    "main".to_string()
}

fn default_fetch_limit() -> u32 {
    100
}

fn default_awaiting_approval_label() -> String {
    "Awaiting Approval".to_string()
}

fn default_ready_for_merge_label() -> String {
    "Ready For Merge".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            repository: None,
            base_branch: default_base_branch(),
            host: None,
            source: SourceKind::default(),
            fetch_limit: default_fetch_limit(),
            awaiting_approval_label: default_awaiting_approval_label(),
            ready_for_merge_label: default_ready_for_merge_label(),
            log_file: None,
            weights: ScoreWeights::default(),
        }
    }
}

impl AppConfig {
    /// Load config from an explicit path, CWD or home directory, or use defaults
    ///
    /// A config file that exists but does not parse, or carries invalid
    /// weights, is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match load_config_file(explicit)? {
            Some(source) => {
                let config = Self::from_toml_str(&source.content)
                    .with_context(|| format!("Invalid config file {}", source.path.display()))?;
                log::info!("Loaded app config from {}", source.path.display());
                Ok(config)
            }
            None => {
                log::debug!("Using default app config");
                Ok(Self::default())
            }
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot express
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        if self.fetch_limit == 0 {
            anyhow::bail!("fetch_limit must be greater than zero");
        }
        Ok(())
    }

    /// Set the host, normalizing github.com and empty strings to None
    pub fn set_host(&mut self, host: Option<String>) {
        self.host = host.filter(|h| h != DEFAULT_HOST && !h.is_empty());
    }

    /// Get the effective host (defaults to github.com)
    pub fn effective_host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Path of the CSV score log, falling back to the data directory
    pub fn log_file_path(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => crate::default_log_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.repository.is_none());
        assert_eq!(config.base_branch, "main");
        assert_eq!(config.source, SourceKind::Gh);
        assert_eq!(config.fetch_limit, 100);
        assert_eq!(config.awaiting_approval_label, "Awaiting Approval");
        assert_eq!(config.ready_for_merge_label, "Ready For Merge");
        assert_eq!(config.weights, ScoreWeights::default());
        assert_eq!(config.effective_host(), DEFAULT_HOST);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            repository = "octocat/Hello-World"
            base_branch = "prod"
            source = "api"
        "#;
        let config = AppConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.repository.as_deref(), Some("octocat/Hello-World"));
        assert_eq!(config.base_branch, "prod");
        assert_eq!(config.source, SourceKind::Api);
        // Other fields should use defaults
        assert_eq!(config.ready_for_merge_label, "Ready For Merge");
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_config_weights_table() {
        let toml = r#"
            [weights]
            backlog = 4.0
            activity = 1.0
            delay = 3.0
            queue = 2.0
        "#;
        let config = AppConfig::from_toml_str(toml).unwrap();
        assert_eq!(
            config.weights,
            ScoreWeights::new(4.0, 1.0, 3.0, 2.0).unwrap()
        );
    }

    #[test]
    fn test_config_rejects_invalid_weights() {
        let toml = r#"
            [weights]
            delay = 0.0
        "#;
        let err = AppConfig::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("delay"));
    }

    #[test]
    fn test_config_rejects_zero_fetch_limit() {
        assert!(AppConfig::from_toml_str("fetch_limit = 0").is_err());
    }

    #[test]
    fn test_config_rejects_unknown_source() {
        assert!(AppConfig::from_toml_str("source = \"graphql\"").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "repository = \"rust-lang/rust\"").unwrap();
        writeln!(file, "log_file = \"/tmp/pulse.csv\"").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.repository.as_deref(), Some("rust-lang/rust"));
        assert_eq!(config.log_file_path().unwrap(), PathBuf::from("/tmp/pulse.csv"));
    }

    #[test]
    fn test_load_explicit_file_with_syntax_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "repository = ").unwrap();

        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().starts_with("Invalid config file"));
    }

    #[test]
    fn test_host_normalization() {
        let mut config = AppConfig::default();
        config.set_host(Some("ghe.example.com".to_string()));
        assert_eq!(config.effective_host(), "ghe.example.com");

        config.set_host(Some("github.com".to_string()));
        assert!(config.host.is_none());

        config.set_host(Some(String::new()));
        assert!(config.host.is_none());
    }

    #[test]
    fn test_source_kind_from_str() {
        assert_eq!("gh".parse::<SourceKind>(), Ok(SourceKind::Gh));
        assert_eq!("API".parse::<SourceKind>(), Ok(SourceKind::Api));
        assert!("rest".parse::<SourceKind>().is_err());
        assert_eq!(SourceKind::Api.to_string(), "api");
    }
}
