//! Data directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.local/share/gh-pr-pulse/`
//! - macOS: `~/Library/Application Support/gh-pr-pulse/`
//! - Windows: `%APPDATA%\gh-pr-pulse\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "gh-pr-pulse";
const LOG_FILE: &str = "pulse-log.csv";

/// Get the application data directory, creating it if needed
pub fn data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("Could not determine data directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
    Ok(dir)
}

/// Get path to the default score log
pub fn default_log_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(LOG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_exists() {
        let dir = data_dir().unwrap();
        assert!(dir.exists());
        assert!(dir.ends_with(APP_NAME));
    }

    #[test]
    fn test_default_log_path() {
        let path = default_log_path().unwrap();
        assert!(path.ends_with(LOG_FILE));
        assert!(path.parent().unwrap().ends_with(APP_NAME));
    }
}
