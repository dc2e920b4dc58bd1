use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = ".gh-pr-pulse.toml";

/// A config file that was found and read
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub content: String,
}

/// Load config file content
///
/// With an explicit path, that file must exist. Otherwise searches for
/// `.gh-pr-pulse.toml` in:
/// 1. Current working directory
/// 2. Home directory
///
/// Returns `None` if no config file was found.
pub fn load_config_file(explicit: Option<&Path>) -> Result<Option<ConfigSource>> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        return Ok(Some(ConfigSource {
            path: path.to_path_buf(),
            content,
        }));
    }

    let candidates = std::iter::once(PathBuf::from(CONFIG_FILE)).chain(home_config_path());
    for path in candidates {
        if let Ok(content) = std::fs::read_to_string(&path) {
            log::debug!("Loaded config from {}", path.display());
            return Ok(Some(ConfigSource { path, content }));
        }
    }

    Ok(None)
}

/// Get the path to the config file in the home directory
fn home_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_branch = \"prod\"").unwrap();

        let source = load_config_file(Some(file.path())).unwrap().unwrap();
        assert_eq!(source.path, file.path());
        assert!(source.content.contains("prod"));
    }

    #[test]
    fn test_explicit_path_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_config_file(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
    }
}
