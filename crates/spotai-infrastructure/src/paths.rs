//! Unified path management for spotai files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/spotai/            # Config directory
//! ├── config.toml              # Game and store configuration
//! └── logs/                    # Application logs
//!     └── spotai.log.YYYY-MM-DD
//!
//! ~/.cache/spotai/             # Cache directory
//! └── stats/                   # Aggregate stats cache entries
//!     ├── round_stats_cache.json
//!     └── round_stats_cache_timestamp.json
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "spotai";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for spotai_core::SpotaiError {
    fn from(err: PathError) -> Self {
        spotai_core::SpotaiError::config(err.to_string())
    }
}

/// Platform directories for spotai.
pub struct SpotaiPaths;

impl SpotaiPaths {
    /// Returns the spotai configuration directory (e.g. `~/.config/spotai/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the spotai cache directory (e.g. `~/.cache/spotai/`).
    pub fn cache_dir() -> Result<PathBuf, PathError> {
        dirs::cache_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the directory holding the stats cache entries.
    pub fn stats_cache_dir() -> Result<PathBuf, PathError> {
        Ok(Self::cache_dir()?.join("stats"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file() {
        let config_file = SpotaiPaths::config_file().unwrap();
        assert!(config_file.ends_with("spotai/config.toml"));
        let config_dir = SpotaiPaths::config_dir().unwrap();
        assert!(config_file.starts_with(&config_dir));
    }

    #[test]
    fn test_stats_cache_dir() {
        let stats_dir = SpotaiPaths::stats_cache_dir().unwrap();
        assert!(stats_dir.ends_with("stats"));
        assert!(stats_dir.starts_with(SpotaiPaths::cache_dir().unwrap()));
    }

    #[test]
    fn test_logs_dir() {
        let logs_dir = SpotaiPaths::logs_dir().unwrap();
        assert!(logs_dir.ends_with("logs"));
        assert!(logs_dir.starts_with(SpotaiPaths::config_dir().unwrap()));
    }
}
