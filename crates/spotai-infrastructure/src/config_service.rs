//! Configuration loading.
//!
//! Reads `config.toml` and layers environment overrides on top:
//! `SPOTAI_STORE_URL` and `SPOTAI_STORE_KEY` replace the store URL and key.

use crate::paths::SpotaiPaths;
use spotai_core::config::ConfigRoot;
use spotai_core::error::{Result, SpotaiError};
use std::path::{Path, PathBuf};

pub const ENV_STORE_URL: &str = "SPOTAI_STORE_URL";
pub const ENV_STORE_KEY: &str = "SPOTAI_STORE_KEY";

/// Loads [`ConfigRoot`] from a TOML file.
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses `~/.config/spotai/config.toml`.
    pub fn new_default() -> Result<Self> {
        Ok(Self::new(SpotaiPaths::config_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file (defaults when it does not exist), applies process
    /// environment overrides and validates the result.
    pub async fn load(&self) -> Result<ConfigRoot> {
        self.load_with_env(|key| std::env::var(key).ok()).await
    }

    pub async fn load_with_env<F>(&self, env: F) -> Result<ConfigRoot>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => toml::from_str::<ConfigRoot>(&content).map_err(|e| {
                SpotaiError::config(format!("{}: {}", self.path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "[ConfigService] No config at {}, using defaults",
                    self.path.display()
                );
                ConfigRoot::default()
            }
            Err(e) => return Err(e.into()),
        };

        apply_env_overrides(&mut config, env);
        config.validate()?;

        tracing::info!(
            "[ConfigService] Loaded config: {}s per game, shuffle {}, store {}",
            config.game.round_seconds,
            config.game.shuffle,
            if config.store.is_enabled() { "enabled" } else { "disabled" }
        );
        Ok(config)
    }

    /// Writes `config` to the file, creating parent directories.
    pub async fn save(&self, config: &ConfigRoot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = toml::to_string_pretty(config)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

fn apply_env_overrides<F>(config: &mut ConfigRoot, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = env(ENV_STORE_URL).filter(|v| !v.trim().is_empty()) {
        config.store.url = Some(url);
    }
    if let Some(key) = env(ENV_STORE_KEY).filter(|v| !v.trim().is_empty()) {
        config.store.api_key = Some(key);
    }
}
