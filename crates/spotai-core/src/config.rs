use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, SpotaiError};
use crate::session::SessionSettings;
use crate::store::StatsUpdateMode;

pub const DEFAULT_ROUND_SECONDS: u32 = 180;
pub const DEFAULT_CHOICE_LOCK_MS: u64 = 50;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_MEDIA_BASE: &str = "/videos";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ConfigRoot {
    pub game: GameConfig,
    pub store: StoreConfig,
    pub stats: StatsConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub round_seconds: u32,
    pub shuffle: bool,
    pub choice_lock_ms: u64,
    /// TOML deck replacing the built-in one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deck_file: Option<PathBuf>,
    /// Prefix for the built-in deck's clip URIs.
    pub media_base: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_seconds: DEFAULT_ROUND_SECONDS,
            shuffle: true,
            choice_lock_ms: DEFAULT_CHOICE_LOCK_MS,
            deck_file: None,
            media_base: DEFAULT_MEDIA_BASE.to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the row store. Results are not submitted when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
    pub update_mode: StatsUpdateMode,
    /// Server-side function returning precomputed per-round percentages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_function: Option<String>,
    /// Server-side function used when `update_mode` is `atomic`.
    pub increment_function: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            update_mode: StatsUpdateMode::default(),
            aggregate_function: None,
            increment_function: "increment_round_stat".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn is_enabled(&self) -> bool {
        self.url.as_deref().is_some_and(|url| !url.trim().is_empty())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StatsConfig {
    pub cache_ttl_secs: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl StatsConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl ConfigRoot {
    /// Rejects values the game cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.game.round_seconds == 0 {
            return Err(SpotaiError::config("game.round_seconds must be greater than 0"));
        }
        if self.store.request_timeout_secs == 0 {
            return Err(SpotaiError::config(
                "store.request_timeout_secs must be greater than 0",
            ));
        }
        Ok(())
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            round_seconds: self.game.round_seconds,
            choice_lock: Duration::from_millis(self.game.choice_lock_ms),
            shuffle: self.game.shuffle,
        }
    }
}
