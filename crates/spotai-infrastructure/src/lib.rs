pub mod config_service;
pub mod deck_file;
pub mod file_stats_cache;
pub mod paths;
pub mod rest_store;

pub use crate::config_service::ConfigService;
pub use crate::file_stats_cache::FileStatsCache;
pub use crate::paths::SpotaiPaths;
pub use crate::rest_store::RestStore;
