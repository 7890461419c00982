//! Composition root: config, deck and the service instances.

use anyhow::{Context, Result};
use spotai_application::{ResultSubmitter, StatsService};
use spotai_core::config::ConfigRoot;
use spotai_core::deck::RoundDeck;
use spotai_core::stats::StatsCache;
use spotai_core::store::RemoteStore;
use spotai_infrastructure::{ConfigService, FileStatsCache, RestStore, deck_file};
use std::sync::Arc;

pub struct AppContext {
    pub config: ConfigRoot,
    pub deck: RoundDeck,
    store: Option<Arc<dyn RemoteStore>>,
    cache: Arc<dyn StatsCache>,
}

impl AppContext {
    pub async fn bootstrap(config_service: &ConfigService) -> Result<Self> {
        let config = config_service
            .load()
            .await
            .with_context(|| format!("Failed to load {}", config_service.path().display()))?;

        let deck = deck_file::deck_for(&config.game)
            .await
            .context("Failed to load round deck")?;

        let store: Option<Arc<dyn RemoteStore>> = match RestStore::from_config(&config.store) {
            Some(store) => Some(Arc::new(store)),
            None => {
                tracing::info!("[Bootstrap] No store URL configured, playing offline");
                None
            }
        };
        let cache: Arc<dyn StatsCache> = Arc::new(FileStatsCache::new_default()?);

        tracing::info!(
            "[Bootstrap] Ready: {} rounds, store {}",
            deck.len(),
            if store.is_some() { "online" } else { "offline" }
        );

        Ok(Self {
            config,
            deck,
            store,
            cache,
        })
    }

    pub fn stats_service(&self) -> StatsService {
        StatsService::new(
            self.store.clone(),
            self.cache.clone(),
            self.config.stats.cache_ttl(),
            self.config.store.request_timeout(),
        )
    }

    pub fn submitter(&self) -> Option<ResultSubmitter> {
        self.store
            .clone()
            .map(|store| ResultSubmitter::new(store, self.config.store.update_mode))
    }
}
