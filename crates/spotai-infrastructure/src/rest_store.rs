//! RestStore - PostgREST implementation of the remote row store.
//!
//! Talks to a Supabase-style REST endpoint:
//! - `POST /rest/v1/user_results` to insert result rows
//! - `GET|POST /rest/v1/round_stats` to read and upsert counters
//! - `POST /rest/v1/rpc/<function>` for the optional server-side functions

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use spotai_core::config::StoreConfig;
use spotai_core::error::{Result, SpotaiError};
use spotai_core::stats::{AggregateRoundStat, RoundCounters};
use spotai_core::store::{RemoteStore, UserResultRow};
use std::time::Duration;

const USER_RESULTS_TABLE: &str = "user_results";
const ROUND_STATS_TABLE: &str = "round_stats";

/// Remote store backed by a PostgREST API.
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    aggregate_function: Option<String>,
    increment_function: String,
}

#[derive(Debug, Serialize)]
struct IncrementRequest {
    round_number: u32,
    is_correct: bool,
}

impl RestStore {
    /// Creates a store for `base_url` (the project URL, without `/rest/v1`).
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            timeout,
            aggregate_function: None,
            increment_function: "increment_round_stat".to_string(),
        }
    }

    /// Builds a store from `[store]` config. Returns `None` when no URL is set.
    pub fn from_config(config: &StoreConfig) -> Option<Self> {
        if !config.is_enabled() {
            return None;
        }
        let url = config.url.clone()?;
        let store = Self::new(url, config.api_key.clone(), config.request_timeout())
            .with_increment_function(config.increment_function.clone());
        Some(match &config.aggregate_function {
            Some(function) => store.with_aggregate_function(function.clone()),
            None => store,
        })
    }

    /// Sets the RPC that returns precomputed per-round percentages.
    pub fn with_aggregate_function(mut self, function: impl Into<String>) -> Self {
        self.aggregate_function = Some(function.into());
        self
    }

    /// Sets the RPC used for atomic counter increments.
    pub fn with_increment_function(mut self, function: impl Into<String>) -> Self {
        self.increment_function = function.into();
        self
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, function)
    }

    /// Adds the API key headers and the request timeout.
    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.timeout(self.timeout);
        match &self.api_key {
            Some(key) => request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Response> {
        let response = self
            .authed(request)
            .send()
            .await
            .map_err(|e| self.transport_error(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SpotaiError::remote(
                status.as_u16(),
                format!("{}: {}", operation, error_text),
            ));
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T> {
        self.send(operation, request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| {
                SpotaiError::data_access(format!("Failed to parse {} response: {}", operation, e))
            })
    }

    fn transport_error(&self, operation: &str, error: reqwest::Error) -> SpotaiError {
        if error.is_timeout() {
            SpotaiError::timeout(operation, self.timeout)
        } else {
            SpotaiError::data_access(format!("{} failed: {}", operation, error))
        }
    }
}

#[async_trait]
impl RemoteStore for RestStore {
    async fn insert_user_results(&self, rows: &[UserResultRow]) -> Result<()> {
        let request = self
            .client
            .post(self.table_url(USER_RESULTS_TABLE))
            .header("Prefer", "return=minimal")
            .json(rows);
        self.send("insert user results", request).await?;
        Ok(())
    }

    async fn fetch_round_counters(&self, round_number: u32) -> Result<Option<RoundCounters>> {
        let request = self.client.get(self.table_url(ROUND_STATS_TABLE)).query(&[
            ("select", "*".to_string()),
            ("round_number", format!("eq.{}", round_number)),
        ]);
        let rows: Vec<RoundCounters> = self.send_json("fetch round stats", request).await?;
        Ok(rows.into_iter().next())
    }

    async fn write_round_counters(&self, counters: &RoundCounters) -> Result<()> {
        let request = self
            .client
            .post(self.table_url(ROUND_STATS_TABLE))
            .query(&[("on_conflict", "round_number")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(counters);
        self.send("write round stats", request).await?;
        Ok(())
    }

    async fn fetch_all_round_counters(&self) -> Result<Vec<RoundCounters>> {
        let request = self
            .client
            .get(self.table_url(ROUND_STATS_TABLE))
            .query(&[("select", "*"), ("order", "round_number.asc")]);
        self.send_json("fetch all round stats", request).await
    }

    async fn fetch_precomputed_stats(&self) -> Result<Option<Vec<AggregateRoundStat>>> {
        let Some(function) = &self.aggregate_function else {
            return Ok(None);
        };
        let request = self
            .client
            .post(self.rpc_url(function))
            .json(&serde_json::json!({}));
        let stats: Vec<AggregateRoundStat> =
            self.send_json("fetch precomputed stats", request).await?;
        Ok(Some(stats))
    }

    async fn increment_round_counter(&self, round_number: u32, is_correct: bool) -> Result<()> {
        let request = self
            .client
            .post(self.rpc_url(&self.increment_function))
            .json(&IncrementRequest {
                round_number,
                is_correct,
            });
        self.send("increment round stat", request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: Option<&str>) -> StoreConfig {
        StoreConfig {
            url: url.map(str::to_string),
            api_key: Some("anon-key".to_string()),
            aggregate_function: Some("round_percentages".to_string()),
            ..StoreConfig::default()
        }
    }

    #[test]
    fn test_from_config_requires_url() {
        assert!(RestStore::from_config(&config(None)).is_none());
        assert!(RestStore::from_config(&config(Some("  "))).is_none());
    }

    #[test]
    fn test_from_config() {
        let store = RestStore::from_config(&config(Some("https://demo.supabase.co/"))).unwrap();
        assert_eq!(store.base_url, "https://demo.supabase.co");
        assert_eq!(store.timeout, Duration::from_secs(5));
        assert_eq!(store.aggregate_function.as_deref(), Some("round_percentages"));
        assert_eq!(store.increment_function, "increment_round_stat");
    }

    #[test]
    fn test_urls() {
        let store = RestStore::new("https://demo.supabase.co", None, Duration::from_secs(5));
        assert_eq!(
            store.table_url(USER_RESULTS_TABLE),
            "https://demo.supabase.co/rest/v1/user_results"
        );
        assert_eq!(
            store.rpc_url("increment_round_stat"),
            "https://demo.supabase.co/rest/v1/rpc/increment_round_stat"
        );
    }

    #[test]
    fn test_auth_headers() {
        let store = RestStore::new(
            "https://demo.supabase.co",
            Some("anon-key".to_string()),
            Duration::from_secs(5),
        );
        let request = store
            .authed(store.client.get(store.table_url(ROUND_STATS_TABLE)))
            .build()
            .unwrap();
        assert_eq!(request.headers()["apikey"], "anon-key");
        assert_eq!(request.headers()["Authorization"], "Bearer anon-key");
        assert_eq!(request.timeout(), Some(&Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_no_aggregate_function_means_none() {
        let store = RestStore::new("http://127.0.0.1:9", None, Duration::from_millis(100));
        assert_eq!(store.fetch_precomputed_stats().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unreachable_store_is_remote_error() {
        // port 9 (discard) is not expected to serve HTTP
        let store = RestStore::new("http://127.0.0.1:9", None, Duration::from_millis(500));
        let err = store.fetch_all_round_counters().await.unwrap_err();
        assert!(err.is_remote());
    }

    #[test]
    fn test_user_result_row_shape() {
        let token = spotai_core::session::SessionToken::generate();
        let row = UserResultRow {
            session_id: token,
            round_number: 3,
            is_correct: false,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["session_id"], token.to_string());
        assert_eq!(json["round_number"], 3);
        assert_eq!(json["is_correct"], false);
    }
}
