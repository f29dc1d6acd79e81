//! Per-ticker memoisation of prepared datasets.

use crate::error::PipelineResult;
use crate::preprocessing::PreparedDataset;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};
use tracing::info;

/// In-memory cache of prepared datasets keyed by the raw ticker string.
///
/// Keys are case-sensitive and never normalised. Entries live until the cache
/// is dropped: there is no eviction, TTL or size bound, so data is never
/// refreshed within a process.
///
/// The lock guards only map access and is not held while a dataset is being
/// built. Two concurrent misses for the same ticker therefore both run the
/// builder, and the last insert wins.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: RwLock<HashMap<String, Arc<PreparedDataset>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached dataset for `ticker`, if any
    pub fn get(&self, ticker: &str) -> Option<Arc<PreparedDataset>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(ticker).cloned()
    }

    /// Store a dataset, replacing any existing entry
    pub fn insert(&self, ticker: &str, dataset: PreparedDataset) -> Arc<PreparedDataset> {
        let dataset = Arc::new(dataset);
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(ticker.to_string(), Arc::clone(&dataset));
        dataset
    }

    /// Return the cached dataset or run `build` and cache its result.
    ///
    /// Only successful builds are stored; errors are returned as-is and the
    /// next call for the same ticker tries again.
    pub async fn get_or_build<F, Fut>(&self, ticker: &str, build: F) -> PipelineResult<Arc<PreparedDataset>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = PipelineResult<PreparedDataset>>,
    {
        if let Some(hit) = self.get(ticker) {
            info!("Cache hit for {}", ticker);
            return Ok(hit);
        }

        info!("Cache miss for {}", ticker);
        let dataset = build().await?;
        Ok(self.insert(ticker, dataset))
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(ticker)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
