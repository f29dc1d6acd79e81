//! End-to-end pipeline: fetch, features, split/scale, cache, predict.

use crate::api::{MarketDataSource, YahooClient};
use crate::cache::DatasetCache;
use crate::config::Config;
use crate::error::PipelineResult;
use crate::features::build_features;
use crate::fetcher::Fetcher;
use crate::models::{fit_and_predict, train_and_predict, ForestConfig, PredictionVector};
use crate::preprocessing::{prepare, PreparedDataset, SplitConfig};
use crate::report::Forecast;
use std::sync::Arc;
use tracing::info;

/// Stock price prediction pipeline over a market data source
pub struct Pipeline<S> {
    fetcher: Fetcher<S>,
    cache: DatasetCache,
    split: SplitConfig,
    model: ForestConfig,
}

impl Pipeline<YahooClient> {
    /// Pipeline against Yahoo Finance configured from `config`
    pub fn from_config(config: &Config) -> Self {
        let source = YahooClient::with_base_url(config.fetch.base_url.clone());
        Self::with_config(source, config)
    }
}

impl<S: MarketDataSource> Pipeline<S> {
    /// Pipeline with default settings
    pub fn new(source: S) -> Self {
        Self::from_fetcher(Fetcher::new(source))
    }

    /// Pipeline around an already configured fetcher
    pub fn from_fetcher(fetcher: Fetcher<S>) -> Self {
        Self {
            fetcher,
            cache: DatasetCache::new(),
            split: SplitConfig::default(),
            model: ForestConfig::default(),
        }
    }

    /// Pipeline over `source` with settings from `config`
    pub fn with_config(source: S, config: &Config) -> Self {
        Self {
            fetcher: Fetcher::new(source)
                .with_policy(config.fetch.retry_policy())
                .with_window(config.fetch.window()),
            cache: DatasetCache::new(),
            split: SplitConfig::from(&config.split),
            model: config.model.clone(),
        }
    }

    pub fn with_split(mut self, split: SplitConfig) -> Self {
        self.split = split;
        self
    }

    pub fn with_model(mut self, model: ForestConfig) -> Self {
        self.model = model;
        self
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    pub fn fetcher(&self) -> &Fetcher<S> {
        &self.fetcher
    }

    /// Prepared dataset for `ticker`, built once per process and cached.
    pub async fn fetch_and_prepare(&self, ticker: &str) -> PipelineResult<Arc<PreparedDataset>> {
        self.cache
            .get_or_build(ticker, move || async move {
                let raw = self.fetcher.fetch(ticker).await?;
                let featured = build_features(&raw);
                info!(
                    "{}: {} raw rows, {} complete rows",
                    ticker,
                    raw.len(),
                    featured.len()
                );
                prepare(featured, &self.split)
            })
            .await
    }

    /// Fit a fresh model on the training partition and predict the test rows
    pub fn predict(&self, dataset: &PreparedDataset) -> PipelineResult<PredictionVector> {
        let predictions = train_and_predict(
            dataset.train_x(),
            dataset.test_x(),
            dataset.train_y(),
            &self.model,
        )?;
        Ok(predictions)
    }

    /// Fetch (or reuse), predict and summarise one ticker
    pub async fn run(&self, ticker: &str) -> PipelineResult<Forecast> {
        let dataset = self.fetch_and_prepare(ticker).await?;
        let (forest, predictions) = fit_and_predict(
            dataset.train_x(),
            dataset.test_x(),
            dataset.train_y(),
            &self.model,
        )?;

        let forecast = Forecast::new(&dataset, &predictions, &forest);
        if let Some(m) = &forecast.metrics {
            info!("{}: test R² {:.4}, RMSE {:.4}", ticker, m.r2, m.rmse);
        }
        Ok(forecast)
    }
}
