//! Evaluation pipeline: fetch candles, ask the advisory, evaluate, store.
//!
//! Many symbols run concurrently. Within one symbol each new cycle bumps a
//! generation counter; a cycle that finishes after a newer one started is
//! discarded rather than stored. Each symbol has its own counter lock, so a
//! slow store for one symbol never holds up another.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::metrics::Metrics;
use crate::models::advisory::AdvisoryInput;
use crate::models::indicators::CandleSeries;
use crate::models::signal::Signal;
use crate::services::{AdvisoryProvider, MarketDataProvider, SignalSink};
use crate::signals::engine::SignalEngine;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("market data error: {0}")]
    MarketData(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("failed to store signal: {0}")]
    Storage(String),

    #[error("evaluation task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Stored(Signal),
    /// A newer cycle for the same symbol started before this one finished.
    Superseded,
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub candle_limit: usize,
    pub advisory_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            candle_limit: 250,
            advisory_timeout: Duration::from_secs(10),
        }
    }
}

pub struct SignalPipeline {
    engine: Arc<SignalEngine>,
    market_data: Arc<dyn MarketDataProvider + Send + Sync>,
    advisory: Option<Arc<dyn AdvisoryProvider + Send + Sync>>,
    sink: Arc<dyn SignalSink + Send + Sync>,
    metrics: Option<Arc<Metrics>>,
    config: PipelineConfig,
    generations: RwLock<HashMap<String, Arc<Mutex<u64>>>>,
}

impl SignalPipeline {
    pub fn new(
        engine: Arc<SignalEngine>,
        market_data: Arc<dyn MarketDataProvider + Send + Sync>,
        sink: Arc<dyn SignalSink + Send + Sync>,
    ) -> Self {
        Self {
            engine,
            market_data,
            advisory: None,
            sink,
            metrics: None,
            config: PipelineConfig::default(),
            generations: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_advisory(mut self, advisory: Arc<dyn AdvisoryProvider + Send + Sync>) -> Self {
        self.advisory = Some(advisory);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// The generation counter for `symbol`, created on first use.
    async fn generation_slot(&self, symbol: &str) -> Arc<Mutex<u64>> {
        if let Some(slot) = self.generations.read().await.get(symbol) {
            return slot.clone();
        }
        self.generations
            .write()
            .await
            .entry(symbol.to_string())
            .or_default()
            .clone()
    }

    async fn begin(&self, symbol: &str) -> u64 {
        let slot = self.generation_slot(symbol).await;
        let mut generation = slot.lock().await;
        *generation += 1;
        *generation
    }

    /// Run one cycle for `symbol`.
    pub async fn run_cycle(&self, symbol: &str) -> Result<CycleOutcome, PipelineError> {
        let generation = self.begin(symbol).await;

        if let Some(metrics) = &self.metrics {
            metrics.signal_evaluations_total.inc();
            metrics.signal_evaluations_active.inc();
        }
        let started = Instant::now();

        let result = self.cycle(symbol, generation).await;

        if let Some(metrics) = &self.metrics {
            metrics.signal_evaluations_active.dec();
            metrics
                .signal_evaluation_duration_seconds
                .observe(started.elapsed().as_secs_f64());
            match &result {
                Ok(CycleOutcome::Stored(signal)) => metrics.record_signal(signal.signal_type),
                Ok(CycleOutcome::Superseded) => metrics.stale_results_discarded_total.inc(),
                Err(_) => metrics.signal_evaluation_errors_total.inc(),
            }
        }

        if let Err(e) = &result {
            warn!(symbol = %symbol, error = %e, "evaluation cycle failed");
        }
        result
    }

    /// Run one cycle per symbol concurrently, results in input order.
    pub async fn run_all(
        &self,
        symbols: &[String],
    ) -> Vec<(String, Result<CycleOutcome, PipelineError>)> {
        let cycles = symbols.iter().map(|symbol| async move {
            (symbol.clone(), self.run_cycle(symbol).await)
        });
        join_all(cycles).await
    }

    async fn cycle(&self, symbol: &str, generation: u64) -> Result<CycleOutcome, PipelineError> {
        let candles = self
            .market_data
            .get_candles(symbol, self.config.candle_limit)
            .await
            .map_err(|e| PipelineError::MarketData(e.to_string()))?;
        let series = CandleSeries::new(candles)?;
        debug!(symbol = %symbol, count = series.len(), generation, "candles fetched");

        let advisory = self.fetch_advisory(symbol, &series).await;

        let engine = self.engine.clone();
        let signal = tokio::task::spawn_blocking(move || engine.evaluate(&series, advisory.as_ref()))
            .await
            .map_err(|e| PipelineError::Task(e.to_string()))??;

        // Held across the store so a newer cycle for this symbol cannot
        // begin in between. Other symbols use their own slot.
        let slot = self.generation_slot(symbol).await;
        let current = slot.lock().await;
        if *current != generation {
            debug!(symbol = %symbol, generation, "discarding superseded result");
            return Ok(CycleOutcome::Superseded);
        }

        self.sink
            .store(symbol, &signal)
            .await
            .map_err(|e| PipelineError::Storage(e.to_string()))?;
        drop(current);

        info!(
            symbol = %symbol,
            signal = ?signal.signal_type,
            confidence = signal.confidence,
            "signal stored"
        );
        Ok(CycleOutcome::Stored(signal))
    }

    /// A slow or failing advisory degrades to "no advisory".
    async fn fetch_advisory(&self, symbol: &str, series: &CandleSeries) -> Option<AdvisoryInput> {
        let provider = self.advisory.as_ref()?;
        match tokio::time::timeout(self.config.advisory_timeout, provider.assess(symbol, series))
            .await
        {
            Ok(Ok(advisory)) => advisory,
            Ok(Err(e)) => {
                warn!(symbol = %symbol, error = %e, "advisory failed, continuing without it");
                None
            }
            Err(_) => {
                warn!(
                    symbol = %symbol,
                    timeout_ms = self.config.advisory_timeout.as_millis() as u64,
                    "advisory timed out, continuing without it"
                );
                None
            }
        }
    }
}
