//! Market data provider interface

use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::indicators::Candle;
use crate::services::ServiceError;

#[async_trait::async_trait]
pub trait MarketDataProvider {
    /// Most recent `limit` candles for a symbol, oldest first
    async fn get_candles(&self, symbol: &str, limit: usize) -> Result<Vec<Candle>, ServiceError>;
}

/// Candles held in memory, keyed by symbol. Useful for replaying files and
/// for tests.
#[derive(Default)]
pub struct InMemoryMarketData {
    candles: RwLock<HashMap<String, Vec<Candle>>>,
}

impl InMemoryMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored history for `symbol`.
    pub async fn insert(&self, symbol: impl Into<String>, candles: Vec<Candle>) {
        self.candles.write().await.insert(symbol.into(), candles);
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for InMemoryMarketData {
    async fn get_candles(&self, symbol: &str, limit: usize) -> Result<Vec<Candle>, ServiceError> {
        let candles = self.candles.read().await;
        let history = candles
            .get(symbol)
            .ok_or_else(|| format!("no candles stored for {}", symbol))?;
        let start = history.len().saturating_sub(limit);
        Ok(history[start..].to_vec())
    }
}
