//! Advisory (sentiment) provider interface

use std::collections::HashMap;
use std::time::Duration;

use crate::models::advisory::AdvisoryInput;
use crate::models::indicators::Candle;
use crate::services::ServiceError;

#[async_trait::async_trait]
pub trait AdvisoryProvider {
    /// Opinion on `symbol` given the candles about to be evaluated.
    /// `Ok(None)` means the provider has nothing to say.
    async fn assess(
        &self,
        symbol: &str,
        candles: &[Candle],
    ) -> Result<Option<AdvisoryInput>, ServiceError>;
}

/// Fixed answers per symbol, with an optional artificial latency.
#[derive(Default)]
pub struct StaticAdvisory {
    answers: HashMap<String, AdvisoryInput>,
    delay: Option<Duration>,
}

impl StaticAdvisory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, symbol: impl Into<String>, input: AdvisoryInput) -> Self {
        self.answers.insert(symbol.into(), input);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait::async_trait]
impl AdvisoryProvider for StaticAdvisory {
    async fn assess(
        &self,
        symbol: &str,
        _candles: &[Candle],
    ) -> Result<Option<AdvisoryInput>, ServiceError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.answers.get(symbol).cloned())
    }
}
