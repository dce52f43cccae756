//! Signal persistence interface

use tokio::sync::Mutex;

use crate::models::signal::Signal;
use crate::services::ServiceError;

#[async_trait::async_trait]
pub trait SignalSink {
    async fn store(&self, symbol: &str, signal: &Signal) -> Result<(), ServiceError>;
}

/// Keeps every stored signal in memory, in arrival order.
#[derive(Default)]
pub struct MemorySink {
    stored: Mutex<Vec<(String, Signal)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn signals(&self) -> Vec<(String, Signal)> {
        self.stored.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl SignalSink for MemorySink {
    async fn store(&self, symbol: &str, signal: &Signal) -> Result<(), ServiceError> {
        self.stored
            .lock()
            .await
            .push((symbol.to_string(), signal.clone()));
        Ok(())
    }
}
