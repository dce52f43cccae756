//! Collaborators around the engine: where candles come from, who supplies
//! the advisory opinion, and where signals end up.

pub mod advisory;
pub mod market_data;
pub mod sink;

pub use advisory::{AdvisoryProvider, StaticAdvisory};
pub use market_data::{InMemoryMarketData, MarketDataProvider};
pub use sink::{MemorySink, SignalSink};

/// Error type at collaborator boundaries.
pub type ServiceError = Box<dyn std::error::Error + Send + Sync>;
