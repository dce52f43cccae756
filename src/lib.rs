//! Technical analysis and signal fusion engine.
//!
//! Candles flow strictly upward: indicators and price levels are derived from a
//! [`models::CandleSeries`], fused with an optional advisory score into a
//! [`models::FusedAssessment`], and turned into a risk-sized [`models::Signal`]
//! by [`signals::engine::SignalEngine`].

pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;

pub use config::EngineConfig;
pub use error::EngineError;
pub use signals::engine::SignalEngine;
