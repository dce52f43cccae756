//! Engine error taxonomy

use crate::indicators::IndicatorError;
use thiserror::Error;

/// Every way an evaluation (or engine construction) can fail.
///
/// The engine never degrades a failure into a low-confidence signal: any of
/// these aborts the cycle and no [`crate::models::Signal`] is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("insufficient data for {indicator}: need {required} candles, got {actual}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("risk sizing failed: {0}")]
    RiskSizing(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("invalid candle series: {0}")]
    InvalidSeries(String),
}

impl From<IndicatorError> for EngineError {
    fn from(err: IndicatorError) -> Self {
        match err {
            IndicatorError::InsufficientData {
                indicator,
                required,
                actual,
            } => EngineError::InsufficientData {
                indicator,
                required,
                actual,
            },
            IndicatorError::InvalidPeriod { .. } => EngineError::Configuration(err.to_string()),
        }
    }
}
