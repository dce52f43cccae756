use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    #[error("{indicator} needs at least {required} candles, got {actual}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("{indicator} period must be positive, got {period}")]
    InvalidPeriod { indicator: &'static str, period: u32 },
}

/// Fails fast when `actual < required`.
pub fn require_len(
    indicator: &'static str,
    required: usize,
    actual: usize,
) -> Result<(), IndicatorError> {
    if actual < required {
        return Err(IndicatorError::InsufficientData {
            indicator,
            required,
            actual,
        });
    }
    Ok(())
}

pub fn require_period(indicator: &'static str, period: u32) -> Result<(), IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidPeriod { indicator, period });
    }
    Ok(())
}
