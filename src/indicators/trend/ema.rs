//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::indicators::error::{require_len, require_period, IndicatorError};
use crate::models::indicators::{Candle, EmaIndicator};

/// EMA of closes, one value per candle from index `period - 1` onward.
pub fn calculate_ema_series(candles: &[Candle], period: u32) -> Result<Vec<f64>, IndicatorError> {
    require_period("ema", period)?;
    require_len("ema", period as usize, candles.len())?;

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    math::ema_series(&closes, period as usize).ok_or(IndicatorError::InsufficientData {
        indicator: "ema",
        required: period as usize,
        actual: candles.len(),
    })
}

/// Calculate EMA for a specific period
pub fn calculate_ema(candles: &[Candle], period: u32) -> Result<EmaIndicator, IndicatorError> {
    let series = calculate_ema_series(candles, period)?;
    let value = series[series.len() - 1];
    let previous = series.len().checked_sub(2).map(|i| series[i]);

    Ok(EmaIndicator {
        value,
        previous,
        period,
    })
}

/// Calculate multiple EMAs at once, skipping periods the series is too short for
pub fn calculate_emas(candles: &[Candle], periods: &[u32]) -> Vec<EmaIndicator> {
    periods
        .iter()
        .filter_map(|&period| calculate_ema(candles, period).ok())
        .collect()
}

/// Fast EMA relative to slow EMA: 1 above, -1 below, 0 equal
pub fn check_ema_cross(
    candles: &[Candle],
    fast_period: u32,
    slow_period: u32,
) -> Result<i32, IndicatorError> {
    let fast_ema = calculate_ema(candles, fast_period)?;
    let slow_ema = calculate_ema(candles, slow_period)?;

    Ok(if fast_ema.value > slow_ema.value {
        1
    } else if fast_ema.value < slow_ema.value {
        -1
    } else {
        0
    })
}
