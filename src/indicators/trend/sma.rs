//! SMA (Simple Moving Average) indicator

use crate::common::math;
use crate::indicators::error::{require_len, require_period, IndicatorError};
use crate::models::indicators::{Candle, SmaIndicator};

pub fn calculate_sma_series(candles: &[Candle], period: u32) -> Result<Vec<f64>, IndicatorError> {
    require_period("sma", period)?;
    require_len("sma", period as usize, candles.len())?;

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    math::sma_series(&closes, period as usize).ok_or(IndicatorError::InsufficientData {
        indicator: "sma",
        required: period as usize,
        actual: candles.len(),
    })
}

pub fn calculate_sma(candles: &[Candle], period: u32) -> Result<SmaIndicator, IndicatorError> {
    let series = calculate_sma_series(candles, period)?;
    let value = series[series.len() - 1];
    let previous = series.len().checked_sub(2).map(|i| series[i]);

    Ok(SmaIndicator {
        value,
        previous,
        period,
    })
}
