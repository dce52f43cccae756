//! ATR (Average True Range) indicator

use crate::common::math;
use crate::indicators::error::{require_len, require_period, IndicatorError};
use crate::models::indicators::{AtrIndicator, Candle};

/// True range of every candle after the first.
pub fn true_ranges(candles: &[Candle]) -> Vec<f64> {
    candles
        .windows(2)
        .map(|w| math::true_range(w[1].high, w[1].low, w[0].close))
        .collect()
}

/// Calculate ATR (Average True Range)
///
/// Simple average of the last `period` true ranges, so `period + 1` candles
/// are required.
pub fn calculate_atr(candles: &[Candle], period: u32) -> Result<AtrIndicator, IndicatorError> {
    require_period("atr", period)?;
    require_len("atr", period as usize + 1, candles.len())?;

    let tr_values = true_ranges(candles);
    let value = math::sma(&tr_values, period as usize).ok_or(IndicatorError::InsufficientData {
        indicator: "atr",
        required: period as usize + 1,
        actual: candles.len(),
    })?;

    Ok(AtrIndicator { value, period })
}
