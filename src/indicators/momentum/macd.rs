//! MACD (Moving Average Convergence Divergence) indicator

use crate::common::math;
use crate::indicators::error::{require_len, require_period, IndicatorError};
use crate::models::indicators::{Candle, MacdIndicator};

/// Full MACD history.
///
/// `macd_line[k]` sits at candle `max(fast, slow) - 1 + k`. `signal_line` and
/// `histogram` line up with each other and with the tail of `macd_line`.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Fewest candles that yield one signal-line value.
pub fn macd_min_candles(fast_period: u32, slow_period: u32, signal_period: u32) -> usize {
    fast_period.max(slow_period) as usize + signal_period as usize - 1
}

/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
/// Histogram = MACD - Signal
pub fn calculate_macd_series(
    candles: &[Candle],
    fast_period: u32,
    slow_period: u32,
    signal_period: u32,
) -> Result<MacdSeries, IndicatorError> {
    require_period("macd", fast_period)?;
    require_period("macd", slow_period)?;
    require_period("macd", signal_period)?;
    require_len(
        "macd",
        macd_min_candles(fast_period, slow_period, signal_period),
        candles.len(),
    )?;

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let insufficient = || IndicatorError::InsufficientData {
        indicator: "macd",
        required: macd_min_candles(fast_period, slow_period, signal_period),
        actual: candles.len(),
    };

    let fast = math::ema_series(&closes, fast_period as usize).ok_or_else(insufficient)?;
    let slow = math::ema_series(&closes, slow_period as usize).ok_or_else(insufficient)?;

    // Both EMA series end at the last candle; keep the common tail.
    let common = fast.len().min(slow.len());
    let macd_line: Vec<f64> = fast[fast.len() - common..]
        .iter()
        .zip(&slow[slow.len() - common..])
        .map(|(f, s)| f - s)
        .collect();

    let signal_line =
        math::ema_series(&macd_line, signal_period as usize).ok_or_else(insufficient)?;
    let offset = macd_line.len() - signal_line.len();
    let histogram = signal_line
        .iter()
        .zip(&macd_line[offset..])
        .map(|(signal, macd)| macd - signal)
        .collect();

    Ok(MacdSeries {
        macd_line,
        signal_line,
        histogram,
    })
}

/// Calculate MACD at the latest candle
pub fn calculate_macd(
    candles: &[Candle],
    fast_period: u32,
    slow_period: u32,
    signal_period: u32,
) -> Result<MacdIndicator, IndicatorError> {
    let series = calculate_macd_series(candles, fast_period, slow_period, signal_period)?;
    let last = series.histogram.len() - 1;

    Ok(MacdIndicator {
        macd: series.macd_line[series.macd_line.len() - 1],
        signal: series.signal_line[last],
        histogram: series.histogram[last],
        previous_histogram: last.checked_sub(1).map(|i| series.histogram[i]),
        period: (fast_period, slow_period, signal_period),
    })
}
