//! RSI (Relative Strength Index) indicator

use crate::indicators::error::{require_len, require_period, IndicatorError};
use crate::models::indicators::{Candle, RsiIndicator};

/// RSI = 100 - (100 / (1 + RS)), RS = Average Gain / Average Loss
///
/// A window with no movement at all reads 50; one with gains and no losses
/// reads 100.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return 50.0;
        }
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// RSI with Wilder smoothing, seeded from the mean of the first `period`
/// close-to-close changes.
///
/// Element `k` is the RSI at candle `period + k`.
pub fn calculate_rsi_series(candles: &[Candle], period: u32) -> Result<Vec<f64>, IndicatorError> {
    require_period("rsi", period)?;
    let period = period as usize;
    require_len("rsi", period + 1, candles.len())?;

    let (gains, losses): (Vec<f64>, Vec<f64>) = candles
        .windows(2)
        .map(|w| {
            let change = w[1].close - w[0].close;
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let p = period as f64;
    let mut avg_gain = gains[..period].iter().sum::<f64>() / p;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / p;

    let mut out = Vec::with_capacity(gains.len() - period + 1);
    out.push(rsi_from_averages(avg_gain, avg_loss));

    for i in period..gains.len() {
        avg_gain = (avg_gain * (p - 1.0) + gains[i]) / p;
        avg_loss = (avg_loss * (p - 1.0) + losses[i]) / p;
        out.push(rsi_from_averages(avg_gain, avg_loss));
    }

    Ok(out)
}

/// Calculate RSI indicator at the latest candle
pub fn calculate_rsi(candles: &[Candle], period: u32) -> Result<RsiIndicator, IndicatorError> {
    let series = calculate_rsi_series(candles, period)?;
    let value = series[series.len() - 1];
    let previous = series.len().checked_sub(2).map(|i| series[i]);

    Ok(RsiIndicator {
        value,
        previous,
        period,
    })
}
