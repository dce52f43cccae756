//! Indicator snapshot at the latest candle

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::indicators::momentum::{calculate_macd, calculate_rsi};
use crate::indicators::trend::{calculate_ema, calculate_sma};
use crate::indicators::volatility::calculate_atr;
use crate::indicators::volume::calculate_volume_profile;
use crate::models::indicators::{Candle, IndicatorSnapshot};

/// Compute every configured indicator over `candles`.
///
/// Fails with `InsufficientData` as soon as one indicator lacks history;
/// nothing partial is returned.
pub fn build_snapshot(
    candles: &[Candle],
    config: &EngineConfig,
) -> Result<IndicatorSnapshot, EngineError> {
    let required = config.min_candles();
    let last_candle = match candles.last() {
        Some(candle) if candles.len() >= required => *candle,
        _ => {
            return Err(EngineError::InsufficientData {
                indicator: "snapshot",
                required,
                actual: candles.len(),
            })
        }
    };

    let p = &config.periods;
    Ok(IndicatorSnapshot {
        timestamp: last_candle.timestamp,
        last_candle,
        ema_fast: calculate_ema(candles, p.ema_fast)?,
        ema_slow: calculate_ema(candles, p.ema_slow)?,
        sma_fast: calculate_sma(candles, p.sma_fast)?,
        sma_slow: calculate_sma(candles, p.sma_slow)?,
        rsi: calculate_rsi(candles, p.rsi)?,
        macd: calculate_macd(candles, p.macd_fast, p.macd_slow, p.macd_signal)?,
        atr: calculate_atr(candles, p.atr)?,
        volume: calculate_volume_profile(candles, p.volume_lookback, config.volume_spike_sigma)?,
    })
}
