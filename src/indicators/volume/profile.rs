//! Volume spike detection against a trailing window

use crate::common::math;
use crate::indicators::error::{require_len, require_period, IndicatorError};
use crate::models::indicators::{Candle, VolumeProfile};

/// |z| never exceeds this, including for a flat window.
pub const Z_SCORE_CAP: f64 = 10.0;

/// Z-score of the latest candle's volume against the `lookback` candles
/// before it.
///
/// The latest candle is excluded from its own baseline. A zero-variance
/// window gives `z = 0` when the latest volume matches it and `±Z_SCORE_CAP`
/// otherwise.
///
/// Spikes are one-sided: only volume at least `spike_sigma` deviations
/// above the mean counts. Unusually thin volume is never a spike.
pub fn calculate_volume_profile(
    candles: &[Candle],
    lookback: u32,
    spike_sigma: f64,
) -> Result<VolumeProfile, IndicatorError> {
    require_period("volume", lookback)?;
    let window_len = lookback as usize;
    require_len("volume", window_len + 1, candles.len())?;

    let last = candles.len() - 1;
    let window: Vec<f64> = candles[last - window_len..last]
        .iter()
        .map(|c| c.volume)
        .collect();
    let volume = candles[last].volume;

    let insufficient = IndicatorError::InsufficientData {
        indicator: "volume",
        required: window_len + 1,
        actual: candles.len(),
    };
    let mean = math::mean(&window).ok_or(insufficient.clone())?;
    let std_dev = math::std_dev(&window).ok_or(insufficient)?;

    let z_score = if std_dev > 0.0 {
        ((volume - mean) / std_dev).clamp(-Z_SCORE_CAP, Z_SCORE_CAP)
    } else if volume > mean {
        Z_SCORE_CAP
    } else if volume < mean {
        -Z_SCORE_CAP
    } else {
        0.0
    };

    Ok(VolumeProfile {
        volume,
        mean,
        std_dev,
        z_score,
        is_spike: z_score >= spike_sigma,
        lookback,
    })
}
