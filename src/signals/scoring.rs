//! Per-factor votes
//!
//! Each function turns one slice of the indicator snapshot (or the advisory
//! input) into a weighted vote with a direction and a magnitude in [0, 1].

use crate::common::math;
use crate::config::EngineConfig;
use crate::models::advisory::AdvisoryInput;
use crate::models::indicators::IndicatorSnapshot;
use crate::models::levels::LevelSet;
use crate::models::signal::{Direction, FactorContribution, FactorKind};

/// MACD histograms are compared against this fraction of ATR.
const MACD_ATR_SCALE: f64 = 0.1;

fn direction_of(value: f64) -> Direction {
    Direction::from_score(value, 0.0)
}

/// `|distance| / atr`, capped at 1. Without volatility any non-zero distance
/// counts in full.
fn atr_normalized(distance: f64, atr: f64) -> f64 {
    if atr > 0.0 && atr.is_finite() {
        (distance.abs() / atr).min(1.0)
    } else if distance != 0.0 {
        1.0
    } else {
        0.0
    }
}

fn vote(factor: FactorKind, weight: f64, direction: Direction, magnitude: f64) -> FactorContribution {
    if direction == Direction::Neutral {
        return FactorContribution::neutral(factor, weight);
    }
    FactorContribution {
        factor,
        weight,
        direction,
        magnitude: math::clamp_unit(magnitude),
    }
}

/// Fast EMA against slow EMA, scaled by separation in ATR units and halved
/// when the SMA pair disagrees.
pub fn score_moving_average(snapshot: &IndicatorSnapshot, weight: f64) -> FactorContribution {
    let separation = snapshot.ema_fast.value - snapshot.ema_slow.value;
    let direction = direction_of(separation);
    let mut magnitude = atr_normalized(separation, snapshot.atr.value);

    let sma_direction = direction_of(snapshot.sma_fast.value - snapshot.sma_slow.value);
    if sma_direction != direction {
        magnitude *= 0.5;
    }

    vote(FactorKind::MovingAverage, weight, direction, magnitude)
}

pub fn score_rsi(
    snapshot: &IndicatorSnapshot,
    oversold: f64,
    overbought: f64,
    weight: f64,
) -> FactorContribution {
    let rsi = &snapshot.rsi;
    let magnitude = (rsi.value - 50.0).abs() / 50.0;

    let direction = if rsi.value < oversold {
        if rsi.is_rising() {
            Direction::Bullish
        } else {
            Direction::Neutral
        }
    } else if rsi.value > overbought {
        if rsi.is_falling() {
            Direction::Bearish
        } else {
            Direction::Neutral
        }
    } else if rsi.value > 50.0 && rsi.is_rising() {
        Direction::Bullish
    } else if rsi.value < 50.0 && rsi.is_falling() {
        Direction::Bearish
    } else {
        Direction::Neutral
    };

    vote(FactorKind::Rsi, weight, direction, magnitude)
}

/// Histogram sign for direction; size in ATR units, halved while the
/// histogram is contracting.
pub fn score_macd(snapshot: &IndicatorSnapshot, weight: f64) -> FactorContribution {
    let histogram = snapshot.macd.histogram;
    let direction = direction_of(histogram);
    let mut magnitude = atr_normalized(histogram, snapshot.atr.value * MACD_ATR_SCALE);

    if let Some(previous) = snapshot.macd.previous_histogram {
        if histogram.abs() < previous.abs() {
            magnitude *= 0.5;
        }
    }

    vote(FactorKind::Macd, weight, direction, magnitude)
}

/// A spike never sets a direction of its own; it amplifies the body of the
/// candle it occurred on.
pub fn score_volume(snapshot: &IndicatorSnapshot, spike_sigma: f64, weight: f64) -> FactorContribution {
    let volume = &snapshot.volume;
    if !volume.is_spike {
        return FactorContribution::neutral(FactorKind::VolumeSpike, weight);
    }

    let direction = match snapshot.last_candle.body_direction() {
        1 => Direction::Bullish,
        -1 => Direction::Bearish,
        _ => Direction::Neutral,
    };
    let magnitude = (volume.z_score / (2.0 * spike_sigma)).min(1.0);

    vote(FactorKind::VolumeSpike, weight, direction, magnitude)
}

/// Pull of the nearest qualifying support minus the pull of the nearest
/// qualifying resistance, each `strength / (1 + distance / atr)`.
pub fn score_levels(
    snapshot: &IndicatorSnapshot,
    levels: &LevelSet,
    min_strength: f64,
    weight: f64,
) -> FactorContribution {
    let close = snapshot.close();
    let atr = snapshot.atr.value;

    let pull = |price: f64, strength: f64| {
        let distance = (close - price).abs();
        if atr > 0.0 && atr.is_finite() {
            strength / (1.0 + distance / atr)
        } else if distance == 0.0 {
            strength
        } else {
            0.0
        }
    };

    let support = levels
        .nearest_support_below(close, min_strength)
        .map(|l| pull(l.price, l.strength))
        .unwrap_or(0.0);
    let resistance = levels
        .nearest_resistance_above(close, min_strength)
        .map(|l| pull(l.price, l.strength))
        .unwrap_or(0.0);
    let net = support - resistance;

    vote(FactorKind::PriceLevels, weight, direction_of(net), net.abs())
}

/// Direction from the sentiment sign, magnitude from the advisory's own
/// confidence. Out-of-range values are clamped.
pub fn score_advisory(advisory: &AdvisoryInput, weight: f64) -> FactorContribution {
    let sentiment = if advisory.sentiment_score.is_nan() {
        0.0
    } else {
        advisory.sentiment_score.clamp(-1.0, 1.0)
    };
    vote(
        FactorKind::Advisory,
        weight,
        direction_of(sentiment),
        math::clamp_unit(advisory.confidence),
    )
}

/// Every technical vote, followed by the advisory vote when one is given.
pub fn score_factors(
    snapshot: &IndicatorSnapshot,
    levels: &LevelSet,
    advisory: Option<&AdvisoryInput>,
    config: &EngineConfig,
) -> Vec<FactorContribution> {
    let w = &config.weights;
    let mut votes = vec![
        score_moving_average(snapshot, w.moving_average),
        score_rsi(snapshot, config.rsi_oversold, config.rsi_overbought, w.rsi),
        score_macd(snapshot, w.macd),
        score_volume(snapshot, config.volume_spike_sigma, w.volume),
        score_levels(snapshot, levels, config.levels.min_strength, w.levels),
    ];
    if let Some(advisory) = advisory {
        votes.push(score_advisory(advisory, w.advisory));
    }
    votes
}
