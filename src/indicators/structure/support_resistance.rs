//! Support and Resistance levels detection
//!
//! Swing highs become resistance candidates and swing lows become support
//! candidates. Each candidate is scored by how often later candles tested it
//! without breaking through and by the relative volume of the candle that
//! formed it. Nearby candidates of the same kind are then merged.

use crate::common::math;
use crate::config::LevelConfig;
use crate::models::indicators::Candle;
use crate::models::levels::{LevelKind, LevelSet, PriceLevel};

const TOUCH_WEIGHT: f64 = 0.6;
const VOLUME_WEIGHT: f64 = 0.4;

fn is_swing_high(candles: &[Candle], i: usize, window: usize) -> bool {
    let high = candles[i].high;
    (i - window..=i + window)
        .filter(|&j| j != i)
        .all(|j| candles[j].high < high)
}

fn is_swing_low(candles: &[Candle], i: usize, window: usize) -> bool {
    let low = candles[i].low;
    (i - window..=i + window)
        .filter(|&j| j != i)
        .all(|j| candles[j].low > low)
}

/// Later candles that came within `tolerance` of the level before the first
/// close through it.
fn count_touches(later: &[Candle], price: f64, kind: LevelKind, tolerance: f64) -> usize {
    let band = price * tolerance;
    let mut touches = 0;
    for candle in later {
        match kind {
            LevelKind::Resistance => {
                if candle.close > price + band {
                    break;
                }
                if candle.high >= price - band {
                    touches += 1;
                }
            }
            LevelKind::Support => {
                if candle.close < price - band {
                    break;
                }
                if candle.low <= price + band {
                    touches += 1;
                }
            }
        }
    }
    touches
}

fn candidate_strength(touches: usize, relative_volume: f64) -> f64 {
    let t = touches as f64;
    let rv = relative_volume.max(0.0);
    math::clamp_unit(TOUCH_WEIGHT * t / (t + 2.0) + VOLUME_WEIGHT * rv / (1.0 + rv))
}

/// Combine candidates of one kind that sit within `tolerance` of each other.
///
/// Price becomes the strength-weighted average; strength is the capped sum.
fn merge_candidates(mut candidates: Vec<PriceLevel>, tolerance: f64) -> Vec<PriceLevel> {
    candidates.sort_by(|a, b| a.price.total_cmp(&b.price));

    let mut merged: Vec<PriceLevel> = Vec::with_capacity(candidates.len());
    for level in candidates {
        match merged.last_mut() {
            Some(current) if (level.price - current.price).abs() <= current.price * tolerance => {
                let total = current.strength + level.strength;
                current.price = if total > 0.0 {
                    (current.price * current.strength + level.price * level.strength) / total
                } else {
                    (current.price + level.price) / 2.0
                };
                current.strength = total.min(1.0);
            }
            _ => merged.push(level),
        }
    }
    merged
}

fn strongest(mut levels: Vec<PriceLevel>, max: usize) -> Vec<PriceLevel> {
    levels.sort_by(|a, b| {
        b.strength
            .total_cmp(&a.strength)
            .then(a.price.total_cmp(&b.price))
    });
    levels.truncate(max);
    levels
}

/// Detect support/resistance levels from local extrema.
///
/// A series shorter than `2 * window + 1` yields an empty set.
pub fn detect_levels(candles: &[Candle], config: &LevelConfig) -> LevelSet {
    let window = config.window;
    if window == 0 || candles.len() < 2 * window + 1 {
        return LevelSet::empty();
    }

    let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();
    let mean_volume = math::mean(&volumes).unwrap_or(0.0);
    let relative_volume = |v: f64| if mean_volume > 0.0 { v / mean_volume } else { 0.0 };

    let mut supports = Vec::new();
    let mut resistances = Vec::new();

    for i in window..candles.len() - window {
        let candle = &candles[i];
        let later = &candles[i + 1..];
        let rv = relative_volume(candle.volume);

        if is_swing_high(candles, i, window) {
            let touches = count_touches(
                later,
                candle.high,
                LevelKind::Resistance,
                config.touch_tolerance_pct,
            );
            resistances.push(PriceLevel {
                price: candle.high,
                strength: candidate_strength(touches, rv),
                kind: LevelKind::Resistance,
            });
        }
        if is_swing_low(candles, i, window) {
            let touches =
                count_touches(later, candle.low, LevelKind::Support, config.touch_tolerance_pct);
            supports.push(PriceLevel {
                price: candle.low,
                strength: candidate_strength(touches, rv),
                kind: LevelKind::Support,
            });
        }
    }

    let tolerance = config.merge_tolerance_pct;
    let mut levels = strongest(merge_candidates(supports, tolerance), config.max_per_kind);
    levels.extend(strongest(
        merge_candidates(resistances, tolerance),
        config.max_per_kind,
    ));

    LevelSet::new(levels)
}
