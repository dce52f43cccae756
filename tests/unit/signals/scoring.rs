//! Unit tests for per-factor votes

use crate::support::ts;
use sigfuse::models::{
    AdvisoryInput, AtrIndicator, Candle, Direction, EmaIndicator, FactorKind, IndicatorSnapshot,
    LevelKind, LevelSet, MacdIndicator, PriceLevel, RsiIndicator, SmaIndicator, VolumeProfile,
};
use sigfuse::signals::scoring::{
    score_advisory, score_levels, score_macd, score_moving_average, score_rsi, score_volume,
};

/// Quiet market at 100 with ATR 2 and no spike.
fn base_snapshot() -> IndicatorSnapshot {
    IndicatorSnapshot {
        timestamp: ts(0),
        last_candle: Candle::new(100.0, 101.0, 99.0, 100.0, 1000.0, ts(0)),
        ema_fast: EmaIndicator { value: 100.0, previous: Some(100.0), period: 20 },
        ema_slow: EmaIndicator { value: 100.0, previous: Some(100.0), period: 50 },
        sma_fast: SmaIndicator { value: 100.0, previous: Some(100.0), period: 20 },
        sma_slow: SmaIndicator { value: 100.0, previous: Some(100.0), period: 50 },
        rsi: RsiIndicator { value: 50.0, previous: Some(50.0), period: 14 },
        macd: MacdIndicator {
            macd: 0.0,
            signal: 0.0,
            histogram: 0.0,
            previous_histogram: Some(0.0),
            period: (12, 26, 9),
        },
        atr: AtrIndicator { value: 2.0, period: 14 },
        volume: VolumeProfile {
            volume: 1000.0,
            mean: 1000.0,
            std_dev: 10.0,
            z_score: 0.0,
            is_spike: false,
            lookback: 20,
        },
    }
}

#[test]
fn test_moving_average_scaled_by_atr() {
    let mut s = base_snapshot();
    s.ema_fast.value = 101.0;
    s.sma_fast.value = 101.0;
    let vote = score_moving_average(&s, 1.0);
    assert_eq!(vote.factor, FactorKind::MovingAverage);
    assert_eq!(vote.direction, Direction::Bullish);
    assert_eq!(vote.magnitude, 0.5);

    s.ema_fast.value = 90.0;
    s.sma_fast.value = 90.0;
    let vote = score_moving_average(&s, 1.0);
    assert_eq!(vote.direction, Direction::Bearish);
    assert_eq!(vote.magnitude, 1.0);
}

#[test]
fn test_moving_average_halved_on_sma_disagreement() {
    let mut s = base_snapshot();
    s.ema_fast.value = 101.0;
    s.sma_fast.value = 99.0;
    assert_eq!(score_moving_average(&s, 1.0).magnitude, 0.25);
}

#[test]
fn test_moving_average_neutral_when_equal() {
    let vote = score_moving_average(&base_snapshot(), 1.0);
    assert_eq!(vote.direction, Direction::Neutral);
    assert_eq!(vote.magnitude, 0.0);
    assert_eq!(vote.signed_contribution(), 0.0);
}

#[test]
fn test_rsi_oversold_rising_is_bullish() {
    let mut s = base_snapshot();
    s.rsi = RsiIndicator { value: 25.0, previous: Some(20.0), period: 14 };
    let vote = score_rsi(&s, 30.0, 70.0, 0.75);
    assert_eq!(vote.direction, Direction::Bullish);
    assert_eq!(vote.magnitude, 0.5);
    assert_eq!(vote.signed_contribution(), 0.375);
}

#[test]
fn test_rsi_oversold_still_falling_is_neutral() {
    let mut s = base_snapshot();
    s.rsi = RsiIndicator { value: 25.0, previous: Some(28.0), period: 14 };
    assert_eq!(score_rsi(&s, 30.0, 70.0, 0.75).direction, Direction::Neutral);
}

#[test]
fn test_rsi_overbought_falling_is_bearish() {
    let mut s = base_snapshot();
    s.rsi = RsiIndicator { value: 80.0, previous: Some(85.0), period: 14 };
    let vote = score_rsi(&s, 30.0, 70.0, 1.0);
    assert_eq!(vote.direction, Direction::Bearish);
    assert!((vote.magnitude - 0.6).abs() < 1e-12);

    s.rsi.previous = Some(75.0);
    assert_eq!(score_rsi(&s, 30.0, 70.0, 1.0).direction, Direction::Neutral);
}

#[test]
fn test_rsi_mid_band_follows_move_away_from_midline() {
    let mut s = base_snapshot();
    s.rsi = RsiIndicator { value: 60.0, previous: Some(55.0), period: 14 };
    assert_eq!(score_rsi(&s, 30.0, 70.0, 1.0).direction, Direction::Bullish);

    s.rsi = RsiIndicator { value: 60.0, previous: Some(65.0), period: 14 };
    assert_eq!(score_rsi(&s, 30.0, 70.0, 1.0).direction, Direction::Neutral);

    s.rsi = RsiIndicator { value: 40.0, previous: Some(45.0), period: 14 };
    assert_eq!(score_rsi(&s, 30.0, 70.0, 1.0).direction, Direction::Bearish);
}

#[test]
fn test_macd_sign_and_contraction() {
    let mut s = base_snapshot();
    s.macd.histogram = 0.1;
    s.macd.previous_histogram = Some(0.05);
    let vote = score_macd(&s, 1.0);
    assert_eq!(vote.direction, Direction::Bullish);
    assert!((vote.magnitude - 0.5).abs() < 1e-12);

    s.macd.previous_histogram = Some(0.2);
    assert!((score_macd(&s, 1.0).magnitude - 0.25).abs() < 1e-12);

    s.macd.histogram = -1.0;
    s.macd.previous_histogram = None;
    let vote = score_macd(&s, 1.0);
    assert_eq!(vote.direction, Direction::Bearish);
    assert_eq!(vote.magnitude, 1.0);
}

#[test]
fn test_volume_spike_follows_candle_body() {
    let mut s = base_snapshot();
    s.volume.is_spike = true;
    s.volume.z_score = 3.0;
    // doji: a spike with no body has nothing to amplify
    assert_eq!(score_volume(&s, 2.0, 0.5).direction, Direction::Neutral);

    s.last_candle.open = 99.0;
    let vote = score_volume(&s, 2.0, 0.5);
    assert_eq!(vote.direction, Direction::Bullish);
    assert_eq!(vote.magnitude, 0.75);

    s.last_candle.open = 101.0;
    assert_eq!(score_volume(&s, 2.0, 0.5).direction, Direction::Bearish);

    s.volume.is_spike = false;
    assert_eq!(score_volume(&s, 2.0, 0.5).direction, Direction::Neutral);
}

#[test]
fn test_levels_net_pull() {
    let s = base_snapshot();
    let levels = LevelSet::new(vec![
        PriceLevel { price: 98.0, strength: 0.8, kind: LevelKind::Support },
        PriceLevel { price: 106.0, strength: 0.8, kind: LevelKind::Resistance },
        PriceLevel { price: 101.0, strength: 0.1, kind: LevelKind::Resistance },
    ]);
    // support 0.8 / (1 + 1) = 0.4, resistance 0.8 / (1 + 3) = 0.2, weak level ignored
    let vote = score_levels(&s, &levels, 0.3, 0.75);
    assert_eq!(vote.direction, Direction::Bullish);
    assert!((vote.magnitude - 0.2).abs() < 1e-12);

    assert_eq!(
        score_levels(&s, &LevelSet::empty(), 0.3, 0.75).direction,
        Direction::Neutral
    );
}

#[test]
fn test_advisory_vote() {
    let vote = score_advisory(&AdvisoryInput::new(-0.4, 0.9), 3.0);
    assert_eq!(vote.factor, FactorKind::Advisory);
    assert_eq!(vote.direction, Direction::Bearish);
    assert_eq!(vote.magnitude, 0.9);

    let clamped = score_advisory(&AdvisoryInput::new(5.0, 1.5), 3.0);
    assert_eq!(clamped.direction, Direction::Bullish);
    assert_eq!(clamped.magnitude, 1.0);

    let neutral = score_advisory(&AdvisoryInput::new(0.0, 0.9), 3.0);
    assert_eq!(neutral.direction, Direction::Neutral);

    let nan = score_advisory(&AdvisoryInput::new(f64::NAN, f64::NAN), 3.0);
    assert_eq!(nan.signed_contribution(), 0.0);
}
