//! Unit tests for the signal engine entry points

use crate::support::{create_flat_candles, create_uptrend_candles, series, ts};
use sigfuse::config::EngineConfig;
use sigfuse::models::{AdvisoryInput, EntryTiming, Signal, SignalType, StopSource};
use sigfuse::{EngineError, SignalEngine};

fn engine() -> SignalEngine {
    SignalEngine::new(EngineConfig::default()).unwrap()
}

#[test]
fn test_min_candles_boundary() {
    let engine = engine();
    assert_eq!(engine.min_candles(), 50);

    let exact = series(create_uptrend_candles(50));
    assert!(engine.evaluate(&exact, None).is_ok());

    let short = series(create_uptrend_candles(49));
    assert!(matches!(
        engine.evaluate(&short, None),
        Err(EngineError::InsufficientData { required: 50, actual: 49, .. })
    ));
}

#[test]
fn test_evaluate_at_is_deterministic() {
    let engine = engine();
    let candles = series(create_uptrend_candles(90));
    let advisory = AdvisoryInput::new(0.8, 0.9);

    let a = engine.evaluate_at(&candles, Some(&advisory), ts(1)).unwrap();
    let b = engine.evaluate_at(&candles, Some(&advisory), ts(1)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.generated_at, ts(1));
}

#[test]
fn test_evaluate_with_indicators_returns_snapshot() {
    let engine = engine();
    let candles = series(create_uptrend_candles(90));
    let (signal, snapshot) = engine.evaluate_with_indicators(&candles, None).unwrap();
    assert_eq!(signal.entry_price, snapshot.close());
    assert_eq!(snapshot.timestamp, candles[89].timestamp);
}

#[test]
fn test_hold_carries_no_targets() {
    let signal = engine()
        .evaluate(&series(create_flat_candles(80, 100.0)), None)
        .unwrap();
    assert_eq!(signal.signal_type, SignalType::Hold);
    assert!(signal.stop_loss.is_none());
    assert!(signal.take_profit.is_none());
    assert!(signal.entry_timing.is_none());
    assert!(signal.risk_reward_ratio.is_none());
    assert!(signal.advisory.is_none());
}

#[test]
fn test_buy_metadata() {
    let advisory = AdvisoryInput::new(0.8, 0.9).with_tags(["breakout", "inflows"]);
    let signal = engine()
        .evaluate(&series(create_uptrend_candles(120)), Some(&advisory))
        .unwrap();

    assert_eq!(signal.signal_type, SignalType::Buy);
    assert_eq!(signal.risk_reward_ratio, Some(2.0));
    assert!(matches!(signal.stop_source, Some(StopSource::Atr { multiplier, .. }) if multiplier == 1.5));
    // volume spike plus a confident advisory
    assert_eq!(signal.entry_timing, Some(EntryTiming::Immediate));
    assert_eq!(signal.advisory.as_ref().unwrap().rationale_tags, vec!["breakout", "inflows"]);

    let risk = signal.risk_distance().unwrap();
    let reward = signal.reward_distance().unwrap();
    assert!((reward - 2.0 * risk).abs() < 1e-9);
}

#[test]
fn test_lower_threshold_can_only_add_signals() {
    let candles = series(create_uptrend_candles(120));
    let advisory = AdvisoryInput::new(0.8, 0.9);

    let strict = SignalEngine::new(EngineConfig {
        signal_threshold: 0.95,
        ..EngineConfig::default()
    })
    .unwrap();
    assert_eq!(
        strict.evaluate(&candles, Some(&advisory)).unwrap().signal_type,
        SignalType::Hold
    );

    let loose = SignalEngine::new(EngineConfig {
        signal_threshold: 0.5,
        ..EngineConfig::default()
    })
    .unwrap();
    assert_eq!(
        loose.evaluate(&candles, Some(&advisory)).unwrap().signal_type,
        SignalType::Buy
    );
}

#[test]
fn test_signal_json_round_trip() {
    let advisory = AdvisoryInput::new(0.8, 0.9).with_tags(["momentum"]);
    let signal = engine()
        .evaluate(&series(create_uptrend_candles(120)), Some(&advisory))
        .unwrap();

    let json = serde_json::to_string(&signal).unwrap();
    let restored: Signal = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, signal);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["signal_type"], "buy");
    assert!(value["assessment"]["contributing_factors"].is_array());
}

#[test]
fn test_hold_json_omits_targets() {
    let signal = engine()
        .evaluate(&series(create_flat_candles(80, 100.0)), None)
        .unwrap();
    let value = serde_json::to_value(&signal).unwrap();
    assert!(value.get("stop_loss").is_none());
    assert!(value.get("take_profit").is_none());
    assert_eq!(value["signal_type"], "hold");
}

#[test]
fn test_invalid_series_rejected() {
    let mut candles = create_uptrend_candles(60);
    candles.swap(10, 11);
    assert!(matches!(
        sigfuse::models::CandleSeries::new(candles),
        Err(EngineError::InvalidSeries(_))
    ));

    let mut candles = create_uptrend_candles(60);
    candles[5].close = f64::NAN;
    assert!(sigfuse::models::CandleSeries::new(candles).is_err());
}
