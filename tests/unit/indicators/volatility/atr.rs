//! Unit tests for ATR indicator

use crate::support::{create_flat_candles, ts};
use sigfuse::indicators::volatility::{calculate_atr, true_ranges};
use sigfuse::models::Candle;

#[test]
fn test_atr_constant_range() {
    let atr = calculate_atr(&create_flat_candles(20, 100.0), 14).unwrap();
    assert!((atr.value - 1.0).abs() < 1e-12);
    assert_eq!(atr.period, 14);
}

#[test]
fn test_atr_needs_period_plus_one() {
    assert!(calculate_atr(&create_flat_candles(14, 100.0), 14).is_err());
    assert!(calculate_atr(&create_flat_candles(15, 100.0), 14).is_ok());
}

#[test]
fn test_true_range_includes_gaps() {
    let candles = vec![
        Candle::new(100.0, 101.0, 99.0, 100.0, 1.0, ts(0)),
        Candle::new(110.0, 111.0, 109.0, 110.0, 1.0, ts(1)),
    ];
    assert_eq!(true_ranges(&candles), vec![11.0]);
    assert_eq!(calculate_atr(&candles, 1).unwrap().value, 11.0);
}
