//! Candle builders shared by the test crates.
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use sigfuse::models::{Candle, CandleSeries};

pub fn ts(i: usize) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + i as i64 * 60, 0).unwrap()
}

/// Each candle opens at the previous close, with a fixed wick around the body.
pub fn candles_from_closes(closes: &[f64], volume: f64) -> Vec<Candle> {
    let mut candles = Vec::with_capacity(closes.len());
    let mut prev = closes.first().copied().unwrap_or(0.0);
    for (i, &close) in closes.iter().enumerate() {
        let open = prev;
        candles.push(Candle::new(
            open,
            open.max(close) + 0.5,
            open.min(close) - 0.5,
            close,
            volume,
            ts(i),
        ));
        prev = close;
    }
    candles
}

/// Every candle closes 1% above its open, volumes wobble slightly and the
/// final candle carries a large volume spike.
pub fn create_uptrend_candles(count: usize) -> Vec<Candle> {
    let mut candles = Vec::with_capacity(count);
    let mut prev = 100.0;
    for i in 0..count {
        let open = prev;
        let close = open * 1.01;
        candles.push(Candle::new(
            open,
            close * 1.002,
            open * 0.998,
            close,
            1000.0 + (i % 3) as f64 * 10.0,
            ts(i),
        ));
        prev = close;
    }
    if let Some(last) = candles.last_mut() {
        last.volume = 5000.0;
    }
    candles
}

/// A choppy climb, an eight-candle pullback, then a steady ten-candle
/// recovery. RSI dips below 50 in the pullback and crosses back above it
/// six candles from the end. The final candle carries a volume spike.
pub fn create_recovery_candles(count: usize) -> Vec<Candle> {
    const PULLBACK: usize = 8;
    const RECOVERY: usize = 10;
    let base = count.saturating_sub(PULLBACK + RECOVERY);

    let mut candles = Vec::with_capacity(count);
    let mut prev = 100.0;
    for i in 0..count {
        let step = if i >= base + PULLBACK {
            1.008
        } else if i >= base {
            0.99
        } else if i % 2 == 0 {
            1.012
        } else {
            0.994
        };
        let open = prev;
        let close = open * step;
        candles.push(Candle::new(
            open,
            open.max(close) * 1.002,
            open.min(close) * 0.998,
            close,
            1000.0 + (i % 3) as f64 * 10.0,
            ts(i),
        ));
        prev = close;
    }
    if let Some(last) = candles.last_mut() {
        last.volume = 5000.0;
    }
    candles
}

pub fn create_flat_candles(count: usize, price: f64) -> Vec<Candle> {
    (0..count)
        .map(|i| Candle::new(price, price + 0.5, price - 0.5, price, 1000.0, ts(i)))
        .collect()
}

/// Reflect every price around `pivot`, keeping volumes and timestamps.
pub fn mirror(candles: &[Candle], pivot: f64) -> Vec<Candle> {
    candles
        .iter()
        .map(|c| {
            Candle::new(
                pivot - c.open,
                pivot - c.low,
                pivot - c.high,
                pivot - c.close,
                c.volume,
                c.timestamp,
            )
        })
        .collect()
}

pub fn series(candles: Vec<Candle>) -> CandleSeries {
    CandleSeries::new(candles).unwrap()
}
