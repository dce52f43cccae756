use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// +1 for a green body, -1 for a red body, 0 for a doji.
    pub fn body_direction(&self) -> i8 {
        if self.close > self.open {
            1
        } else if self.close < self.open {
            -1
        } else {
            0
        }
    }
}

/// Ordered, validated candle sequence for one trading pair.
///
/// Timestamps are strictly increasing and every value is finite and
/// non-negative with `low <= high`. Dereferences to `[Candle]` so indicator
/// functions take plain slices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Candle>", into = "Vec<Candle>")]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(candles: Vec<Candle>) -> Result<Self, EngineError> {
        for (i, candle) in candles.iter().enumerate() {
            let values = [candle.open, candle.high, candle.low, candle.close, candle.volume];
            if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(EngineError::InvalidSeries(format!(
                    "candle {} has a non-finite or negative value",
                    i
                )));
            }
            if candle.low > candle.high {
                return Err(EngineError::InvalidSeries(format!(
                    "candle {} has low {} above high {}",
                    i, candle.low, candle.high
                )));
            }
            if i > 0 && candle.timestamp <= candles[i - 1].timestamp {
                return Err(EngineError::InvalidSeries(format!(
                    "timestamp of candle {} is not after candle {}",
                    i,
                    i - 1
                )));
            }
        }
        Ok(Self { candles })
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn into_inner(self) -> Vec<Candle> {
        self.candles
    }
}

impl Deref for CandleSeries {
    type Target = [Candle];

    fn deref(&self) -> &Self::Target {
        &self.candles
    }
}

impl TryFrom<Vec<Candle>> for CandleSeries {
    type Error = EngineError;

    fn try_from(candles: Vec<Candle>) -> Result<Self, Self::Error> {
        Self::new(candles)
    }
}

impl From<CandleSeries> for Vec<Candle> {
    fn from(series: CandleSeries) -> Self {
        series.candles
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverType {
    Bullish,
    Bearish,
    None,
}

impl CrossoverType {
    /// Classifies the sign change of a spread between two consecutive points.
    pub fn from_spread(previous: f64, current: f64) -> Self {
        if previous <= 0.0 && current > 0.0 {
            CrossoverType::Bullish
        } else if previous >= 0.0 && current < 0.0 {
            CrossoverType::Bearish
        } else {
            CrossoverType::None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmaIndicator {
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<f64>,
    pub period: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmaIndicator {
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<f64>,
    pub period: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiIndicator {
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<f64>,
    pub period: u32,
}

impl RsiIndicator {
    pub fn is_rising(&self) -> bool {
        self.previous.is_some_and(|prev| self.value > prev)
    }

    pub fn is_falling(&self) -> bool {
        self.previous.is_some_and(|prev| self.value < prev)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdIndicator {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_histogram: Option<f64>,
    pub period: (u32, u32, u32),
}

impl MacdIndicator {
    pub fn crossover(&self) -> CrossoverType {
        match self.previous_histogram {
            Some(prev) => CrossoverType::from_spread(prev, self.histogram),
            None => CrossoverType::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtrIndicator {
    pub value: f64,
    pub period: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeProfile {
    pub volume: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub z_score: f64,
    pub is_spike: bool,
    pub lookback: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendState {
    Uptrend,
    Downtrend,
    Sideways,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiCondition {
    Oversold,
    Overbought,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeCondition {
    High,
    Normal,
}

/// Human-level read of the latest candle, reported alongside a signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalConditions {
    pub trend: TrendState,
    pub rsi_condition: RsiCondition,
    pub volume_condition: VolumeCondition,
    pub ema_cross: CrossoverType,
    pub macd_cross: CrossoverType,
}

/// Indicator values at the latest candle, plus the previous point where a
/// crossover check needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub timestamp: DateTime<Utc>,
    pub last_candle: Candle,
    pub ema_fast: EmaIndicator,
    pub ema_slow: EmaIndicator,
    pub sma_fast: SmaIndicator,
    pub sma_slow: SmaIndicator,
    pub rsi: RsiIndicator,
    pub macd: MacdIndicator,
    pub atr: AtrIndicator,
    pub volume: VolumeProfile,
}

impl IndicatorSnapshot {
    pub fn close(&self) -> f64 {
        self.last_candle.close
    }

    pub fn ema_cross(&self) -> CrossoverType {
        match (self.ema_fast.previous, self.ema_slow.previous) {
            (Some(fast_prev), Some(slow_prev)) => CrossoverType::from_spread(
                fast_prev - slow_prev,
                self.ema_fast.value - self.ema_slow.value,
            ),
            _ => CrossoverType::None,
        }
    }

    pub fn trend(&self) -> TrendState {
        let close = self.close();
        if self.ema_fast.value > self.ema_slow.value && close > self.ema_fast.value {
            TrendState::Uptrend
        } else if self.ema_fast.value < self.ema_slow.value && close < self.ema_fast.value {
            TrendState::Downtrend
        } else {
            TrendState::Sideways
        }
    }

    pub fn conditions(&self, rsi_oversold: f64, rsi_overbought: f64) -> TechnicalConditions {
        let rsi_condition = if self.rsi.value < rsi_oversold {
            RsiCondition::Oversold
        } else if self.rsi.value > rsi_overbought {
            RsiCondition::Overbought
        } else {
            RsiCondition::Neutral
        };
        let volume_condition = if self.volume.is_spike {
            VolumeCondition::High
        } else {
            VolumeCondition::Normal
        };
        TechnicalConditions {
            trend: self.trend(),
            rsi_condition,
            volume_condition,
            ema_cross: self.ema_cross(),
            macd_cross: self.macd.crossover(),
        }
    }
}
