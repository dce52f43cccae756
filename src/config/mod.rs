//! Engine configuration
//!
//! Every field has a default. A JSON document may override any subset of
//! them, and a handful of environment variables override the JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::EngineError;

/// Deployment environment name (`APP_ENV`, falling back to `ENVIRONMENT`).
pub fn get_environment() -> String {
    std::env::var("APP_ENV")
        .or_else(|_| std::env::var("ENVIRONMENT"))
        .unwrap_or_else(|_| "sandbox".to_string())
        .to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorPeriods {
    pub ema_fast: u32,
    pub ema_slow: u32,
    pub sma_fast: u32,
    pub sma_slow: u32,
    pub rsi: u32,
    pub macd_fast: u32,
    pub macd_slow: u32,
    pub macd_signal: u32,
    pub atr: u32,
    pub volume_lookback: u32,
}

impl Default for IndicatorPeriods {
    fn default() -> Self {
        Self {
            ema_fast: 20,
            ema_slow: 50,
            sma_fast: 20,
            sma_slow: 50,
            rsi: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            atr: 14,
            volume_lookback: 20,
        }
    }
}

/// Support/resistance detection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Half-width of the centered extremum window.
    pub window: usize,
    /// Fraction of price within which two candidate levels merge.
    pub merge_tolerance_pct: f64,
    /// Fraction of price within which a later candle counts as a touch.
    pub touch_tolerance_pct: f64,
    pub max_per_kind: usize,
    /// Levels weaker than this are ignored for fusion and stop placement.
    pub min_strength: f64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            window: 5,
            merge_tolerance_pct: 0.001,
            touch_tolerance_pct: 0.005,
            max_per_kind: 5,
            min_strength: 0.3,
        }
    }
}

/// Static fusion weights. They need not sum to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorWeights {
    pub moving_average: f64,
    pub rsi: f64,
    pub macd: f64,
    pub volume: f64,
    pub levels: f64,
    pub advisory: f64,
}

impl FactorWeights {
    pub fn technical_total(&self) -> f64 {
        self.moving_average + self.rsi + self.macd + self.volume + self.levels
    }
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            moving_average: 1.0,
            rsi: 0.75,
            macd: 1.0,
            volume: 0.5,
            levels: 0.75,
            advisory: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub signal_threshold: f64,
    pub risk_reward_ratio: f64,
    pub atr_stop_multiplier: f64,
    pub neutral_dead_zone: f64,
    pub tie_break_epsilon: f64,
    pub volume_spike_sigma: f64,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub periods: IndicatorPeriods,
    pub levels: LevelConfig,
    pub weights: FactorWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            signal_threshold: 0.7,
            risk_reward_ratio: 2.0,
            atr_stop_multiplier: 1.5,
            neutral_dead_zone: 0.1,
            tie_break_epsilon: 0.1,
            volume_spike_sigma: 2.0,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            periods: IndicatorPeriods::default(),
            levels: LevelConfig::default(),
            weights: FactorWeights::default(),
        }
    }
}

fn invalid(message: impl Into<String>) -> EngineError {
    EngineError::Configuration(message.into())
}

fn check_unit(name: &str, value: f64) -> Result<(), EngineError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(invalid(format!("{} must be within [0, 1], got {}", name, value)));
    }
    Ok(())
}

fn check_positive(name: &str, value: f64) -> Result<(), EngineError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(format!("{} must be positive, got {}", name, value)));
    }
    Ok(())
}

fn check_fast_slow(name: &str, fast: u32, slow: u32) -> Result<(), EngineError> {
    if fast == 0 || slow == 0 {
        return Err(invalid(format!("{} periods must be positive", name)));
    }
    if fast >= slow {
        return Err(invalid(format!(
            "{} fast period {} must be shorter than slow period {}",
            name, fast, slow
        )));
    }
    Ok(())
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        check_unit("signal_threshold", self.signal_threshold)?;
        check_positive("risk_reward_ratio", self.risk_reward_ratio)?;
        check_positive("atr_stop_multiplier", self.atr_stop_multiplier)?;
        check_unit("neutral_dead_zone", self.neutral_dead_zone)?;
        check_unit("tie_break_epsilon", self.tie_break_epsilon)?;
        check_positive("volume_spike_sigma", self.volume_spike_sigma)?;

        if !(0.0..=100.0).contains(&self.rsi_oversold)
            || !(0.0..=100.0).contains(&self.rsi_overbought)
            || self.rsi_oversold >= self.rsi_overbought
        {
            return Err(invalid(format!(
                "rsi thresholds must satisfy 0 <= oversold < overbought <= 100, got {} / {}",
                self.rsi_oversold, self.rsi_overbought
            )));
        }

        let p = &self.periods;
        check_fast_slow("ema", p.ema_fast, p.ema_slow)?;
        check_fast_slow("sma", p.sma_fast, p.sma_slow)?;
        check_fast_slow("macd", p.macd_fast, p.macd_slow)?;
        for (name, period) in [
            ("rsi", p.rsi),
            ("macd_signal", p.macd_signal),
            ("atr", p.atr),
            ("volume_lookback", p.volume_lookback),
        ] {
            if period == 0 {
                return Err(invalid(format!("{} period must be positive", name)));
            }
        }

        let l = &self.levels;
        if l.window == 0 || l.max_per_kind == 0 {
            return Err(invalid("level window and max_per_kind must be positive"));
        }
        for (name, tolerance) in [
            ("merge_tolerance_pct", l.merge_tolerance_pct),
            ("touch_tolerance_pct", l.touch_tolerance_pct),
        ] {
            if !tolerance.is_finite() || !(0.0..1.0).contains(&tolerance) {
                return Err(invalid(format!(
                    "{} must be within [0, 1), got {}",
                    name, tolerance
                )));
            }
        }
        check_unit("min_strength", l.min_strength)?;

        let w = &self.weights;
        for (name, weight) in [
            ("moving_average", w.moving_average),
            ("rsi", w.rsi),
            ("macd", w.macd),
            ("volume", w.volume),
            ("levels", w.levels),
            ("advisory", w.advisory),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid(format!(
                    "weight {} must be non-negative, got {}",
                    name, weight
                )));
            }
        }
        if w.technical_total() <= 0.0 {
            return Err(invalid("at least one technical weight must be positive"));
        }

        Ok(())
    }

    /// Fewest candles for which every indicator produces a value.
    pub fn min_candles(&self) -> usize {
        let p = &self.periods;
        [
            p.ema_slow as usize,
            p.sma_slow as usize,
            p.rsi as usize + 1,
            p.macd_fast.max(p.macd_slow) as usize + p.macd_signal as usize - 1,
            p.atr as usize + 1,
            p.volume_lookback as usize + 1,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Parse a (possibly partial) JSON document over the defaults.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| invalid(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| invalid(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Apply scalar overrides looked up by environment-variable name.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields: [(&str, &mut f64); 4] = [
            ("SIGNAL_THRESHOLD", &mut self.signal_threshold),
            ("RISK_REWARD_RATIO", &mut self.risk_reward_ratio),
            ("ATR_STOP_MULTIPLIER", &mut self.atr_stop_multiplier),
            ("VOLUME_SPIKE_SIGMA", &mut self.volume_spike_sigma),
        ];
        for (key, field) in fields {
            if let Some(raw) = lookup(key) {
                *field = raw
                    .trim()
                    .parse()
                    .map_err(|_| invalid(format!("{} is not a number: {:?}", key, raw)))?;
            }
        }
        self.validate()?;
        Ok(self)
    }

    /// `CONFIG_PATH` if set, else defaults, then environment overrides.
    pub fn from_env() -> Result<Self, EngineError> {
        let base = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::from_json_file(path)?,
            Err(_) => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }
}
