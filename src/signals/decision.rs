//! Signal decision and risk sizing

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::models::advisory::AdvisoryInput;
use crate::models::indicators::{RsiCondition, TechnicalConditions, VolumeCondition};
use crate::models::levels::LevelSet;
use crate::models::signal::{
    Direction, EntryTiming, FusedAssessment, SignalType, StopSource, TimingCondition,
};

/// Advisory confidence above which a high-volume signal enters immediately.
const IMMEDIATE_ENTRY_CONFIDENCE: f64 = 0.8;

/// One evaluation cycle starts in `Evaluating` and ends in exactly one
/// `Emitted` state. Nothing carries over between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionState {
    Evaluating,
    Emitted(SignalType),
}

impl DecisionState {
    /// Apply the threshold policy and return the emitted type. An already
    /// emitted state is terminal and keeps its type.
    pub fn advance(self, assessment: &FusedAssessment, signal_threshold: f64) -> SignalType {
        match self {
            DecisionState::Emitted(signal_type) => signal_type,
            DecisionState::Evaluating => decide(assessment, signal_threshold),
        }
    }
}

/// Below the threshold everything is Hold, regardless of direction.
pub fn decide(assessment: &FusedAssessment, signal_threshold: f64) -> SignalType {
    if assessment.confidence < signal_threshold {
        return SignalType::Hold;
    }
    match assessment.direction {
        Direction::Bullish => SignalType::Buy,
        Direction::Bearish => SignalType::Sell,
        Direction::Neutral => SignalType::Hold,
    }
}

/// Stop-loss / take-profit pair for an actionable signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopLossTakeProfit {
    pub stop_loss: f64,
    pub take_profit: f64,
    pub risk_distance: f64,
    pub reward_distance: f64,
    pub source: StopSource,
}

impl StopLossTakeProfit {
    fn check_entry(entry: f64) -> Result<(), EngineError> {
        if !entry.is_finite() || entry <= 0.0 {
            return Err(EngineError::RiskSizing(format!(
                "entry price must be positive, got {}",
                entry
            )));
        }
        Ok(())
    }

    fn atr_source(atr: f64, multiplier: f64) -> Result<StopSource, EngineError> {
        if !atr.is_finite() || atr <= 0.0 {
            return Err(EngineError::RiskSizing(format!(
                "no qualifying level and ATR {} cannot size a stop",
                atr
            )));
        }
        Ok(StopSource::Atr { atr, multiplier })
    }

    /// Stop at the nearest qualifying support below entry, else
    /// `entry - k * ATR`. Target sits `risk_reward_ratio` risks above entry.
    ///
    /// Fails with `RiskSizing` when the stop would land at or below zero.
    pub fn for_buy(
        entry: f64,
        levels: &LevelSet,
        atr: f64,
        config: &EngineConfig,
    ) -> Result<Self, EngineError> {
        Self::check_entry(entry)?;

        let (stop_loss, source) =
            match levels.nearest_support_below(entry, config.levels.min_strength) {
                Some(level) => (
                    level.price,
                    StopSource::Level {
                        price: level.price,
                        strength: level.strength,
                    },
                ),
                None => {
                    let source = Self::atr_source(atr, config.atr_stop_multiplier)?;
                    (entry - config.atr_stop_multiplier * atr, source)
                }
            };

        if stop_loss <= 0.0 || stop_loss >= entry {
            return Err(EngineError::RiskSizing(format!(
                "buy stop {} is not within (0, {})",
                stop_loss, entry
            )));
        }

        let risk_distance = entry - stop_loss;
        let reward_distance = config.risk_reward_ratio * risk_distance;

        Ok(Self {
            stop_loss,
            take_profit: entry + reward_distance,
            risk_distance,
            reward_distance,
            source,
        })
    }

    /// Stop at the nearest qualifying resistance above entry, else
    /// `entry + k * ATR`. Target sits `risk_reward_ratio` risks below entry.
    ///
    /// Fails with `RiskSizing` when that target would land at or below zero,
    /// e.g. entry 10.6 with ATR 3.6 puts the stop at 16.0 and the target
    /// at -0.2.
    pub fn for_sell(
        entry: f64,
        levels: &LevelSet,
        atr: f64,
        config: &EngineConfig,
    ) -> Result<Self, EngineError> {
        Self::check_entry(entry)?;

        let (stop_loss, source) =
            match levels.nearest_resistance_above(entry, config.levels.min_strength) {
                Some(level) => (
                    level.price,
                    StopSource::Level {
                        price: level.price,
                        strength: level.strength,
                    },
                ),
                None => {
                    let source = Self::atr_source(atr, config.atr_stop_multiplier)?;
                    (entry + config.atr_stop_multiplier * atr, source)
                }
            };

        let risk_distance = stop_loss - entry;
        let reward_distance = config.risk_reward_ratio * risk_distance;
        let take_profit = entry - reward_distance;

        if risk_distance <= 0.0 || take_profit <= 0.0 || !stop_loss.is_finite() {
            return Err(EngineError::RiskSizing(format!(
                "sell target {} for stop {} falls at or below zero",
                take_profit, stop_loss
            )));
        }

        Ok(Self {
            stop_loss,
            take_profit,
            risk_distance,
            reward_distance,
            source,
        })
    }

    /// `None` for Hold.
    pub fn for_signal(
        signal_type: SignalType,
        entry: f64,
        levels: &LevelSet,
        atr: f64,
        config: &EngineConfig,
    ) -> Result<Option<Self>, EngineError> {
        match signal_type {
            SignalType::Buy => Self::for_buy(entry, levels, atr, config).map(Some),
            SignalType::Sell => Self::for_sell(entry, levels, atr, config).map(Some),
            SignalType::Hold => Ok(None),
        }
    }
}

/// Enter now when volume confirms and the advisory is very sure; otherwise
/// list what to wait for. Hold has no timing.
pub fn entry_timing(
    signal_type: SignalType,
    conditions: &TechnicalConditions,
    advisory: Option<&AdvisoryInput>,
) -> Option<EntryTiming> {
    if signal_type == SignalType::Hold {
        return None;
    }

    let high_volume = conditions.volume_condition == VolumeCondition::High;
    let advisory_confident =
        advisory.is_some_and(|a| a.confidence > IMMEDIATE_ENTRY_CONFIDENCE);
    if high_volume && advisory_confident {
        return Some(EntryTiming::Immediate);
    }

    let mut waits = Vec::new();
    match conditions.rsi_condition {
        RsiCondition::Oversold => waits.push(TimingCondition::WaitForRsiRecovery),
        RsiCondition::Overbought => waits.push(TimingCondition::WaitForRsiPullback),
        RsiCondition::Neutral => {}
    }
    if !high_volume {
        waits.push(TimingCondition::WaitForVolumeConfirmation);
    }

    if waits.is_empty() {
        Some(EntryTiming::Immediate)
    } else {
        Some(EntryTiming::Delayed(waits))
    }
}
