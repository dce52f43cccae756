use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::advisory::AdvisoryInput;
use crate::models::indicators::TechnicalConditions;
use crate::models::levels::LevelSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

impl Direction {
    /// Direction of a signed score, with `|score| < dead_zone` treated as neutral.
    pub fn from_score(score: f64, dead_zone: f64) -> Self {
        if score.is_nan() || score.abs() < dead_zone || score == 0.0 {
            Direction::Neutral
        } else if score > 0.0 {
            Direction::Bullish
        } else {
            Direction::Bearish
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            Direction::Bullish => 1.0,
            Direction::Bearish => -1.0,
            Direction::Neutral => 0.0,
        }
    }

    pub fn opposes(self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Bullish, Direction::Bearish) | (Direction::Bearish, Direction::Bullish)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    MovingAverage,
    Rsi,
    Macd,
    VolumeSpike,
    PriceLevels,
    Advisory,
}

impl FactorKind {
    pub fn name(self) -> &'static str {
        match self {
            FactorKind::MovingAverage => "moving_average",
            FactorKind::Rsi => "rsi",
            FactorKind::Macd => "macd",
            FactorKind::VolumeSpike => "volume_spike",
            FactorKind::PriceLevels => "price_levels",
            FactorKind::Advisory => "advisory",
        }
    }

    pub fn is_technical(self) -> bool {
        self != FactorKind::Advisory
    }
}

/// One weighted vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorContribution {
    pub factor: FactorKind,
    pub weight: f64,
    pub direction: Direction,
    /// 0..=1
    pub magnitude: f64,
}

impl FactorContribution {
    pub fn neutral(factor: FactorKind, weight: f64) -> Self {
        Self {
            factor,
            weight,
            direction: Direction::Neutral,
            magnitude: 0.0,
        }
    }

    /// Signed, weighted contribution to the fused score numerator.
    pub fn signed_contribution(&self) -> f64 {
        self.direction.sign() * self.magnitude * self.weight
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedAssessment {
    pub direction: Direction,
    /// 0..=1
    pub confidence: f64,
    /// Fused score in -1..=1 before the dead-zone and tie-break are applied.
    pub score: f64,
    /// Score over technical factors alone.
    pub technical_score: f64,
    /// Set when indicator votes and the advisory disagreed with near-equal
    /// magnitudes and the result was forced to neutral.
    pub abstained: bool,
    /// Strongest contribution first.
    pub contributing_factors: Vec<FactorContribution>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingCondition {
    WaitForRsiRecovery,
    WaitForRsiPullback,
    WaitForVolumeConfirmation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryTiming {
    Immediate,
    Delayed(Vec<TimingCondition>),
}

/// Where a stop-loss came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopSource {
    Level { price: f64, strength: f64 },
    Atr { atr: f64, multiplier: f64 },
}

/// Terminal output of one evaluation cycle.
///
/// Buy: `stop_loss < entry_price < take_profit`. Sell: `take_profit <
/// entry_price < stop_loss`. Hold carries neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub signal_type: SignalType,
    pub confidence: f64,
    pub entry_price: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stop_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub take_profit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stop_source: Option<StopSource>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub risk_reward_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub entry_timing: Option<EntryTiming>,
    pub generated_at: DateTime<Utc>,
    pub supporting_levels: LevelSet,
    pub assessment: FusedAssessment,
    pub conditions: TechnicalConditions,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub advisory: Option<AdvisoryInput>,
}

impl Signal {
    pub fn is_actionable(&self) -> bool {
        self.signal_type != SignalType::Hold
    }

    /// Distance from entry to stop, for actionable signals.
    pub fn risk_distance(&self) -> Option<f64> {
        self.stop_loss.map(|sl| (self.entry_price - sl).abs())
    }

    /// Distance from entry to target, for actionable signals.
    pub fn reward_distance(&self) -> Option<f64> {
        self.take_profit.map(|tp| (tp - self.entry_price).abs())
    }
}
