//! Shared data models spanning the engine layers.

pub mod advisory;
pub mod indicators;
pub mod levels;
pub mod signal;

pub use advisory::AdvisoryInput;
pub use indicators::{
    AtrIndicator, Candle, CandleSeries, CrossoverType, EmaIndicator, IndicatorSnapshot,
    MacdIndicator, RsiCondition, RsiIndicator, SmaIndicator, TechnicalConditions, TrendState,
    VolumeCondition, VolumeProfile,
};
pub use levels::{LevelKind, LevelSet, PriceLevel};
pub use signal::{
    Direction, EntryTiming, FactorContribution, FactorKind, FusedAssessment, Signal, SignalType,
    StopSource, TimingCondition,
};
