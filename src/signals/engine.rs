//! Main signal evaluation engine.
//!
//! One call runs the whole cycle: indicators and levels, factor votes,
//! fusion, decision, risk sizing. The engine holds only its validated
//! configuration, so one instance can serve any number of concurrent callers.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::indicators::build_snapshot;
use crate::indicators::structure::detect_levels;
use crate::models::advisory::AdvisoryInput;
use crate::models::indicators::{CandleSeries, IndicatorSnapshot};
use crate::models::signal::{Signal, SignalType};
use crate::signals::aggregation::fuse;
use crate::signals::decision::{entry_timing, DecisionState, StopLossTakeProfit};
use crate::signals::scoring::score_factors;

#[derive(Debug, Clone)]
pub struct SignalEngine {
    config: EngineConfig,
}

impl SignalEngine {
    /// Rejects an invalid configuration up front so evaluation never has to.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fewest candles `evaluate` accepts.
    pub fn min_candles(&self) -> usize {
        self.config.min_candles()
    }

    pub fn evaluate(
        &self,
        series: &CandleSeries,
        advisory: Option<&AdvisoryInput>,
    ) -> Result<Signal, EngineError> {
        self.evaluate_at(series, advisory, Utc::now())
    }

    /// Same as [`evaluate`](Self::evaluate) with a caller-supplied
    /// `generated_at`, which makes the output fully deterministic.
    pub fn evaluate_at(
        &self,
        series: &CandleSeries,
        advisory: Option<&AdvisoryInput>,
        generated_at: DateTime<Utc>,
    ) -> Result<Signal, EngineError> {
        self.run(series, advisory, generated_at)
            .map(|(signal, _)| signal)
    }

    /// Evaluate and also return the indicator snapshot behind the signal
    pub fn evaluate_with_indicators(
        &self,
        series: &CandleSeries,
        advisory: Option<&AdvisoryInput>,
    ) -> Result<(Signal, IndicatorSnapshot), EngineError> {
        self.run(series, advisory, Utc::now())
    }

    fn run(
        &self,
        series: &CandleSeries,
        advisory: Option<&AdvisoryInput>,
        generated_at: DateTime<Utc>,
    ) -> Result<(Signal, IndicatorSnapshot), EngineError> {
        let config = &self.config;

        let snapshot = build_snapshot(series, config)?;
        let levels = detect_levels(series, &config.levels);
        debug!(
            candles = series.len(),
            close = snapshot.close(),
            rsi = snapshot.rsi.value,
            macd_histogram = snapshot.macd.histogram,
            atr = snapshot.atr.value,
            levels = levels.len(),
            "indicators computed"
        );

        let votes = score_factors(&snapshot, &levels, advisory, config);
        let assessment = fuse(votes, config);
        debug!(
            score = assessment.score,
            technical_score = assessment.technical_score,
            confidence = assessment.confidence,
            abstained = assessment.abstained,
            "factors fused"
        );

        let signal_type = DecisionState::Evaluating.advance(&assessment, config.signal_threshold);

        let entry_price = snapshot.close();
        let targets = StopLossTakeProfit::for_signal(
            signal_type,
            entry_price,
            &levels,
            snapshot.atr.value,
            config,
        )?;

        let conditions = snapshot.conditions(config.rsi_oversold, config.rsi_overbought);
        let entry_timing = entry_timing(signal_type, &conditions, advisory);

        if signal_type != SignalType::Hold {
            info!(
                signal = ?signal_type,
                confidence = assessment.confidence,
                entry = entry_price,
                stop_loss = targets.map(|t| t.stop_loss),
                take_profit = targets.map(|t| t.take_profit),
                "signal emitted"
            );
        }

        let signal = Signal {
            signal_type,
            confidence: assessment.confidence,
            entry_price,
            stop_loss: targets.map(|t| t.stop_loss),
            take_profit: targets.map(|t| t.take_profit),
            stop_source: targets.map(|t| t.source),
            risk_reward_ratio: targets.map(|_| config.risk_reward_ratio),
            entry_timing,
            generated_at,
            supporting_levels: levels.bracketing(entry_price, config.levels.min_strength),
            assessment,
            conditions,
            advisory: advisory.cloned(),
        };

        Ok((signal, snapshot))
    }
}
