//! Prometheus metrics for evaluation cycles

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use crate::models::signal::SignalType;

/// Evaluation metrics on a private registry, so several pipelines (or tests)
/// never collide on metric names.
pub struct Metrics {
    registry: Registry,
    pub signal_evaluations_total: IntCounter,
    pub signal_evaluation_errors_total: IntCounter,
    pub signals_emitted_total: IntCounterVec,
    pub stale_results_discarded_total: IntCounter,
    pub signal_evaluations_active: IntGauge,
    pub signal_evaluation_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let signal_evaluations_total = IntCounter::new(
            "signal_evaluations_total",
            "Evaluation cycles started",
        )?;
        let signal_evaluation_errors_total = IntCounter::new(
            "signal_evaluation_errors_total",
            "Evaluation cycles that ended in an error",
        )?;
        let signals_emitted_total = IntCounterVec::new(
            Opts::new("signals_emitted_total", "Signals produced, by type"),
            &["type"],
        )?;
        let stale_results_discarded_total = IntCounter::new(
            "stale_results_discarded_total",
            "Results dropped because a newer cycle for the same pair started",
        )?;
        let signal_evaluations_active = IntGauge::new(
            "signal_evaluations_active",
            "Evaluation cycles currently in flight",
        )?;
        let signal_evaluation_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "signal_evaluation_duration_seconds",
                "Wall-clock time of one evaluation cycle",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        )?;

        registry.register(Box::new(signal_evaluations_total.clone()))?;
        registry.register(Box::new(signal_evaluation_errors_total.clone()))?;
        registry.register(Box::new(signals_emitted_total.clone()))?;
        registry.register(Box::new(stale_results_discarded_total.clone()))?;
        registry.register(Box::new(signal_evaluations_active.clone()))?;
        registry.register(Box::new(signal_evaluation_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            signal_evaluations_total,
            signal_evaluation_errors_total,
            signals_emitted_total,
            stale_results_discarded_total,
            signal_evaluations_active,
            signal_evaluation_duration_seconds,
        })
    }

    pub fn record_signal(&self, signal_type: SignalType) {
        let label = match signal_type {
            SignalType::Buy => "buy",
            SignalType::Sell => "sell",
            SignalType::Hold => "hold",
        };
        self.signals_emitted_total.with_label_values(&[label]).inc();
    }

    /// Text exposition format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
