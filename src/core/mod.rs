//! Runtime that drives evaluation cycles against the collaborators.

pub mod runtime;

pub use runtime::{CycleOutcome, PipelineConfig, PipelineError, SignalPipeline};
