//! Factor scoring, fusion, decision and the engine that ties them together.

pub mod aggregation;
pub mod decision;
pub mod engine;
pub mod scoring;

pub use aggregation::*;
pub use decision::*;
pub use engine::*;
pub use scoring::*;
