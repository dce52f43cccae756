//! Price structure: support and resistance

pub mod support_resistance;

pub use support_resistance::*;
