//! Application Layer - Use cases wiring ports to the indicator

pub mod replay;

pub use replay::{ReplayError, ReplayReport, ReplayRunner, ReplaySummary};
