//! Adapters Layer - Concrete implementations of ports
//!
//! - `jsonl`: JSON-lines bar feed and signal writer
//! - `cli`: Command-line interface

pub mod cli;
pub mod jsonl;

pub use jsonl::{write_signals, JsonLinesBarFeed};
