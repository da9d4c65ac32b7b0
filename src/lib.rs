//! Trend Divergence Indicator Library
//!
//! A streaming indicator that watches for short-term price moves against the
//! long-term trend and uses the log-volume z-score to tell noise from a real
//! trend change. One bar in, one signal out.
//!
//! # Modules
//!
//! - `domain`: Bars, signals and per-bar outputs
//! - `ports`: Trait abstractions (TrendIndicator, BarFeed)
//! - `strategy`: Volume statistics, trend estimators, classifiers, episode tracking
//! - `adapters`: JSON-lines I/O and the CLI
//! - `config`: Configuration loading and validation
//! - `application`: Replay runner

pub mod domain;
pub mod ports;
pub mod strategy;
pub mod adapters;
pub mod config;
pub mod application;
