//! Ports Layer - Trait definitions for external dependencies
//!
//! Following hexagonal architecture, these traits abstract:
//! - Bar sources (files, in-memory, live feeds)
//! - The indicator itself, so runners can drive any implementation

pub mod bar_feed;
pub mod indicator;

pub use bar_feed::{BarFeed, FeedError, VecBarFeed};
pub use indicator::TrendIndicator;
