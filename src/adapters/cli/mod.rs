//! CLI Adapter
//!
//! Command-line interface for the trend divergence indicator.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{execute, CheckConfigCmd, CliApp, Command, ReplayCmd};

/// Parse the process arguments
pub fn init() -> CliApp {
    use clap::Parser;
    CliApp::parse()
}
