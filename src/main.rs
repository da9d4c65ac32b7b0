//! trend-divergence - replay bar streams through the trend divergence indicator

use anyhow::Result;

use trend_divergence::adapters::cli;

fn main() -> Result<()> {
    let app = cli::init();
    cli::execute(app)
}
