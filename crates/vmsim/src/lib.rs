pub mod config;
pub mod printer;

use anyhow::{Context, Result};
use paging::{Trace, simulate};

use crate::config::SimConfig;
use crate::printer::Report;

/// Loads the configured trace and replays it, returning the report to print.
pub fn run(config: &SimConfig) -> Result<Report> {
    let trace = Trace::open(&config.trace_path)
        .with_context(|| format!("load trace {}", config.trace_path.display()))?;
    let stats = simulate(config.policy, config.frames, &trace);
    Ok(Report::new(config.policy, config.frames, stats))
}
