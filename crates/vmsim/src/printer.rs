use std::fmt;
use std::num::NonZeroUsize;

use anyhow::{Context, Result};
use clap::ValueEnum;
use comfy_table::{Cell, Table};
use paging::{Policy, SimulationStats};
use serde::Serialize;

/// How a report is rendered on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Table,
    Json,
}

/// Result of one run together with the settings that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub algorithm: &'static str,
    pub frames: usize,
    #[serde(flatten)]
    pub stats: SimulationStats,
}

impl Report {
    pub fn new(policy: Policy, frames: NonZeroUsize, stats: SimulationStats) -> Self {
        Self {
            algorithm: policy.name(),
            frames: frames.get(),
            stats,
        }
    }

    fn rows(&self) -> [(&'static str, String); 5] {
        [
            ("Algorithm", self.algorithm.to_string()),
            ("Number of frames", self.frames.to_string()),
            ("Total memory accesses", self.stats.accesses.to_string()),
            ("Total page faults", self.stats.faults.to_string()),
            ("Total writes to disk", self.stats.writebacks.to_string()),
        ]
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.rows() {
            writeln!(f, "{}: {}", label, value)?;
        }
        Ok(())
    }
}

pub fn format_report(report: &Report, format: OutputFormat) -> Result<String> {
    let output = match format {
        OutputFormat::Text => report.to_string(),
        OutputFormat::Table => format_table(report),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("serialize report")? + "\n"
        }
    };
    Ok(output)
}

pub fn print_report(report: &Report, format: OutputFormat) -> Result<()> {
    print!("{}", format_report(report, format)?);
    Ok(())
}

fn format_table(report: &Report) -> String {
    let mut table = Table::new();
    table.set_header(vec![Cell::new("Metric"), Cell::new("Value")]);
    for (label, value) in report.rows() {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    format!("{table}\n")
}
