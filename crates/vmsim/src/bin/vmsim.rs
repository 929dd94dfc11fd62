use anyhow::Result;
use clap::Parser;

use vmsim::config::Args;
use vmsim::printer::print_report;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.resolve();
    log::debug!("resolved configuration: {:?}", config);

    let report = vmsim::run(&config)?;
    print_report(&report, config.format)
}
