//! malldir CLI: normalize shopping-mall directory sources.
//!
//! Reads a saved directory page or API dump, runs it through the mall's
//! strategy, and writes the canonical directory JSON.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
