//! EsgTracker CLI — file-backed ESG disclosure tracking tool.
//!
//! Extracts disclosure line items from sustainability reports, curates a
//! category taxonomy over them, and builds a cross-framework ontology.

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
