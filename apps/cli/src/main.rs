//! tabpanel CLI — merge HTML fragments into one tabbed page.
//!
//! Each fragment becomes a button plus a content block; the injected
//! script shows one block at a time.

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
