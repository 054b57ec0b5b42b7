//! # Designer
//!
//! Command-line entry point for inspecting and exporting designs.

use clap::Parser;
use designer_cli::{init_tracing, run, CliArgs};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    tracing::debug!(?args, "Parsed arguments");

    let output = run(args)?;
    println!("{output}");
    Ok(())
}
