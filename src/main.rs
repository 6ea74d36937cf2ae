//! MS²Rescore front-end CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, assemble the
//! configuration, hand it to the rescoring program, and exit with the
//! appropriate status. For programmatic use, prefer the library API
//! (`ms2rescore_gui::api`).

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();
    cli::run(args)
}
