// Host tooling: unwrap/expect/panic acceptable outside the library crate.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod doc;
mod step;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "pigpio GPIO controller development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the mock-only host build and the pigpio build for the Pi
    Check,
    /// Run tests (unit, integration and doc; hardware only on request)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
        /// Also run the on-target pigpio tests (Raspberry Pi, as root)
        #[arg(long)]
        hardware: bool,
    },
    /// Build and optionally open documentation
    Doc {
        /// Open documentation in browser
        #[arg(long)]
        open: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => check::run(),
        Commands::Test {
            unit,
            integration,
            hardware,
        } => test::run(unit, integration, hardware),
        Commands::Doc { open } => doc::run(open),
    }
}
