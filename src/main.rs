use anyhow::Result;
use clap::Parser;

use globrun::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
