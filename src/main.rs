//! Binary for aigpart

use aigpart::cmd;
use clap::Parser;

#[doc(hidden)]
fn main() {
    let cli = cmd::Cli::parse();

    match cli.command {
        cmd::Commands::Partition(a) => a.run(),
        cmd::Commands::Stats(a) => a.run(),
    }
}
