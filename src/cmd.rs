//! Command line interface

use std::fs::File;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::aiger::parse_aag;
use crate::module::module_from_netlist;
use crate::netlist::netlist_from_aiger;
use crate::partition::{fm_algorithm, initial_partition};
use crate::report::report;

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Command line arguments
#[derive(Subcommand)]
pub enum Commands {
    /// Partition an AIGER netlist into two balanced, low-cut halves
    ///
    /// Parses the file, builds the gate/net graph and the hypergraph
    /// module, then runs Fiduccia-Mattheyses passes to convergence.
    #[clap()]
    Partition(PartitionArgs),

    /// Show statistics about an AIGER netlist
    ///
    /// Prints gate and net counts without running the partitioner.
    #[clap()]
    Stats(StatsArgs),
}

/// Command arguments for partitioning
#[derive(Args)]
pub struct PartitionArgs {
    /// AIGER file to partition
    file: PathBuf,

    /// Seed for the tie-breaking RNG used during move selection
    #[arg(long)]
    seed: Option<u64>,
}

impl PartitionArgs {
    pub fn run(&self) {
        let f = File::open(&self.file).unwrap_or_else(|e| {
            eprintln!("Could not open {}: {e}", self.file.display());
            std::process::exit(1);
        });
        let aig = parse_aag(f).unwrap_or_else(|e| {
            eprintln!("Error parsing {}: {e}", self.file.display());
            std::process::exit(1);
        });
        let nl = netlist_from_aiger(&aig);
        let module = module_from_netlist(&nl);
        let mut partition = initial_partition(&module).unwrap_or_else(|e| {
            eprintln!("Could not partition {}: {e}", self.file.display());
            std::process::exit(1);
        });
        let mut rng = self.seed.map(SmallRng::seed_from_u64);
        let passes = fm_algorithm(&mut partition, rng.as_mut());
        let r = report(&module, &partition, None);
        println!("{r}");
        println!("passes: {passes}");
    }
}

/// Command arguments for showing statistics
#[derive(Args)]
pub struct StatsArgs {
    /// AIGER file to inspect
    file: PathBuf,
}

impl StatsArgs {
    pub fn run(&self) {
        let f = File::open(&self.file).unwrap_or_else(|e| {
            eprintln!("Could not open {}: {e}", self.file.display());
            std::process::exit(1);
        });
        let aig = parse_aag(f).unwrap_or_else(|e| {
            eprintln!("Error parsing {}: {e}", self.file.display());
            std::process::exit(1);
        });
        let nl = netlist_from_aiger(&aig);
        let module = module_from_netlist(&nl);
        println!("inputs:     {}", aig.inputs.len());
        println!("outputs:    {}", aig.outputs.len());
        println!("latches:    {} (discarded)", aig.latches.len());
        println!("gates:      {}", nl.gates.len());
        println!("nets:       {}", nl.nets.len());
        println!("nodes:      {}", module.nb_nodes());
        println!("hypernets:  {}", module.raw_edges().len());
    }
}
