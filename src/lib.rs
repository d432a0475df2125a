//! AIGER front-end and FM hypergraph bipartitioner for logic synthesis.
//!
//! Pipeline: [`aiger::parse_aag`] → [`netlist::netlist_from_aiger`] →
//! [`module::module_from_netlist`] → [`partition::initial_partition`] and
//! [`partition::fm_algorithm`].

pub mod aiger;
pub mod cmd;
pub mod module;
pub mod netlist;
pub mod partition;
pub mod report;

pub use aiger::{parse_aag, Aiger, AigerError};
pub use module::{module_from_netlist, Module};
pub use netlist::{netlist_from_aiger, Netlist};
pub use partition::{fm_algorithm, fm_step, initial_partition, Partition, PartitionError};
