//! Human-readable reporting over a finished (or in-progress) [`Partition`].

use std::fmt;

use crate::module::Module;
use crate::partition::{AreaBounds, Partition};

/// A snapshot summary of a partition's cut, balance, and sides.
#[derive(Debug, Clone, Copy)]
pub struct PartitionReport {
    /// Total node count in the module.
    pub nb_nodes: usize,
    /// Nodes currently on the left side.
    pub l_count: usize,
    /// Nodes currently on the right side.
    pub r_count: usize,
    /// Total area of the left side.
    pub l_area: i64,
    /// Total area of the right side.
    pub r_area: i64,
    /// Number of hypernets currently cut.
    pub cut: usize,
    /// The balance bounds the partition was last evaluated against, if any.
    pub bounds: Option<AreaBounds>,
}

/// Builds a [`PartitionReport`] from a partition, optionally under `bounds`
/// computed by the caller (e.g. the bounds of the last completed FM pass).
pub fn report(module: &Module<'_>, partition: &Partition<'_, '_>, bounds: Option<AreaBounds>) -> PartitionReport {
    PartitionReport {
        nb_nodes: module.nb_nodes(),
        l_count: partition.data().l_iter().count(),
        r_count: partition.data().r_iter().count(),
        l_area: partition.l_area(),
        r_area: partition.r_area(),
        cut: partition.cut_size(),
        bounds,
    }
}

impl fmt::Display for PartitionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nodes:   {}", self.nb_nodes)?;
        writeln!(f, "left:    {} nodes, area {}", self.l_count, self.l_area)?;
        writeln!(f, "right:   {} nodes, area {}", self.r_count, self.r_area)?;
        writeln!(f, "cut:     {} hypernets", self.cut)?;
        if let Some(b) = self.bounds {
            writeln!(
                f,
                "bounds:  [{}, {}] (target {})",
                b.lower, b.upper, b.target_l_area
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aiger::parse_aag;
    use crate::module::module_from_netlist;
    use crate::netlist::netlist_from_aiger;
    use crate::partition::initial_partition;

    #[test]
    fn test_report_basic_counts() {
        let text = "aag 6 4 0 2 2\n2\n4\n6\n8\n9\n11\n9 2 4\n11 6 8\n";
        let aig = parse_aag(text.as_bytes()).unwrap();
        let nl = netlist_from_aiger(&aig);
        let m = module_from_netlist(&nl);
        let p = initial_partition(&m).unwrap();
        let r = report(&m, &p, None);
        assert_eq!(r.nb_nodes, 2);
        assert_eq!(r.l_count + r.r_count, 2);
        let text_out = format!("{r}");
        assert!(text_out.contains("nodes:"));
    }
}
