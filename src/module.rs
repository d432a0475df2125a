//! Module construction: turns a [`Netlist`] into a node-per-gate hypergraph
//! with both pairwise adjacency (for BFS seeding) and hypernet incidence
//! (for FM gain computation).

use itertools::Itertools;

use crate::netlist::{GatePtr, Netlist};

/// Handle to a [`Node`] in a [`Module`]. Dense and parity with the netlist's
/// gate indices: `node[i]` always corresponds to `gate[i]`.
pub type NodePtr = usize;
/// Handle to a [`Hypernet`] in a [`Module`]'s hyperedge arena.
pub type HypernetPtr = usize;

/// A node: one gate, its pairwise neighbours, and whether it is pinned to a
/// side (always `false` for this crate, since fixed cells are not produced
/// by any builder here — kept for parity with spec.md's data model).
#[derive(Debug, Clone)]
pub struct Node {
    /// The gate this node represents.
    pub gate: GatePtr,
    /// Pairwise-adjacent nodes, may contain duplicates and never contains
    /// `self` (self-loops are dropped, per the module-builder's design).
    pub neighbors: Vec<NodePtr>,
    /// Whether this node is fixed to a side. Never set by the builders in
    /// this crate, but read by the partitioner.
    pub fixed: bool,
}

/// A hyperedge: the set of nodes bound to a shared net, stored once in the
/// module's arena and referenced by index from each member's incidence list.
#[derive(Debug, Clone)]
pub struct Hypernet {
    /// Nodes bound to this net, each appearing once.
    pub members: Vec<NodePtr>,
}

/// A hypergraph module built from a [`Netlist`]: one node per gate, plus
/// pairwise adjacency and hypernet incidence derived from the nets.
pub struct Module<'n> {
    netlist: &'n Netlist,
    nodes: Vec<Node>,
    /// `incidence[node]` lists the hypernets that node belongs to.
    incidence: Vec<Vec<HypernetPtr>>,
    raw_edges: Vec<Hypernet>,
}

impl<'n> Module<'n> {
    /// Number of nodes (always equal to the netlist's gate count).
    pub fn nb_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the node at `p`.
    pub fn node(&self, p: NodePtr) -> &Node {
        &self.nodes[p]
    }

    /// The underlying netlist this module was built from.
    pub fn netlist(&self) -> &'n Netlist {
        self.netlist
    }

    /// Hypernets a node belongs to.
    pub fn incident_nets(&self, p: NodePtr) -> &[HypernetPtr] {
        &self.incidence[p]
    }

    /// All hyperedges in the module's arena.
    pub fn raw_edges(&self) -> &[Hypernet] {
        &self.raw_edges
    }

    /// A single hyperedge by index.
    pub fn hypernet(&self, p: HypernetPtr) -> &Hypernet {
        &self.raw_edges[p]
    }

    /// Area of the gate a node represents.
    pub fn gate_area(&self, p: NodePtr) -> u32 {
        self.netlist.gates[self.nodes[p].gate].kind.area()
    }

    /// Largest single-gate area in the module, used to size balance slack.
    pub fn max_node_area(&self) -> u32 {
        self.nodes.iter().map(|n| self.netlist.gates[n.gate].kind.area()).max().unwrap_or(0)
    }

    /// Sum of every node's gate area.
    pub fn total_area(&self) -> u32 {
        self.nodes.iter().map(|n| self.netlist.gates[n.gate].kind.area()).sum()
    }
}

/// Build a [`Module`] from a [`Netlist`]: one node per gate (dense handle
/// parity with the netlist's gate indices), pairwise adjacency derived by
/// walking each net's bound-gate list (may contain duplicate edges; no
/// self-loops), and hypernet incidence for every net bound to two or more
/// gates.
pub fn module_from_netlist(netlist: &Netlist) -> Module<'_> {
    let n = netlist.gates.len();
    let mut nodes: Vec<Node> = (0..n)
        .map(|g| Node {
            gate: g,
            neighbors: Vec::new(),
            fixed: false,
        })
        .collect();
    let mut incidence: Vec<Vec<HypernetPtr>> = vec![Vec::new(); n];
    let mut raw_edges: Vec<Hypernet> = Vec::new();

    for net in &netlist.nets {
        if net.binds.len() < 2 {
            continue;
        }
        // Pairwise adjacency: every unordered pair of distinct gates bound
        // to this net becomes an edge, possibly duplicated across nets.
        for (&a, &b) in net.binds.iter().tuple_combinations() {
            nodes[a].neighbors.push(b);
            nodes[b].neighbors.push(a);
        }
        let hp = raw_edges.len();
        raw_edges.push(Hypernet {
            members: net.binds.clone(),
        });
        for &g in &net.binds {
            incidence[g].push(hp);
        }
    }

    Module {
        netlist,
        nodes,
        incidence,
        raw_edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aiger::parse_aag;
    use crate::netlist::netlist_from_aiger;

    #[test]
    fn test_two_isolated_gates() {
        // Two independent and-gates sharing no net: no hypernet, no edges.
        let text = "aag 6 4 0 2 2\n2\n4\n6\n8\n9\n11\n9 2 4\n11 6 8\n";
        let aig = parse_aag(text.as_bytes()).unwrap();
        let nl = netlist_from_aiger(&aig);
        let m = module_from_netlist(&nl);
        assert_eq!(m.nb_nodes(), 2);
        for i in 0..m.nb_nodes() {
            assert!(m.node(i).neighbors.is_empty());
            assert!(m.incident_nets(i).is_empty());
        }
    }

    #[test]
    fn test_three_gate_chain_shares_hypernets() {
        // g1 = AND(x1, x2); g2 = AND(g1, x3); both share the net for g1's
        // output, so that net becomes a 2-member hypernet.
        let text = "aag 5 3 0 1 2\n2\n4\n6\n11\n8 2 4\n11 8 6\n";
        let aig = parse_aag(text.as_bytes()).unwrap();
        let nl = netlist_from_aiger(&aig);
        let m = module_from_netlist(&nl);
        assert_eq!(m.nb_nodes(), 2);
        assert!(!m.node(0).neighbors.is_empty());
        assert!(!m.node(1).neighbors.is_empty());
        assert_eq!(m.raw_edges().len(), 1);
        assert_eq!(m.raw_edges()[0].members.len(), 2);
    }

    #[test]
    fn test_no_self_loops() {
        let text = "aag 6 4 0 2 2\n2\n4\n6\n8\n9\n11\n9 2 4\n11 6 8\n";
        let aig = parse_aag(text.as_bytes()).unwrap();
        let nl = netlist_from_aiger(&aig);
        let m = module_from_netlist(&nl);
        for i in 0..m.nb_nodes() {
            assert!(!m.node(i).neighbors.contains(&i));
        }
    }
}
