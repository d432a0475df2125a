//! Cell gain model and the critical-net gain-update rule.

use crate::module::{Module, NodePtr};

use super::{PartitionData, Side};

/// Gain of moving `v` away from its current side: the number of incident
/// hypernets that would become uncut, minus the number that would become
/// cut, were `v` to move right now. Positive gain means the move reduces
/// the cut count.
pub fn cell_gain(module: &Module<'_>, data: &PartitionData, v: NodePtr) -> i64 {
    let side = data.side(v);
    let mut cut = 0i64;
    let mut uncut = 0i64;
    for &hp in module.incident_nets(v) {
        let e = module.hypernet(hp);
        let s = e
            .members
            .iter()
            .filter(|&&m| m != v && data.side(m) == side)
            .count();
        if s == 0 {
            cut += 1;
        } else {
            uncut += 1;
        }
    }
    cut - uncut
}

/// The gain vector for every node in `module` under the current assignment.
pub fn initial_gains(module: &Module<'_>, data: &PartitionData) -> Vec<i64> {
    (0..module.nb_nodes()).map(|v| cell_gain(module, data, v)).collect()
}

/// Applies the critical-net gain update after `moved` has been committed
/// from `_from` to its current (new) side. For every hypernet incident to
/// `moved`, the net is critical when the side `moved` now belongs to has 0
/// or 1 members; in that case every other non-fixed member's gain is
/// adjusted by the table in the criticality rule: a lone remaining member
/// (count after move == 1) loses 1 of gain, a now-empty side (count == 0,
/// unreachable in practice since `moved` itself always counts on its own
/// post-move side) would gain 1. Nets with 2 or more members on that side
/// are not critical and are left untouched.
pub fn update_gains_after_move(
    module: &Module<'_>,
    data: &PartitionData,
    gain: &mut [i64],
    fixed: &[bool],
    moved: NodePtr,
    _from: Side,
) {
    let to = data.side(moved);
    for &hp in module.incident_nets(moved) {
        let e = module.hypernet(hp);
        let count = e.members.iter().filter(|&&m| data.side(m) == to).count();
        let delta = match count {
            0 => 1,
            1 => -1,
            _ => 0,
        };
        if delta == 0 {
            continue;
        }
        for &u in &e.members {
            if u == moved || fixed[u] {
                continue;
            }
            gain[u] += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aiger::parse_aag;
    use crate::module::module_from_netlist;
    use crate::netlist::netlist_from_aiger;
    use crate::partition::PartitionData;

    #[test]
    fn test_gain_of_isolated_node_is_zero() {
        let text = "aag 6 4 0 2 2\n2\n4\n6\n8\n9\n11\n9 2 4\n11 6 8\n";
        let aig = parse_aag(text.as_bytes()).unwrap();
        let nl = netlist_from_aiger(&aig);
        let m = module_from_netlist(&nl);
        let data = PartitionData::new(m.nb_nodes());
        for v in 0..m.nb_nodes() {
            assert_eq!(cell_gain(&m, &data, v), 0);
        }
    }

    #[test]
    fn test_gain_of_shared_net_cut() {
        let text = "aag 5 3 0 1 2\n2\n4\n6\n11\n8 2 4\n11 8 6\n";
        let aig = parse_aag(text.as_bytes()).unwrap();
        let nl = netlist_from_aiger(&aig);
        let m = module_from_netlist(&nl);
        let mut data = PartitionData::new(m.nb_nodes());
        // Put node 0 on L and node 1 on R: their shared net is cut, and
        // moving either one to match the other improves it.
        data.set_side(0, Side::L);
        data.set_side(1, Side::R);
        assert_eq!(cell_gain(&m, &data, 0), 1);
        assert_eq!(cell_gain(&m, &data, 1), 1);
    }
}
