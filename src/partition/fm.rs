//! Initial seeding, the FM pass (`fm_step`) and the FM driver loop
//! (`fm_algorithm`).

use rand::rngs::SmallRng;
use rand::Rng;

use crate::module::{Module, NodePtr};

use super::gain::{initial_gains, update_gains_after_move};
use super::{area_left, AreaBounds, Partition, PartitionData, PartitionError, Side};

/// Seeds an initial bipartition by a breadth-first traversal from node 0.
/// Visit index `0..=N/2` goes to `R`, the rest to `L` (the threshold is
/// deliberately inclusive of the midpoint, matching the source behaviour
/// this crate generalises). Nodes BFS never reaches (disconnected
/// components) are assigned round-robin so that every node ends up on
/// exactly one side.
pub fn initial_partition<'m, 'n>(module: &'m Module<'n>) -> Result<Partition<'m, 'n>, PartitionError> {
    let n = module.nb_nodes();
    if n == 0 {
        return Err(PartitionError::EmptyModule);
    }

    let threshold = n / 2;
    let mut assigned: Vec<Option<Side>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut queue = std::collections::VecDeque::new();
    queue.push_back(0usize);
    visited[0] = true;
    let mut visit_index = 0usize;

    while let Some(v) = queue.pop_front() {
        assigned[v] = Some(if visit_index <= threshold { Side::R } else { Side::L });
        visit_index += 1;
        for &u in &module.node(v).neighbors {
            if !visited[u] {
                visited[u] = true;
                queue.push_back(u);
            }
        }
    }

    let mut rr = 0usize;
    for a in assigned.iter_mut() {
        if a.is_none() {
            *a = Some(if rr % 2 == 0 { Side::L } else { Side::R });
            rr += 1;
        }
    }

    let mut data = PartitionData::new(n);
    for (v, s) in assigned.into_iter().enumerate() {
        data.set_side(v, s.expect("every node must be assigned a side"));
    }

    Ok(Partition::new(module, data))
}

/// Finds the non-fixed node with the highest gain whose tentative move
/// keeps the left-side area within `bounds`. Ties are broken first by the
/// closeness of the resulting left-side area to `bounds.target_l_area`,
/// then (if `rng` is given) by reservoir sampling over the remaining ties,
/// otherwise by picking the first candidate encountered.
fn find_highest_gain_cell(
    module: &Module<'_>,
    data: &mut PartitionData,
    gain: &[i64],
    fixed: &[bool],
    bounds: &AreaBounds,
    rng: Option<&mut SmallRng>,
) -> Option<(NodePtr, i64, i64)> {
    let mut best: Option<(NodePtr, i64, i64)> = None;
    let mut tie_count = 0u32;
    let mut rng = rng;

    for v in 0..module.nb_nodes() {
        if fixed[v] {
            continue;
        }
        let other = data.side(v).other();
        data.enter_pretending();
        data.set_side(v, other);
        let l_area = area_left(module, data);
        data.restore();

        if !bounds.contains(l_area) {
            continue;
        }
        let g = gain[v];

        let better = match best {
            None => true,
            Some((_, bg, ba)) => {
                if g > bg {
                    true
                } else if g == bg {
                    let d_new = (l_area - bounds.target_l_area).abs();
                    let d_old = (ba - bounds.target_l_area).abs();
                    d_new < d_old
                } else {
                    false
                }
            }
        };

        if better {
            best = Some((v, g, l_area));
            tie_count = 1;
        } else if let Some((_, bg, ba)) = best {
            let same_gain = g == bg;
            let same_dist = (l_area - bounds.target_l_area).abs() == (ba - bounds.target_l_area).abs();
            if same_gain && same_dist {
                tie_count += 1;
                if let Some(r) = rng.as_deref_mut() {
                    if r.gen_range(0..tie_count) == 0 {
                        best = Some((v, g, l_area));
                    }
                }
            }
        }
    }

    best
}

/// Runs a single FM pass: repeatedly moves the highest-gain feasible cell,
/// tracking cumulative gain over the move sequence, then commits only the
/// best-scoring prefix (or nothing, if no prefix improves on the status
/// quo). Returns the best cumulative gain `G*` achieved.
pub fn fm_step(partition: &mut Partition<'_, '_>, rng: Option<&mut SmallRng>) -> i64 {
    let module = partition.module();
    let n = module.nb_nodes();
    let data = partition.data_mut();

    let initial_sides: Vec<Side> = (0..n).map(|v| data.side(v)).collect();
    let l_area_entry = area_left(module, data);
    let slack = module.max_node_area();
    let bounds = AreaBounds::compute(l_area_entry, slack);

    let mut fixed = vec![false; n];
    let mut gain = initial_gains(module, data);

    struct Move {
        node: NodePtr,
        to: Side,
        g: i64,
        l_area: i64,
    }
    let mut moves: Vec<Move> = Vec::new();

    let mut rng = rng;
    loop {
        let candidate = find_highest_gain_cell(module, data, &gain, &fixed, &bounds, rng.as_deref_mut());
        let Some((v, g, l_area)) = candidate else {
            break;
        };
        let from = data.side(v);
        data.set_side(v, from.other());
        fixed[v] = true;
        update_gains_after_move(module, data, &mut gain, &fixed, v, from);
        moves.push(Move {
            node: v,
            to: data.side(v),
            g,
            l_area,
        });
    }

    // Scan the move-order list for the prefix with maximum cumulative gain,
    // breaking ties between equal-sum prefixes by the closeness of that
    // prefix's end-state left area to the pass-entry target (spec's §4.4.5
    // tie-break rule). The initial best is (len=0, sum=0).
    let mut running = 0i64;
    let mut best_sum = 0i64;
    let mut best_len = 0usize;
    let mut best_dist = (l_area_entry - bounds.target_l_area).abs();
    for (i, mv) in moves.iter().enumerate() {
        running += mv.g;
        let dist = (mv.l_area - bounds.target_l_area).abs();
        if running > best_sum || (running == best_sum && dist < best_dist) {
            best_sum = running;
            best_len = i + 1;
            best_dist = dist;
        }
    }

    // Restore to the entering assignment, then replay the best prefix.
    for (v, s) in initial_sides.into_iter().enumerate() {
        data.set_side(v, s);
    }
    for mv in moves.into_iter().take(best_len) {
        data.set_side(mv.node, mv.to);
    }

    best_sum
}

/// Runs FM passes to convergence: repeats `fm_step` until a pass returns a
/// non-positive gain, then stops. Returns the number of passes run.
pub fn fm_algorithm(partition: &mut Partition<'_, '_>, mut rng: Option<&mut SmallRng>) -> u32 {
    let mut passes = 0u32;
    loop {
        let g = fm_step(partition, rng.as_deref_mut());
        passes += 1;
        if g <= 0 {
            break;
        }
    }
    passes
}
