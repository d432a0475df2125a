//! Two-way hypergraph partitioning via the Fiduccia-Mattheyses heuristic.

mod fm;
mod gain;

pub use fm::{fm_algorithm, fm_step, initial_partition};

use std::fmt;

use crate::module::{Module, NodePtr};

/// Which side of the cut a node is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    L,
    R,
}

impl Side {
    /// The other side.
    pub fn other(&self) -> Side {
        match self {
            Side::L => Side::R,
            Side::R => Side::L,
        }
    }
}

/// Errors that can be raised while building or running a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionError {
    /// The module has zero nodes; there is nothing to bipartition.
    EmptyModule,
    /// An internal invariant was violated (a move left one side empty, for
    /// instance), surfaced rather than silently tolerated.
    DegeneratePartition,
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionError::EmptyModule => write!(f, "cannot partition a module with zero nodes"),
            PartitionError::DegeneratePartition => write!(f, "partition left one side empty"),
        }
    }
}

impl std::error::Error for PartitionError {}

/// Whether a [`PartitionData`] is committed, or mid-trial-move with a
/// restorable backup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionState {
    Real,
    Pretending,
}

/// The raw per-node side assignment, plus the PRETENDING/REAL trial-move
/// machinery. A single backup vector is kept rather than separate L/R
/// backups, since R is always the complement of L and cloning the whole
/// side vector is simpler and just as correct.
#[derive(Debug, Clone)]
pub struct PartitionData {
    side: Vec<Side>,
    state: PartitionState,
    backup: Option<Vec<Side>>,
}

impl PartitionData {
    /// Builds a `PartitionData` with every node assigned to `L`.
    pub fn new(nb_nodes: usize) -> PartitionData {
        PartitionData {
            side: vec![Side::L; nb_nodes],
            state: PartitionState::Real,
            backup: None,
        }
    }

    /// The side `p` is currently assigned to.
    pub fn side(&self, p: NodePtr) -> Side {
        self.side[p]
    }

    /// Reassigns `p` to `s`.
    pub fn set_side(&mut self, p: NodePtr, s: Side) {
        self.side[p] = s;
    }

    /// Current partitioning state.
    pub fn state(&self) -> PartitionState {
        self.state
    }

    /// Iterator over nodes currently on the left side.
    pub fn l_iter(&self) -> impl Iterator<Item = NodePtr> + '_ {
        self.side
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Side::L)
            .map(|(i, _)| i)
    }

    /// Iterator over nodes currently on the right side.
    pub fn r_iter(&self) -> impl Iterator<Item = NodePtr> + '_ {
        self.side
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Side::R)
            .map(|(i, _)| i)
    }

    /// Snapshots the current assignment and switches to `Pretending`.
    pub fn enter_pretending(&mut self) {
        assert_eq!(self.state, PartitionState::Real, "already pretending");
        self.backup = Some(self.side.clone());
        self.state = PartitionState::Pretending;
    }

    /// Discards the backup and commits the trial move as real.
    pub fn commit(&mut self) {
        assert_eq!(self.state, PartitionState::Pretending, "not pretending");
        self.backup = None;
        self.state = PartitionState::Real;
    }

    /// Restores the assignment from the backup taken at
    /// [`PartitionData::enter_pretending`] and returns to `Real`.
    pub fn restore(&mut self) {
        assert_eq!(self.state, PartitionState::Pretending, "not pretending");
        self.side = self.backup.take().expect("backup must exist while pretending");
        self.state = PartitionState::Real;
    }
}

/// Area balance bounds computed once at the start of an FM pass.
#[derive(Debug, Clone, Copy)]
pub struct AreaBounds {
    /// Left-side area at pass entry (spec.md's `optimal`, renamed since
    /// "optimal" overstated what is really just a snapshot of the incoming
    /// left area, not an independently chosen target).
    pub target_l_area: i64,
    /// Lowest left-side area a move may leave the partition at.
    pub lower: i64,
    /// Highest left-side area a move may leave the partition at.
    pub upper: i64,
}

impl AreaBounds {
    /// Computes bounds around `l_area_entry` (the left-side area at pass
    /// entry), widened by `slack` (the largest single-gate area in the
    /// module, so that no legal move is ever rejected purely because one
    /// gate is large).
    pub fn compute(l_area_entry: i64, slack: u32) -> AreaBounds {
        AreaBounds {
            target_l_area: l_area_entry,
            lower: l_area_entry - slack as i64,
            upper: l_area_entry + slack as i64,
        }
    }

    /// Whether `l_area` is within bounds, inclusive.
    pub fn contains(&self, l_area: i64) -> bool {
        l_area >= self.lower && l_area <= self.upper
    }
}

/// Total gate area currently assigned to the left side.
pub fn area_left(module: &Module<'_>, data: &PartitionData) -> i64 {
    data.l_iter().map(|p| module.gate_area(p) as i64).sum()
}

/// A partition: a module and the side assignment built over it.
pub struct Partition<'m, 'n> {
    module: &'m Module<'n>,
    data: PartitionData,
}

impl<'m, 'n> Partition<'m, 'n> {
    /// Builds a partition over `module` with the given initial assignment.
    pub fn new(module: &'m Module<'n>, data: PartitionData) -> Partition<'m, 'n> {
        Partition { module, data }
    }

    /// The module being partitioned.
    pub fn module(&self) -> &'m Module<'n> {
        self.module
    }

    /// The raw side-assignment data.
    pub fn data(&self) -> &PartitionData {
        &self.data
    }

    /// Mutable access to the raw side-assignment data, used by the FM
    /// driver to apply committed moves.
    pub fn data_mut(&mut self) -> &mut PartitionData {
        &mut self.data
    }

    /// Number of hyperedges cut by the current assignment: a hypernet is
    /// cut when its members span both sides.
    pub fn cut_size(&self) -> usize {
        self.module
            .raw_edges()
            .iter()
            .filter(|e| {
                let mut sides = e.members.iter().map(|&p| self.data.side(p));
                let first = sides.next();
                match first {
                    None => false,
                    Some(f) => sides.any(|s| s != f),
                }
            })
            .count()
    }

    /// Current left-side total area.
    pub fn l_area(&self) -> i64 {
        area_left(self.module, &self.data)
    }

    /// Current right-side total area.
    pub fn r_area(&self) -> i64 {
        self.module.total_area() as i64 - self.l_area()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_data_pretending_restore() {
        let mut d = PartitionData::new(3);
        d.set_side(1, Side::R);
        d.enter_pretending();
        d.set_side(0, Side::R);
        assert_eq!(d.side(0), Side::R);
        d.restore();
        assert_eq!(d.side(0), Side::L);
        assert_eq!(d.side(1), Side::R);
        assert_eq!(d.state(), PartitionState::Real);
    }

    #[test]
    fn test_partition_data_pretending_commit() {
        let mut d = PartitionData::new(2);
        d.enter_pretending();
        d.set_side(0, Side::R);
        d.commit();
        assert_eq!(d.side(0), Side::R);
        assert_eq!(d.state(), PartitionState::Real);
    }

    #[test]
    fn test_area_bounds_contains() {
        let b = AreaBounds::compute(50, 10);
        assert!(b.contains(50));
        assert!(b.contains(45));
        assert!(!b.contains(30));
    }
}
