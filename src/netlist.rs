//! Netlist construction from a parsed AIGER file: gates, nets and inverters.

use std::collections::HashMap;

use crate::aiger::{lit_is_constant, lit_pol, lit_var, Aiger, Lit};

/// Handle to a [`Gate`] in a [`Netlist`].
pub type GatePtr = usize;
/// Handle to a [`Net`] in a [`Netlist`].
pub type NetPtr = usize;

/// The function computed by a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    /// Single-input inverter, materialised only when a variable is used in
    /// both polarities.
    Inv,
    /// Two-input AND gate.
    And2,
}

impl GateKind {
    /// Returns `(literal_count, gate_count)` footprint, used as a cheap area
    /// proxy, mirroring quaigh's `network/area.rs` per-gate-type costs.
    pub fn footprint(&self) -> (u32, u32) {
        match self {
            GateKind::Inv => (1, 3),
            GateKind::And2 => (6, 3),
        }
    }

    /// Area cost of the gate, the first element of [`GateKind::footprint`].
    pub fn area(&self) -> u32 {
        self.footprint().0
    }
}

/// A gate: its kind, an optional label, and the nets it is bound to.
#[derive(Debug, Clone)]
pub struct Gate {
    /// Function computed.
    pub kind: GateKind,
    /// Optional human-readable label (from the AIGER symbol table, when any
    /// of the gate's bound nets carries one).
    pub label: Option<String>,
    /// Input nets.
    pub inputs: Vec<NetPtr>,
    /// Output nets (always exactly one net in this crate, but kept as a
    /// vector to mirror quaigh's `Gate::dependencies`-style uniformity).
    pub outputs: Vec<NetPtr>,
}

/// A net: a single-bit wire, identified by the `(variable, polarity)` tag it
/// was interned under.
#[derive(Debug, Clone)]
pub struct Net {
    /// Interning tag: `2*var + polarity`, matching the AIGER literal encoding
    /// but distinct from it (see [`Netlist::tag_of`]).
    pub tag: u32,
    /// Optional symbol-table label.
    pub label: Option<String>,
    /// Gates this net is bound to (as an input or an output), each appearing
    /// at most once.
    pub binds: Vec<GatePtr>,
    /// Whether the opposite-polarity net for this variable is also in use
    /// (hence an inverter gate exists for it).
    pub has_inverted_net: bool,
}

/// A netlist: an unordered bag of gates and nets built from an [`Aiger`].
#[derive(Debug, Clone, Default)]
pub struct Netlist {
    /// All gates, dense-indexed by [`GatePtr`].
    pub gates: Vec<Gate>,
    /// All nets, dense-indexed by [`NetPtr`].
    pub nets: Vec<Net>,
    nets_by_tag: HashMap<u32, NetPtr>,
}

impl Netlist {
    fn new() -> Netlist {
        Netlist::default()
    }

    /// Interning tag for a literal: constant-false is 0, constant-true is 1,
    /// an unnegated variable `v` is `(v << 1) | 1`, a negated variable `v` is
    /// `v << 1`. Distinct from the AIGER literal encoding so that the two
    /// constants (which share variable 0) get distinct tags.
    fn tag_of(lit: Lit) -> u32 {
        let v = lit_var(lit);
        if v == 0 {
            u32::from(lit_pol(lit))
        } else if lit_pol(lit) {
            v << 1
        } else {
            (v << 1) | 1
        }
    }

    fn negated_tag(tag: u32) -> u32 {
        if tag <= 1 {
            1 - tag
        } else {
            tag ^ 1
        }
    }

    fn label_for(&self, names: &std::collections::BTreeMap<usize, String>, index: usize) -> Option<String> {
        names.get(&index).cloned()
    }

    /// Interns the net for `tag`, creating it if needed.
    fn intern(&mut self, tag: u32, label: Option<String>) -> NetPtr {
        if let Some(&p) = self.nets_by_tag.get(&tag) {
            if let Some(l) = label {
                if self.nets[p].label.is_none() {
                    self.nets[p].label = Some(l);
                }
            }
            return p;
        }
        let p = self.nets.len();
        self.nets.push(Net {
            tag,
            label,
            binds: Vec::new(),
            has_inverted_net: false,
        });
        self.nets_by_tag.insert(tag, p);
        p
    }

    /// Returns the net for `lit`, interning it first if necessary.
    fn add_or_get_net(&mut self, lit: Lit, label: Option<String>) -> NetPtr {
        self.intern(Self::tag_of(lit), label)
    }

    /// Interns the net for `lit`, given that the net for the opposite
    /// polarity of its variable already exists. Materialises the `Inv` gate
    /// between the two polarities (unnegated net as input, negated net as
    /// output), since this is the first time both are needed. Returns the
    /// newly interned net for `lit` itself, carrying `label` if given.
    fn add_negated_net(&mut self, lit: Lit, label: Option<String>) -> NetPtr {
        let tag = Self::tag_of(lit);
        let neg_tag = Self::negated_tag(tag);
        let opposite = *self
            .nets_by_tag
            .get(&neg_tag)
            .expect("add_negated_net requires the opposite-polarity net to already exist");
        let p = self.intern(tag, label);
        let (base, negp) = if lit_pol(lit) {
            // lit is itself the negated polarity: the net just interned is
            // the negated one, and the pre-existing opposite net is the
            // unnegated base the inverter is driven from.
            (opposite, p)
        } else {
            (p, opposite)
        };
        self.nets[base].has_inverted_net = true;
        self.nets[negp].has_inverted_net = true;
        let gate = Gate {
            kind: GateKind::Inv,
            label: None,
            inputs: vec![base],
            outputs: vec![negp],
        };
        self.bind_gate(gate, base, negp);
        p
    }

    fn bind_gate(&mut self, gate: Gate, input: NetPtr, output: NetPtr) {
        let gp = self.gates.len();
        self.gates.push(gate);
        if !self.nets[input].binds.contains(&gp) {
            self.nets[input].binds.push(gp);
        }
        if !self.nets[output].binds.contains(&gp) {
            self.nets[output].binds.push(gp);
        }
    }

    /// Returns the net for `lit`, materialising an inverter if `lit` is
    /// non-constant and the opposite-polarity net exists but this one does
    /// not yet.
    fn net_for_lit(&mut self, lit: Lit, label: Option<String>) -> NetPtr {
        let tag = Self::tag_of(lit);
        if let Some(&p) = self.nets_by_tag.get(&tag) {
            if let Some(l) = label {
                if self.nets[p].label.is_none() {
                    self.nets[p].label = Some(l);
                }
            }
            return p;
        }
        // The net doesn't exist yet: if the opposite polarity does (and lit
        // can actually be inverted), this is an inverted use and needs an
        // Inv gate; otherwise just intern it.
        let neg_tag = Self::negated_tag(tag);
        if !lit_is_constant(lit) && self.nets_by_tag.contains_key(&neg_tag) {
            self.add_negated_net(lit, label)
        } else {
            self.intern(tag, label)
        }
    }

    /// Runs a best-effort consistency check over the built netlist,
    /// mirroring quaigh's own `Network::check` debug-assertions.
    pub fn check(&self) {
        for (gp, g) in self.gates.iter().enumerate() {
            let (want_in, want_out) = match g.kind {
                GateKind::Inv => (1, 1),
                GateKind::And2 => (2, 1),
            };
            assert_eq!(g.inputs.len(), want_in, "gate {gp} has the wrong input arity for {:?}", g.kind);
            assert_eq!(g.outputs.len(), want_out, "gate {gp} has the wrong output arity for {:?}", g.kind);
            for &n in g.inputs.iter().chain(g.outputs.iter()) {
                assert!(n < self.nets.len(), "gate {gp} references out-of-range net {n}");
                assert!(
                    self.nets[n].binds.contains(&gp),
                    "net {n} missing back-reference to gate {gp}"
                );
            }
        }
        for (np, n) in self.nets.iter().enumerate() {
            for &gp in &n.binds {
                assert!(gp < self.gates.len(), "net {np} references out-of-range gate {gp}");
            }
        }
    }
}

/// Build a [`Netlist`] from a parsed [`Aiger`] file, discarding latches
/// (sequential behaviour is out of scope) and materialising one `Inv` gate
/// per variable that is used in both polarities.
pub fn netlist_from_aiger(aig: &Aiger) -> Netlist {
    let mut nl = Netlist::new();

    for (i, &lit) in aig.inputs.iter().enumerate() {
        let label = nl.label_for(&aig.input_names, i);
        nl.add_or_get_net(lit, label);
    }

    for gate in &aig.and_gates {
        let label = None;
        let a = nl.net_for_lit(gate.a, None);
        let b = nl.net_for_lit(gate.b, None);
        let out = nl.add_or_get_net(gate.out, label);
        let g = Gate {
            kind: GateKind::And2,
            label: None,
            inputs: vec![a, b],
            outputs: vec![out],
        };
        let gp = nl.gates.len();
        nl.gates.push(g);
        for &n in &[a, b, out] {
            if !nl.nets[n].binds.contains(&gp) {
                nl.nets[n].binds.push(gp);
            }
        }
    }

    for (i, &lit) in aig.outputs.iter().enumerate() {
        let label = nl.label_for(&aig.output_names, i);
        nl.net_for_lit(lit, label);
    }

    nl
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aiger::parse_aag;

    #[test]
    fn test_single_input_passthrough() {
        let text = "aag 1 1 0 1 0\n2\n2\n";
        let aig = parse_aag(text.as_bytes()).unwrap();
        let nl = netlist_from_aiger(&aig);
        nl.check();
        assert_eq!(nl.gates.len(), 0);
        assert_eq!(nl.nets.len(), 1);
    }

    #[test]
    fn test_inverter_materialised_once() {
        // x1 used as-is and negated: one AND2 gate, one Inv gate.
        let text = "aag 2 1 0 1 1\n2\n4\n4 2 3\n";
        let aig = parse_aag(text.as_bytes()).unwrap();
        let nl = netlist_from_aiger(&aig);
        nl.check();
        let inv_count = nl.gates.iter().filter(|g| g.kind == GateKind::Inv).count();
        assert_eq!(inv_count, 1);
        let and_count = nl.gates.iter().filter(|g| g.kind == GateKind::And2).count();
        assert_eq!(and_count, 1);
    }

    #[test]
    fn test_shared_variable_both_polarities_outputs() {
        // aag 3 2 0 2 1, one gate: out = AND(x1, !x1); output 1 passes x2.
        let text = "aag 3 2 0 2 1\n2\n4\n6\n4\n6 2 3\n";
        let aig = parse_aag(text.as_bytes()).unwrap();
        let nl = netlist_from_aiger(&aig);
        nl.check();
        let inv_count = nl.gates.iter().filter(|g| g.kind == GateKind::Inv).count();
        assert_eq!(inv_count, 1, "x1 is used both negated and unnegated");
    }

    #[test]
    fn test_half_adder_like_fixture() {
        // Two inputs a, b; sum = a XOR b encoded as AND-of-negated-ANDs;
        // carry = a AND b. Verifies structural invariants rather than a
        // specific gate count, since the exact XOR encoding is not fixed by
        // the format itself.
        // a=2, b=4
        // n1 = !(a & b)        -> lit 6
        // n2 = !(a & !n1)      -> lit 8
        // n3 = !(!n1 & b)      -> lit 10
        // sum = !(n2 & n3)     -> lit 12  (== a XOR b)
        // carry = a & b        -> lit 6 negated is n1, so carry = !n1's negation = lit 7? use direct gate
        let text = "\
aag 6 2 0 2 4
2
4
13
7
6 2 4
8 2 7
10 3 4
12 9 11
";
        let aig = parse_aag(text.as_bytes()).unwrap();
        let nl = netlist_from_aiger(&aig);
        nl.check();
        // Every net with more than one bound gate reflects genuine fan-out;
        // every net appears in each gate's bind list at most once.
        for n in &nl.nets {
            let mut seen = std::collections::HashSet::new();
            for &g in &n.binds {
                assert!(seen.insert(g), "net bound to the same gate twice");
            }
        }
        // Exactly one inverter per variable used in both polarities.
        let vars_with_inv: Vec<_> = nl
            .nets
            .iter()
            .filter(|n| n.has_inverted_net)
            .collect();
        assert!(vars_with_inv.len() % 2 == 0);
    }
}
