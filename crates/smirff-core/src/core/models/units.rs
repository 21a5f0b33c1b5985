//! Structural units (atoms, bonds, angles, torsions) of a molecular graph and the
//! symmetry rules that decide when two atom tuples denote the same unit.

use super::graph::MolecularGraph;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// How the atoms of a matched tuple may be permuted without changing the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symmetry {
    /// Tuple order is significant (single atoms).
    Ordered,
    /// A tuple equals its reverse: bonds, angles, proper torsions, constraints.
    Reversible,
    /// Central atom at tag 2; the three peripheral atoms form an unordered set.
    Improper,
    /// The tuple is an unordered set of atoms.
    Unordered,
}

impl Symmetry {
    /// Returns the canonical representative of `tuple` under this symmetry.
    ///
    /// For [`Symmetry::Improper`] the key lists the central atom first, followed by the
    /// sorted peripheral atoms.
    pub fn canonicalize(&self, tuple: &[usize]) -> Vec<usize> {
        match self {
            Symmetry::Ordered => tuple.to_vec(),
            Symmetry::Reversible => {
                let reversed: Vec<usize> = tuple.iter().rev().copied().collect();
                if reversed.as_slice() < tuple {
                    reversed
                } else {
                    tuple.to_vec()
                }
            }
            Symmetry::Improper => {
                if tuple.len() != 4 {
                    return tuple.to_vec();
                }
                let mut others = [tuple[0], tuple[2], tuple[3]];
                others.sort_unstable();
                vec![tuple[1], others[0], others[1], others[2]]
            }
            Symmetry::Unordered => {
                let mut sorted = tuple.to_vec();
                sorted.sort_unstable();
                sorted
            }
        }
    }
}

pub fn atoms<G: MolecularGraph + ?Sized>(graph: &G) -> Vec<Vec<usize>> {
    (0..graph.num_atoms()).map(|i| vec![i]).collect()
}

pub fn bonds<G: MolecularGraph + ?Sized>(graph: &G) -> Vec<Vec<usize>> {
    let set: BTreeSet<Vec<usize>> = graph
        .bonds()
        .iter()
        .map(|bond| Symmetry::Reversible.canonicalize(&bond.atoms))
        .collect();
    set.into_iter().collect()
}

pub fn angles<G: MolecularGraph + ?Sized>(graph: &G) -> Vec<Vec<usize>> {
    let mut set = BTreeSet::new();
    for center in 0..graph.num_atoms() {
        let neighbors = graph.neighbors(center);
        for (i, &a) in neighbors.iter().enumerate() {
            for &c in &neighbors[i + 1..] {
                set.insert(Symmetry::Reversible.canonicalize(&[a, center, c]));
            }
        }
    }
    set.into_iter().collect()
}

pub fn proper_torsions<G: MolecularGraph + ?Sized>(graph: &G) -> Vec<Vec<usize>> {
    let mut set = BTreeSet::new();
    for bond in graph.bonds() {
        let [b, c] = bond.atoms;
        for &a in graph.neighbors(b) {
            if a == c {
                continue;
            }
            for &d in graph.neighbors(c) {
                // a == d closes a three-membered ring and is not a torsion.
                if d == b || d == a {
                    continue;
                }
                set.insert(Symmetry::Reversible.canonicalize(&[a, b, c, d]));
            }
        }
    }
    set.into_iter().collect()
}

/// Improper candidates: every atom with exactly three neighbors, keyed as
/// `[center, n1, n2, n3]` with sorted neighbors.
pub fn improper_centers<G: MolecularGraph + ?Sized>(graph: &G) -> Vec<Vec<usize>> {
    (0..graph.num_atoms())
        .filter_map(|center| match graph.neighbors(center) {
            [a, b, c] => Some(vec![center, *a, *b, *c]),
            _ => None,
        })
        .collect()
}

/// Number of proper torsions sharing the central bond `b`-`c`.
pub fn torsion_multiplicity<G: MolecularGraph + ?Sized>(graph: &G, b: usize, c: usize) -> usize {
    let deg_b = graph.neighbors(b).len();
    let deg_c = graph.neighbors(c).len();
    deg_b.saturating_sub(1) * deg_c.saturating_sub(1)
}

/// Shortest bond-path separation for every atom pair at most `max_bonds` apart.
///
/// Keys are ordered pairs `(i, j)` with `i < j`.
pub fn bond_separations<G: MolecularGraph + ?Sized>(
    graph: &G,
    max_bonds: usize,
) -> BTreeMap<(usize, usize), usize> {
    let mut separations = BTreeMap::new();
    for start in 0..graph.num_atoms() {
        let mut depth = vec![usize::MAX; graph.num_atoms()];
        depth[start] = 0;
        let mut queue = VecDeque::from([start]);
        while let Some(atom) = queue.pop_front() {
            if depth[atom] == max_bonds {
                continue;
            }
            for &next in graph.neighbors(atom) {
                if depth[next] == usize::MAX {
                    depth[next] = depth[atom] + 1;
                    queue.push_back(next);
                    if start < next {
                        separations.insert((start, next), depth[next]);
                    }
                }
            }
        }
    }
    separations
}
