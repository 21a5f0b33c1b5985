use super::atom::Atom;
use super::element::Element;
use super::topology::{Bond, BondOrder};
use std::collections::HashMap;
use thiserror::Error;

/// Read-only view of a molecular graph consumed by parameter assignment.
///
/// Implementations are supplied by the molecule representation in use. Atom indices
/// are zero-based and must stay stable for the duration of one assignment pass; the
/// matcher returns tuples in the same index space.
pub trait MolecularGraph {
    /// All atoms, indexed by their zero-based position.
    fn atoms(&self) -> &[Atom];

    /// All bonds of the graph.
    fn bonds(&self) -> &[Bond];

    /// The atoms bonded to `atom`, in ascending index order.
    fn neighbors(&self, atom: usize) -> &[usize];

    fn num_atoms(&self) -> usize {
        self.atoms().len()
    }

    fn element(&self, atom: usize) -> Option<Element> {
        self.atoms().get(atom).map(|a| a.element)
    }

    fn bond_between(&self, a: usize, b: usize) -> Option<&Bond> {
        self.bonds().iter().find(|bond| bond.connects(a, b))
    }

    /// The precomputed fractional bond order between two bonded atoms, if any.
    fn fractional_bond_order(&self, a: usize, b: usize) -> Option<f64> {
        self.bond_between(a, b).and_then(|bond| bond.fractional_order)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Atom index {index} is out of range for a graph with {len} atoms")]
    AtomOutOfRange { index: usize, len: usize },
    #[error("Atom {0} cannot be bonded to itself")]
    SelfBond(usize),
    #[error("Bond between atoms {0} and {1} is listed more than once")]
    DuplicateBond(usize, usize),
}

/// A plain in-memory molecular graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    /// Cached adjacency list for bond connectivity, indexed by atom.
    adjacency: Vec<Vec<usize>>,
    /// Lookup from an ordered atom pair to its position in `bonds`.
    bond_index: HashMap<(usize, usize), usize>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a molecule from atoms and bonds, checking every bond endpoint.
    ///
    /// Unlike [`add_bond`](Self::add_bond), a pair listed twice is an error, so a
    /// second record can never silently drop its order or fractional bond order.
    pub fn from_parts(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Result<Self, GraphError> {
        let mut molecule = Self::new();
        for atom in atoms {
            molecule.add_atom(atom);
        }
        for bond in bonds {
            let [a, b] = bond.atoms;
            if molecule.bond_index.contains_key(&Self::pair_key(a, b)) {
                return Err(GraphError::DuplicateBond(a, b));
            }
            molecule.insert_bond(bond)?;
        }
        Ok(molecule)
    }

    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.adjacency.push(Vec::new());
        self.atoms.len() - 1
    }

    /// Adds a bond between two atoms.
    ///
    /// Adding a bond that already exists is a no-op and returns the existing bond's
    /// position.
    pub fn add_bond(&mut self, a: usize, b: usize, order: BondOrder) -> Result<usize, GraphError> {
        self.insert_bond(Bond::new(a, b, order))
    }

    /// Sets the fractional bond order of an existing bond; returns `false` if the
    /// atoms are not bonded.
    pub fn set_fractional_bond_order(&mut self, a: usize, b: usize, value: f64) -> bool {
        match self.bond_index.get(&Self::pair_key(a, b)) {
            Some(&idx) => {
                self.bonds[idx].fractional_order = Some(value);
                true
            }
            None => false,
        }
    }

    fn insert_bond(&mut self, bond: Bond) -> Result<usize, GraphError> {
        let [a, b] = bond.atoms;
        let len = self.atoms.len();
        for index in [a, b] {
            if index >= len {
                return Err(GraphError::AtomOutOfRange { index, len });
            }
        }
        if a == b {
            return Err(GraphError::SelfBond(a));
        }

        let key = Self::pair_key(a, b);
        if let Some(&existing) = self.bond_index.get(&key) {
            return Ok(existing);
        }

        self.bonds.push(bond);
        let idx = self.bonds.len() - 1;
        self.bond_index.insert(key, idx);
        for (from, to) in [(a, b), (b, a)] {
            let list = &mut self.adjacency[from];
            if let Err(pos) = list.binary_search(&to) {
                list.insert(pos, to);
            }
        }
        Ok(idx)
    }

    #[inline]
    fn pair_key(a: usize, b: usize) -> (usize, usize) {
        if a <= b { (a, b) } else { (b, a) }
    }
}

impl MolecularGraph for Molecule {
    fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    fn neighbors(&self, atom: usize) -> &[usize] {
        self.adjacency.get(atom).map(Vec::as_slice).unwrap_or(&[])
    }

    fn bond_between(&self, a: usize, b: usize) -> Option<&Bond> {
        self.bond_index
            .get(&Self::pair_key(a, b))
            .map(|&idx| &self.bonds[idx])
    }
}
