use crate::core::forcefield::definitions::{
    AngleParameter, BondParameter, FourierTerm, ProperTorsionParameter, VdwParameter,
};
use crate::core::forcefield::params::ForceField;
use crate::core::models::atom::Atom;
use crate::core::models::element::Element;
use crate::core::models::graph::Molecule;
use crate::core::models::topology::BondOrder;
use crate::core::smirks::table::TableMatcher;

pub const CC_BOND: &str = "[#6X4:1]-[#6X4:2]";
pub const CH_BOND: &str = "[#6X4:1]-[#1:2]";
pub const GENERIC_BOND: &str = "[*:1]~[*:2]";
pub const HCH_ANGLE: &str = "[#1:1]-[#6X4:2]-[#1:3]";
pub const CCH_ANGLE: &str = "[#6X4:1]-[#6X4:2]-[#1:3]";
pub const HCCH_TORSION: &str = "[#1:1]-[#6X4:2]-[#6X4:3]-[#1:4]";
pub const CARBON_ATOM: &str = "[#6:1]";
pub const HYDROGEN_ATOM: &str = "[#1:1]";

/// Ethane with carbons at 0 and 1; hydrogens 2, 3, 4 on C0 and 5, 6, 7 on C1.
pub fn ethane() -> Molecule {
    let mut mol = Molecule::new();
    let c0 = mol.add_atom(Atom::new(Element::CARBON));
    let c1 = mol.add_atom(Atom::new(Element::CARBON));
    mol.add_bond(c0, c1, BondOrder::Single).unwrap();
    for carbon in [c0, c0, c0, c1, c1, c1] {
        let h = mol.add_atom(Atom::new(Element::HYDROGEN));
        mol.add_bond(carbon, h, BondOrder::Single).unwrap();
    }
    mol
}

/// A bent A-B-C chain: O(0)-C(1)-N(2).
pub fn linear_triatomic() -> Molecule {
    let mut mol = Molecule::new();
    let a = mol.add_atom(Atom::new(Element::OXYGEN));
    let b = mol.add_atom(Atom::new(Element::CARBON));
    let c = mol.add_atom(Atom::new(Element::NITROGEN));
    mol.add_bond(a, b, BondOrder::Single).unwrap();
    mol.add_bond(b, c, BondOrder::Single).unwrap();
    mol
}

/// Formaldehyde-like trigonal carbon 0 bonded to O(1), H(2), H(3).
pub fn trigonal_center() -> Molecule {
    let mut mol = Molecule::new();
    let c = mol.add_atom(Atom::new(Element::CARBON));
    let o = mol.add_atom(Atom::new(Element::OXYGEN));
    let h1 = mol.add_atom(Atom::new(Element::HYDROGEN));
    let h2 = mol.add_atom(Atom::new(Element::HYDROGEN));
    mol.add_bond(c, o, BondOrder::Double).unwrap();
    mol.add_bond(c, h1, BondOrder::Single).unwrap();
    mol.add_bond(c, h2, BondOrder::Single).unwrap();
    mol
}

const ETHANE_HYDROGENS: [(usize, usize); 6] = [(0, 2), (0, 3), (0, 4), (1, 5), (1, 6), (1, 7)];

/// Recorded matches for the ethane fixture, as a toolkit would report them.
pub fn ethane_matcher() -> TableMatcher {
    let ch_bonds: Vec<Vec<usize>> = ETHANE_HYDROGENS.iter().map(|&(c, h)| vec![c, h]).collect();

    let mut all_bonds = vec![vec![0, 1]];
    all_bonds.extend(ch_bonds.iter().cloned());

    let mut hch = Vec::new();
    let mut cch = Vec::new();
    for (carbon, other) in [(0usize, 1usize), (1, 0)] {
        let hs: Vec<usize> = ETHANE_HYDROGENS
            .iter()
            .filter(|&&(c, _)| c == carbon)
            .map(|&(_, h)| h)
            .collect();
        for (i, &a) in hs.iter().enumerate() {
            for &b in &hs[i + 1..] {
                hch.push(vec![a, carbon, b]);
            }
            cch.push(vec![other, carbon, a]);
        }
    }

    let mut hcch = Vec::new();
    for a in [2, 3, 4] {
        for d in [5, 6, 7] {
            hcch.push(vec![a, 0, 1, d]);
        }
    }

    TableMatcher::new()
        .with(GENERIC_BOND, all_bonds)
        .with(CC_BOND, [vec![0, 1], vec![1, 0]])
        .with(CH_BOND, ch_bonds)
        .with(HCH_ANGLE, hch)
        .with(CCH_ANGLE, cch)
        .with(HCCH_TORSION, hcch)
        .with(CARBON_ATOM, [vec![0], vec![1]])
        .with(HYDROGEN_ATOM, (2..8).map(|h| vec![h]))
}

/// A force field that covers every bonded and nonbonded unit of [`ethane`].
pub fn ethane_forcefield() -> ForceField {
    let mut ff = ForceField::new();
    let bonds = ff.bonds_mut();
    bonds
        .add(BondParameter {
            id: "b1".into(),
            smirks: CC_BOND.into(),
            length: 1.526.into(),
            k: 620.0.into(),
        })
        .unwrap();
    bonds
        .add(BondParameter {
            id: "b2".into(),
            smirks: CH_BOND.into(),
            length: 1.09.into(),
            k: 680.0.into(),
        })
        .unwrap();
    let angles = ff.angles_mut();
    for (id, smirks, angle) in [("a1", HCH_ANGLE, 107.8), ("a2", CCH_ANGLE, 110.7)] {
        angles
            .add(AngleParameter {
                id: id.into(),
                smirks: smirks.into(),
                angle,
                k: 70.0,
            })
            .unwrap();
    }
    ff.proper_torsions_mut()
        .add(ProperTorsionParameter {
            id: "t1".into(),
            smirks: HCCH_TORSION.into(),
            terms: vec![FourierTerm::new(3, 0.0, 0.15)],
        })
        .unwrap();
    let vdw = ff.vdw_mut();
    for (id, smirks, epsilon, sigma) in [
        ("n1", HYDROGEN_ATOM, 0.0157, 2.65),
        ("n2", CARBON_ATOM, 0.1094, 3.4),
    ] {
        vdw.add(VdwParameter {
            id: id.into(),
            smirks: smirks.into(),
            epsilon,
            sigma: Some(sigma),
            rmin_half: None,
        })
        .unwrap();
    }
    ff.electrostatics_mut();
    ff
}
