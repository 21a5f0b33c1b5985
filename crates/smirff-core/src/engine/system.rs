use crate::core::forcefield::assignment::{Labels, VdwTerms};
use crate::core::forcefield::handlers::electrostatics::ElectrostaticsSettings;
use crate::core::forcefield::handlers::gbsa::GbsaSettings;
use crate::core::forcefield::handlers::vdw::VdwSettings;
use crate::core::models::element::Element;
use crate::core::models::graph::MolecularGraph;
use crate::core::models::units;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Particle {
    pub index: usize,
    pub element: Element,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sigma: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epsilon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gbsa_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gbsa_scale: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct HarmonicBond {
    pub atoms: [usize; 2],
    pub length: f64,
    pub k: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct HarmonicAngle {
    pub atoms: [usize; 3],
    pub angle: f64,
    pub k: f64,
}

/// One Fourier term on one torsion unit; `k` is already divided by `idivf`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PeriodicTorsion {
    pub atoms: [usize; 4],
    pub periodicity: u32,
    pub phase: f64,
    pub k: f64,
    pub improper: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Constraint {
    pub atoms: [usize; 2],
    pub distance: f64,
}

/// A scaled nonbonded interaction between atoms one to three bonds apart.
///
/// Pairs whose scale factors are both zero are still listed so that engines can
/// exclude them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct NonbondedException {
    pub atoms: [usize; 2],
    pub separation: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge_product: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sigma: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epsilon: Option<f64>,
}

/// Simulation-ready parameters of one molecule.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SystemParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_charge: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vdw: Option<VdwSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub electrostatics: Option<ElectrostaticsSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gbsa: Option<GbsaSettings>,
    pub particles: Vec<Particle>,
    pub bonds: Vec<HarmonicBond>,
    pub angles: Vec<HarmonicAngle>,
    pub torsions: Vec<PeriodicTorsion>,
    pub constraints: Vec<Constraint>,
    pub exceptions: Vec<NonbondedException>,
}

/// The result of a successful pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParameterizedSystem {
    pub labels: Labels,
    pub parameters: SystemParameters,
}

/// Nonbonded settings that shape the assembled system.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Nonbonded<'a> {
    pub vdw: Option<&'a VdwSettings>,
    pub electrostatics: Option<&'a ElectrostaticsSettings>,
    pub gbsa: Option<&'a GbsaSettings>,
}

fn fixed<const N: usize>(atoms: &[usize]) -> [usize; N] {
    let mut out = [0; N];
    out.copy_from_slice(&atoms[..N]);
    out
}

impl SystemParameters {
    pub(crate) fn assemble(
        graph: &dyn MolecularGraph,
        labels: &Labels,
        charges: &[Option<f64>],
        settings: Nonbonded<'_>,
        generate_exceptions: bool,
    ) -> Self {
        let n = graph.num_atoms();
        let mut lj: Vec<Option<VdwTerms>> = vec![None; n];
        for assignment in &labels.vdw {
            lj[assignment.atoms[0]] = Some(assignment.terms);
        }

        let mut particles: Vec<Particle> = graph
            .atoms()
            .iter()
            .enumerate()
            .map(|(index, atom)| Particle {
                index,
                element: atom.element,
                charge: charges.get(index).copied().flatten(),
                sigma: lj[index].map(|t| t.sigma),
                epsilon: lj[index].map(|t| t.epsilon),
                gbsa_radius: None,
                gbsa_scale: None,
            })
            .collect();
        for assignment in &labels.gbsa {
            let particle = &mut particles[assignment.atoms[0]];
            particle.gbsa_radius = Some(assignment.terms.radius);
            particle.gbsa_scale = Some(assignment.terms.scale);
        }

        let bonds = labels
            .bonds
            .iter()
            .map(|a| HarmonicBond {
                atoms: fixed(&a.atoms),
                length: a.terms.length,
                k: a.terms.k,
            })
            .collect();
        let angles = labels
            .angles
            .iter()
            .map(|a| HarmonicAngle {
                atoms: fixed(&a.atoms),
                angle: a.terms.angle,
                k: a.terms.k,
            })
            .collect();
        let propers = labels.proper_torsions.iter().map(|a| (a, false));
        let impropers = labels.improper_torsions.iter().map(|a| (a, true));
        let torsions = propers
            .chain(impropers)
            .flat_map(|(a, improper)| {
                a.terms.iter().map(move |term| PeriodicTorsion {
                    atoms: fixed(&a.atoms),
                    periodicity: term.periodicity,
                    phase: term.phase,
                    k: term.k,
                    improper,
                })
            })
            .collect();
        let constraints = labels
            .constraints
            .iter()
            .map(|a| Constraint {
                atoms: fixed(&a.atoms),
                distance: a.terms.distance,
            })
            .collect();

        let exceptions = if generate_exceptions {
            scaled_exceptions(graph, &lj, charges, settings)
        } else {
            Vec::new()
        };

        let total_charge = if charges.iter().all(Option::is_some) && !charges.is_empty() {
            Some(charges.iter().flatten().sum())
        } else {
            None
        };

        Self {
            total_charge,
            vdw: settings.vdw.cloned(),
            electrostatics: settings.electrostatics.cloned(),
            gbsa: settings.gbsa.cloned(),
            particles,
            bonds,
            angles,
            torsions,
            constraints,
            exceptions,
        }
    }
}

fn scaled_exceptions(
    graph: &dyn MolecularGraph,
    lj: &[Option<VdwTerms>],
    charges: &[Option<f64>],
    settings: Nonbonded<'_>,
) -> Vec<NonbondedException> {
    units::bond_separations(graph, 3)
        .into_iter()
        .map(|((i, j), separation)| {
            let charge_product = settings.electrostatics.and_then(|es| {
                let qi = charges.get(i).copied().flatten()?;
                let qj = charges.get(j).copied().flatten()?;
                Some(qi * qj * es.scale_for(separation))
            });
            let (sigma, epsilon) = match (settings.vdw, lj[i], lj[j]) {
                (Some(vdw), Some(a), Some(b)) => {
                    let (sigma, epsilon) = vdw.combining_rules.combine(a, b);
                    (Some(sigma), Some(epsilon * vdw.scale_for(separation)))
                }
                _ => (None, None),
            };
            NonbondedException {
                atoms: [i, j],
                separation,
                charge_product,
                sigma,
                epsilon,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::assignment::{Assignment, BondTerms, TorsionTerm};
    use crate::test_utils::linear_triatomic;

    fn labels() -> Labels {
        let vdw = |atom: usize, sigma: f64| Assignment {
            atoms: vec![atom],
            parameter_id: format!("n{atom}"),
            smirks: "[*:1]".into(),
            position: atom,
            terms: VdwTerms {
                epsilon: 0.1,
                sigma,
            },
        };
        Labels {
            bonds: vec![Assignment {
                atoms: vec![0, 1],
                parameter_id: "b1".into(),
                smirks: "[*:1]~[*:2]".into(),
                position: 0,
                terms: BondTerms { length: 1.2, k: 800.0 },
            }],
            improper_torsions: vec![Assignment {
                atoms: vec![0, 1, 2, 0],
                parameter_id: "i1".into(),
                smirks: "[*:1]~[*:2](~[*:3])~[*:4]".into(),
                position: 0,
                terms: vec![TorsionTerm {
                    periodicity: 2,
                    phase: 180.0,
                    k: 0.5,
                    idivf: 3.0,
                }],
            }],
            vdw: vec![vdw(0, 3.0), vdw(1, 3.4), vdw(2, 3.2)],
            ..Default::default()
        }
    }

    #[test]
    fn assembly_copies_terms_and_nonbonded_settings() {
        let mol = linear_triatomic();
        let vdw = VdwSettings::default();
        let es = ElectrostaticsSettings::default();
        let charges = [Some(-0.4), Some(0.5), Some(-0.1)];
        let system = SystemParameters::assemble(
            &mol,
            &labels(),
            &charges,
            Nonbonded {
                vdw: Some(&vdw),
                electrostatics: Some(&es),
                gbsa: None,
            },
            true,
        );
        assert_eq!(system.particles.len(), 3);
        assert_eq!(system.particles[1].sigma, Some(3.4));
        assert_eq!(system.bonds[0].atoms, [0, 1]);
        assert!(system.torsions[0].improper);
        assert!((system.total_charge.unwrap()).abs() < 1e-12);
        assert_eq!(system.exceptions.len(), 3);
        let one_three = system
            .exceptions
            .iter()
            .find(|e| e.atoms == [0, 2])
            .unwrap();
        assert_eq!(one_three.separation, 2);
        assert_eq!(one_three.charge_product, Some(0.0));
        assert_eq!(one_three.epsilon, Some(0.0));
        assert!((one_three.sigma.unwrap() - 3.1).abs() < 1e-12);
    }

    #[test]
    fn missing_charges_leave_total_unset() {
        let mol = linear_triatomic();
        let system = SystemParameters::assemble(
            &mol,
            &Labels::default(),
            &[Some(0.1), None, None],
            Nonbonded::default(),
            false,
        );
        assert_eq!(system.total_charge, None);
        assert!(system.exceptions.is_empty());
        assert_eq!(system.particles[0].charge, Some(0.1));
        assert_eq!(system.particles[0].sigma, None);
    }
}
