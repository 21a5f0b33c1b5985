use super::element::Element;
use serde::{Deserialize, Serialize};

/// Represents an atom of a molecular graph as seen by parameter assignment.
///
/// The assignment engine only reads atoms; they are supplied by an external
/// molecule representation and are assumed to be chemically valid. Stereochemistry
/// is carried as an opaque descriptor that only the matcher interprets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Atom {
    /// The chemical element of the atom.
    pub element: Element,
    /// The formal charge in elementary charge units.
    #[serde(default)]
    pub formal_charge: i8,
    /// Whether the atom is aromatic under the model used to build the graph.
    #[serde(default)]
    pub aromatic: bool,
    /// Opaque stereo descriptor (e.g. "R", "S"), interpreted only by matchers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stereo: Option<String>,
    /// A precomputed partial charge, if an external charge method supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_charge: Option<f64>,
}

impl Atom {
    /// Creates a new neutral, non-aromatic atom of the given element.
    pub fn new(element: Element) -> Self {
        Self {
            element,
            formal_charge: 0,
            aromatic: false,
            stereo: None,
            partial_charge: None,
        }
    }

    pub fn with_formal_charge(mut self, formal_charge: i8) -> Self {
        self.formal_charge = formal_charge;
        self
    }

    pub fn with_partial_charge(mut self, partial_charge: f64) -> Self {
        self.partial_charge = Some(partial_charge);
        self
    }

    pub fn aromatic(mut self) -> Self {
        self.aromatic = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_has_expected_default_fields() {
        let atom = Atom::new(Element::CARBON);
        assert_eq!(atom.element, Element::CARBON);
        assert_eq!(atom.formal_charge, 0);
        assert!(!atom.aromatic);
        assert!(atom.stereo.is_none());
        assert!(atom.partial_charge.is_none());
    }

    #[test]
    fn builder_methods_set_fields() {
        let atom = Atom::new(Element::NITROGEN)
            .with_formal_charge(1)
            .with_partial_charge(-0.25)
            .aromatic();
        assert_eq!(atom.formal_charge, 1);
        assert_eq!(atom.partial_charge, Some(-0.25));
        assert!(atom.aromatic);
    }
}
