//! Fractional bond-order interpolation of bond-order-dependent parameter fields.

use serde::{Deserialize, Serialize};

/// A `(bond order, value)` anchor point of an interpolated field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Anchor {
    pub bond_order: f64,
    pub value: f64,
}

impl Anchor {
    pub fn new(bond_order: f64, value: f64) -> Self {
        Self { bond_order, value }
    }
}

/// A numeric parameter field that is either fixed or interpolated between two anchors
/// on the fractional bond order of the unit's central bond.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BondOrderValue {
    Fixed(f64),
    Interpolated { low: Anchor, high: Anchor },
}

impl BondOrderValue {
    pub fn interpolated(low: Anchor, high: Anchor) -> Self {
        Self::Interpolated { low, high }
    }

    pub fn is_interpolated(&self) -> bool {
        matches!(self, Self::Interpolated { .. })
    }

    /// Returns the anchor order that makes this field unusable, if any. Two anchors at
    /// the same bond order leave the slope undefined.
    pub fn degenerate_anchor(&self) -> Option<f64> {
        match self {
            Self::Interpolated { low, high }
                if (high.bond_order - low.bond_order).abs() < f64::EPSILON
                    || !low.bond_order.is_finite()
                    || !high.bond_order.is_finite() =>
            {
                Some(low.bond_order)
            }
            _ => None,
        }
    }

    /// Resolves the field. `bond_order` is only consulted for interpolated fields;
    /// `None` is returned when it is needed but missing.
    pub fn resolve(&self, bond_order: Option<f64>) -> Option<f64> {
        match self {
            Self::Fixed(value) => Some(*value),
            Self::Interpolated { low, high } => {
                bond_order.map(|bo| interpolate(bo, *low, *high))
            }
        }
    }
}

impl From<f64> for BondOrderValue {
    fn from(value: f64) -> Self {
        Self::Fixed(value)
    }
}

/// Linear interpolation between two anchors.
///
/// Bond orders outside the anchor range extrapolate along the same line.
#[inline]
pub fn interpolate(bond_order: f64, low: Anchor, high: Anchor) -> f64 {
    let fraction = (bond_order - low.bond_order) / (high.bond_order - low.bond_order);
    low.value + fraction * (high.value - low.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOW: Anchor = Anchor {
        bond_order: 1.0,
        value: 100.0,
    };
    const HIGH: Anchor = Anchor {
        bond_order: 2.0,
        value: 200.0,
    };

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {b}, got {a}");
    }

    #[test]
    fn interpolate_hits_anchors_and_midpoint() {
        assert_close(interpolate(1.0, LOW, HIGH), 100.0);
        assert_close(interpolate(2.0, LOW, HIGH), 200.0);
        assert_close(interpolate(1.5, LOW, HIGH), 150.0);
    }

    #[test]
    fn interpolate_extrapolates_without_clamping() {
        assert_close(interpolate(2.5, LOW, HIGH), 250.0);
        assert_close(interpolate(0.5, LOW, HIGH), 50.0);
    }

    #[test]
    fn interpolate_does_not_depend_on_anchor_order() {
        assert_close(interpolate(1.25, HIGH, LOW), interpolate(1.25, LOW, HIGH));
    }

    #[test]
    fn resolve_requires_bond_order_only_when_interpolated() {
        assert_eq!(BondOrderValue::Fixed(3.0).resolve(None), Some(3.0));
        let value = BondOrderValue::interpolated(LOW, HIGH);
        assert_eq!(value.resolve(None), None);
        assert_close(value.resolve(Some(1.5)).unwrap(), 150.0);
    }

    #[test]
    fn degenerate_anchor_detects_equal_orders() {
        let value = BondOrderValue::interpolated(LOW, Anchor::new(1.0, 300.0));
        assert_eq!(value.degenerate_anchor(), Some(1.0));
        assert_eq!(BondOrderValue::interpolated(LOW, HIGH).degenerate_anchor(), None);
        assert_eq!(BondOrderValue::Fixed(1.0).degenerate_anchor(), None);
    }
}
