//! One-dimensional affine algebra.
//!
//! Every coordinate space of the chart (sample index, wall-clock time, model
//! values, screen pixels) is a 1-D affine line. Maps between them are [`AR1`]
//! values, solved from pairs of points ([`Basis`]) rather than from ad-hoc
//! offsets and scales, so direction (an inverted screen Y axis) is carried by
//! point order instead of by sign fiddling at call sites.

use derive_more::Constructor;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{ChartError, ChartResult};

/// Affine map `x ↦ a·x + b`
#[derive(Debug, Clone, Copy, PartialEq, Constructor, Serialize, Deserialize)]
pub struct AR1 {
    pub a: f64,
    pub b: f64,
}

impl AR1 {
    pub const IDENTITY: AR1 = AR1 { a: 1.0, b: 0.0 };

    pub fn apply(&self, x: f64) -> f64 {
        self.a * x + self.b
    }

    /// Returns `self ∘ inner`: the map that applies `inner` first and `self`
    /// second.
    pub fn compose_with(&self, inner: &AR1) -> AR1 {
        AR1 { a: self.a * inner.a, b: self.a * inner.b + self.b }
    }

    pub fn inverse(&self) -> ChartResult<AR1> {
        if !self.a.is_finite() || !self.b.is_finite() || self.a == 0.0 {
            return Err(ChartError::SingularTransform(format!(
                "AR1({}, {}) has no inverse",
                self.a, self.b
            )));
        }
        Ok(AR1 { a: 1.0 / self.a, b: -self.b / self.a })
    }

    /// Solves the unique map taking `from.p1 → to.p1` and `from.p2 → to.p2`.
    pub fn between_bases(from: &Basis, to: &Basis) -> ChartResult<AR1> {
        let [f1, f2] = from.to_arr();
        let [t1, t2] = to.to_arr();
        let df = f2 - f1;
        if df == 0.0 || !df.is_finite() {
            return Err(ChartError::SingularTransform(format!(
                "source basis ({}, {}) is degenerate",
                f1, f2
            )));
        }
        let a = (t2 - t1) / df;
        Ok(AR1 { a, b: t1 - a * f1 })
    }

    /// Maps both points of a basis, keeping their order.
    pub fn apply_to_basis(&self, basis: &Basis) -> Basis {
        Basis::new(self.apply(basis.p1), self.apply(basis.p2))
    }
}

impl Default for AR1 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Ordered pair of points on a 1-D affine line. Order is semantic.
#[derive(Debug, Clone, Copy, PartialEq, Constructor, Serialize, Deserialize)]
pub struct Basis {
    pub p1: f64,
    pub p2: f64,
}

impl Basis {
    pub const UNIT: Basis = Basis { p1: 0.0, p2: 1.0 };
    /// Stand-in for an axis whose extent is not known yet.
    pub const PLACEHOLDER: Basis = Basis { p1: 0.0, p2: 1.0 };

    pub fn to_arr(&self) -> [f64; 2] {
        [self.p1, self.p2]
    }

    /// Unsigned width of the basis
    pub fn range(&self) -> f64 {
        (self.p2 - self.p1).abs()
    }

    pub fn is_finite(&self) -> bool {
        self.p1.is_finite() && self.p2.is_finite()
    }

    pub fn transform_with(&self, map: &AR1) -> Basis {
        map.apply_to_basis(self)
    }

    pub fn midpoint(&self) -> f64 {
        (self.p1 + self.p2) / 2.0
    }
}

impl From<[f64; 2]> for Basis {
    fn from([p1, p2]: [f64; 2]) -> Self {
        Self::new(p1, p2)
    }
}

impl From<(f64, f64)> for Basis {
    fn from((p1, p2): (f64, f64)) -> Self {
        Self::new(p1, p2)
    }
}

/// A rectangle described across two independent coordinate lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectProductBasis {
    x: Basis,
    y: Basis,
}

impl DirectProductBasis {
    pub fn from_projections(x: Basis, y: Basis) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> Basis {
        self.x
    }

    pub fn y(&self) -> Basis {
        self.y
    }

    pub fn to_arr(&self) -> [[f64; 2]; 2] {
        [self.x.to_arr(), self.y.to_arr()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_applies_inner_first() {
        let outer = AR1::new(2.0, 1.0);
        let inner = AR1::new(3.0, -4.0);
        let composed = outer.compose_with(&inner);
        for x in [-3.0, 0.0, 0.5, 7.0] {
            assert_eq!(composed.apply(x), outer.apply(inner.apply(x)));
        }
        // the other order is a different map
        assert_ne!(inner.compose_with(&outer).apply(1.0), composed.apply(1.0));
    }

    #[test]
    fn between_bases_hits_both_points() {
        let from = Basis::new(0.0, 1.0);
        let to = Basis::new(1000.0, 1060.0);
        let map = AR1::between_bases(&from, &to).unwrap();
        assert_eq!(map.apply(0.0), 1000.0);
        assert_eq!(map.apply(1.0), 1060.0);
    }

    #[test]
    fn between_bases_keeps_inversion() {
        let model = Basis::new(0.0, 10.0);
        let screen = Basis::new(200.0, 0.0);
        let map = AR1::between_bases(&model, &screen).unwrap();
        assert_eq!(map.apply(0.0), 200.0);
        assert_eq!(map.apply(10.0), 0.0);
        assert!(map.a < 0.0);
    }

    #[test]
    fn degenerate_source_fails() {
        let err = AR1::between_bases(&Basis::new(3.0, 3.0), &Basis::UNIT).unwrap_err();
        assert!(err.is_singular());
    }

    #[test]
    fn inverse_round_trips() {
        let map = AR1::new(4.0, -2.0);
        let inv = map.inverse().unwrap();
        assert_eq!(inv.apply(map.apply(1.5)), 1.5);
        assert!(AR1::new(0.0, 1.0).inverse().is_err());
    }

    #[test]
    fn basis_order_is_preserved() {
        let b = Basis::new(5.0, -1.0);
        assert_eq!(b.to_arr(), [5.0, -1.0]);
        assert_eq!(b.range(), 6.0);
        let flipped = b.transform_with(&AR1::new(-1.0, 0.0));
        assert_eq!(flipped.to_arr(), [-5.0, 1.0]);
    }

    #[test]
    fn direct_product_accessors() {
        let dp = DirectProductBasis::from_projections(Basis::new(0.0, 9.0), Basis::new(100.0, 0.0));
        assert_eq!(dp.x(), Basis::new(0.0, 9.0));
        assert_eq!(dp.y().to_arr(), [100.0, 0.0]);
        assert_eq!(dp.to_arr(), [[0.0, 9.0], [100.0, 0.0]]);
    }
}
