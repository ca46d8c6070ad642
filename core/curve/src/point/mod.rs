//! The six coordinate representations and the capability they share.

mod affine;
mod chudnovsky;
mod jacobian;
mod modified;
mod projective;

pub use self::affine::Affine;
pub use self::chudnovsky::{Chudnovsky, SimplifiedChudnovsky};
pub use self::jacobian::Jacobian;
pub use self::modified::ModifiedJacobian;
pub use self::projective::Projective;

use crate::EllipticCurve;
use field::{FieldElement, Uint};

/// Group operations every coordinate representation provides.
///
/// The contracts are those of the affine addition law; each representation
/// reproduces them by formulas on its stored fields, deferring divisions to
/// the affine projection. The identity is a flagged placeholder coordinate
/// set and is always treated as the point at infinity by arithmetic.
pub trait CurvePoint: Clone + PartialEq + Sized {
    /// The additive identity on `curve`.
    fn zero(curve: &EllipticCurve) -> Self;

    /// Wraps affine coordinates already known to satisfy the equation.
    fn from_affine(x: FieldElement, y: FieldElement, curve: &EllipticCurve) -> Self;

    fn curve(&self) -> &EllipticCurve;

    /// Whether this point is the identity.
    fn is_zero(&self) -> bool;

    /// Replaces the point with its negation.
    fn negate(&mut self);

    /// Doubles the point in place. A point with y = 0 doubles to the
    /// identity.
    fn double(&mut self);

    /// Adds another point of the same representation in place.
    fn add_assign(&mut self, other: &Self);

    /// The affine projection; `None` for the identity.
    fn to_affine(&self) -> Option<(FieldElement, FieldElement)>;

    fn sub_assign(&mut self, other: &Self) {
        let mut negated = other.clone();
        negated.negate();
        self.add_assign(&negated);
    }

    fn add(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.add_assign(other);
        result
    }

    fn sub(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.sub_assign(other);
        result
    }

    fn neg(&self) -> Self {
        let mut result = self.clone();
        result.negate();
        result
    }

    /// Scalar multiplication by windowed non-adjacent form.
    fn mul(&self, scalar: &Uint) -> Self {
        crate::wnaf::mul(self, scalar)
    }

    /// Scalar multiplication by a field element's value.
    fn mul_element(&self, scalar: &FieldElement) -> Self {
        self.mul(scalar.value())
    }

    fn affine_x(&self) -> Option<FieldElement> {
        self.to_affine().map(|(x, _)| x)
    }

    fn affine_y(&self) -> Option<FieldElement> {
        self.to_affine().map(|(_, y)| y)
    }

    /// Whether the affine projection satisfies the curve equation; the
    /// identity passes by definition.
    fn on_curve(&self) -> bool {
        match self.to_affine() {
            None => true,
            Some((x, y)) => &y * &y == self.curve().equation_rhs(&x),
        }
    }
}
