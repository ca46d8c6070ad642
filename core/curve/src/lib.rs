//! Elliptic curve groups y² = x³ + ax + b over prime fields, char > 3.
//!
//! A point is stored in one of six coordinate systems chosen at
//! construction; all of them expose the same group operations through the
//! `CurvePoint` trait, and the windowed-NAF scalar multiplication is
//! written once over that trait. Representations do not mix within an
//! operation — conversions go through the affine projection.

mod point;
pub mod wnaf;

pub use crate::point::{
    Affine, Chudnovsky, CurvePoint, Jacobian, ModifiedJacobian, Projective, SimplifiedChudnovsky,
};

use field::{Field, FieldElement};
use rand::Rng;

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Attempts to build a curve that is not a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    /// The discriminant vanishes: 4a³ + 27b² ≡ 0 (mod p).
    SingularCurve,
}

impl fmt::Display for CurveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CurveError::SingularCurve => write!(f, "singular curve: 4a^3 + 27b^2 = 0"),
        }
    }
}

impl Error for CurveError {}

struct CurveParams {
    a: FieldElement,
    b: FieldElement,
    field: Field,
}

/// An elliptic curve `{a, b, F}`. All points created from it share these
/// parameters by reference.
#[derive(Clone)]
pub struct EllipticCurve {
    params: Arc<CurveParams>,
}

impl EllipticCurve {
    /// Builds the curve, rejecting singular parameters up front.
    ///
    /// The coefficients must be elements of `field`; anything else is a
    /// precondition violation.
    pub fn new(a: FieldElement, b: FieldElement, field: Field) -> Result<Self, CurveError> {
        if a.modulus() != field.modulus() || b.modulus() != field.modulus() {
            panic!("curve coefficients must come from the supplied field");
        }

        let four = field.element(4u64);
        let twenty_seven = field.element(27u64);
        let discriminant = four * &(&a * &a) * &a + &(twenty_seven * &(&b * &b));

        if discriminant.is_zero() {
            return Err(CurveError::SingularCurve);
        }

        Ok(EllipticCurve {
            params: Arc::new(CurveParams { a, b, field }),
        })
    }

    pub fn a(&self) -> &FieldElement {
        &self.params.a
    }

    pub fn b(&self) -> &FieldElement {
        &self.params.b
    }

    pub fn field(&self) -> &Field {
        &self.params.field
    }

    /// The right-hand side x³ + ax + b of the curve equation.
    pub fn equation_rhs(&self, x: &FieldElement) -> FieldElement {
        let x_cubed = &(x * x) * x;
        x_cubed + &(self.a() * x) + self.b()
    }

    /// The point with the given affine coordinates, if it lies on the curve.
    pub fn point<P: CurvePoint>(&self, x: FieldElement, y: FieldElement) -> Option<P> {
        if &y * &y != self.equation_rhs(&x) {
            return None;
        }

        Some(P::from_affine(x, y, self))
    }

    /// A point with the given x-coordinate, if x³ + ax + b is a square.
    pub fn point_with_x<P: CurvePoint>(&self, x: FieldElement) -> Option<P> {
        let rhs = self.equation_rhs(&x);

        // A root of the right-hand side is its own y (a 2-torsion point).
        if rhs.is_zero() {
            let zero = self.field().zero();
            return Some(P::from_affine(x, zero, self));
        }

        match rhs.sqrt() {
            Ok(y) => Some(P::from_affine(x, y, self)),
            Err(_) => None,
        }
    }

    /// The identity in the chosen representation.
    pub fn null_point<P: CurvePoint>(&self) -> P {
        P::zero(self)
    }

    /// Samples x-coordinates until one lands on the curve. The budget is
    /// bounded; on exhaustion the identity is returned, which for a
    /// well-formed curve is an astronomically unlikely event.
    pub fn random_point<P: CurvePoint, R: Rng>(&self, rng: &mut R) -> P {
        const ATTEMPTS: usize = 1000;

        for _ in 0..ATTEMPTS {
            let x = self.field().random_element(rng);

            if let Some(point) = self.point_with_x(x) {
                return point;
            }
        }

        self.null_point()
    }
}

impl PartialEq for EllipticCurve {
    fn eq(&self, other: &Self) -> bool {
        self.params.a == other.params.a
            && self.params.b == other.params.b
            && self.params.field == other.params.field
    }
}

impl Eq for EllipticCurve {}

impl fmt::Debug for EllipticCurve {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "EllipticCurve(y^2 = x^3 + {}x + {} over {:?})",
            self.params.a, self.params.b, self.params.field
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use field::Uint;
    use rand::{SeedableRng, XorShiftRng};

    fn small_curve() -> EllipticCurve {
        // y^2 = x^3 + 28 over F_29; contains (4, 18).
        let f = Field::new(Uint::from_u64(29));
        EllipticCurve::new(f.zero(), f.element(28u64), f.clone()).unwrap()
    }

    #[test]
    fn rejects_singular_curves() {
        let f = Field::new(Uint::from_u64(29));
        // 4·0 + 27·0 = 0
        assert_eq!(
            EllipticCurve::new(f.zero(), f.zero(), f.clone()).unwrap_err(),
            CurveError::SingularCurve
        );
        // a = -3, b = 2: 4·(-27) + 27·4 = 0
        assert_eq!(
            EllipticCurve::new(-f.element(3u64), f.element(2u64), f.clone()).unwrap_err(),
            CurveError::SingularCurve
        );
    }

    #[test]
    fn known_point_is_accepted() {
        let curve = small_curve();
        let f = curve.field().clone();

        // 18^2 = 324 ≡ 2 and 4^3 + 28 = 92 ≡ 2 (mod 29)
        assert_eq!(
            curve.equation_rhs(&f.element(4u64)),
            f.element(2u64)
        );
        let point: Option<Affine> = curve.point(f.element(4u64), f.element(18u64));
        assert!(point.is_some());

        let off_curve: Option<Affine> = curve.point(f.element(4u64), f.element(17u64));
        assert!(off_curve.is_none());
    }

    #[test]
    fn point_with_x_solves_the_equation() {
        let curve = small_curve();
        let f = curve.field().clone();

        let point: Affine = curve.point_with_x(f.element(4u64)).unwrap();
        let (x, y) = point.to_affine().unwrap();
        assert_eq!(x, f.element(4u64));
        assert_eq!(&y * &y, curve.equation_rhs(&x));
    }

    #[test]
    fn random_points_land_on_the_curve() {
        let curve = small_curve();
        let mut rng = XorShiftRng::from_seed([0x459c4e2c, 0x8f13d5a7, 0xc02b9f61, 0x17a8c5d3]);

        for _ in 0..50 {
            let point: Affine = curve.random_point(&mut rng);
            assert!(point.on_curve());
        }
    }
}
