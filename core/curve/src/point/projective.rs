//! Homogeneous projective coordinates: (X, Y, Z) projects to (X/Z, Y/Z).
//! No inversions per addition.

use crate::point::CurvePoint;
use crate::EllipticCurve;
use field::FieldElement;

use std::fmt;

#[derive(Clone)]
pub struct Projective {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
    infinity: bool,
    curve: EllipticCurve,
}

impl CurvePoint for Projective {
    fn zero(curve: &EllipticCurve) -> Self {
        Projective {
            x: curve.field().zero(),
            y: curve.field().one(),
            z: curve.field().one(),
            infinity: true,
            curve: curve.clone(),
        }
    }

    fn from_affine(x: FieldElement, y: FieldElement, curve: &EllipticCurve) -> Self {
        let point = Projective {
            x,
            y,
            z: curve.field().one(),
            infinity: false,
            curve: curve.clone(),
        };
        debug_assert!(point.on_curve());
        point
    }

    fn curve(&self) -> &EllipticCurve {
        &self.curve
    }

    fn is_zero(&self) -> bool {
        self.infinity
    }

    fn negate(&mut self) {
        self.y = -self.y.clone();
    }

    fn double(&mut self) {
        if self.infinity {
            return;
        }

        if !self.y.is_invertible() {
            self.infinity = true;
            return;
        }

        let three = self.curve.field().element(3u64);
        let w = self.curve.a() * &(&self.z * &self.z) + &(three * &(&self.x * &self.x));
        let s = &self.y * &self.z;
        let s_squared = &s * &s;
        let s_cubed = &s_squared * &s;
        let b = &(&self.x * &self.y) * &s;
        let h = &(&w * &w) - &(&b << 3);

        self.x = &(&h * &s) << 1;
        self.y = &w * &(&(&b << 2) - &h) - &(&(&(&self.y * &self.y) * &s_squared) << 3);
        self.z = &s_cubed << 3;
        debug_assert!(self.on_curve());
    }

    fn add_assign(&mut self, other: &Self) {
        if self.infinity {
            *self = other.clone();
            return;
        }

        if other.infinity {
            return;
        }

        let x1z2 = &self.x * &other.z;
        let x2z1 = &other.x * &self.z;
        let y1z2 = &self.y * &other.z;
        let y2z1 = &other.y * &self.z;

        if x1z2 == x2z1 {
            if y1z2 != y2z1 {
                self.infinity = true;
            } else {
                self.double();
            }

            return;
        }

        let u = &y2z1 - &y1z2;
        let v = &x2z1 - &x1z2;
        let v_squared = &v * &v;
        let v_cubed = &v_squared * &v;
        let z1z2 = &self.z * &other.z;
        let a = &(&(&u * &u) * &z1z2) - &v_cubed - &(&(&v_squared * &x1z2) << 1);

        self.x = &v * &a;
        self.y = &u * &(&(&v_squared * &x1z2) - &a) - &(&v_cubed * &y1z2);
        self.z = &v_cubed * &z1z2;
        debug_assert!(self.on_curve());
    }

    fn to_affine(&self) -> Option<(FieldElement, FieldElement)> {
        if self.infinity {
            return None;
        }

        Some((&self.x / &self.z, &self.y / &self.z))
    }
}

impl PartialEq for Projective {
    /// Compares by cross-multiplied coordinates, so scaled representations
    /// of the same point are equal.
    fn eq(&self, other: &Self) -> bool {
        if self.infinity || other.infinity {
            return self.infinity && other.infinity;
        }

        &self.x * &other.z == &other.x * &self.z && &self.y * &other.z == &other.y * &self.z
    }
}

impl Eq for Projective {}

impl fmt::Debug for Projective {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.infinity {
            write!(f, "Projective(infinity)")
        } else {
            write!(f, "Projective({} : {} : {})", self.x, self.y, self.z)
        }
    }
}
