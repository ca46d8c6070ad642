//! Jacobian coordinates: (X, Y, Z) projects to (X/Z², Y/Z³).

use crate::point::CurvePoint;
use crate::EllipticCurve;
use field::FieldElement;

use std::fmt;

#[derive(Clone)]
pub struct Jacobian {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
    infinity: bool,
    curve: EllipticCurve,
}

impl CurvePoint for Jacobian {
    fn zero(curve: &EllipticCurve) -> Self {
        Jacobian {
            x: curve.field().zero(),
            y: curve.field().one(),
            z: curve.field().one(),
            infinity: true,
            curve: curve.clone(),
        }
    }

    fn from_affine(x: FieldElement, y: FieldElement, curve: &EllipticCurve) -> Self {
        let point = Jacobian {
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
        let y_squared = &self.y * &self.y;
        let y_fourth = &y_squared * &y_squared;
        let v = &(&self.x * &y_squared) << 2;
        let z_squared = &self.z * &self.z;
        let w = three * &(&self.x * &self.x) + &(self.curve.a() * &(&z_squared * &z_squared));

        self.x = &(&w * &w) - &(&v << 1);
        self.z = &(&self.y * &self.z) << 1;
        self.y = &w * &(&v - &self.x) - &(&y_fourth << 3);
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

        let other_z_squared = &other.z * &other.z;
        let self_z_squared = &self.z * &self.z;
        let x1z2 = &self.x * &other_z_squared;
        let x2z1 = &other.x * &self_z_squared;
        let y1z2 = &(&self.y * &other_z_squared) * &other.z;
        let y2z1 = &(&other.y * &self_z_squared) * &self.z;

        if x1z2 == x2z1 {
            if y1z2 != y2z1 {
                self.infinity = true;
            } else {
                self.double();
            }

            return;
        }

        let h = &x2z1 - &x1z2;
        let h_squared = &h * &h;
        let h_cubed = &h_squared * &h;
        let r = &y2z1 - &y1z2;

        self.x = &(&(&r * &r) - &h_cubed) - &(&(&x1z2 * &h_squared) << 1);
        self.y = &r * &(&(&x1z2 * &h_squared) - &self.x) - &(&y1z2 * &h_cubed);
        self.z = &(&self.z * &other.z) * &h;
        debug_assert!(self.on_curve());
    }

    fn to_affine(&self) -> Option<(FieldElement, FieldElement)> {
        if self.infinity {
            return None;
        }

        let z_squared = &self.z * &self.z;
        let z_cubed = &z_squared * &self.z;
        Some((&self.x / &z_squared, &self.y / &z_cubed))
    }
}

impl PartialEq for Jacobian {
    fn eq(&self, other: &Self) -> bool {
        if self.infinity || other.infinity {
            return self.infinity && other.infinity;
        }

        let other_z_squared = &other.z * &other.z;
        let self_z_squared = &self.z * &self.z;

        &self.x * &other_z_squared == &other.x * &self_z_squared
            && &(&self.y * &other_z_squared) * &other.z == &(&other.y * &self_z_squared) * &self.z
    }
}

impl Eq for Jacobian {}

impl fmt::Debug for Jacobian {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.infinity {
            write!(f, "Jacobian(infinity)")
        } else {
            write!(f, "Jacobian({} : {} : {})", self.x, self.y, self.z)
        }
    }
}
