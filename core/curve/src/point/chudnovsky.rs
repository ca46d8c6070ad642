//! Chudnovsky variants of Jacobian coordinates: Z² (and Z³) travel with
//! the point so equality tests and additions reuse them.

use crate::point::CurvePoint;
use crate::EllipticCurve;
use field::FieldElement;

use std::fmt;

/// (X, Y, Z, Z², Z³), projecting to (X/Z², Y/Z³).
#[derive(Clone)]
pub struct Chudnovsky {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
    z_squared: FieldElement,
    z_cubed: FieldElement,
    infinity: bool,
    curve: EllipticCurve,
}

impl CurvePoint for Chudnovsky {
    fn zero(curve: &EllipticCurve) -> Self {
        let one = curve.field().one();
        Chudnovsky {
            x: curve.field().zero(),
            y: one.clone(),
            z: one.clone(),
            z_squared: one.clone(),
            z_cubed: one,
            infinity: true,
            curve: curve.clone(),
        }
    }

    fn from_affine(x: FieldElement, y: FieldElement, curve: &EllipticCurve) -> Self {
        let one = curve.field().one();
        let point = Chudnovsky {
            x,
            y,
            z: one.clone(),
            z_squared: one.clone(),
            z_cubed: one,
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
        let w = three * &(&self.x * &self.x)
            + &(self.curve.a() * &(&self.z_squared * &self.z_squared));

        self.x = &(&w * &w) - &(&v << 1);
        self.z = &(&self.y * &self.z) << 1;
        self.y = &w * &(&v - &self.x) - &(&y_fourth << 3);
        self.z_squared = &self.z * &self.z;
        self.z_cubed = &self.z * &self.z_squared;
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

        let x1z2 = &self.x * &other.z_squared;
        let x2z1 = &other.x * &self.z_squared;
        let y1z2 = &self.y * &other.z_cubed;
        let y2z1 = &other.y * &self.z_cubed;

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
        self.z_squared = &self.z * &self.z;
        self.z_cubed = &self.z * &self.z_squared;
        debug_assert!(self.on_curve());
    }

    fn to_affine(&self) -> Option<(FieldElement, FieldElement)> {
        if self.infinity {
            return None;
        }

        Some((&self.x / &self.z_squared, &self.y / &self.z_cubed))
    }
}

impl PartialEq for Chudnovsky {
    fn eq(&self, other: &Self) -> bool {
        if self.infinity || other.infinity {
            return self.infinity && other.infinity;
        }

        &self.x * &other.z_squared == &other.x * &self.z_squared
            && &self.y * &other.z_cubed == &other.y * &self.z_cubed
    }
}

impl Eq for Chudnovsky {}

impl fmt::Debug for Chudnovsky {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.infinity {
            write!(f, "Chudnovsky(infinity)")
        } else {
            write!(f, "Chudnovsky({} : {} : {})", self.x, self.y, self.z)
        }
    }
}

/// (X, Y, Z, Z²): the Chudnovsky cache without Z³.
#[derive(Clone)]
pub struct SimplifiedChudnovsky {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
    z_squared: FieldElement,
    infinity: bool,
    curve: EllipticCurve,
}

impl CurvePoint for SimplifiedChudnovsky {
    fn zero(curve: &EllipticCurve) -> Self {
        let one = curve.field().one();
        SimplifiedChudnovsky {
            x: curve.field().zero(),
            y: one.clone(),
            z: one.clone(),
            z_squared: one,
            infinity: true,
            curve: curve.clone(),
        }
    }

    fn from_affine(x: FieldElement, y: FieldElement, curve: &EllipticCurve) -> Self {
        let one = curve.field().one();
        let point = SimplifiedChudnovsky {
            x,
            y,
            z: one.clone(),
            z_squared: one,
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
        let w = three * &(&self.x * &self.x)
            + &(self.curve.a() * &(&self.z_squared * &self.z_squared));

        self.x = &(&w * &w) - &(&v << 1);
        self.z = &(&self.y * &self.z) << 1;
        self.y = &w * &(&v - &self.x) - &(&y_fourth << 3);
        self.z_squared = &self.z * &self.z;
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

        let x1z2 = &self.x * &other.z_squared;
        let x2z1 = &other.x * &self.z_squared;
        let y1z2 = &(&self.y * &other.z_squared) * &other.z;
        let y2z1 = &(&other.y * &self.z_squared) * &self.z;

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
        self.z_squared = &self.z * &self.z;
        debug_assert!(self.on_curve());
    }

    fn to_affine(&self) -> Option<(FieldElement, FieldElement)> {
        if self.infinity {
            return None;
        }

        let z_cubed = &self.z_squared * &self.z;
        Some((&self.x / &self.z_squared, &self.y / &z_cubed))
    }
}

impl PartialEq for SimplifiedChudnovsky {
    fn eq(&self, other: &Self) -> bool {
        if self.infinity || other.infinity {
            return self.infinity && other.infinity;
        }

        &self.x * &other.z_squared == &other.x * &self.z_squared
            && &(&self.y * &other.z_squared) * &other.z == &(&other.y * &self.z_squared) * &self.z
    }
}

impl Eq for SimplifiedChudnovsky {}

impl fmt::Debug for SimplifiedChudnovsky {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.infinity {
            write!(f, "SimplifiedChudnovsky(infinity)")
        } else {
            write!(
                f,
                "SimplifiedChudnovsky({} : {} : {})",
                self.x, self.y, self.z
            )
        }
    }
}
