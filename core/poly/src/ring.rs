//! Quotient rings F_p[x] / (m).
//!
//! Elements are polynomials reduced modulo a fixed `m`, shared by reference
//! across all elements of one ring; `value.degree() < m.degree()` always.

use crate::Polynomial;

use field::{Field, FieldElement, Uint};

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::sync::Arc;

/// The ring F_p[x] / (modulus).
#[derive(Clone)]
pub struct Ring {
    modulus: Arc<Polynomial>,
}

impl Ring {
    /// Builds the quotient ring. A modulus of degree 0 is a precondition
    /// violation.
    pub fn new(modulus: Polynomial) -> Self {
        if modulus.degree() == 0 {
            panic!("quotient ring modulus must have positive degree");
        }

        Ring {
            modulus: Arc::new(modulus),
        }
    }

    /// The element represented by `value`, reduced modulo the ring modulus.
    pub fn element(&self, value: Polynomial) -> RingElement {
        RingElement {
            value: &value % &*self.modulus,
            modulus: self.modulus.clone(),
        }
    }

    /// The image of x.
    pub fn x(&self) -> RingElement {
        self.element(Polynomial::x_power(self.field(), 1))
    }

    pub fn one(&self) -> RingElement {
        self.element(Polynomial::from_values(self.field(), &[1]))
    }

    pub fn modulus(&self) -> &Polynomial {
        &self.modulus
    }

    pub fn field(&self) -> &Field {
        self.modulus.field()
    }
}

impl PartialEq for Ring {
    fn eq(&self, other: &Self) -> bool {
        self.modulus == other.modulus
    }
}

impl Eq for Ring {}

impl fmt::Debug for Ring {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Ring mod {:?}", self.modulus)
    }
}

/// A polynomial reduced modulo the ring modulus.
#[derive(Clone)]
pub struct RingElement {
    value: Polynomial,
    modulus: Arc<Polynomial>,
}

impl RingElement {
    pub fn value(&self) -> &Polynomial {
        &self.value
    }

    pub fn modulus(&self) -> &Polynomial {
        &self.modulus
    }

    pub fn ring(&self) -> Ring {
        Ring {
            modulus: self.modulus.clone(),
        }
    }

    pub fn field(&self) -> &Field {
        self.modulus.field()
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Raises to a `Uint` power by square-and-multiply.
    pub fn pow(&self, exponent: &Uint) -> RingElement {
        let mut result = self.ring().one();
        let mut found_one = false;

        for bit in uint::BitIterator::new(*exponent) {
            if found_one {
                result = &result * &result;
            } else {
                found_one = bit;
            }

            if bit {
                result = &result * self;
            }
        }

        result
    }

    /// Composition of representatives followed by reduction: substitutes
    /// `inner` into this element's polynomial by Horner.
    pub fn compose(&self, inner: &RingElement) -> RingElement {
        let field = self.field();
        let coeffs = self.value.coeffs();
        let top = coeffs[self.value.degree()].clone();
        let mut result = self
            .ring()
            .element(Polynomial::from_coeffs(field, vec![top]));

        for coeff in coeffs.iter().rev().skip(1) {
            result = &result * inner;
            result.value += &Polynomial::from_coeffs(field, vec![coeff.clone()]);
        }

        result
    }
}

impl PartialEq for RingElement {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for RingElement {}

impl fmt::Debug for RingElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} in {:?}", self.value, self.ring())
    }
}

impl<'a> AddAssign<&'a RingElement> for RingElement {
    fn add_assign(&mut self, other: &RingElement) {
        self.value += &other.value;
    }
}

impl<'a> SubAssign<&'a RingElement> for RingElement {
    fn sub_assign(&mut self, other: &RingElement) {
        self.value -= &other.value;
    }
}

impl<'a> MulAssign<&'a RingElement> for RingElement {
    fn mul_assign(&mut self, other: &RingElement) {
        self.value *= &other.value;
        self.value %= &*self.modulus;
    }
}

impl<'a> MulAssign<&'a FieldElement> for RingElement {
    fn mul_assign(&mut self, scalar: &FieldElement) {
        self.value *= scalar;
    }
}

macro_rules! ring_binop_impl {
    ($op_trait:ident, $op:ident, $assign:ident, $rhs:ty) => {
        impl<'a> $op_trait<&'a $rhs> for RingElement {
            type Output = RingElement;

            fn $op(mut self, other: &$rhs) -> RingElement {
                self.$assign(other);
                self
            }
        }

        impl<'a, 'b> $op_trait<&'b $rhs> for &'a RingElement {
            type Output = RingElement;

            fn $op(self, other: &$rhs) -> RingElement {
                let mut result = self.clone();
                result.$assign(other);
                result
            }
        }
    };
}

ring_binop_impl!(Add, add, add_assign, RingElement);
ring_binop_impl!(Sub, sub, sub_assign, RingElement);
ring_binop_impl!(Mul, mul, mul_assign, RingElement);
ring_binop_impl!(Mul, mul, mul_assign, FieldElement);

impl Neg for RingElement {
    type Output = RingElement;

    fn neg(mut self) -> RingElement {
        self.value = -self.value;
        self
    }
}

impl<'a> Neg for &'a RingElement {
    type Output = RingElement;

    fn neg(self) -> RingElement {
        -self.clone()
    }
}
