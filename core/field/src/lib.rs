//! Modular arithmetic over a prime modulus.
//!
//! A `Field` owns its modulus behind an `Arc`; every element it produces
//! shares that allocation, so elements are cheap to clone. The invariant
//! `value < modulus` holds after every operation: addition subtracts the
//! modulus once on overflow, subtraction adds it once on underflow,
//! multiplication reduces once.
//!
//! The whole algebraic stack works at one fixed width (`U512`), which gives
//! multiplication full headroom for moduli up to 256 bits.

mod sqrt;

pub use crate::sqrt::LegendreSymbol;

/// Working width of the algebraic stack.
pub use uint::U512 as Uint;

use rand::Rng;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Shl, ShlAssign, Sub, SubAssign};
use std::sync::Arc;

/// Failures of field-level operations that callers can recover from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// Inverse of zero (or of a non-unit modulo a composite) requested.
    NotInvertible,
    /// Square root of a quadratic non-residue requested.
    NotASquare,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldError::NotInvertible => write!(f, "element is not invertible"),
            FieldError::NotASquare => write!(f, "element is not a quadratic residue"),
        }
    }
}

impl Error for FieldError {}

/// A prime field, i.e. the configuration object `{modulus}`.
#[derive(Clone)]
pub struct Field {
    modulus: Arc<Uint>,
}

impl Field {
    /// Builds the field of integers modulo `modulus`.
    ///
    /// The modulus is trusted to be prime; primality is the caller's
    /// contract. A modulus below 2 is a precondition violation.
    pub fn new(modulus: Uint) -> Self {
        if modulus < Uint::from_u64(2) {
            panic!("Field modulus must be at least 2");
        }

        Field {
            modulus: Arc::new(modulus),
        }
    }

    /// The element congruent to `value`.
    pub fn element<V: Into<Uint>>(&self, value: V) -> FieldElement {
        let value = value.into();
        FieldElement {
            value: value % *self.modulus,
            modulus: self.modulus.clone(),
        }
    }

    /// The additive identity.
    pub fn zero(&self) -> FieldElement {
        FieldElement {
            value: Uint::zero(),
            modulus: self.modulus.clone(),
        }
    }

    /// The multiplicative identity.
    pub fn one(&self) -> FieldElement {
        self.element(Uint::one())
    }

    pub fn modulus(&self) -> &Uint {
        &self.modulus
    }

    /// A uniformly sampled element.
    pub fn random_element<R: Rng>(&self, rng: &mut R) -> FieldElement {
        self.element(rng.gen::<Uint>() % *self.modulus)
    }

    /// A uniformly sampled element of the multiplicative group.
    pub fn random_nonzero_element<R: Rng>(&self, rng: &mut R) -> FieldElement {
        let reduced = rng.gen::<Uint>() % (*self.modulus - Uint::one());
        self.element(reduced + Uint::one())
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.modulus == other.modulus
    }
}

impl Eq for Field {}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Field({})", self.modulus)
    }
}

/// An element of a prime field: a value strictly below the shared modulus.
#[derive(Clone)]
pub struct FieldElement {
    value: Uint,
    modulus: Arc<Uint>,
}

impl FieldElement {
    pub fn value(&self) -> &Uint {
        &self.value
    }

    pub fn modulus(&self) -> &Uint {
        &self.modulus
    }

    /// The field this element belongs to.
    pub fn field(&self) -> Field {
        Field {
            modulus: self.modulus.clone(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Whether `invert` would succeed.
    pub fn is_invertible(&self) -> bool {
        !self.value.is_zero()
    }

    /// Raises to a `Uint` power by square-and-multiply.
    pub fn pow(&self, exponent: &Uint) -> FieldElement {
        let mut result = self.field().one();
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

    /// The multiplicative inverse, by the extended Euclidean algorithm.
    pub fn invert(&self) -> Result<FieldElement, FieldError> {
        let inverse = inverse_modulo(&self.value, &self.modulus)?;
        Ok(FieldElement {
            value: inverse,
            modulus: self.modulus.clone(),
        })
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for FieldElement {}

impl Ord for FieldElement {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl PartialOrd for FieldElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} mod {}", self.value, self.modulus)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<'a> AddAssign<&'a FieldElement> for FieldElement {
    fn add_assign(&mut self, other: &FieldElement) {
        self.value += other.value;

        // Subtract the modulus once if the sum wrapped or left the range.
        if self.value < other.value || self.value >= *self.modulus {
            self.value -= *self.modulus;
        }
    }
}

impl<'a> SubAssign<&'a FieldElement> for FieldElement {
    fn sub_assign(&mut self, other: &FieldElement) {
        let underflow = self.value < other.value;
        self.value -= other.value;

        if underflow {
            self.value += *self.modulus;
        }
    }
}

impl<'a> MulAssign<&'a FieldElement> for FieldElement {
    fn mul_assign(&mut self, other: &FieldElement) {
        self.value = (self.value * other.value) % *self.modulus;
    }
}

impl<'a> DivAssign<&'a FieldElement> for FieldElement {
    /// Division by a non-invertible element is a precondition violation;
    /// callers branch on `is_invertible` first.
    fn div_assign(&mut self, other: &FieldElement) {
        let inverse = other
            .invert()
            .expect("field division by a non-invertible element");
        *self *= &inverse;
    }
}

impl ShlAssign<u32> for FieldElement {
    /// Multiplies by `2^shift`, reducing at every doubling.
    fn shl_assign(&mut self, shift: u32) {
        for _ in 0..shift {
            let doubled = self.clone();
            *self += &doubled;
        }
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        if self.value.is_zero() {
            return self;
        }

        FieldElement {
            value: *self.modulus - self.value,
            modulus: self.modulus,
        }
    }
}

impl<'a> Neg for &'a FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        -self.clone()
    }
}

macro_rules! binop_impl {
    ($op_trait:ident, $op:ident, $assign_trait:ident, $assign:ident) => {
        impl $op_trait for FieldElement {
            type Output = FieldElement;

            fn $op(mut self, other: FieldElement) -> FieldElement {
                self.$assign(&other);
                self
            }
        }

        impl<'a> $op_trait<&'a FieldElement> for FieldElement {
            type Output = FieldElement;

            fn $op(mut self, other: &FieldElement) -> FieldElement {
                self.$assign(other);
                self
            }
        }

        impl<'a> $op_trait<FieldElement> for &'a FieldElement {
            type Output = FieldElement;

            fn $op(self, other: FieldElement) -> FieldElement {
                let mut result = self.clone();
                result.$assign(&other);
                result
            }
        }

        impl<'a, 'b> $op_trait<&'b FieldElement> for &'a FieldElement {
            type Output = FieldElement;

            fn $op(self, other: &FieldElement) -> FieldElement {
                let mut result = self.clone();
                result.$assign(other);
                result
            }
        }
    };
}

binop_impl!(Add, add, AddAssign, add_assign);
binop_impl!(Sub, sub, SubAssign, sub_assign);
binop_impl!(Mul, mul, MulAssign, mul_assign);
binop_impl!(Div, div, DivAssign, div_assign);

impl Shl<u32> for FieldElement {
    type Output = FieldElement;

    fn shl(mut self, shift: u32) -> FieldElement {
        self <<= shift;
        self
    }
}

impl<'a> Shl<u32> for &'a FieldElement {
    type Output = FieldElement;

    fn shl(self, shift: u32) -> FieldElement {
        self.clone() << shift
    }
}

/// Extended Euclid on `value` and `modulus`: the inverse of `value` in
/// `[0, modulus)`, or `NotInvertible` when they share a factor.
///
/// Cofactors are tracked modulo `modulus`, which keeps every intermediate
/// non-negative. Shared with the CRT reconstruction in the point counter.
pub fn inverse_modulo(value: &Uint, modulus: &Uint) -> Result<Uint, FieldError> {
    let reduced = *value % *modulus;

    if reduced.is_zero() {
        return Err(FieldError::NotInvertible);
    }

    let (gcd, inverse, _) = extended_modular_gcd(reduced, *modulus, modulus);

    if gcd != Uint::one() {
        return Err(FieldError::NotInvertible);
    }

    Ok(inverse % *modulus)
}

/// Returns `(g, x, y)` with `g = gcd(a, b)` and `g ≡ x·a + y·b (mod modulus)`.
fn extended_modular_gcd(a: Uint, b: Uint, modulus: &Uint) -> (Uint, Uint, Uint) {
    if b.is_zero() {
        return (a, Uint::one(), Uint::zero());
    }

    let (quotient, remainder) = a.div_rem(&b);
    let (gcd, x1, y1) = extended_modular_gcd(b, remainder, modulus);

    // g = x1·b + y1·(a - q·b) = y1·a + (x1 - q·y1)·b
    let x = y1;
    let t = (y1 * quotient) % *modulus;
    let y = if x1 >= t {
        x1 - t
    } else {
        x1 + *modulus - t
    };

    (gcd, x, y)
}
