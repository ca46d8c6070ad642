//! Univariate polynomials with prime-field coefficients.
//!
//! Coefficients are stored lowest degree first in canonical form: either a
//! single zero coefficient (the zero polynomial) or a sequence whose last
//! coefficient is non-zero. Every operation restores the canonical form
//! before returning.

mod ring;

pub use crate::ring::{Ring, RingElement};

use field::{Field, FieldElement, Uint};

use std::fmt;
use std::ops::{Add, AddAssign, Index, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign};

/// A polynomial over a prime field, in canonical form.
#[derive(Clone)]
pub struct Polynomial {
    field: Field,
    coeffs: Vec<FieldElement>,
}

impl Polynomial {
    /// The zero polynomial.
    pub fn zero(field: &Field) -> Self {
        Polynomial {
            field: field.clone(),
            coeffs: vec![field.zero()],
        }
    }

    /// Builds a polynomial from coefficients, lowest degree first.
    pub fn from_coeffs(field: &Field, coeffs: Vec<FieldElement>) -> Self {
        let mut result = Polynomial {
            field: field.clone(),
            coeffs,
        };
        result.clean();
        result
    }

    /// Convenience constructor from small integer coefficients.
    pub fn from_values(field: &Field, values: &[u64]) -> Self {
        let coeffs = values.iter().map(|value| field.element(*value)).collect();
        Self::from_coeffs(field, coeffs)
    }

    /// The monomial x^n.
    pub fn x_power(field: &Field, n: usize) -> Self {
        Polynomial {
            field: field.clone(),
            coeffs: vec![field.zero(); n],
        }
        .appended(field.one())
    }

    fn appended(mut self, coeff: FieldElement) -> Self {
        self.coeffs.push(coeff);
        self
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Index of the top coefficient; the zero polynomial has degree 0.
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0].is_zero()
    }

    pub fn leading_coeff(&self) -> &FieldElement {
        &self.coeffs[self.degree()]
    }

    pub fn coeffs(&self) -> &[FieldElement] {
        &self.coeffs
    }

    /// Multiplies by x^n.
    pub fn shift_up(&self, n: usize) -> Self {
        if self.is_zero() {
            return self.clone();
        }

        let mut coeffs = vec![self.field.zero(); n];
        coeffs.extend_from_slice(&self.coeffs);
        Polynomial {
            field: self.field.clone(),
            coeffs,
        }
    }

    /// Evaluates at a point by Horner's rule.
    pub fn eval(&self, point: &FieldElement) -> FieldElement {
        let mut result = self.leading_coeff().clone();

        for coeff in self.coeffs.iter().rev().skip(1) {
            result = result * point + coeff;
        }

        result
    }

    /// Substitutes `inner` for x, multiplying partial results by Horner.
    pub fn compose(&self, inner: &Polynomial) -> Polynomial {
        let mut result = Polynomial::from_coeffs(&self.field, vec![self.leading_coeff().clone()]);

        for coeff in self.coeffs.iter().rev().skip(1) {
            result = &result * inner;
            result += &Polynomial::from_coeffs(&self.field, vec![coeff.clone()]);
        }

        result
    }

    /// Raises to a `Uint` power by square-and-multiply.
    pub fn pow(&self, exponent: &Uint) -> Polynomial {
        let mut result = Polynomial::from_coeffs(&self.field, vec![self.field.one()]);
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

    /// True iff this polynomial shares a root with x^p - x, i.e. has a
    /// root in the coefficient field.
    pub fn has_root_in_field(&self) -> bool {
        if self.is_zero() {
            return true;
        }

        if self.degree() == 0 {
            return false;
        }

        let ring = Ring::new(self.clone());
        let x = ring.element(Polynomial::x_power(&self.field, 1));
        let frobenius = x.pow(self.field.modulus()) - &x;

        gcd(self, frobenius.value()).degree() > 0
    }

    /// Drops trailing zero coefficients down to canonical form.
    fn clean(&mut self) {
        while self.coeffs.len() > 1 && self.coeffs.last().map_or(false, FieldElement::is_zero) {
            self.coeffs.pop();
        }

        if self.coeffs.is_empty() {
            self.coeffs.push(self.field.zero());
        }
    }

    fn negate(&mut self) {
        for coeff in self.coeffs.iter_mut() {
            *coeff = -coeff.clone();
        }
    }
}

impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        self.coeffs == other.coeffs
    }
}

impl Eq for Polynomial {}

impl Index<usize> for Polynomial {
    type Output = FieldElement;

    fn index(&self, pos: usize) -> &FieldElement {
        &self.coeffs[pos]
    }
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Polynomial[")?;
        for (pos, coeff) in self.coeffs.iter().enumerate() {
            if pos > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", coeff)?;
        }
        write!(f, "]")
    }
}

impl<'a> AddAssign<&'a Polynomial> for Polynomial {
    fn add_assign(&mut self, other: &Polynomial) {
        if self.coeffs.len() < other.coeffs.len() {
            self.coeffs.resize(other.coeffs.len(), self.field.zero());
        }

        for (pos, coeff) in other.coeffs.iter().enumerate() {
            self.coeffs[pos] += coeff;
        }

        self.clean();
    }
}

impl<'a> SubAssign<&'a Polynomial> for Polynomial {
    fn sub_assign(&mut self, other: &Polynomial) {
        if self.coeffs.len() < other.coeffs.len() {
            self.coeffs.resize(other.coeffs.len(), self.field.zero());
        }

        for (pos, coeff) in other.coeffs.iter().enumerate() {
            self.coeffs[pos] -= coeff;
        }

        self.clean();
    }
}

impl<'a, 'b> Mul<&'b Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    /// Schoolbook multiplication over the coefficients.
    fn mul(self, other: &Polynomial) -> Polynomial {
        let field = &self.field;
        let mut coeffs = vec![field.zero(); self.degree() + other.degree() + 1];

        for (lhs_pos, lhs_coeff) in self.coeffs.iter().enumerate() {
            if lhs_coeff.is_zero() {
                continue;
            }

            for (rhs_pos, rhs_coeff) in other.coeffs.iter().enumerate() {
                coeffs[lhs_pos + rhs_pos] += &(lhs_coeff * rhs_coeff);
            }
        }

        Polynomial::from_coeffs(field, coeffs)
    }
}

impl<'a> MulAssign<&'a Polynomial> for Polynomial {
    fn mul_assign(&mut self, other: &Polynomial) {
        *self = &*self * other;
    }
}

impl<'a> Mul<&'a FieldElement> for &'a Polynomial {
    type Output = Polynomial;

    fn mul(self, scalar: &FieldElement) -> Polynomial {
        let coeffs = self.coeffs.iter().map(|coeff| coeff * scalar).collect();
        Polynomial::from_coeffs(&self.field, coeffs)
    }
}

impl<'a> MulAssign<&'a FieldElement> for Polynomial {
    fn mul_assign(&mut self, scalar: &FieldElement) {
        for coeff in self.coeffs.iter_mut() {
            *coeff *= scalar;
        }

        self.clean();
    }
}

impl<'a, 'b> Add<&'b Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn add(self, other: &Polynomial) -> Polynomial {
        let mut result = self.clone();
        result += other;
        result
    }
}

impl<'a, 'b> Sub<&'b Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn sub(self, other: &Polynomial) -> Polynomial {
        let mut result = self.clone();
        result -= other;
        result
    }
}

impl Neg for Polynomial {
    type Output = Polynomial;

    fn neg(mut self) -> Polynomial {
        self.negate();
        self
    }
}

impl<'a> Neg for &'a Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        -self.clone()
    }
}

impl<'a> RemAssign<&'a Polynomial> for Polynomial {
    /// Reduces in place by subtracting shifted scalar multiples of `other`.
    fn rem_assign(&mut self, other: &Polynomial) {
        if other.is_zero() {
            panic!("polynomial reduction by the zero polynomial");
        }

        if other.degree() == 0 {
            *self = Polynomial::zero(&self.field);
            return;
        }

        while self.degree() >= other.degree() && !self.is_zero() {
            let factor = self.leading_coeff() / other.leading_coeff();
            let shift = self.degree() - other.degree();
            *self -= &(&*other * &factor).shift_up(shift);
        }
    }
}

impl<'a, 'b> Rem<&'b Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn rem(self, other: &Polynomial) -> Polynomial {
        let mut result = self.clone();
        result %= other;
        result
    }
}

/// Quotient and remainder of Euclidean division.
pub struct DivisionResult {
    pub quotient: Polynomial,
    pub remainder: Polynomial,
}

/// Euclidean division; the quotient is assembled coefficient by
/// coefficient. A zero divisor is a precondition violation.
pub fn divide(lhs: &Polynomial, rhs: &Polynomial) -> DivisionResult {
    let field = lhs.field();

    if rhs.is_zero() {
        panic!("polynomial division by the zero polynomial");
    }

    if rhs.degree() == 0 {
        let inverse = rhs
            .leading_coeff()
            .invert()
            .expect("canonical non-zero constant is invertible");
        return DivisionResult {
            quotient: lhs * &inverse,
            remainder: Polynomial::zero(field),
        };
    }

    if lhs.degree() < rhs.degree() {
        return DivisionResult {
            quotient: Polynomial::zero(field),
            remainder: lhs.clone(),
        };
    }

    let mut quotient_coeffs = vec![field.zero(); lhs.degree() - rhs.degree() + 1];
    let mut remainder = lhs.clone();

    while remainder.degree() >= rhs.degree() && !remainder.is_zero() {
        let factor = remainder.leading_coeff() / rhs.leading_coeff();
        let shift = remainder.degree() - rhs.degree();
        remainder -= &(rhs * &factor).shift_up(shift);
        quotient_coeffs[shift] = factor;
    }

    DivisionResult {
        quotient: Polynomial::from_coeffs(field, quotient_coeffs),
        remainder,
    }
}

/// Greatest common divisor by the Euclidean algorithm. Not normalized.
pub fn gcd(lhs: &Polynomial, rhs: &Polynomial) -> Polynomial {
    let mut a = lhs.clone();
    let mut b = rhs.clone();

    while !b.is_zero() {
        let remainder = divide(&a, &b).remainder;
        a = b;
        b = remainder;
    }

    a
}

/// Result of the extended Euclidean algorithm against a ring modulus:
/// `gcd = value_multiplier · value + modulus_multiplier · modulus`.
pub struct ModulusGcdResult {
    pub gcd: Polynomial,
    pub value_multiplier: Polynomial,
    pub modulus_multiplier: Polynomial,
}

/// Extended gcd, normalized so that a unit gcd becomes monic 1 and the
/// multipliers scale with it.
pub fn extended_modulus_gcd(value: &Polynomial, modulus: &Polynomial) -> ModulusGcdResult {
    let field = value.field();

    let mut r_prev = value.clone();
    let mut r = modulus.clone();
    let mut x_prev = Polynomial::from_values(field, &[1]);
    let mut x = Polynomial::zero(field);
    let mut y_prev = Polynomial::zero(field);
    let mut y = Polynomial::from_values(field, &[1]);

    while !r.is_zero() {
        let DivisionResult {
            quotient,
            remainder,
        } = divide(&r_prev, &r);

        r_prev = std::mem::replace(&mut r, remainder);

        let x_next = &x_prev - &(&quotient * &x);
        x_prev = std::mem::replace(&mut x, x_next);

        let y_next = &y_prev - &(&quotient * &y);
        y_prev = std::mem::replace(&mut y, y_next);
    }

    // Normalize the gcd to be monic.
    let inverse = r_prev
        .leading_coeff()
        .invert()
        .expect("leading coefficient of a canonical non-zero polynomial");
    r_prev *= &inverse;
    x_prev *= &inverse;
    y_prev *= &inverse;

    ModulusGcdResult {
        gcd: r_prev,
        value_multiplier: x_prev,
        modulus_multiplier: y_prev,
    }
}
