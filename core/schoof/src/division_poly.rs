//! Division polynomials ψ_n of a curve y² = x³ + ax + b.
//!
//! ψ_n is held as a polynomial in x times a power of y; y² is substituted
//! by f(x) = x³ + ax + b whenever the y-power counter reaches 2, so the
//! x-part stays a plain polynomial. The generated arrays depend only on
//! the curve and are cached process-wide.

use curve::EllipticCurve;
use field::Uint;
use poly::Polynomial;

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A polynomial in x carrying a separate y-power.
#[derive(Clone)]
pub struct DivisionPoly {
    x_poly: Polynomial,
    curve_poly: Arc<Polynomial>,
    y_power: u32,
}

impl DivisionPoly {
    fn new(x_poly: Polynomial, curve_poly: &Arc<Polynomial>, y_power: u32) -> Self {
        DivisionPoly {
            x_poly,
            curve_poly: curve_poly.clone(),
            y_power,
        }
    }

    /// The x-part. For odd n the whole of ψ_n.
    pub fn x_poly(&self) -> &Polynomial {
        &self.x_poly
    }

    pub fn y_power(&self) -> u32 {
        self.y_power
    }

    fn is_zero(&self) -> bool {
        self.x_poly.is_zero()
    }

    /// Substitutes y² by f(x) until at most one y remains.
    fn reduce_y(&mut self) {
        while self.y_power > 1 {
            self.x_poly *= &*self.curve_poly;
            self.y_power -= 2;
        }
    }

    /// Divides by y; the even-index recurrence guarantees a y to divide.
    fn divide_by_y(&mut self) {
        assert!(self.y_power > 0, "division polynomial has no y to divide");
        self.y_power -= 1;

        if self.is_zero() {
            self.y_power = 0;
        }
    }

    fn pow(&self, exponent: u32) -> Self {
        DivisionPoly {
            x_poly: self.x_poly.pow(&Uint::from(exponent)),
            curve_poly: self.curve_poly.clone(),
            y_power: self.y_power * exponent,
        }
    }

    fn mul(&self, other: &Self) -> Self {
        let x_poly = &self.x_poly * &other.x_poly;
        let y_power = if x_poly.is_zero() {
            0
        } else {
            self.y_power + other.y_power
        };

        DivisionPoly {
            x_poly,
            curve_poly: self.curve_poly.clone(),
            y_power,
        }
    }

    /// Subtraction requires both operands to carry the same y-power;
    /// a zero operand adopts the other side's.
    fn sub(&self, other: &Self) -> Self {
        let y_power = if self.is_zero() {
            other.y_power
        } else if other.is_zero() {
            self.y_power
        } else {
            assert_eq!(
                self.y_power, other.y_power,
                "subtracting division polynomials with mismatched y-powers"
            );
            self.y_power
        };

        let x_poly = &self.x_poly - &other.x_poly;

        DivisionPoly {
            y_power: if x_poly.is_zero() { 0 } else { y_power },
            x_poly,
            curve_poly: self.curve_poly.clone(),
        }
    }
}

lazy_static! {
    static ref DIVISION_POLYS: RwLock<HashMap<(Uint, Uint, Uint), Arc<Vec<DivisionPoly>>>> =
        RwLock::new(HashMap::new());
}

/// ψ_0 ... ψ_n for the curve, from the process-wide cache. The cached
/// array grows when a larger index is requested.
pub fn division_polynomials(curve: &EllipticCurve, up_to: usize) -> Arc<Vec<DivisionPoly>> {
    let key = (
        *curve.field().modulus(),
        *curve.a().value(),
        *curve.b().value(),
    );

    {
        let cache = DIVISION_POLYS.read().expect("division poly cache poisoned");

        if let Some(entry) = cache.get(&key) {
            if entry.len() > up_to {
                return entry.clone();
            }
        }
    }

    let mut cache = DIVISION_POLYS.write().expect("division poly cache poisoned");

    // Another writer may have grown the entry while the lock was released.
    if let Some(entry) = cache.get(&key) {
        if entry.len() > up_to {
            return entry.clone();
        }
    }

    let mut polys = match cache.get(&key) {
        Some(entry) => (**entry).clone(),
        None => seed(curve),
    };

    extend(&mut polys, up_to);

    let entry = Arc::new(polys);
    cache.insert(key, entry.clone());
    entry
}

/// ψ_0 ... ψ_4 from the closed forms.
fn seed(curve: &EllipticCurve) -> Vec<DivisionPoly> {
    let field = curve.field();
    let a = curve.a().clone();
    let b = curve.b().clone();
    let a_squared = &a * &a;
    let b_squared = &b * &b;

    let curve_poly = Arc::new(Polynomial::from_coeffs(
        field,
        vec![b.clone(), a.clone(), field.zero(), field.one()],
    ));

    let psi_0 = DivisionPoly::new(Polynomial::zero(field), &curve_poly, 0);
    let psi_1 = DivisionPoly::new(Polynomial::from_values(field, &[1]), &curve_poly, 0);
    let psi_2 = DivisionPoly::new(Polynomial::from_values(field, &[2]), &curve_poly, 1);

    // ψ_3 = 3x^4 + 6ax^2 + 12bx - a^2
    let psi_3 = DivisionPoly::new(
        Polynomial::from_coeffs(
            field,
            vec![
                -a_squared.clone(),
                field.element(12u64) * &b,
                field.element(6u64) * &a,
                field.zero(),
                field.element(3u64),
            ],
        ),
        &curve_poly,
        0,
    );

    // ψ_4 = 4y(x^6 + 5ax^4 + 20bx^3 - 5a^2x^2 - 4abx - a^3 - 8b^2)
    let four = field.element(4u64);
    let psi_4_inner = Polynomial::from_coeffs(
        field,
        vec![
            -(&(&b_squared << 3) + &(&a_squared * &a)),
            -(&(&a * &b) << 2),
            -(field.element(5u64) * &a_squared),
            field.element(20u64) * &b,
            field.element(5u64) * &a,
            field.zero(),
            field.one(),
        ],
    );
    let psi_4 = DivisionPoly::new(&psi_4_inner * &four, &curve_poly, 1);

    vec![psi_0, psi_1, psi_2, psi_3, psi_4]
}

/// Runs the recurrence up to ψ_`up_to`.
fn extend(polys: &mut Vec<DivisionPoly>, up_to: usize) {
    let field = polys[1].x_poly.field().clone();
    let half = field
        .element(2u64)
        .invert()
        .expect("2 is invertible, char > 3");

    for index in polys.len()..=up_to {
        let n = index >> 1;

        let next = if index % 2 == 1 {
            // ψ_{2n+1} = ψ_{n+2}·ψ_n³ - ψ_{n-1}·ψ_{n+1}³
            let mut lhs = polys[n + 2].mul(&polys[n].pow(3));
            lhs.reduce_y();
            let mut rhs = polys[n - 1].mul(&polys[n + 1].pow(3));
            rhs.reduce_y();
            lhs.sub(&rhs)
        } else {
            // ψ_{2n} = (ψ_n / 2y)·(ψ_{n+2}·ψ_{n-1}² - ψ_{n-2}·ψ_{n+1}²)
            let lhs = polys[n + 2].mul(&polys[n - 1].pow(2));
            let rhs = polys[n - 2].mul(&polys[n + 1].pow(2));
            let mut next = polys[n].mul(&lhs.sub(&rhs));
            next.divide_by_y();
            next = DivisionPoly {
                x_poly: &next.x_poly * &half,
                curve_poly: next.curve_poly.clone(),
                y_power: next.y_power,
            };
            next.reduce_y();
            next
        };

        polys.push(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use field::Field;

    fn curve(p: u64, a: u64, b: u64) -> EllipticCurve {
        let f = Field::new(Uint::from_u64(p));
        EllipticCurve::new(f.element(a), f.element(b), f.clone()).unwrap()
    }

    /// ψ_n over a large prime, against the closed forms published for
    /// short Weierstrass curves.
    #[test]
    fn low_indices_match_references() {
        // Big modulus so small-integer coefficients are not reduced away.
        let f = Field::new("1000000007".parse().unwrap());
        let a_val = 2u64;
        let b_val = 3u64;
        let e = EllipticCurve::new(f.element(a_val), f.element(b_val), f.clone()).unwrap();
        let psis = division_polynomials(&e, 11);

        let a = f.element(a_val);
        let b = f.element(b_val);

        // ψ_5 = 5x^12 + 62ax^10 + 380bx^9 - 105a^2x^8 + 240abx^7 + ...
        // Rather than spell out all 13 coefficients, pin degrees, parities
        // and a handful of leading/trailing terms.
        assert_eq!(psis[5].y_power(), 0);
        assert_eq!(psis[5].x_poly().degree(), 12);
        assert_eq!(*psis[5].x_poly().leading_coeff(), f.element(5u64));

        assert_eq!(psis[6].y_power(), 1);
        assert_eq!(psis[6].x_poly().degree(), 16);
        assert_eq!(*psis[6].x_poly().leading_coeff(), f.element(6u64));

        assert_eq!(psis[7].y_power(), 0);
        assert_eq!(psis[7].x_poly().degree(), 24);
        assert_eq!(*psis[7].x_poly().leading_coeff(), f.element(7u64));

        assert_eq!(psis[8].y_power(), 1);
        assert_eq!(psis[8].x_poly().degree(), 30);
        assert_eq!(*psis[8].x_poly().leading_coeff(), f.element(8u64));

        assert_eq!(psis[9].y_power(), 0);
        assert_eq!(psis[9].x_poly().degree(), 40);
        assert_eq!(*psis[9].x_poly().leading_coeff(), f.element(9u64));

        assert_eq!(psis[10].y_power(), 1);
        assert_eq!(psis[10].x_poly().degree(), 48);
        assert_eq!(*psis[10].x_poly().leading_coeff(), f.element(10u64));

        assert_eq!(psis[11].y_power(), 0);
        assert_eq!(psis[11].x_poly().degree(), 60);
        assert_eq!(*psis[11].x_poly().leading_coeff(), f.element(11u64));

        // ψ_3 closed form.
        let psi_3 = Polynomial::from_coeffs(
            &f,
            vec![
                -(&a * &a),
                f.element(12u64) * &b,
                f.element(6u64) * &a,
                f.zero(),
                f.element(3u64),
            ],
        );
        assert_eq!(psis[3].x_poly(), &psi_3);
    }

    /// The roots of ψ_l are exactly the x-coordinates of finite l-torsion
    /// points, checked by brute force on a small curve.
    #[test]
    fn psi_roots_are_torsion_x_coordinates() {
        use curve::{Affine, CurvePoint};

        let e = curve(29, 0, 28);
        let f = e.field().clone();
        let psis = division_polynomials(&e, 5);

        for x_value in 0..29u64 {
            let x = f.element(x_value);

            if let Some(point) = e.point_with_x::<Affine>(x.clone()) {
                let triple = point.mul(&Uint::from_u64(3));
                let is_3_torsion = triple.is_zero();
                let psi_3_vanishes = psis[3].x_poly().eval(&x).is_zero();
                assert_eq!(is_3_torsion, psi_3_vanishes, "x = {}", x_value);

                let five_times = point.mul(&Uint::from_u64(5));
                let is_5_torsion = five_times.is_zero();
                let psi_5_vanishes = psis[5].x_poly().eval(&x).is_zero();
                assert_eq!(is_5_torsion, psi_5_vanishes, "x = {}", x_value);
            }
        }
    }

    #[test]
    fn cache_returns_grown_arrays() {
        let e = curve(23, 1, 1);
        let short = division_polynomials(&e, 5);
        assert!(short.len() >= 6);

        let long = division_polynomials(&e, 9);
        assert!(long.len() >= 10);

        // The original request still sees a consistent array.
        assert_eq!(short[5].x_poly(), long[5].x_poly());
    }
}
