//! Endomorphisms of a curve restricted to an l-torsion quotient ring.
//!
//! An endomorphism is a pair (a, b) of ring elements acting as
//! (x, y) → (a(x), b(x)·y). Adding two endomorphisms follows the affine
//! chord-tangent formulas, so a denominator must be inverted in the ring;
//! when the denominator shares a factor with the ring modulus, that factor
//! is returned instead of a sum and the caller refines the ring. A failed
//! inversion here is not a bug — it is a refinement of the modulus.

use field::{FieldElement, Uint};
use poly::{extended_modulus_gcd, Polynomial, Ring, RingElement};

use std::sync::Arc;

/// Shared state of every endomorphism in one working ring.
pub struct EndContext {
    ring: Ring,
    /// f = x³ + ax + b reduced into the ring (stands in for y²).
    curve_function: RingElement,
    /// The curve coefficient a, kept aside because the reduction above
    /// can destroy the coefficients of f.
    curve_a: FieldElement,
}

impl EndContext {
    pub fn new(ring: Ring, curve_poly: &Polynomial, curve_a: FieldElement) -> Arc<Self> {
        let curve_function = ring.element(curve_poly.clone());

        Arc::new(EndContext {
            ring,
            curve_function,
            curve_a,
        })
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }
}

/// Outcome of an endomorphism addition.
pub enum EndoSum {
    /// The sum, still a rational map on the working torsion.
    Endo(End),
    /// A proper factor of the ring modulus surfaced by a denominator;
    /// the caller retries in the smaller ring.
    ModulusFactor(Polynomial),
    /// The sum is the point at infinity on the whole working torsion
    /// (the operands were opposite points).
    Infinity,
}

/// An endomorphism (x, y) → (a(x), b(x)·y), y² reduced by the curve.
#[derive(Clone)]
pub struct End {
    a: RingElement,
    b: RingElement,
    context: Arc<EndContext>,
}

impl End {
    /// The identity map (x, y) → (x, y).
    pub fn identity(context: &Arc<EndContext>) -> Self {
        End {
            a: context.ring.x(),
            b: context.ring.one(),
            context: context.clone(),
        }
    }

    /// The Frobenius (x, y) → (x^p, y^p): a = x^p and b = f^((p-1)/2),
    /// since y^p = (y²)^((p-1)/2)·y.
    pub fn frobenius(context: &Arc<EndContext>, p: &Uint) -> Self {
        let a = context.ring.x().pow(p);
        let b = context.curve_function.pow(&((*p - Uint::one()) >> 1));

        End {
            a,
            b,
            context: context.clone(),
        }
    }

    pub fn a(&self) -> &RingElement {
        &self.a
    }

    pub fn b(&self) -> &RingElement {
        &self.b
    }

    /// Composition self ∘ other: substitute other's x-map into both
    /// components, then pick up other's y-factor.
    pub fn compose(&self, other: &End) -> End {
        let a = self.a.compose(&other.a);
        let b = &self.b.compose(&other.a) * &other.b;

        End {
            a,
            b,
            context: self.context.clone(),
        }
    }

    pub fn neg(&self) -> End {
        End {
            a: self.a.clone(),
            b: -&self.b,
            context: self.context.clone(),
        }
    }

    /// The tangent-line doubling. The denominator 2·b·f carries the 2y
    /// of the affine slope.
    pub fn double(&self) -> EndoSum {
        let context = &self.context;
        let field = self.a.field().clone();
        let two = field.element(2u64);
        let denominator = &(&self.b * &context.curve_function) * &two;

        let inverse = match invert_in_ring(&denominator) {
            Ok(inverse) => inverse,
            Err(outcome) => return outcome,
        };

        // Slope r·y with r = (3a² + A) / (2·b·f), A the curve coefficient.
        let three = field.element(3u64);
        let curve_a = context
            .ring
            .element(Polynomial::from_coeffs(&field, vec![context.curve_a.clone()]));
        let a_squared = &self.a * &self.a;
        let r = &(&(&a_squared * &three) + &curve_a) * &inverse;

        let new_a = &(&(&r * &r) * &context.curve_function) - &(&self.a * &two);
        let new_b = &(&r * &(&self.a - &new_a)) - &self.b;

        EndoSum::Endo(End {
            a: new_a,
            b: new_b,
            context: context.clone(),
        })
    }

    /// The chord addition. Equal x-maps mean doubling or opposite points.
    pub fn add(&self, other: &End) -> EndoSum {
        if self.a == other.a {
            if self.b == other.b {
                return self.double();
            }

            return EndoSum::Infinity;
        }

        let denominator = &self.a - &other.a;

        let inverse = match invert_in_ring(&denominator) {
            Ok(inverse) => inverse,
            Err(outcome) => return outcome,
        };

        let r = &(&self.b - &other.b) * &inverse;
        let new_a = &(&(&(&r * &r) * &self.context.curve_function) - &self.a) - &other.a;
        let new_b = &(&r * &(&self.a - &new_a)) - &self.b;

        EndoSum::Endo(End {
            a: new_a,
            b: new_b,
            context: self.context.clone(),
        })
    }

    pub fn sub(&self, other: &End) -> EndoSum {
        self.add(&other.neg())
    }

    /// Scalar multiplication by the windowed-NAF digit stream, lifted to
    /// endomorphism addition. The accumulator is seeded with the top
    /// non-zero digit because the additive identity has no rational-map
    /// representation. Requires n ≥ 1.
    pub fn mul_scalar(&self, n: u32) -> EndoSum {
        assert!(n > 0, "endomorphism scalar must be positive");

        if n == 1 {
            return EndoSum::Endo(self.clone());
        }

        let digits = curve::wnaf::form(&Uint::from(n));

        // Odd multiples {E, 3E, ...}, built only as far as the digit
        // stream reaches: a spare entry could be infinity on a small
        // torsion even when the product itself is not.
        let top_entry = digits
            .iter()
            .map(|digit| (digit.abs() >> 1) as usize)
            .max()
            .expect("a positive scalar has digits");
        let mut table = vec![self.clone()];

        if top_entry > 0 {
            let twice = match self.double() {
                EndoSum::Endo(twice) => twice,
                other => return other,
            };

            while table.len() <= top_entry {
                let step = table.last().expect("table is seeded").add(&twice);
                match step {
                    EndoSum::Endo(next) => table.push(next),
                    other => return other,
                }
            }
        }

        // The top non-zero digit of a wNAF form is positive.
        let top = digits.len() - 1;
        let mut acc = table[(digits[top] >> 1) as usize].clone();

        for &digit in digits[..top].iter().rev() {
            acc = match acc.double() {
                EndoSum::Endo(acc) => acc,
                other => return other,
            };

            if digit != 0 {
                let entry = &table[(digit.abs() >> 1) as usize];
                let step = if digit > 0 {
                    acc.add(entry)
                } else {
                    acc.sub(entry)
                };

                acc = match step {
                    EndoSum::Endo(acc) => acc,
                    other => return other,
                };
            }
        }

        EndoSum::Endo(acc)
    }
}

impl PartialEq for End {
    fn eq(&self, other: &Self) -> bool {
        self.a == other.a && self.b == other.b
    }
}

impl Eq for End {}

/// Inverts a ring element via the extended gcd against the ring modulus,
/// classifying failures: a proper factor refines the modulus; the zero
/// element means the operands met at infinity on the whole torsion.
fn invert_in_ring(element: &RingElement) -> Result<RingElement, EndoSum> {
    if element.is_zero() {
        return Err(EndoSum::Infinity);
    }

    let result = extended_modulus_gcd(element.value(), element.modulus());

    // A reduced non-zero element has gcd degree strictly below the
    // modulus degree, so any positive degree is a proper factor.
    if result.gcd.degree() > 0 {
        return Err(EndoSum::ModulusFactor(result.gcd));
    }

    Ok(element.ring().element(result.value_multiplier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve::EllipticCurve;
    use field::Field;

    /// Working ring of y² = x³ + 2x + 1 over F_7 modulo ψ_3.
    fn setup() -> (Arc<EndContext>, Uint) {
        let p = Uint::from_u64(7);
        let f = Field::new(p);
        let e = EllipticCurve::new(f.element(2u64), f.element(1u64), f.clone()).unwrap();
        let psis = crate::division_poly::division_polynomials(&e, 3);
        let ring = Ring::new(psis[3].x_poly().clone());
        let curve_poly = Polynomial::from_values(&f, &[1, 2, 0, 1]);
        let context = EndContext::new(ring, &curve_poly, f.element(2u64));
        (context, p)
    }

    #[test]
    fn identity_composes_trivially() {
        let (context, _) = setup();
        let id = End::identity(&context);
        assert_eq!(id.compose(&id), id);
    }

    #[test]
    fn frobenius_composed_is_frobenius_squared() {
        let (context, p) = setup();
        let pi = End::frobenius(&context, &p);
        let pi_squared = pi.compose(&pi);

        // The x-map of π² is x^(p²) reduced in the ring.
        let expected_a = context.ring().x().pow(&(p * p));
        assert_eq!(pi_squared.a(), &expected_a);
    }

    #[test]
    fn adding_opposites_is_infinity() {
        let (context, _) = setup();
        let id = End::identity(&context);

        match id.add(&id.neg()) {
            EndoSum::Infinity => {}
            _ => panic!("P + (-P) must be the point at infinity"),
        }
    }

    #[test]
    fn two_is_minus_one_on_3_torsion() {
        let (context, _) = setup();
        let id = End::identity(&context);

        match id.mul_scalar(2) {
            EndoSum::Endo(double) => assert_eq!(double, id.neg()),
            EndoSum::ModulusFactor(factor) => {
                assert!(factor.degree() > 0);
                assert!(factor.degree() < context.ring().modulus().degree());
            }
            EndoSum::Infinity => panic!("2·id cannot be infinity on 3-torsion"),
        }
    }

    #[test]
    fn three_annihilates_3_torsion() {
        let (context, _) = setup();
        let id = End::identity(&context);

        match id.mul_scalar(3) {
            EndoSum::Infinity => {}
            EndoSum::ModulusFactor(factor) => {
                // Also acceptable: a split of ψ_3 discovered on the way.
                assert!(factor.degree() > 0);
                assert!(factor.degree() < context.ring().modulus().degree());
            }
            EndoSum::Endo(_) => panic!("3·id must vanish on 3-torsion"),
        }
    }

    #[test]
    fn four_is_one_on_3_torsion() {
        let (context, _) = setup();
        let id = End::identity(&context);

        match id.mul_scalar(4) {
            EndoSum::Endo(quadruple) => assert_eq!(quadruple, id),
            EndoSum::ModulusFactor(factor) => {
                assert!(factor.degree() > 0);
                assert!(factor.degree() < context.ring().modulus().degree());
            }
            EndoSum::Infinity => panic!("4·id cannot be infinity on 3-torsion"),
        }
    }
}
