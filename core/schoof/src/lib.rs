//! Schoof's algorithm: the number of points of y² = x³ + ax + b over F_p.
//!
//! The trace of Frobenius t is determined modulo enough small primes l
//! that their product M exceeds 4√p, then reconstructed by the Chinese
//! remainder theorem; #E(F_p) = p + 1 - t. For each odd l the work happens
//! in F_p[x] / ψ_l, and a failed inversion during endomorphism arithmetic
//! refines ψ_l to one of its factors rather than failing the run.

pub mod division_poly;
pub mod endomorphism;

use crate::endomorphism::{End, EndContext, EndoSum};
use curve::EllipticCurve;
use field::{inverse_modulo, Uint};
use poly::{Polynomial, Ring};

/// #E(F_p) for a non-singular curve over a prime field, char > 3.
pub fn points_number(curve: &EllipticCurve) -> Uint {
    let p = *curve.field().modulus();
    let one = Uint::one();

    // Collect residues until M² > 16p, i.e. M > 4√p.
    let edge = p << 4;
    let mut accumulated = one;
    let mut trace = Uint::zero();
    let mut l = 2u32;

    while accumulated * accumulated <= edge {
        if Uint::from(l) == p {
            l = next_prime(l);
            continue;
        }

        let residue = trace_modulo(curve, l);
        let l_uint = Uint::from(l);

        if accumulated == one {
            trace = Uint::from(residue);
        } else {
            // Two-prime CRT of (trace mod M) and (residue mod l).
            let m_inverse = inverse_modulo(&(accumulated % l_uint), &l_uint)
                .expect("the accumulated product is coprime to a fresh prime");
            let l_inverse = inverse_modulo(&l_uint, &accumulated)
                .expect("a fresh prime is coprime to the accumulated product");

            let a = m_inverse * accumulated * Uint::from(residue);
            let b = l_inverse * l_uint * trace;
            trace = a + b;
        }

        accumulated = accumulated * l_uint;

        if trace >= accumulated {
            trace = trace % accumulated;
        }

        l = next_prime(l);
    }

    // Restore the signed representative: |t| ≤ 2√p < M/2.
    if trace > accumulated >> 1 {
        p + one + (accumulated - trace)
    } else {
        p + one - trace
    }
}

/// t mod l.
///
/// l = 2 reduces to a root test: the curve has a 2-torsion point iff
/// x³ + ax + b has a root in F_p. For odd l, π² + p_l = t·π is tested on
/// the l-torsion for t = 0, 1, ... in turn; any addition may surface a
/// factor of the working modulus, which restarts the search in the
/// smaller ring.
fn trace_modulo(curve: &EllipticCurve, l: u32) -> u32 {
    let field = curve.field();
    let p = *field.modulus();

    let curve_poly = Polynomial::from_coeffs(
        field,
        vec![
            curve.b().clone(),
            curve.a().clone(),
            field.zero(),
            field.one(),
        ],
    );

    if l == 2 {
        return if curve_poly.has_root_in_field() { 0 } else { 1 };
    }

    let psis = division_poly::division_polynomials(curve, l as usize);
    let mut modulus_poly = psis[l as usize].x_poly().clone();
    let p_l = (p % Uint::from(l)).to_u32();

    'retry: loop {
        let ring = Ring::new(modulus_poly.clone());
        let context = EndContext::new(ring, &curve_poly, curve.a().clone());

        let pi = End::frobenius(&context, &p);
        let pi_squared = pi.compose(&pi);
        let id = End::identity(&context);

        let scaled_id = match id.mul_scalar(p_l) {
            EndoSum::Endo(end) => end,
            EndoSum::ModulusFactor(factor) => {
                modulus_poly = factor;
                continue 'retry;
            }
            EndoSum::Infinity => {
                panic!("p·id cannot vanish on l-torsion for l coprime to p")
            }
        };

        let sum = match pi_squared.add(&scaled_id) {
            EndoSum::Endo(end) => end,
            EndoSum::ModulusFactor(factor) => {
                modulus_poly = factor;
                continue 'retry;
            }
            // π² + p_l·id = ∞ on the whole torsion: t ≡ 0 (mod l).
            EndoSum::Infinity => return 0,
        };

        let mut candidate = pi.clone();

        for c in 1..l {
            if candidate == sum {
                return c;
            }

            if c + 1 == l {
                // The next step would form l·π = ∞.
                break;
            }

            candidate = match candidate.add(&pi) {
                EndoSum::Endo(next) => next,
                EndoSum::ModulusFactor(factor) => {
                    modulus_poly = factor;
                    continue 'retry;
                }
                EndoSum::Infinity => {
                    panic!("c·π cannot vanish on l-torsion for c < l")
                }
            };
        }

        panic!("trace search exhausted all residues modulo {}", l);
    }
}

fn next_prime(current: u32) -> u32 {
    let mut candidate = current + 1;

    while !is_prime(candidate) {
        candidate += 1;
    }

    candidate
}

fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }

    let mut divisor = 2;

    while divisor * divisor <= n {
        if n % divisor == 0 {
            return false;
        }

        divisor += 1;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use field::{Field, LegendreSymbol};

    fn curve(p: u64, a: u64, b: u64) -> Option<EllipticCurve> {
        let f = Field::new(Uint::from_u64(p));
        EllipticCurve::new(f.element(a), f.element(b), f.clone()).ok()
    }

    /// #E by brute force: 1 + Σ_x (1 + χ(x³ + ax + b)).
    fn count_by_enumeration(e: &EllipticCurve) -> u64 {
        let f = e.field();
        let p = f.modulus().to_u64();
        let mut count = 1u64;

        for x in 0..p {
            let rhs = e.equation_rhs(&f.element(x));

            count += match rhs.legendre() {
                LegendreSymbol::QuadraticResidue => 2,
                LegendreSymbol::Zero => 1,
                LegendreSymbol::QuadraticNonResidue => 0,
            };
        }

        count
    }

    #[test]
    fn small_prime_seed_case() {
        // Over F_7, y² = x³ + 2x + 1 has exactly 5 points.
        let e = curve(7, 2, 1).unwrap();
        assert_eq!(points_number(&e), Uint::from_u64(5));
        assert_eq!(count_by_enumeration(&e), 5);
    }

    #[test]
    fn negative_trace_is_recovered() {
        // Over F_7, y² = x³ + 3x + 2 has 9 points, so t = -1.
        let e = curve(7, 3, 2).unwrap();
        assert_eq!(count_by_enumeration(&e), 9);
        assert_eq!(points_number(&e), Uint::from_u64(9));
    }

    #[test]
    fn matches_enumeration_on_small_fields() {
        for &p in [5u64, 7, 11].iter() {
            for a in 0..p {
                for b in 0..p {
                    if let Some(e) = curve(p, a, b) {
                        assert_eq!(
                            points_number(&e),
                            Uint::from_u64(count_by_enumeration(&e)),
                            "p = {}, a = {}, b = {}",
                            p,
                            a,
                            b
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn respects_the_hasse_bound() {
        for &(p, a, b) in [(17u64, 2u64, 3u64), (19, 1, 4), (23, 5, 1), (29, 0, 28), (31, 7, 11)].iter() {
            let e = curve(p, a, b).unwrap();
            let n = points_number(&e).to_u64();

            let sqrt = (p as f64).sqrt().ceil() as u64;
            let low = p + 1 - 2 * sqrt;
            let high = p + 1 + 2 * sqrt;
            assert!(n >= low && n <= high, "p = {}: {} outside Hasse range", p, n);

            assert_eq!(n, count_by_enumeration(&e));
        }
    }

    #[test]
    fn primes_iterate_in_order() {
        assert_eq!(next_prime(2), 3);
        assert_eq!(next_prime(3), 5);
        assert_eq!(next_prime(13), 17);
        assert!(is_prime(2));
        assert!(!is_prime(1));
        assert!(!is_prime(91));
    }
}
