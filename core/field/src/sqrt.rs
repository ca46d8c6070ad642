//! Square roots in F_p by Tonelli-Shanks.
//!
//! For p ≡ 3 (mod 4) the root is a single power. Otherwise the algorithm
//! needs a quadratic non-residue b and the power tables {b^(2^i)} and
//! {b^(u·2^i)} for p - 1 = 2^e · u; those depend only on p and are cached
//! process-wide, inserted once per modulus under a write lock.

use crate::{Field, FieldElement, FieldError, Uint};

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Legendre symbol of a field element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendreSymbol {
    Zero,
    QuadraticResidue,
    QuadraticNonResidue,
}

struct SqrtTables {
    /// e, with p - 1 = 2^e · u and u odd.
    two_exponent: u32,
    /// u, the odd part of p - 1.
    odd_part: Uint,
    /// b^(2^i) for 0 <= i < e, b a fixed quadratic non-residue.
    nonresidue_powers: Vec<FieldElement>,
    /// b^(u·2^i) for 0 <= i < e.
    nonresidue_odd_powers: Vec<FieldElement>,
}

lazy_static! {
    static ref SQRT_TABLES: RwLock<HashMap<Uint, Arc<SqrtTables>>> = RwLock::new(HashMap::new());
}

fn tables_for(field: &Field) -> Arc<SqrtTables> {
    {
        let cache = SQRT_TABLES.read().expect("sqrt table cache poisoned");

        if let Some(tables) = cache.get(field.modulus()) {
            return tables.clone();
        }
    }

    let tables = Arc::new(build_tables(field));
    let mut cache = SQRT_TABLES.write().expect("sqrt table cache poisoned");
    cache.entry(*field.modulus()).or_insert(tables).clone()
}

fn build_tables(field: &Field) -> SqrtTables {
    let p = *field.modulus();
    let one = field.one();

    let (two_exponent, odd_part) = decompose(p - Uint::one());

    // Smallest non-residue, found by testing b^((p-1)/2).
    let half = (p - Uint::one()) >> 1;
    let mut nonresidue = field.element(2u64);

    while nonresidue.pow(&half) == one {
        nonresidue = nonresidue + &one;
    }

    let mut nonresidue_powers = vec![nonresidue.clone()];

    for _ in 1..two_exponent {
        let squared = {
            let last = nonresidue_powers.last().expect("table is seeded");
            last * last
        };
        nonresidue_powers.push(squared);
    }

    let mut nonresidue_odd_powers = vec![nonresidue.pow(&odd_part)];

    for _ in 1..two_exponent {
        let squared = {
            let last = nonresidue_odd_powers.last().expect("table is seeded");
            last * last
        };
        nonresidue_odd_powers.push(squared);
    }

    SqrtTables {
        two_exponent,
        odd_part,
        nonresidue_powers,
        nonresidue_odd_powers,
    }
}

/// Splits `value` as `2^e · u` with `u` odd.
fn decompose(value: Uint) -> (u32, Uint) {
    let mut two_exponent = 0;
    let mut odd_part = value;

    while !odd_part.is_zero() && odd_part.is_even() {
        two_exponent += 1;
        odd_part >>= 1;
    }

    (two_exponent, odd_part)
}

impl FieldElement {
    /// Whether this element is a square in F_p*, by Euler's criterion.
    pub fn legendre(&self) -> LegendreSymbol {
        if self.is_zero() {
            return LegendreSymbol::Zero;
        }

        let half = (*self.modulus() - Uint::one()) >> 1;

        if self.pow(&half) == self.field().one() {
            LegendreSymbol::QuadraticResidue
        } else {
            LegendreSymbol::QuadraticNonResidue
        }
    }

    /// A square root of this element, if it is a quadratic residue.
    ///
    /// The other root is the negation of the returned one.
    pub fn sqrt(&self) -> Result<FieldElement, FieldError> {
        let field = self.field();
        let p = *self.modulus();

        if p == Uint::from_u64(2) {
            return Ok(self.clone());
        }

        if self.legendre() != LegendreSymbol::QuadraticResidue {
            return Err(FieldError::NotASquare);
        }

        if p.to_u32() & 0b11 == 3 {
            return Ok(self.pow(&((p + Uint::one()) >> 2)));
        }

        let tables = tables_for(&field);
        let e = tables.two_exponent;
        let one = field.one();

        // Work on z, tracking r: the least power with (z^u)^(2^r) = 1.
        // Multiplying z by b^(2^(e-r)) strictly decreases r; each such step
        // contributes b^(2^(e-r-1)) to the square root being divided out.
        let mut z = self.clone();
        let mut z_odd_power = z.pow(&tables.odd_part);
        let mut correction = one.clone();

        loop {
            let mut order = 0u32;
            let mut probe = z_odd_power.clone();

            while probe != one {
                probe = &probe * &probe;
                order += 1;
            }

            if order == 0 {
                break;
            }

            z = &z * &tables.nonresidue_powers[(e - order) as usize];
            z_odd_power = &z_odd_power * &tables.nonresidue_odd_powers[(e - order) as usize];
            correction = &correction * &tables.nonresidue_powers[(e - order - 1) as usize];
        }

        let root_of_adjusted = z.pow(&((tables.odd_part + Uint::one()) >> 1));
        Ok(&root_of_adjusted / &correction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Field;
    use rand::{SeedableRng, XorShiftRng};

    fn fp(modulus: u64) -> Field {
        Field::new(Uint::from_u64(modulus))
    }

    #[test]
    fn decompose_splits_powers_of_two() {
        let (e, u) = decompose(Uint::from_u64(28));
        assert_eq!(e, 2);
        assert_eq!(u, Uint::from_u64(7));

        let (e, u) = decompose(Uint::from_u64(1));
        assert_eq!(e, 0);
        assert_eq!(u, Uint::from_u64(1));
    }

    #[test]
    fn legendre_small_field() {
        let f = fp(11);
        // Squares mod 11: 1, 3, 4, 5, 9.
        for square in [1u64, 3, 4, 5, 9].iter() {
            assert_eq!(
                f.element(*square).legendre(),
                LegendreSymbol::QuadraticResidue
            );
        }
        for nonsquare in [2u64, 6, 7, 8, 10].iter() {
            assert_eq!(
                f.element(*nonsquare).legendre(),
                LegendreSymbol::QuadraticNonResidue
            );
        }
        assert_eq!(f.zero().legendre(), LegendreSymbol::Zero);
    }

    #[test]
    fn sqrt_of_four_with_p_1_mod_4() {
        // 29 ≡ 1 (mod 4), so this exercises the table path.
        let f = fp(29);
        let root = f.element(4u64).sqrt().unwrap();
        assert!(root == f.element(2u64) || root == f.element(27u64));
    }

    #[test]
    fn sqrt_of_four_with_p_3_mod_4() {
        let f = fp(23);
        let root = f.element(4u64).sqrt().unwrap();
        assert!(root == f.element(2u64) || root == f.element(21u64));
    }

    #[test]
    fn sqrt_round_trips_all_residues() {
        // 1 mod 4 with a large power of two in p - 1: 97 - 1 = 2^5 · 3.
        let f = fp(97);

        for value in 1..97u64 {
            let element = f.element(value);

            match element.legendre() {
                LegendreSymbol::QuadraticResidue => {
                    let root = element.sqrt().unwrap();
                    assert_eq!(&root * &root, element);
                }
                LegendreSymbol::QuadraticNonResidue => {
                    assert_eq!(element.sqrt(), Err(FieldError::NotASquare));
                }
                LegendreSymbol::Zero => unreachable!(),
            }
        }
    }

    #[test]
    fn sqrt_of_zero_is_not_a_square() {
        let f = fp(29);
        assert_eq!(f.zero().sqrt(), Err(FieldError::NotASquare));
    }

    #[test]
    fn sqrt_on_p256_field() {
        let mut rng = XorShiftRng::from_seed([0x7c4a95d3, 0x0f21b0c8, 0xa3e61d49, 0x58d2f7ee]);
        let f = Field::new(
            "0xffffffff00000001000000000000000000000000ffffffffffffffffffffffff"
                .parse()
                .unwrap(),
        );

        for _ in 0..5 {
            let a = f.random_nonzero_element(&mut rng);
            let square = &a * &a;
            let root = square.sqrt().unwrap();
            assert!(root == a || root == -a.clone());
        }
    }
}
