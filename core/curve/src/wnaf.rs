//! Windowed non-adjacent form scalar multiplication, written once over the
//! `CurvePoint` capability.
//!
//! Digits lie in {0, ±1, ±3, ..., ±(2^(w-1) - 1)}; the precomputed table
//! holds the odd multiples P, 3P, ..., (2^(w-1) - 1)P.

use crate::point::CurvePoint;
use field::Uint;

/// Window width. Any width in 2..=6 works with a matching table size.
pub const WINDOW: u32 = 3;

/// Signed-digit expansion of `scalar`, least significant digit first.
pub fn form(scalar: &Uint) -> Vec<i8> {
    let mask = (1u32 << WINDOW) - 1;
    let half = 1i8 << (WINDOW - 1);

    let mut n = *scalar;
    let mut digits = Vec::with_capacity(n.num_bits() as usize + 1);

    while !n.is_zero() {
        if n.is_odd() {
            let mut digit = (n.to_u32() & mask) as i8;

            if digit >= half {
                digit -= 1 << WINDOW;
                n += Uint::from_u64((-digit) as u64);
            } else {
                n -= Uint::from_u64(digit as u64);
            }

            digits.push(digit);
        } else {
            digits.push(0);
        }

        n >>= 1;
    }

    digits
}

/// Computes `scalar · point` over the digit stream of `form`.
pub fn mul<P: CurvePoint>(point: &P, scalar: &Uint) -> P {
    let digits = form(scalar);

    // P, 3P, 5P, ..., by repeatedly adding 2P.
    let mut twice = point.clone();
    twice.double();

    let mut table = vec![point.clone()];

    for _ in 1..(1usize << (WINDOW - 2)) {
        let next = table.last().expect("table is seeded").add(&twice);
        table.push(next);
    }

    let mut acc = P::zero(point.curve());

    for &digit in digits.iter().rev() {
        acc.double();

        if digit > 0 {
            acc.add_assign(&table[(digit >> 1) as usize]);
        } else if digit < 0 {
            acc.sub_assign(&table[(-digit >> 1) as usize]);
        }
    }

    acc
}
