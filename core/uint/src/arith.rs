//! Arithmetic, shifts and comparisons on the digit sequence.
//!
//! Addition, subtraction and multiplication are schoolbook with explicit
//! carry chains and wrap modulo the full width. Division dispatches on the
//! divisor length: long division for a single digit, Knuth's Algorithm D
//! otherwise.

use crate::Uint;

use std::cmp::Ordering;
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div, Mul,
    MulAssign, Rem, Shl, ShlAssign, Shr, ShrAssign, Sub, SubAssign,
};

const BASE: u64 = 1 << 32;

impl<const LIMBS: usize> Ord for Uint<LIMBS> {
    fn cmp(&self, other: &Self) -> Ordering {
        for pos in (0..LIMBS).rev() {
            if self.0[pos] != other.0[pos] {
                return self.0[pos].cmp(&other.0[pos]);
            }
        }

        Ordering::Equal
    }
}

impl<const LIMBS: usize> PartialOrd for Uint<LIMBS> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const LIMBS: usize> AddAssign for Uint<LIMBS> {
    fn add_assign(&mut self, other: Self) {
        let mut carry = false;

        for pos in 0..LIMBS {
            let (sum, first) = self.0[pos].overflowing_add(other.0[pos]);
            let (sum, second) = sum.overflowing_add(carry as u32);
            self.0[pos] = sum;
            carry = first | second;
        }
    }
}

impl<const LIMBS: usize> SubAssign for Uint<LIMBS> {
    fn sub_assign(&mut self, other: Self) {
        let mut borrow = false;

        for pos in 0..LIMBS {
            let (diff, first) = self.0[pos].overflowing_sub(other.0[pos]);
            let (diff, second) = diff.overflowing_sub(borrow as u32);
            self.0[pos] = diff;
            borrow = first | second;
        }
    }
}

impl<const LIMBS: usize> MulAssign for Uint<LIMBS> {
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

impl<const LIMBS: usize> Mul for Uint<LIMBS> {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        let mut result = Uint::zero();

        for lhs_pos in 0..LIMBS {
            let mut acc = 0u64;

            for rhs_pos in 0..LIMBS - lhs_pos {
                acc = result.0[lhs_pos + rhs_pos] as u64
                    + self.0[lhs_pos] as u64 * other.0[rhs_pos] as u64
                    + (acc >> 32);
                result.0[lhs_pos + rhs_pos] = acc as u32;
            }
        }

        result
    }
}

impl<const LIMBS: usize> Add for Uint<LIMBS> {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl<const LIMBS: usize> Sub for Uint<LIMBS> {
    type Output = Self;

    fn sub(mut self, other: Self) -> Self {
        self -= other;
        self
    }
}

impl<const LIMBS: usize> Div for Uint<LIMBS> {
    type Output = Self;

    fn div(self, other: Self) -> Self {
        self.div_rem(&other).0
    }
}

impl<const LIMBS: usize> Rem for Uint<LIMBS> {
    type Output = Self;

    fn rem(self, other: Self) -> Self {
        self.div_rem(&other).1
    }
}

impl<const LIMBS: usize> ShrAssign<u32> for Uint<LIMBS> {
    fn shr_assign(&mut self, shift: u32) {
        let digit_shift = (shift / 32) as usize;

        if digit_shift > 0 {
            for pos in 0..LIMBS {
                self.0[pos] = if pos + digit_shift < LIMBS {
                    self.0[pos + digit_shift]
                } else {
                    0
                };
            }
        }

        let sub_shift = shift % 32;

        if sub_shift == 0 {
            return;
        }

        for pos in 0..LIMBS {
            self.0[pos] >>= sub_shift;

            if pos + 1 < LIMBS {
                self.0[pos] |= self.0[pos + 1] << (32 - sub_shift);
            }
        }
    }
}

impl<const LIMBS: usize> ShlAssign<u32> for Uint<LIMBS> {
    fn shl_assign(&mut self, shift: u32) {
        let digit_shift = (shift / 32) as usize;

        if digit_shift > 0 {
            for pos in (0..LIMBS).rev() {
                self.0[pos] = if pos >= digit_shift {
                    self.0[pos - digit_shift]
                } else {
                    0
                };
            }
        }

        let sub_shift = shift % 32;

        if sub_shift == 0 {
            return;
        }

        for pos in (0..LIMBS).rev() {
            self.0[pos] <<= sub_shift;

            if pos > 0 {
                self.0[pos] |= self.0[pos - 1] >> (32 - sub_shift);
            }
        }
    }
}

impl<const LIMBS: usize> Shr<u32> for Uint<LIMBS> {
    type Output = Self;

    fn shr(mut self, shift: u32) -> Self {
        self >>= shift;
        self
    }
}

impl<const LIMBS: usize> Shl<u32> for Uint<LIMBS> {
    type Output = Self;

    fn shl(mut self, shift: u32) -> Self {
        self <<= shift;
        self
    }
}

macro_rules! bitwise_impl {
    ($op_trait:ident, $op:ident, $assign_trait:ident, $assign:ident, $sym:tt) => {
        impl<const LIMBS: usize> $assign_trait for Uint<LIMBS> {
            fn $assign(&mut self, other: Self) {
                for pos in 0..LIMBS {
                    self.0[pos] = self.0[pos] $sym other.0[pos];
                }
            }
        }

        impl<const LIMBS: usize> $op_trait for Uint<LIMBS> {
            type Output = Self;

            fn $op(mut self, other: Self) -> Self {
                self.$assign(other);
                self
            }
        }
    };
}

bitwise_impl!(BitAnd, bitand, BitAndAssign, bitand_assign, &);
bitwise_impl!(BitOr, bitor, BitOrAssign, bitor_assign, |);
bitwise_impl!(BitXor, bitxor, BitXorAssign, bitxor_assign, ^);

impl<const LIMBS: usize> Uint<LIMBS> {
    /// Computes quotient and remainder in one pass.
    ///
    /// Panics on a zero divisor; that is a caller bug, not a recoverable
    /// condition.
    pub fn div_rem(&self, divisor: &Self) -> (Self, Self) {
        if divisor.is_zero() {
            panic!("Uint division by zero");
        }

        if self < divisor {
            return (Self::zero(), *self);
        }

        if divisor.actual_len() == 1 {
            self.div_rem_digit(divisor.0[0])
        } else {
            self.div_rem_knuth(divisor)
        }
    }

    /// Long division by a single digit, top digit first.
    fn div_rem_digit(&self, divisor: u32) -> (Self, Self) {
        let mut quotient = Self::zero();
        let mut part = 0u64;

        for pos in (0..LIMBS).rev() {
            part = (part << 32) + self.0[pos] as u64;

            if part < divisor as u64 {
                continue;
            }

            quotient.0[pos] = (part / divisor as u64) as u32;
            part %= divisor as u64;
        }

        (quotient, Self::from_u64(part))
    }

    /// Knuth's Algorithm D. The dividend is widened by one explicit
    /// overflow digit so normalization cannot lose bits.
    fn div_rem_knuth(&self, divisor: &Self) -> (Self, Self) {
        let dividend_len = self.actual_len();
        let divisor_len = divisor.actual_len();

        // Normalize so the divisor's top digit has its high bit set.
        let shift = divisor.0[divisor_len - 1].leading_zeros();

        let mut dividend = self.0;
        let mut overflow = 0u32;
        let mut divisor = divisor.0;

        if shift > 0 {
            overflow = dividend[LIMBS - 1] >> (32 - shift);

            for pos in (1..LIMBS).rev() {
                dividend[pos] = (dividend[pos] << shift) | (dividend[pos - 1] >> (32 - shift));
            }
            dividend[0] <<= shift;

            for pos in (1..divisor_len).rev() {
                divisor[pos] = (divisor[pos] << shift) | (divisor[pos - 1] >> (32 - shift));
            }
            divisor[0] <<= shift;
        }

        let get = |dividend: &[u32; LIMBS], overflow: u32, pos: usize| -> u64 {
            if pos < LIMBS {
                dividend[pos] as u64
            } else {
                overflow as u64
            }
        };

        let divisor_head = divisor[divisor_len - 1] as u64;
        let mut quotient = Self::zero();

        for pos in (1..=dividend_len - divisor_len + 1).rev() {
            // Estimate the quotient digit from the top two dividend digits.
            let part = (get(&dividend, overflow, pos + divisor_len - 1) << 32)
                + get(&dividend, overflow, pos + divisor_len - 2);
            let mut estimate = part / divisor_head;
            let mut remainder = part % divisor_head;

            // Correct the estimate downward against the second divisor
            // digit; at most two decrements are ever needed.
            loop {
                if estimate >= BASE
                    || estimate * divisor[divisor_len - 2] as u64
                        > (remainder << 32) + get(&dividend, overflow, pos + divisor_len - 3)
                {
                    estimate -= 1;
                    remainder += divisor_head;

                    if remainder < BASE {
                        continue;
                    }
                }

                break;
            }

            // Multiply-subtract the divisor from the dividend window.
            let mut carry = 0i64;
            let mut wide = 0i64;

            for inner in 0..divisor_len {
                let product = (estimate as u32 as u64) * divisor[inner] as u64;
                wide = (get(&dividend, overflow, pos + inner - 1) as i64 + carry)
                    - (product & 0xffff_ffff) as i64;

                if pos + inner - 1 < LIMBS {
                    dividend[pos + inner - 1] = wide as u32;
                } else {
                    overflow = wide as u32;
                }

                carry = (wide >> 32) - (product >> 32) as i64;
            }

            wide = get(&dividend, overflow, pos + divisor_len - 1) as i64 + carry;

            if pos + divisor_len - 1 < LIMBS {
                dividend[pos + divisor_len - 1] = wide as u32;
            } else {
                overflow = wide as u32;
            }

            quotient.0[pos - 1] = estimate as u32;

            // Negative residue: add the divisor back once.
            if wide < 0 {
                quotient.0[pos - 1] -= 1;
                let mut acc = 0i64;

                for inner in 0..divisor_len {
                    acc += get(&dividend, overflow, pos + inner - 1) as i64 + divisor[inner] as i64;

                    if pos + inner - 1 < LIMBS {
                        dividend[pos + inner - 1] = acc as u32;
                    } else {
                        overflow = acc as u32;
                    }

                    acc >>= 32;
                }
            }
        }

        // De-normalize what is left of the dividend.
        let mut remainder = Self::zero();

        if shift == 0 {
            remainder.0[..divisor_len].copy_from_slice(&dividend[..divisor_len]);
        } else {
            for pos in 0..divisor_len - 1 {
                remainder.0[pos] = (dividend[pos] >> shift) | (dividend[pos + 1] << (32 - shift));
            }
            remainder.0[divisor_len - 1] = dividend[divisor_len - 1] >> shift;
        }

        (quotient, remainder)
    }
}

#[cfg(test)]
mod tests {
    use crate::{U256, U512};
    use rand::{Rng, SeedableRng, XorShiftRng};

    #[test]
    fn add_sub_round_trip() {
        let mut rng = XorShiftRng::from_seed([0x193a6754, 0xa8a7d469, 0x97830e05, 0x113ba7bb]);

        for _ in 0..100 {
            let a: U512 = rng.gen();
            let b: U512 = rng.gen();
            assert_eq!((a - b) + b, a);
            assert_eq!(a + b, b + a);
        }
    }

    #[test]
    fn mul_commutes_and_distributes() {
        let mut rng = XorShiftRng::from_seed([0xe5bc0654, 0x3237db17, 0x8d313d76, 0x5dbe6259]);

        for _ in 0..50 {
            let a: U512 = rng.gen();
            let b: U512 = rng.gen();
            let c: U512 = rng.gen();
            assert_eq!(a * b, b * a);
            assert_eq!(a * (b + c), a * b + a * c);
            assert_eq!((a * b) * c, a * (b * c));
        }
    }

    #[test]
    fn division_identity() {
        let mut rng = XorShiftRng::from_seed([0x6d5c9b26, 0xab23c4f2, 0x3b1e4598, 0x0ce77f29]);

        for _ in 0..100 {
            let a: U512 = rng.gen();
            let mut d: U512 = rng.gen();
            // Vary the divisor length so both division branches run.
            d >>= rng.gen_range(0, 512);

            if d.is_zero() {
                continue;
            }

            let (q, r) = a.div_rem(&d);
            assert!(r < d);
            assert_eq!(q * d + r, a);
        }
    }

    #[test]
    fn division_small_cases() {
        let a = U256::from_u64(1_000_000_007);
        let b = U256::from_u64(97);
        let (q, r) = a.div_rem(&b);
        assert_eq!(q, U256::from_u64(10_309_278));
        assert_eq!(r, U256::from_u64(41));

        assert_eq!(U256::from_u64(42) % U256::from_u64(42), U256::zero());
        assert_eq!(U256::one() / U256::from_u64(2), U256::zero());
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn division_by_zero_panics() {
        let _ = U256::one().div_rem(&U256::zero());
    }

    #[test]
    fn shifts_against_multiplication() {
        let mut rng = XorShiftRng::from_seed([0x7fef331f, 0x4b9f2c3e, 0x61dbb752, 0x2e50ff10]);

        for _ in 0..50 {
            let a: U512 = rng.gen();
            assert_eq!(a << 1, a + a);
            assert_eq!((a >> 32).0[0], a.0[1]);
            assert_eq!((a << 5) >> 5, (a << 5) >> 5);

            let small: U512 = U512::from_u64(rng.gen::<u32>() as u64);
            assert_eq!(small << 7, small * U512::from_u64(128));
        }
    }

    #[test]
    fn shift_wraps_at_width() {
        let a = U256::max_value();
        assert_eq!(a << 256, U256::zero());
        assert_eq!((a << 255).num_bits(), 256);
        assert_eq!(a >> 256, U256::zero());
    }

    #[test]
    fn ordering_is_by_value() {
        let small = U256::from_u64(5);
        let big = U256::one() << 200;
        assert!(small < big);
        assert!(big > small);
        assert_eq!(small.cmp(&small), std::cmp::Ordering::Equal);
    }
}
