//! Fixed-width unsigned integers for the algebraic stack.
//!
//! `Uint<LIMBS>` represents an integer in `[0, 2^(32 * LIMBS))` as a
//! little-endian sequence of `u32` digits. All arithmetic wraps modulo the
//! full width; that is a contract, not an accident — callers that need
//! trapping must check separately.

mod arith;
mod parse;

pub use crate::parse::ParseUintError;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use rand::{Rand, Rng};
use std::io;

/// Fixed-width unsigned integer. Digit 0 is the least significant.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Uint<const LIMBS: usize>(pub [u32; LIMBS]);

/// 256-bit unsigned integer.
pub type U256 = Uint<8>;
/// 512-bit unsigned integer.
pub type U512 = Uint<16>;
/// 768-bit unsigned integer.
pub type U768 = Uint<24>;

impl<const LIMBS: usize> Uint<LIMBS> {
    /// Total bit width of the representation.
    pub const BITS: u32 = 32 * LIMBS as u32;

    pub fn zero() -> Self {
        Uint([0u32; LIMBS])
    }

    pub fn one() -> Self {
        Self::from_u64(1)
    }

    /// The largest representable value, `2^BITS - 1`.
    pub fn max_value() -> Self {
        Uint([u32::max_value(); LIMBS])
    }

    pub fn from_u64(value: u64) -> Self {
        let mut digits = [0u32; LIMBS];
        if LIMBS > 0 {
            digits[0] = value as u32;
        }
        if LIMBS > 1 {
            digits[1] = (value >> 32) as u32;
        }
        Uint(digits)
    }

    pub fn from_u128(value: u128) -> Self {
        let mut result = Self::from_u64((value >> 64) as u64);
        result <<= 64;
        result += Self::from_u64(value as u64);
        result
    }

    /// Truncates to the least significant digit.
    pub fn to_u32(&self) -> u32 {
        self.0[0]
    }

    /// Truncates to the two least significant digits.
    pub fn to_u64(&self) -> u64 {
        let mut value = self.0[0] as u64;
        if LIMBS > 1 {
            value |= (self.0[1] as u64) << 32;
        }
        value
    }

    /// Copies the value into another width, truncating or zero-extending.
    pub fn resize<const TO: usize>(&self) -> Uint<TO> {
        let mut digits = [0u32; TO];
        let shared = if LIMBS < TO { LIMBS } else { TO };
        digits[..shared].copy_from_slice(&self.0[..shared]);
        Uint(digits)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|digit| *digit == 0)
    }

    pub fn is_odd(&self) -> bool {
        self.0[0] & 1 == 1
    }

    pub fn is_even(&self) -> bool {
        !self.is_odd()
    }

    /// Number of bits needed to encode this value.
    pub fn num_bits(&self) -> u32 {
        for (pos, digit) in self.0.iter().enumerate().rev() {
            if *digit != 0 {
                return (pos as u32 + 1) * 32 - digit.leading_zeros();
            }
        }

        0
    }

    /// Number of digits up to and including the top non-zero one.
    pub(crate) fn actual_len(&self) -> usize {
        let mut len = LIMBS;

        while len > 0 && self.0[len - 1] == 0 {
            len -= 1;
        }

        len
    }

    /// Halves the value, dropping the low bit.
    pub fn div2(&mut self) {
        *self >>= 1;
    }

    /// Doubles the value. Overflow is ignored.
    pub fn mul2(&mut self) {
        *self <<= 1;
    }

    /// Writes the value as a big-endian integer.
    pub fn write_be<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut buf = [0u8; 4];
        for digit in self.0.iter().rev() {
            BigEndian::write_u32(&mut buf, *digit);
            writer.write_all(&buf)?;
        }

        Ok(())
    }

    /// Reads a big-endian integer into this value.
    pub fn read_be<R: io::Read>(&mut self, reader: &mut R) -> io::Result<()> {
        let mut buf = [0u8; 4];
        for digit in self.0.iter_mut().rev() {
            reader.read_exact(&mut buf)?;
            *digit = BigEndian::read_u32(&buf);
        }

        Ok(())
    }

    /// Writes the value as a little-endian integer.
    pub fn write_le<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut buf = [0u8; 4];
        for digit in self.0.iter() {
            LittleEndian::write_u32(&mut buf, *digit);
            writer.write_all(&buf)?;
        }

        Ok(())
    }

    /// Reads a little-endian integer into this value.
    pub fn read_le<R: io::Read>(&mut self, reader: &mut R) -> io::Result<()> {
        let mut buf = [0u8; 4];
        for digit in self.0.iter_mut() {
            reader.read_exact(&mut buf)?;
            *digit = LittleEndian::read_u32(&buf);
        }

        Ok(())
    }
}

impl<const LIMBS: usize> Default for Uint<LIMBS> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const LIMBS: usize> From<u32> for Uint<LIMBS> {
    fn from(value: u32) -> Self {
        Self::from_u64(value as u64)
    }
}

impl<const LIMBS: usize> From<u64> for Uint<LIMBS> {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl<const LIMBS: usize> Rand for Uint<LIMBS> {
    fn rand<R: Rng>(rng: &mut R) -> Self {
        let mut digits = [0u32; LIMBS];
        for digit in digits.iter_mut() {
            *digit = rng.next_u32();
        }

        Uint(digits)
    }
}

/// Iterator over the bits of a `Uint`, most significant first.
pub struct BitIterator<const LIMBS: usize> {
    digits: [u32; LIMBS],
    pos: usize,
}

impl<const LIMBS: usize> BitIterator<LIMBS> {
    pub fn new(value: Uint<LIMBS>) -> Self {
        BitIterator {
            digits: value.0,
            pos: LIMBS * 32,
        }
    }
}

impl<const LIMBS: usize> Iterator for BitIterator<LIMBS> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.pos == 0 {
            return None;
        }

        self.pos -= 1;
        Some(self.digits[self.pos / 32] >> (self.pos % 32) & 1 == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, XorShiftRng};

    #[test]
    fn bit_iterator_msb_first() {
        let value = U256::from_u64(0b1011);
        let bits: Vec<bool> = BitIterator::new(value).collect();
        assert_eq!(bits.len(), 256);
        assert!(bits[..252].iter().all(|bit| !bit));
        assert_eq!(&bits[252..], &[true, false, true, true][..]);
    }

    #[test]
    fn num_bits_and_len() {
        assert_eq!(U256::zero().num_bits(), 0);
        assert_eq!(U256::one().num_bits(), 1);
        assert_eq!(U256::from_u64(0x1_0000_0000).num_bits(), 33);
        assert_eq!(U512::max_value().num_bits(), 512);
    }

    #[test]
    fn resize_round_trip() {
        let mut rng = XorShiftRng::from_seed([0x5dbe6259, 0x8d313d76, 0x3237db17, 0xe5bc0654]);

        for _ in 0..50 {
            let value: U256 = rng.gen();
            let wide: U512 = value.resize();
            assert_eq!(wide.resize::<8>(), value);
        }
    }

    #[test]
    fn byte_round_trips() {
        let mut rng = XorShiftRng::from_seed([0x0dbc06e9, 0x67b72c41, 0x9ee22ce1, 0x11b10d1a]);

        for _ in 0..50 {
            let value: U512 = rng.gen();

            let mut be = Vec::new();
            value.write_be(&mut be).unwrap();
            let mut back = U512::zero();
            back.read_be(&mut &be[..]).unwrap();
            assert_eq!(back, value);

            let mut le = Vec::new();
            value.write_le(&mut le).unwrap();
            let mut back = U512::zero();
            back.read_le(&mut &le[..]).unwrap();
            assert_eq!(back, value);

            be.reverse();
            assert_eq!(be, le);
        }
    }

    #[test]
    fn be_bytes_match_hex() {
        let value: U256 = "0x6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296"
            .parse()
            .unwrap();
        let mut bytes = Vec::new();
        value.write_be(&mut bytes).unwrap();
        let expected =
            hex::decode("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296").unwrap();
        assert_eq!(bytes, expected);
    }
}
