//! Affine coordinates: the addition law in its textbook form, one field
//! inversion per operation.

use crate::point::CurvePoint;
use crate::EllipticCurve;
use field::{FieldElement, Uint};

use std::fmt;
use std::io;

#[derive(Clone)]
pub struct Affine {
    x: FieldElement,
    y: FieldElement,
    infinity: bool,
    curve: EllipticCurve,
}

const TAG_INFINITY: u8 = 0;
const TAG_UNCOMPRESSED: u8 = 4;

impl Affine {
    /// Writes the point: a tag byte, then both coordinates big-endian.
    /// The identity is the tag alone.
    pub fn write<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        if self.infinity {
            return writer.write_all(&[TAG_INFINITY]);
        }

        writer.write_all(&[TAG_UNCOMPRESSED])?;
        self.x.value().write_be(writer)?;
        self.y.value().write_be(writer)
    }

    /// Reads a point written by `write`, validating the curve equation.
    pub fn read<R: io::Read>(reader: &mut R, curve: &EllipticCurve) -> io::Result<Self> {
        let mut tag = [0u8; 1];
        reader.read_exact(&mut tag)?;

        match tag[0] {
            TAG_INFINITY => Ok(Self::zero(curve)),
            TAG_UNCOMPRESSED => {
                let mut x = Uint::zero();
                x.read_be(reader)?;
                let mut y = Uint::zero();
                y.read_be(reader)?;

                let field = curve.field();
                curve
                    .point(field.element(x), field.element(y))
                    .ok_or_else(|| {
                        io::Error::new(io::ErrorKind::InvalidData, "point is not on the curve")
                    })
            }
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "unknown point encoding tag",
            )),
        }
    }
}

impl CurvePoint for Affine {
    fn zero(curve: &EllipticCurve) -> Self {
        Affine {
            x: curve.field().zero(),
            y: curve.field().one(),
            infinity: true,
            curve: curve.clone(),
        }
    }

    fn from_affine(x: FieldElement, y: FieldElement, curve: &EllipticCurve) -> Self {
        let point = Affine {
            x,
            y,
            infinity: false,
            curve: curve.clone(),
        };
        debug_assert!(point.on_curve());
        point
    }

    fn curve(&self) -> &EllipticCurve {
        &self.curve
    }

    fn is_zero(&self) -> bool {
        self.infinity
    }

    fn negate(&mut self) {
        self.y = -self.y.clone();
    }

    fn double(&mut self) {
        if self.infinity {
            return;
        }

        if !self.y.is_invertible() {
            self.infinity = true;
            return;
        }

        let three = self.curve.field().element(3u64);
        let slope = (three * &(&self.x * &self.x) + self.curve.a()) / &(&self.y << 1);
        let x = &(&slope * &slope) - &(&self.x << 1);
        self.y = &slope * &(&self.x - &x) - &self.y;
        self.x = x;
        debug_assert!(self.on_curve());
    }

    fn add_assign(&mut self, other: &Self) {
        if self.infinity {
            *self = other.clone();
            return;
        }

        if other.infinity {
            return;
        }

        if self.x == other.x {
            if self.y != other.y {
                self.infinity = true;
            } else {
                self.double();
            }

            return;
        }

        let slope = (&other.y - &self.y) / &(&other.x - &self.x);
        let x = &(&slope * &slope) - &self.x - &other.x;
        self.y = &slope * &(&self.x - &x) - &self.y;
        self.x = x;
        debug_assert!(self.on_curve());
    }

    fn to_affine(&self) -> Option<(FieldElement, FieldElement)> {
        if self.infinity {
            return None;
        }

        Some((self.x.clone(), self.y.clone()))
    }
}

impl PartialEq for Affine {
    fn eq(&self, other: &Self) -> bool {
        if self.infinity || other.infinity {
            return self.infinity && other.infinity;
        }

        self.x == other.x && self.y == other.y
    }
}

impl Eq for Affine {}

impl fmt::Debug for Affine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.infinity {
            write!(f, "Affine(infinity)")
        } else {
            write!(f, "Affine({}, {})", self.x, self.y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use field::Field;
    use rand::{SeedableRng, XorShiftRng};

    fn small_curve() -> EllipticCurve {
        let f = Field::new(Uint::from_u64(1009));
        EllipticCurve::new(f.element(2u64), f.element(1u64), f.clone()).unwrap()
    }

    #[test]
    fn serialization_round_trip() {
        let curve = small_curve();
        let mut rng = XorShiftRng::from_seed([0x4e0c8a17, 0xb35d9f62, 0x71a2c4d8, 0x09f6b3e5]);

        for _ in 0..20 {
            let point: Affine = curve.random_point(&mut rng);

            let mut bytes = Vec::new();
            point.write(&mut bytes).unwrap();
            let back = Affine::read(&mut &bytes[..], &curve).unwrap();
            assert_eq!(back, point);
        }

        let identity = Affine::zero(&curve);
        let mut bytes = Vec::new();
        identity.write(&mut bytes).unwrap();
        assert_eq!(bytes, vec![0]);
        assert!(Affine::read(&mut &bytes[..], &curve).unwrap().is_zero());
    }

    #[test]
    fn off_curve_encodings_are_rejected() {
        let curve = small_curve();
        let f = curve.field().clone();

        let mut bytes = vec![4u8];
        f.element(1u64).value().write_be(&mut bytes).unwrap();
        f.element(1u64).value().write_be(&mut bytes).unwrap();

        // (1, 1) does not satisfy y² = x³ + 2x + 1.
        assert!(Affine::read(&mut &bytes[..], &curve).is_err());

        let bogus_tag = vec![9u8];
        assert!(Affine::read(&mut &bogus_tag[..], &curve).is_err());
    }
}
