//! ECDSA over a caller-supplied curve and generator.
//!
//! Messages are already-reduced scalars; hashing them down to a scalar is
//! the caller's concern. Signing loops until both signature halves are
//! non-zero; verification is a plain boolean.

use curve::{Affine, CurvePoint, EllipticCurve};
use field::{Field, Uint};

use rand::Rng;
use std::io;

/// ECDSA domain parameters: a curve, a generator of prime order n, and
/// the cofactor h = #E / n.
pub struct Ecdsa {
    curve: EllipticCurve,
    generator: Affine,
    order: Uint,
    cofactor: Uint,
}

/// A key pair: Q = d·G.
pub struct Keys {
    pub private_key: Uint,
    pub public_key: Affine,
}

/// A signature (r, s), both non-zero and below the generator order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub r: Uint,
    pub s: Uint,
}

impl Signature {
    /// Writes r then s, big-endian. No DER framing; callers may layer it.
    pub fn write<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        self.r.write_be(writer)?;
        self.s.write_be(writer)
    }

    pub fn read<R: io::Read>(reader: &mut R) -> io::Result<Self> {
        let mut r = Uint::zero();
        r.read_be(reader)?;
        let mut s = Uint::zero();
        s.read_be(reader)?;

        Ok(Signature { r, s })
    }
}

impl Ecdsa {
    /// Wraps caller-supplied domain parameters. The generator must have
    /// order `order` on `curve`; that contract is not re-verified here.
    pub fn new(curve: EllipticCurve, generator: Affine, order: Uint, cofactor: Uint) -> Self {
        Ecdsa {
            curve,
            generator,
            order,
            cofactor,
        }
    }

    /// Searches random curves over F_p for one whose group has a large
    /// prime-order subgroup, and derives a generator of it.
    ///
    /// A candidate is accepted when the largest prime divisor n of the
    /// point count has more than `security_bits` bits, differs from p
    /// (anomalous curves leak discrete logs), and does not divide
    /// p^k - 1 for k < 20 (small embedding degrees enable pairing
    /// attacks).
    pub fn generate<R: Rng>(field_order: &Uint, security_bits: u32, rng: &mut R) -> Self {
        let field = Field::new(*field_order);

        loop {
            let a = field.random_element(rng);
            let b = field.random_element(rng);

            let candidate = match EllipticCurve::new(a, b, field.clone()) {
                Ok(candidate) => candidate,
                Err(_) => continue,
            };

            let total = schoof::points_number(&candidate);
            let order = largest_prime_divisor(total);

            if order == *field_order {
                continue;
            }

            if order.num_bits() <= security_bits {
                continue;
            }

            if embedding_degree_below(field_order, &order, 20) {
                continue;
            }

            let cofactor = total / order;
            let mut generator: Affine = candidate.random_point::<Affine, R>(rng).mul(&cofactor);

            while generator.is_zero() {
                generator = candidate.random_point::<Affine, R>(rng).mul(&cofactor);
            }

            return Ecdsa::new(candidate, generator, order, cofactor);
        }
    }

    pub fn curve(&self) -> &EllipticCurve {
        &self.curve
    }

    pub fn generator(&self) -> &Affine {
        &self.generator
    }

    pub fn order(&self) -> &Uint {
        &self.order
    }

    pub fn cofactor(&self) -> &Uint {
        &self.cofactor
    }

    pub fn generate_keys<R: Rng>(&self, rng: &mut R) -> Keys {
        let private_key = random_nonzero_below(&self.order, rng);
        let public_key = self.generator.mul(&private_key);

        Keys {
            private_key,
            public_key,
        }
    }

    /// Signs a message scalar, retrying the nonce until r ≠ 0 and s ≠ 0.
    pub fn sign<R: Rng>(&self, message: &Uint, private_key: &Uint, rng: &mut R) -> Signature {
        let scalar_field = Field::new(self.order);

        loop {
            let nonce = random_nonzero_below(&self.order, rng);
            let point = self.generator.mul(&nonce);

            let r = match point.affine_x() {
                Some(x) => *x.value() % self.order,
                None => continue,
            };

            if r.is_zero() {
                continue;
            }

            // s = k⁻¹ (m + d·r) mod n
            let numerator = scalar_field.element(*message)
                + &(scalar_field.element(*private_key) * &scalar_field.element(r));
            let nonce_inverse = scalar_field
                .element(nonce)
                .invert()
                .expect("a non-zero nonce below the prime order is invertible");
            let s = *(nonce_inverse * &numerator).value();

            if s.is_zero() {
                continue;
            }

            return Signature { r, s };
        }
    }

    /// Checks a signature; malformed (r, s) fail rather than error.
    pub fn verify(&self, message: &Uint, public_key: &Affine, signature: &Signature) -> bool {
        let Signature { r, s } = signature;

        if r.is_zero() || s.is_zero() {
            return false;
        }

        if *r >= self.order || *s >= self.order {
            return false;
        }

        let scalar_field = Field::new(self.order);
        let w = match scalar_field.element(*s).invert() {
            Ok(w) => w,
            Err(_) => return false,
        };

        let u1 = scalar_field.element(*message) * &w;
        let u2 = scalar_field.element(*r) * &w;

        let point = self
            .generator
            .mul(u1.value())
            .add(&public_key.mul(u2.value()));

        match point.affine_x() {
            Some(x) => *x.value() % self.order == *r,
            None => false,
        }
    }
}

/// Uniform sample from [1, bound).
fn random_nonzero_below<R: Rng>(bound: &Uint, rng: &mut R) -> Uint {
    rng.gen::<Uint>() % (*bound - Uint::one()) + Uint::one()
}

/// Largest prime divisor by trial division; the co-divisor left above the
/// square root is prime and wins when present.
fn largest_prime_divisor(mut value: Uint) -> Uint {
    let one = Uint::one();
    let mut result = one;
    let mut divisor = Uint::from_u64(2);

    while divisor * divisor <= value {
        while (value % divisor).is_zero() {
            value = value / divisor;
            result = divisor;
        }

        divisor += one;
    }

    if value > one {
        value
    } else {
        result
    }
}

/// True when `order` divides p^k - 1 for some k below `limit`, computed
/// modulo `order` so no power overflows.
fn embedding_degree_below(p: &Uint, order: &Uint, limit: u32) -> bool {
    let one = Uint::one();
    let mut power = *p % *order;

    for _ in 1..limit {
        if power == one {
            return true;
        }

        power = (power * (*p % *order)) % *order;
    }

    false
}
