//! ElGamal encryption over a curve group.
//!
//! The standard variant embeds the message into a curve point: the lower
//! half of the x-coordinate carries the message, the upper half is
//! sampled until x lands on the curve. The mask separating the halves
//! depends only on the field modulus and is cached process-wide. The
//! hashed variant skips the embedding and XORs the message with a hash of
//! the shared point.

use crate::CryptoError;
use curve::{Affine, CurvePoint, EllipticCurve};
use field::Uint;

use blake2_rfc::blake2b::Blake2b;
use lazy_static::lazy_static;
use rand::Rng;
use std::collections::HashMap;
use std::io;
use std::sync::RwLock;

/// Domain separator of the built-in point hash.
pub const ELGAMAL_HASH_PERSONALIZATION: &'static [u8; 16] = b"hasse_elgamal_h_";

/// An encrypted point message: left = M + k·Q, right = k·G.
#[derive(Clone, PartialEq)]
pub struct Ciphertext {
    pub left: Affine,
    pub right: Affine,
}

impl Ciphertext {
    /// Homomorphic addition: the sum encrypts the sum of the messages
    /// (under the same public key).
    pub fn add(&self, other: &Ciphertext) -> Ciphertext {
        Ciphertext {
            left: self.left.add(&other.left),
            right: self.right.add(&other.right),
        }
    }

    pub fn write<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        self.left.write(writer)?;
        self.right.write(writer)
    }

    pub fn read<R: io::Read>(reader: &mut R, curve: &EllipticCurve) -> io::Result<Self> {
        let left = Affine::read(reader, curve)?;
        let right = Affine::read(reader, curve)?;

        Ok(Ciphertext { left, right })
    }
}

/// A hashed-variant ciphertext: left = m ⊕ H(k·Q), right = k·G.
#[derive(Clone, PartialEq)]
pub struct HashedCiphertext {
    pub left: Uint,
    pub right: Affine,
}

/// A key pair: Q = d·G.
pub struct ElGamalKeys {
    pub private_key: Uint,
    pub public_key: Affine,
}

/// ElGamal over `curve` with a generator of the given order.
pub struct ElGamal {
    curve: EllipticCurve,
    generator: Affine,
    order: Uint,
}

lazy_static! {
    /// High-half masks keyed by the field modulus.
    static ref ZERO_MASKS: RwLock<HashMap<Uint, Uint>> = RwLock::new(HashMap::new());
}

/// The mask selecting the bits at and above ⌊log₂ p⌋ / 2.
fn zero_mask(modulus: &Uint) -> Uint {
    {
        let cache = ZERO_MASKS.read().expect("zero mask cache poisoned");

        if let Some(mask) = cache.get(modulus) {
            return *mask;
        }
    }

    let split = modulus.num_bits() >> 1;
    let mask = (Uint::max_value() >> split) << split;

    let mut cache = ZERO_MASKS.write().expect("zero mask cache poisoned");
    *cache.entry(*modulus).or_insert(mask)
}

impl ElGamal {
    pub fn new(curve: EllipticCurve, generator: Affine, order: Uint) -> Self {
        ElGamal {
            curve,
            generator,
            order,
        }
    }

    pub fn generate_keys<R: Rng>(&self, rng: &mut R) -> ElGamalKeys {
        let private_key = rng.gen::<Uint>() % (self.order - Uint::one()) + Uint::one();
        let public_key = self.generator.mul(&private_key);

        ElGamalKeys {
            private_key,
            public_key,
        }
    }

    /// Encrypts a message scalar by embedding it into a curve point.
    /// Fails with `InvalidInput` when the message does not fit below the
    /// split point, and with `BudgetExhausted` when no x-coordinate lands
    /// on the curve within the sampling budget.
    pub fn encrypt<R: Rng>(
        &self,
        message: &Uint,
        public_key: &Affine,
        rng: &mut R,
    ) -> Result<Ciphertext, CryptoError> {
        let embedded = self.map_to_curve(message, rng)?;
        Ok(self.encrypt_point(&embedded, public_key, rng))
    }

    /// Encrypts a point message: (M + k·Q, k·G) for a fresh k.
    pub fn encrypt_point<R: Rng>(
        &self,
        message: &Affine,
        public_key: &Affine,
        rng: &mut R,
    ) -> Ciphertext {
        let k = rng.gen::<Uint>() % (self.order - Uint::one()) + Uint::one();
        let right = self.generator.mul(&k);
        let left = message.add(&public_key.mul(&k));

        Ciphertext { left, right }
    }

    /// Recovers the embedded message scalar.
    pub fn decrypt(&self, ciphertext: &Ciphertext, private_key: &Uint) -> Uint {
        self.recover(&self.decrypt_point(ciphertext, private_key))
    }

    /// Recovers the message point: left - d·right.
    pub fn decrypt_point(&self, ciphertext: &Ciphertext, private_key: &Uint) -> Affine {
        ciphertext.left.sub(&ciphertext.right.mul(private_key))
    }

    /// Hashed variant: the message XORs with H(k·Q) instead of riding a
    /// curve point; H is caller-supplied, `blake2_point_hash` by default.
    pub fn encrypt_hashed<R: Rng, H: Fn(&Affine) -> Uint>(
        &self,
        message: &Uint,
        public_key: &Affine,
        hash: H,
        rng: &mut R,
    ) -> HashedCiphertext {
        let k = rng.gen::<Uint>() % (self.order - Uint::one()) + Uint::one();
        let right = self.generator.mul(&k);
        let left = *message ^ hash(&public_key.mul(&k));

        HashedCiphertext { left, right }
    }

    pub fn decrypt_hashed<H: Fn(&Affine) -> Uint>(
        &self,
        ciphertext: &HashedCiphertext,
        private_key: &Uint,
        hash: H,
    ) -> Uint {
        ciphertext.left ^ hash(&ciphertext.right.mul(private_key))
    }

    /// Embeds a message into an x-coordinate: random upper half, message
    /// in the lower half, resampled until x³ + ax + b is a square. For a
    /// large field this takes a couple of iterations.
    fn map_to_curve<R: Rng>(&self, message: &Uint, rng: &mut R) -> Result<Affine, CryptoError> {
        const ATTEMPTS: usize = 1000;

        let field = self.curve.field();
        let mask = zero_mask(field.modulus());

        if !(*message & mask).is_zero() {
            return Err(CryptoError::InvalidInput(
                "message does not fit below the embedding split",
            ));
        }

        for _ in 0..ATTEMPTS {
            let mut x = rng.gen::<Uint>() % *field.modulus();
            x &= mask;
            x |= *message;

            // Re-installing the low bits can push x past the modulus, and
            // a reduced x would decrypt to different low bits.
            if x >= *field.modulus() {
                continue;
            }

            if let Some(point) = self.curve.point_with_x(field.element(x)) {
                return Ok(point);
            }
        }

        Err(CryptoError::BudgetExhausted)
    }

    /// Strips the random upper half off a decrypted point.
    fn recover(&self, message: &Affine) -> Uint {
        let mask = zero_mask(self.curve.field().modulus());

        match message.affine_x() {
            Some(x) => {
                let x = *x.value();
                x ^ (x & mask)
            }
            None => Uint::zero(),
        }
    }
}

/// The built-in point hash: blake2b over the affine coordinates under a
/// fixed domain-separation prefix.
pub fn blake2_point_hash(point: &Affine) -> Uint {
    let mut state = Blake2b::new(64);
    state.update(ELGAMAL_HASH_PERSONALIZATION);

    if let Some((x, y)) = point.to_affine() {
        let mut buffer = Vec::with_capacity(128);
        x.value()
            .write_be(&mut buffer)
            .expect("writing to a Vec cannot fail");
        y.value()
            .write_be(&mut buffer)
            .expect("writing to a Vec cannot fail");
        state.update(&buffer);
    }

    let digest = state.finalize();
    let mut result = Uint::zero();
    result
        .read_le(&mut digest.as_bytes())
        .expect("blake2b-512 digest fills the working width");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use field::Field;
    use rand::{SeedableRng, XorShiftRng};

    fn seeded_rng() -> XorShiftRng {
        XorShiftRng::from_seed([0xd1b0a583, 0x93f1c2e7, 0x4a86d05c, 0x6e2b71f9])
    }

    /// A small deterministic group: points of y² = x³ + 2x + 1 over
    /// F_1009, with the full group order as the working order.
    fn setup() -> ElGamal {
        let f = Field::new(Uint::from_u64(1009));
        let e = EllipticCurve::new(f.element(2u64), f.element(1u64), f.clone()).unwrap();
        let order = schoof::points_number(&e);

        let mut rng = seeded_rng();
        let generator: Affine = e.random_point(&mut rng);
        ElGamal::new(e, generator, order)
    }

    #[test]
    fn zero_mask_splits_at_half_bit_length() {
        // 1009 has 10 bits, so the low 5 bits carry messages.
        let mask = zero_mask(&Uint::from_u64(1009));
        assert!((Uint::from_u64(31) & mask).is_zero());
        assert_eq!(Uint::from_u64(32) & mask, Uint::from_u64(32));
    }

    #[test]
    fn standard_round_trip() {
        let elgamal = setup();
        let mut rng = seeded_rng();
        let keys = elgamal.generate_keys(&mut rng);

        for message in [0u64, 1, 17, 31].iter() {
            let message = Uint::from_u64(*message);
            let ciphertext = elgamal.encrypt(&message, &keys.public_key, &mut rng).unwrap();
            assert_eq!(elgamal.decrypt(&ciphertext, &keys.private_key), message);
        }
    }

    #[test]
    fn oversized_messages_are_rejected() {
        let elgamal = setup();
        let mut rng = seeded_rng();
        let keys = elgamal.generate_keys(&mut rng);

        match elgamal.encrypt(&Uint::from_u64(32), &keys.public_key, &mut rng) {
            Err(CryptoError::InvalidInput(_)) => {}
            _ => panic!("oversized message must be rejected"),
        }
    }

    #[test]
    fn ciphertexts_add_homomorphically() {
        let elgamal = setup();
        let mut rng = seeded_rng();
        let keys = elgamal.generate_keys(&mut rng);

        let m1: Affine = elgamal.curve.random_point(&mut rng);
        let m2: Affine = elgamal.curve.random_point(&mut rng);

        let c1 = elgamal.encrypt_point(&m1, &keys.public_key, &mut rng);
        let c2 = elgamal.encrypt_point(&m2, &keys.public_key, &mut rng);

        let sum = c1.add(&c2);
        assert_eq!(
            elgamal.decrypt_point(&sum, &keys.private_key),
            m1.add(&m2)
        );
    }

    #[test]
    fn ciphertext_serialization_round_trip() {
        let elgamal = setup();
        let mut rng = seeded_rng();
        let keys = elgamal.generate_keys(&mut rng);

        let message: Affine = elgamal.curve.random_point(&mut rng);
        let ciphertext = elgamal.encrypt_point(&message, &keys.public_key, &mut rng);

        let mut bytes = Vec::new();
        ciphertext.write(&mut bytes).unwrap();
        let back = Ciphertext::read(&mut &bytes[..], &elgamal.curve).unwrap();
        assert!(back == ciphertext);
        assert_eq!(
            elgamal.decrypt_point(&back, &keys.private_key),
            message
        );
    }

    #[test]
    fn point_round_trip() {
        let elgamal = setup();
        let mut rng = seeded_rng();
        let keys = elgamal.generate_keys(&mut rng);

        let message: Affine = elgamal.curve.random_point(&mut rng);
        let ciphertext = elgamal.encrypt_point(&message, &keys.public_key, &mut rng);
        assert_eq!(
            elgamal.decrypt_point(&ciphertext, &keys.private_key),
            message
        );
    }

    #[test]
    fn hashed_round_trip() {
        let elgamal = setup();
        let mut rng = seeded_rng();
        let keys = elgamal.generate_keys(&mut rng);

        // No embedding, so the message may use the full width.
        let message: Uint = "0xfff12341abcbffbbbe".parse().unwrap();
        let ciphertext =
            elgamal.encrypt_hashed(&message, &keys.public_key, blake2_point_hash, &mut rng);
        assert_eq!(
            elgamal.decrypt_hashed(&ciphertext, &keys.private_key, blake2_point_hash),
            message
        );
    }

    #[test]
    fn hash_depends_on_the_point() {
        let elgamal = setup();
        let mut rng = seeded_rng();

        let p: Affine = elgamal.curve.random_point(&mut rng);
        let q: Affine = elgamal.curve.random_point(&mut rng);

        if p != q {
            assert_ne!(blake2_point_hash(&p), blake2_point_hash(&q));
        }
    }
}
