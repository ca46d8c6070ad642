//! The protocols against the NIST P-256 parameters.

use hasse::{Affine, CurvePoint, Ecdsa, ElGamal, EllipticCurve, Field, U512};

use rand::{SeedableRng, XorShiftRng};

const P: &str = "0xffffffff00000001000000000000000000000000ffffffffffffffffffffffff";
const B: &str = "0x5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b";
const GX: &str = "0x6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296";
const GY: &str = "0x4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5";
const N: &str = "0xffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551";

fn p256() -> (EllipticCurve, Affine, U512) {
    let p: U512 = P.parse().unwrap();
    let field = Field::new(p);

    // a = p - 3
    let a = field.element(p - U512::from_u64(3));
    let b = field.element(B.parse::<U512>().unwrap());
    let curve = EllipticCurve::new(a, b, field.clone()).unwrap();

    let generator: Affine = curve
        .point(
            field.element(GX.parse::<U512>().unwrap()),
            field.element(GY.parse::<U512>().unwrap()),
        )
        .expect("the standard generator lies on the curve");

    (curve, generator, N.parse().unwrap())
}

fn seeded_rng() -> XorShiftRng {
    XorShiftRng::from_seed([0x0b4e1c2d, 0x5f88ba31, 0xc6a9d7f0, 0x93e25a16])
}

#[test]
fn generator_satisfies_the_curve_equation() {
    let (_, generator, order) = p256();
    assert!(generator.on_curve());

    // Cofactor 1: n·G is the identity.
    assert!(generator.mul(&order).is_zero());
}

#[test]
fn ecdsa_round_trip() {
    let (curve, generator, order) = p256();
    let params = Ecdsa::new(curve, generator, order, U512::one());

    let mut rng = seeded_rng();
    let keys = params.generate_keys(&mut rng);

    let message: U512 = "0x48656c6c6f2c2045434453412100".parse().unwrap();
    let signature = params.sign(&message, &keys.private_key, &mut rng);

    assert!(params.verify(&message, &keys.public_key, &signature));

    let other: U512 = "0x48656c6c6f2c2045434453412101".parse().unwrap();
    assert!(!params.verify(&other, &keys.public_key, &signature));
}

#[test]
fn elgamal_round_trip() {
    let (curve, generator, order) = p256();
    let elgamal = ElGamal::new(curve, generator, order);

    let mut rng = seeded_rng();
    let keys = elgamal.generate_keys(&mut rng);

    let message: U512 = "0xfff12341abcbffbbbe".parse().unwrap();
    let ciphertext = elgamal
        .encrypt(&message, &keys.public_key, &mut rng)
        .expect("a 72-bit message fits under the 128-bit split");
    assert_eq!(elgamal.decrypt(&ciphertext, &keys.private_key), message);
}

#[test]
fn elgamal_hashed_round_trip() {
    let (curve, generator, order) = p256();
    let elgamal = ElGamal::new(curve, generator, order);

    let mut rng = seeded_rng();
    let keys = elgamal.generate_keys(&mut rng);

    let message: U512 = "0xfff12341abcbffbbbe".parse().unwrap();
    let ciphertext = elgamal.encrypt_hashed(
        &message,
        &keys.public_key,
        hasse::crypto::blake2_point_hash,
        &mut rng,
    );
    assert_eq!(
        elgamal.decrypt_hashed(&ciphertext, &keys.private_key, hasse::crypto::blake2_point_hash),
        message
    );
}

/// Counting the points of P-256 reproduces the generator order (the
/// cofactor is 1). The run takes hours, so it is opt-in.
#[test]
#[ignore]
fn point_count_matches_the_published_order() {
    let (curve, _, order) = p256();
    assert_eq!(schoof::points_number(&curve), order);
}
