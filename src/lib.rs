//! Elliptic-curve cryptography over prime fields, from the digits up.
//!
//! The crate is a façade over the workspace layers:
//!
//! - [`uint`] — fixed-width unsigned integers (`U256`, `U512`, `U768`)
//!   with Knuth division and radix-prefixed parsing.
//! - [`field`] — prime fields: modular inverse, powers, Legendre symbols
//!   and Tonelli-Shanks square roots.
//! - [`poly`] — univariate polynomials over a field and their quotient
//!   rings.
//! - [`curve`] — short Weierstrass groups y² = x³ + ax + b in six
//!   coordinate systems behind one trait, with windowed-NAF scalar
//!   multiplication.
//! - [`schoof`] — point counting: division polynomials, Frobenius
//!   endomorphisms and CRT reconstruction of the trace.
//! - [`crypto`] — ECDSA and ElGamal on top of the curve groups.
//!
//! No constant-time guarantees are made anywhere: operations branch and
//! allocate on secret-dependent values, which confines the crate to
//! experimentation and study.

pub use crypto;
pub use curve;
pub use field;
pub use poly;
pub use schoof;
pub use uint;

pub use crypto::{Ciphertext, CryptoError, Ecdsa, ElGamal, Signature};
pub use curve::{
    Affine, Chudnovsky, CurveError, CurvePoint, EllipticCurve, Jacobian, ModifiedJacobian,
    Projective, SimplifiedChudnovsky,
};
pub use field::{Field, FieldElement, FieldError, LegendreSymbol};
pub use poly::{Polynomial, Ring, RingElement};
pub use uint::{BitIterator, ParseUintError, Uint, U256, U512, U768};
