//! The protocols on top of the curve groups: ECDSA signatures and ElGamal
//! encryption. Thin compositions — the weight is in the layers below.

mod ecdsa;
mod elgamal;

pub use crate::ecdsa::{Ecdsa, Keys, Signature};
pub use crate::elgamal::{
    blake2_point_hash, Ciphertext, ElGamal, ElGamalKeys, HashedCiphertext,
    ELGAMAL_HASH_PERSONALIZATION,
};

use std::error::Error;
use std::fmt;

/// Protocol-level failures callers can recover from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoError {
    /// Caller-supplied data outside the protocol's domain.
    InvalidInput(&'static str),
    /// A bounded sampling loop ran out of budget.
    BudgetExhausted,
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CryptoError::InvalidInput(reason) => write!(f, "invalid input: {}", reason),
            CryptoError::BudgetExhausted => write!(f, "sampling budget exhausted"),
        }
    }
}

impl Error for CryptoError {}
