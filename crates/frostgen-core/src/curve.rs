//! Curve capability interface
//!
//! Backends are FROST ciphersuites. Polynomial commitments, share
//! verification and proofs of knowledge all come from `frost-core`; this
//! trait only adds what the generator needs around them.

use frost_core::keys::SigningShare;
use frost_core::{Ciphersuite, VerifyingKey};

use crate::error::Result;

/// FROST ciphersuite usable by the key generator
pub trait Curve: Ciphersuite + Send + Sync {
    /// Human-readable backend name
    const NAME: &'static str;

    /// Size of a compressed point in bytes (parity prefix + x-coordinate)
    const POINT_SIZE: usize;

    /// `(q + 1) / 2` for the scalar field order q, big-endian, `POINT_SIZE - 1` bytes
    ///
    /// Fixed protocol constant used by the group-key acceptance check.
    const HALF_ORDER: &'static [u8];

    /// Decode a compressed point into a verifying key
    ///
    /// Only the compressed form is accepted. Encodings the underlying
    /// library would also parse, such as other SEC1 tags, are rejected.
    fn decode_point(bytes: &[u8]) -> Result<VerifyingKey<Self>>;

    /// `a + b` in the scalar field
    ///
    /// `frost-core` keeps its scalars private. Rounds with a threshold of
    /// one sum whole secrets instead of evaluating polynomials, and need
    /// this.
    fn add_signing_shares(
        a: &SigningShare<Self>,
        b: &SigningShare<Self>,
    ) -> Result<SigningShare<Self>>;
}
