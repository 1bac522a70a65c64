//! # FROSTGEN Core
//!
//! Curve backends and threshold parameters for the FROST key generation
//! ceremony.
//!
//! The ceremony itself runs on `frost-core`. A backend is a FROST
//! [`frost_core::Ciphersuite`] extended with the [`Curve`] capabilities the
//! generator needs on top of it:
//!
//! ```text
//! Curve (trait)                 frost-core                 Backends
//! ──────────────────────        ───────────────────        ──────────────────────
//! compressed point layout  ───► dkg::part1/2/3        ◄─── Secp256K1Sha256
//! HALF_ORDER acceptance         keys::KeyPackage            (frost-secp256k1)
//! share addition (t = 1)        keys::reconstruct
//! ```

pub mod curve;
pub mod error;
pub mod params;
pub mod secp256k1;

pub use curve::Curve;
pub use error::{CoreError, Result};
pub use params::{ParticipantIndex, ThresholdParams};
pub use secp256k1::{Secp256K1Sha256, Secp256k1, HALF_Q};

pub use frost_core;
