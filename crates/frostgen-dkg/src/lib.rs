//! # Frostgen DKG
//!
//! Centrally simulated FROST distributed key generation.
//!
//! All `n` participants live in one process. Each round runs the full
//! ceremony and the round is kept only if its group key passes the
//! acceptance policy, which by default requires the x-coordinate to lie
//! in the lower half of the scalar order.
//!
//! ## Round Structure
//!
//! ```text
//! create (part1)    exchange (part2)            aggregate (part3)
//! ─────────────     ────────────────────────    ──────────────────────────
//! f_i, C_i, PoK ──► verify PoK of peers ──────► Feldman-check f_j(i)
//!                   f_i(j) ── transport ──►     s_i = Σ_j f_j(i)
//!                                               Y   = Σ_j C_{j,0}
//!                                                      │
//!                                       accept(Y)? ────┴──► no: fresh round
//! ```
//!
//! The three parts are `frost-core`'s DKG. With `t = 1` every polynomial is
//! a constant, which `frost-core` does not accept, so those rounds commit to
//! `G · a_i` and check each received share against it directly.
//!
//! Verification failures and rejected keys both discard the round. Only
//! invalid parameters and non-retryable errors stop the generator.

pub mod acceptance;
pub mod aggregate;
pub mod driver;
pub mod error;
pub mod exchange;
pub mod group;
pub mod package;
pub mod participant;
pub mod transport;

pub use acceptance::{group_key_in_lower_half, AcceptancePolicy, LowerHalfX};
pub use aggregate::{derive_key_pair, KeyPair};
pub use driver::{
    attempt_once, AttemptOutcome, GeneratedKeys, KeyGenerator, Rejection, RoundPhase,
};
pub use error::{DkgError, DkgResult};
pub use exchange::{exchange_shares, SecretShare, ShareExchange, ShareExchangeState};
pub use group::FrostGroup;
pub use package::{PackageCommitment, ParticipantPackage, SecretSharePackage};
pub use participant::{Coefficients, Commitment, Participant};
pub use transport::{InProcessTransport, ShareTransport};

pub use frostgen_core::{Curve, Secp256k1, ThresholdParams};
