//! Wire packages for out-of-band transport
//!
//! Participants and secret shares are plain byte containers on the wire,
//! encoded with `bitcode`. Decoding back into curve types validates every
//! point and scalar.

use bitcode::{Decode, Encode};
use frost_core::keys::dkg::round1;
use frost_core::keys::SigningShare;
use frostgen_core::{Curve, ParticipantIndex};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::{DkgError, DkgResult};
use crate::exchange::SecretShare;
use crate::participant::{Commitment, Participant};

/// Encoded round-one commitment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum PackageCommitment {
    /// Serialized `frost` round-one package
    Polynomial(Vec<u8>),
    /// Compressed `G · a_i`
    Constant(Vec<u8>),
}

/// Public material of one participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ParticipantPackage {
    /// Protocol version
    pub version: u8,

    /// Participant index
    pub index: ParticipantIndex,

    /// Commitments and, for polynomial rounds, the proof of knowledge
    pub commitment: PackageCommitment,
}

impl ParticipantPackage {
    /// Current protocol version
    pub const VERSION: u8 = 2;

    /// Encode a participant's public material
    pub fn from_participant<C: Curve>(participant: &Participant<C>) -> DkgResult<Self> {
        let commitment = match participant.commitment() {
            Commitment::Polynomial(package) => PackageCommitment::Polynomial(
                package
                    .serialize()
                    .map_err(|e| DkgError::Serialization(e.to_string()))?,
            ),
            Commitment::Constant(key) => PackageCommitment::Constant(
                key.serialize()
                    .map_err(|e| DkgError::Serialization(e.to_string()))?,
            ),
        };

        Ok(Self {
            version: Self::VERSION,
            index: participant.index(),
            commitment,
        })
    }

    /// Decode into a participant handle
    ///
    /// Only checks encodings; the proof itself is checked during the
    /// exchange.
    pub fn into_participant<C: Curve>(&self) -> DkgResult<Participant<C>> {
        check_version(self.version, Self::VERSION)?;

        let commitment = match &self.commitment {
            PackageCommitment::Polynomial(bytes) => Commitment::Polynomial(
                round1::Package::deserialize(bytes)
                    .map_err(|e| DkgError::Deserialization(e.to_string()))?,
            ),
            PackageCommitment::Constant(bytes) => Commitment::Constant(C::decode_point(bytes)?),
        };

        Ok(Participant::from_parts(self.index, commitment))
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> DkgResult<Self> {
        Ok(bitcode::decode(bytes)?)
    }
}

/// One secret share in transit
#[derive(Clone, Serialize, Deserialize, Encode, Decode)]
pub struct SecretSharePackage {
    /// Protocol version
    pub version: u8,

    /// Sender's participant index
    pub sender: ParticipantIndex,

    /// Recipient's participant index
    pub receiver: ParticipantIndex,

    /// Big-endian share scalar
    pub value: Vec<u8>,
}

impl SecretSharePackage {
    /// Current protocol version
    pub const VERSION: u8 = 1;

    /// Encode a share
    pub fn from_share<C: Curve>(share: &SecretShare<C>) -> Self {
        Self {
            version: Self::VERSION,
            sender: share.sender(),
            receiver: share.receiver(),
            value: share.signing_share().serialize(),
        }
    }

    /// Decode into a share
    pub fn into_share<C: Curve>(&self) -> DkgResult<SecretShare<C>> {
        check_version(self.version, Self::VERSION)?;
        let value = SigningShare::deserialize(&self.value)
            .map_err(|e| DkgError::Deserialization(e.to_string()))?;
        Ok(SecretShare::from_signing_share(
            self.sender,
            self.receiver,
            value,
        ))
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> DkgResult<Self> {
        Ok(bitcode::decode(bytes)?)
    }
}

impl std::fmt::Debug for SecretSharePackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretSharePackage")
            .field("version", &self.version)
            .field("sender", &self.sender)
            .field("receiver", &self.receiver)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl Drop for SecretSharePackage {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

fn check_version(version: u8, expected: u8) -> DkgResult<()> {
    if version != expected {
        return Err(DkgError::Deserialization(format!(
            "unsupported package version {}",
            version
        )));
    }
    Ok(())
}
