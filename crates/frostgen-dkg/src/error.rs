//! Error types for the key generation ceremony

use frost_core::Error as FrostError;
use frostgen_core::{CoreError, Curve, ParticipantIndex, ThresholdParams};
use thiserror::Error;

use crate::participant::index_of;

/// Result type for ceremony operations
pub type DkgResult<T> = std::result::Result<T, DkgError>;

/// Errors that can occur during key generation
#[derive(Debug, Error)]
pub enum DkgError {
    /// Invalid (n, t) pair or participant index
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A received share does not match its sender's commitments
    #[error("Share from participant {sender} failed verification at participant {receiver}")]
    ShareVerification {
        sender: ParticipantIndex,
        receiver: ParticipantIndex,
    },

    /// A participant's proof of knowledge did not verify
    #[error("Proof of knowledge from participant {participant} failed verification")]
    ProofOfKnowledge { participant: ParticipantIndex },

    /// The set of other participants handed to the exchange is malformed
    #[error("Invalid participant set: {0}")]
    InvalidParticipants(String),

    /// The set of shares handed to aggregation is malformed
    #[error("Invalid share set: {0}")]
    InvalidShares(String),

    /// Participants of one round derived different group keys
    #[error("Group key mismatch between participants {first} and {other}")]
    GroupKeyMismatch {
        first: ParticipantIndex,
        other: ParticipantIndex,
    },

    /// Any other failure reported by `frost-core` during a round
    #[error("FROST protocol error at participant {participant}: {message}")]
    Protocol {
        participant: ParticipantIndex,
        message: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Curve backend error
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl DkgError {
    /// Whether this error invalidates only the current attempt
    ///
    /// Retryable errors discard the round and start a fresh one; all others
    /// stop the generator.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DkgError::ShareVerification { .. }
                | DkgError::ProofOfKnowledge { .. }
                | DkgError::InvalidParticipants(_)
                | DkgError::InvalidShares(_)
                | DkgError::GroupKeyMismatch { .. }
                | DkgError::Protocol { .. }
                | DkgError::Deserialization(_)
                | DkgError::Core(CoreError::InvalidEncoding(_))
        )
    }

    /// Classify an error `frost-core` raised while `participant` ran its part
    ///
    /// Culprits are `frost` identifiers and are mapped back to participant
    /// indices through `params`.
    pub(crate) fn from_frost<C: Curve>(
        error: FrostError<C>,
        participant: ParticipantIndex,
        params: &ThresholdParams,
    ) -> Self {
        let culprit = error.culprit().and_then(|id| index_of(&id, params));

        match (&error, culprit) {
            (FrostError::InvalidSecretShare { .. }, Some(sender)) => DkgError::ShareVerification {
                sender,
                receiver: participant,
            },
            (FrostError::InvalidProofOfKnowledge { .. }, Some(culprit)) => {
                DkgError::ProofOfKnowledge {
                    participant: culprit,
                }
            }
            (FrostError::InvalidMinSigners | FrostError::InvalidMaxSigners, _) => {
                DkgError::Configuration(error.to_string())
            }
            (
                FrostError::IncorrectNumberOfPackages
                | FrostError::PackageNotFound
                | FrostError::IncorrectPackage,
                _,
            ) => DkgError::InvalidShares(format!("participant {}: {}", participant, error)),
            _ => DkgError::Protocol {
                participant,
                message: error.to_string(),
            },
        }
    }
}

impl From<bitcode::Error> for DkgError {
    fn from(e: bitcode::Error) -> Self {
        DkgError::Deserialization(e.to_string())
    }
}

impl From<serde_json::Error> for DkgError {
    fn from(e: serde_json::Error) -> Self {
        DkgError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_core::Identifier;
    use frostgen_core::Secp256k1;

    #[test]
    fn test_retry_classification() {
        assert!(DkgError::ShareVerification {
            sender: 1,
            receiver: 2
        }
        .is_retryable());
        assert!(DkgError::ProofOfKnowledge { participant: 3 }.is_retryable());
        assert!(DkgError::Protocol {
            participant: 1,
            message: "identity commitment".into()
        }
        .is_retryable());
        assert!(DkgError::Core(CoreError::InvalidEncoding("bad".into())).is_retryable());

        assert!(!DkgError::Configuration("t > n".into()).is_retryable());
        assert!(!DkgError::Core(CoreError::InvalidParameters {
            threshold: 5,
            participants: 3
        })
        .is_retryable());
        assert!(!DkgError::Serialization("io".into()).is_retryable());
    }

    #[test]
    fn test_frost_culprits_map_to_indices() {
        let params = ThresholdParams::new(4, 2).unwrap();
        let three = Identifier::<Secp256k1>::try_from(3u16).unwrap();

        let error = DkgError::from_frost(
            FrostError::<Secp256k1>::InvalidProofOfKnowledge { culprit: three },
            1,
            &params,
        );
        assert!(matches!(error, DkgError::ProofOfKnowledge { participant: 3 }));

        let error = DkgError::from_frost(FrostError::<Secp256k1>::InvalidMinSigners, 1, &params);
        assert!(matches!(error, DkgError::Configuration(_)));
        assert!(!error.is_retryable());

        let error = DkgError::from_frost(FrostError::<Secp256k1>::IncorrectNumberOfPackages, 2, &params);
        assert!(matches!(error, DkgError::InvalidShares(_)));
    }
}
