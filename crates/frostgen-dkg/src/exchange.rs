//! Pairwise secret-share computation
//!
//! For every ordered pair (i, j) participant i owes participant j the
//! scalar `f_i(j)`. Before producing anything, the caller checks that the
//! other participants form exactly the expected set; `frost-core` then
//! checks each one's proof of knowledge while computing the shares.

use std::collections::BTreeMap;

use frost_core::keys::dkg::{self, round1, round2};
use frost_core::keys::SigningShare;
use frostgen_core::{Curve, ParticipantIndex, ThresholdParams};
use tracing::debug;

use crate::error::{DkgError, DkgResult};
use crate::participant::{identifier, index_of, Coefficients, Commitment, Participant, Secret};

/// Share `f_sender(receiver)` in transit from sender to receiver
#[derive(Clone)]
pub struct SecretShare<C: Curve> {
    sender: ParticipantIndex,
    receiver: ParticipantIndex,
    package: round2::Package<C>,
}

impl<C: Curve> SecretShare<C> {
    /// Create a share
    pub fn new(
        sender: ParticipantIndex,
        receiver: ParticipantIndex,
        package: round2::Package<C>,
    ) -> Self {
        Self {
            sender,
            receiver,
            package,
        }
    }

    /// Wrap a bare signing share
    pub fn from_signing_share(
        sender: ParticipantIndex,
        receiver: ParticipantIndex,
        share: SigningShare<C>,
    ) -> Self {
        Self::new(sender, receiver, round2::Package::new(share))
    }

    /// Index of the participant that computed the share
    pub fn sender(&self) -> ParticipantIndex {
        self.sender
    }

    /// Index of the participant the share is addressed to
    pub fn receiver(&self) -> ParticipantIndex {
        self.receiver
    }

    /// The `frost` round-two package carrying the share
    pub fn package(&self) -> &round2::Package<C> {
        &self.package
    }

    /// The secret scalar
    pub fn signing_share(&self) -> &SigningShare<C> {
        self.package.signing_share()
    }
}

impl<C: Curve> std::fmt::Debug for SecretShare<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretShare")
            .field("sender", &self.sender)
            .field("receiver", &self.receiver)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

pub(crate) enum ExchangeSecret<C: Curve> {
    Polynomial(round2::SecretPackage<C>),
    Constant(SigningShare<C>),
}

/// Intermediate state of one participant between exchange and aggregation
///
/// Consumed by [`crate::aggregate::derive_key_pair`].
pub struct ShareExchangeState<C: Curve> {
    pub(crate) index: ParticipantIndex,
    pub(crate) params: ThresholdParams,
    pub(crate) secret: ExchangeSecret<C>,
    /// Commitments of every other participant in the round
    pub(crate) commitments: BTreeMap<ParticipantIndex, Commitment<C>>,
}

impl<C: Curve> ShareExchangeState<C> {
    /// Index of the participant this state belongs to
    pub fn index(&self) -> ParticipantIndex {
        self.index
    }

    /// Participants whose commitments were accepted, self included
    pub fn verified_participants(&self) -> Vec<ParticipantIndex> {
        let mut indices: Vec<_> = self.commitments.keys().copied().collect();
        indices.push(self.index);
        indices.sort_unstable();
        indices
    }

    /// Round-one packages of the other participants, keyed for `frost-core`
    pub(crate) fn round1_packages(
        &self,
    ) -> DkgResult<BTreeMap<frost_core::Identifier<C>, round1::Package<C>>> {
        round1_packages(&self.commitments)
    }
}

impl<C: Curve> std::fmt::Debug for ShareExchangeState<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareExchangeState")
            .field("index", &self.index)
            .field("params", &self.params)
            .field("secret", &"[REDACTED]")
            .field("peers", &self.commitments.len())
            .finish()
    }
}

/// Output of [`exchange_shares`]
#[derive(Debug)]
pub struct ShareExchange<C: Curve> {
    /// The caller's own state, kept until aggregation
    pub state: ShareExchangeState<C>,
    /// Outgoing shares in ascending receiver order
    pub their_shares: Vec<SecretShare<C>>,
}

/// Verify the other participants and compute the caller's outgoing shares
pub fn exchange_shares<C: Curve>(
    participant: &Participant<C>,
    coefficients: Coefficients<C>,
    other_participants: &[&Participant<C>],
    params: &ThresholdParams,
) -> DkgResult<ShareExchange<C>> {
    let index = participant.index();

    if coefficients.index() != index {
        return Err(DkgError::InvalidParticipants(format!(
            "coefficients of participant {} handed to participant {}",
            coefficients.index(),
            index
        )));
    }
    participant.verify(params)?;

    let expected_others = params.participants() as usize - 1;
    if other_participants.len() != expected_others {
        return Err(DkgError::InvalidParticipants(format!(
            "participant {} expected {} other participants, got {}",
            index,
            expected_others,
            other_participants.len()
        )));
    }

    let mut commitments = BTreeMap::new();
    for other in other_participants {
        if other.index() == index {
            return Err(DkgError::InvalidParticipants(format!(
                "participant {} listed among its own peers",
                index
            )));
        }

        other.verify(params)?;

        if commitments
            .insert(other.index(), other.commitment().clone())
            .is_some()
        {
            return Err(DkgError::InvalidParticipants(format!(
                "participant {} listed twice",
                other.index()
            )));
        }
    }

    let (secret, mut their_shares) = match coefficients.secret {
        Secret::Polynomial(secret_package) => {
            let (round2_secret, outgoing) =
                dkg::part2(secret_package, &round1_packages(&commitments)?)
                    .map_err(|e| DkgError::from_frost(e, index, params))?;

            let shares = outgoing
                .into_iter()
                .map(|(id, package)| {
                    let receiver = index_of(&id, params).ok_or_else(|| {
                        DkgError::InvalidParticipants(format!(
                            "participant {} produced a share for an unknown identifier",
                            index
                        ))
                    })?;
                    Ok(SecretShare::new(index, receiver, package))
                })
                .collect::<DkgResult<Vec<_>>>()?;

            (ExchangeSecret::Polynomial(round2_secret), shares)
        }
        Secret::Constant(share) => {
            // f_i(j) = a_i for every j
            let shares = commitments
                .keys()
                .map(|&receiver| SecretShare::from_signing_share(index, receiver, share.clone()))
                .collect();

            (ExchangeSecret::Constant(share), shares)
        }
    };
    their_shares.sort_by_key(|share| share.receiver());

    debug!(
        index,
        shares = their_shares.len(),
        "Verified peers and computed outgoing shares"
    );

    Ok(ShareExchange {
        state: ShareExchangeState {
            index,
            params: *params,
            secret,
            commitments,
        },
        their_shares,
    })
}

fn round1_packages<C: Curve>(
    commitments: &BTreeMap<ParticipantIndex, Commitment<C>>,
) -> DkgResult<BTreeMap<frost_core::Identifier<C>, round1::Package<C>>> {
    commitments
        .iter()
        .map(|(&index, commitment)| match commitment {
            Commitment::Polynomial(package) => Ok((identifier::<C>(index)?, package.clone())),
            Commitment::Constant(_) => Err(DkgError::InvalidParticipants(format!(
                "participant {} has no polynomial commitment",
                index
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use frostgen_core::Secp256k1;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn round(
        n: u16,
        t: u16,
        seed: u64,
    ) -> (
        ThresholdParams,
        Vec<Participant<Secp256k1>>,
        Vec<Coefficients<Secp256k1>>,
    ) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let params = ThresholdParams::new(n, t).unwrap();
        let (participants, coefficients) = params
            .indices()
            .map(|i| Participant::create(i, &params, &mut rng).unwrap())
            .unzip();
        (params, participants, coefficients)
    }

    fn others<C: Curve>(participants: &[Participant<C>], skip: usize) -> Vec<&Participant<C>> {
        participants
            .iter()
            .enumerate()
            .filter(|(slot, _)| *slot != skip)
            .map(|(_, p)| p)
            .collect()
    }

    #[test]
    fn test_exchange_produces_one_share_per_peer() {
        let (params, participants, mut coefficients) = round(5, 3, 1);

        let peers = others(&participants, 2);
        let exchange =
            exchange_shares(&participants[2], coefficients.remove(2), &peers, &params).unwrap();

        let receivers: Vec<_> = exchange.their_shares.iter().map(|s| s.receiver()).collect();
        assert_eq!(receivers, vec![1, 2, 4, 5]);
        assert!(exchange.their_shares.iter().all(|s| s.sender() == 3));
        assert_eq!(exchange.state.index(), 3);
        assert_eq!(exchange.state.verified_participants(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_constant_round_sends_same_share_to_everyone() {
        let (params, participants, mut coefficients) = round(3, 1, 2);

        let peers = others(&participants, 0);
        let exchange =
            exchange_shares(&participants[0], coefficients.remove(0), &peers, &params).unwrap();

        assert_eq!(exchange.their_shares.len(), 2);
        assert_eq!(
            exchange.their_shares[0].signing_share().serialize(),
            exchange.their_shares[1].signing_share().serialize()
        );
    }

    #[test]
    fn test_exchange_rejects_incomplete_peer_set() {
        let (params, participants, mut coefficients) = round(3, 2, 3);

        let result = exchange_shares(
            &participants[0],
            coefficients.remove(0),
            &[&participants[1]],
            &params,
        );
        assert!(matches!(result, Err(DkgError::InvalidParticipants(_))));
    }

    #[test]
    fn test_exchange_rejects_self_and_duplicates() {
        let (params, participants, mut coefficients) = round(3, 2, 4);

        let with_self = [&participants[0], &participants[1]];
        let result = exchange_shares(&participants[0], coefficients.remove(0), &with_self, &params);
        assert!(matches!(result, Err(DkgError::InvalidParticipants(_))));

        let duplicated = [&participants[0], &participants[0]];
        let result =
            exchange_shares(&participants[1], coefficients.remove(0), &duplicated, &params);
        assert!(matches!(result, Err(DkgError::InvalidParticipants(_))));
    }

    #[test]
    fn test_exchange_rejects_replayed_commitment() {
        let (params, participants, mut coefficients) = round(3, 2, 5);

        // Participant 3's package replayed under index 2: the proof is bound
        // to the sender's identifier
        let replayed = Participant::from_parts(2, participants[2].commitment().clone());
        let peers = [&replayed, &participants[2]];
        let result = exchange_shares(&participants[0], coefficients.remove(0), &peers, &params);
        assert!(matches!(
            result,
            Err(DkgError::ProofOfKnowledge { participant: 2 })
        ));
    }

    #[test]
    fn test_exchange_rejects_foreign_coefficients() {
        let (params, participants, mut coefficients) = round(3, 2, 6);

        let peers = others(&participants, 0);
        let result = exchange_shares(&participants[0], coefficients.remove(1), &peers, &params);
        assert!(matches!(result, Err(DkgError::InvalidParticipants(_))));
    }

    #[test]
    fn test_share_debug_is_redacted() {
        let (params, participants, mut coefficients) = round(2, 2, 7);
        let peers = others(&participants, 0);
        let exchange =
            exchange_shares(&participants[0], coefficients.remove(0), &peers, &params).unwrap();

        let rendered = format!("{:?}", exchange.their_shares[0]);
        assert!(rendered.contains("REDACTED"));
        assert!(rendered.contains("receiver: 2"));
    }
}
