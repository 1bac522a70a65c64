//! Final key pair derivation
//!
//! Each participant checks every share it received against the sender's
//! commitments, then sums them with its own evaluation:
//!
//! ```text
//! s_i = f_i(i) + Σ_{j≠i} f_j(i)        (secret key share)
//! Y_i = G · s_i                          (public key share)
//! Y   = Σ_j C_{j,0}                      (group public key)
//! ```
//!
//! With `t >= 2` this is `frost-core`'s `part3`. Constant rounds check
//! `G · f_j(i) = C_{j,0}` directly.

use std::collections::{BTreeMap, BTreeSet};

use frost_core::keys::dkg;
use frost_core::keys::{KeyPackage, SigningShare, VerifyingShare};
use frost_core::{SigningKey, VerifyingKey};
use frostgen_core::{Curve, ParticipantIndex, ThresholdParams};
use tracing::debug;
use zeroize::Zeroize;

use crate::error::{DkgError, DkgResult};
use crate::exchange::{ExchangeSecret, SecretShare, ShareExchangeState};
use crate::participant::{identifier, Commitment, Participant};

/// Result of the ceremony for one participant
#[derive(Clone)]
pub struct KeyPair<C: Curve> {
    /// Participant index (1-indexed)
    pub index: ParticipantIndex,
    /// `frost` key package holding the secret key share
    pub key_package: KeyPackage<C>,
    /// Compressed `G · secret_key_share`, safe to publish
    pub public_key_share: Vec<u8>,
    /// Compressed group public key, identical for every participant of the round
    pub group_public_key: Vec<u8>,
}

impl<C: Curve> KeyPair<C> {
    fn from_key_package(
        index: ParticipantIndex,
        key_package: KeyPackage<C>,
        params: &ThresholdParams,
    ) -> DkgResult<Self> {
        let public_key_share = key_package
            .verifying_share()
            .serialize()
            .map_err(|e| DkgError::from_frost(e, index, params))?;
        let group_public_key = key_package
            .verifying_key()
            .serialize()
            .map_err(|e| DkgError::from_frost(e, index, params))?;

        Ok(Self {
            index,
            key_package,
            public_key_share,
            group_public_key,
        })
    }

    /// Secret key share, confidential to this participant
    pub fn secret_key_share(&self) -> &SigningShare<C> {
        self.key_package.signing_share()
    }

    /// Lowercase hex of the big-endian secret key share
    pub fn secret_key_share_hex(&self) -> String {
        let mut bytes = self.secret_key_share().serialize();
        let encoded = hex::encode(&bytes);
        bytes.zeroize();
        encoded
    }

    /// Compressed public key share
    pub fn public_key_share_bytes(&self) -> &[u8] {
        &self.public_key_share
    }

    /// Compressed group public key
    pub fn group_public_key_bytes(&self) -> &[u8] {
        &self.group_public_key
    }
}

impl<C: Curve> std::fmt::Debug for KeyPair<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("index", &self.index)
            .field("secret_key_share", &"[REDACTED]")
            .field("public_key_share", &hex::encode(&self.public_key_share))
            .field("group_public_key", &hex::encode(&self.group_public_key))
            .finish()
    }
}

/// Turn a participant's received share set into its final key pair
///
/// `received_shares` must hold exactly one share from every other
/// participant of the round. A share failing verification against its
/// sender's commitments aborts with [`DkgError::ShareVerification`].
pub fn derive_key_pair<C: Curve>(
    state: ShareExchangeState<C>,
    participant: &Participant<C>,
    received_shares: &[SecretShare<C>],
) -> DkgResult<KeyPair<C>> {
    let index = state.index;

    if participant.index() != index {
        return Err(DkgError::InvalidShares(format!(
            "exchange state of participant {} used for participant {}",
            index,
            participant.index()
        )));
    }

    let expected = state.params.participants() as usize - 1;
    if received_shares.len() != expected {
        return Err(DkgError::InvalidShares(format!(
            "participant {} expected {} shares, got {}",
            index,
            expected,
            received_shares.len()
        )));
    }

    let mut senders = BTreeSet::new();
    for share in received_shares {
        if share.receiver() != index {
            return Err(DkgError::InvalidShares(format!(
                "share from {} addressed to {} delivered to {}",
                share.sender(),
                share.receiver(),
                index
            )));
        }

        if !state.commitments.contains_key(&share.sender()) {
            return Err(DkgError::InvalidShares(format!(
                "participant {} received a share from unexpected sender {}",
                index,
                share.sender()
            )));
        }

        if !senders.insert(share.sender()) {
            return Err(DkgError::InvalidShares(format!(
                "participant {} received two shares from {}",
                index,
                share.sender()
            )));
        }
    }

    let params = state.params;
    let key_package = match &state.secret {
        ExchangeSecret::Polynomial(round2_secret) => {
            let round1_packages = state.round1_packages()?;
            let round2_packages = received_shares
                .iter()
                .map(|share| Ok((identifier::<C>(share.sender())?, share.package().clone())))
                .collect::<DkgResult<BTreeMap<_, _>>>()?;

            let (key_package, _public_key_package) =
                dkg::part3(round2_secret, &round1_packages, &round2_packages)
                    .map_err(|e| DkgError::from_frost(e, index, &params))?;
            key_package
        }
        ExchangeSecret::Constant(own) => {
            aggregate_constant(&state, own, received_shares)?
        }
    };

    let key_pair = KeyPair::from_key_package(index, key_package, &params)?;
    debug!(index, "Derived key pair");
    Ok(key_pair)
}

/// `t = 1`: every share is the sender's whole secret
fn aggregate_constant<C: Curve>(
    state: &ShareExchangeState<C>,
    own: &SigningShare<C>,
    received_shares: &[SecretShare<C>],
) -> DkgResult<KeyPackage<C>> {
    let index = state.index;
    let params = &state.params;
    let frost_error = |e| DkgError::from_frost(e, index, params);

    let mut secret = own.clone();
    for share in received_shares {
        let commitment = match state.commitments.get(&share.sender()) {
            Some(Commitment::Constant(commitment)) => commitment,
            _ => {
                return Err(DkgError::InvalidShares(format!(
                    "participant {} has no constant commitment",
                    share.sender()
                )))
            }
        };

        let image = VerifyingShare::from(share.signing_share().clone())
            .serialize()
            .map_err(frost_error)?;
        if image != commitment.serialize().map_err(frost_error)? {
            return Err(DkgError::ShareVerification {
                sender: share.sender(),
                receiver: index,
            });
        }

        secret = C::add_signing_shares(&secret, share.signing_share())?;
    }

    let mut bytes = secret.serialize();
    let group_secret = SigningKey::<C>::deserialize(&bytes);
    bytes.zeroize();
    let group_public_key = VerifyingKey::from(&group_secret.map_err(frost_error)?);

    Ok(KeyPackage::new(
        identifier::<C>(index)?,
        secret.clone(),
        VerifyingShare::from(secret),
        group_public_key,
        params.threshold(),
    ))
}
