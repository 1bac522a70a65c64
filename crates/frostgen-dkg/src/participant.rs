//! Participants and their round-one secrets
//!
//! With `t >= 2` a participant is a `frost-core` round-one package: Feldman
//! commitments to a random polynomial of degree `t - 1` plus a proof of
//! knowledge of its constant term. `frost-core` refuses `t = 1`, where the
//! polynomial is a bare constant, so those rounds publish `G · a_i` instead.

use frost_core::keys::dkg::{self, round1};
use frost_core::keys::SigningShare;
use frost_core::{Identifier, SigningKey, VerifyingKey};
use frostgen_core::{Curve, ParticipantIndex, ThresholdParams};
use rand::{CryptoRng, RngCore};
use tracing::trace;
use zeroize::Zeroize;

use crate::error::{DkgError, DkgResult};

/// Public round-one material of a participant
#[derive(Debug, Clone, PartialEq)]
pub enum Commitment<C: Curve> {
    /// Feldman commitments and proof of knowledge (`t >= 2`)
    Polynomial(round1::Package<C>),
    /// `G · a_i` for a constant polynomial (`t = 1`)
    Constant(VerifyingKey<C>),
}

/// Public handle of one actor in the ceremony
///
/// Holds only public material and is safe to hand to every other
/// participant.
#[derive(Debug, Clone, PartialEq)]
pub struct Participant<C: Curve> {
    index: ParticipantIndex,
    commitment: Commitment<C>,
}

pub(crate) enum Secret<C: Curve> {
    Polynomial(round1::SecretPackage<C>),
    Constant(SigningShare<C>),
}

/// Private coefficients of a participant's polynomial
///
/// Never leaves its owner and is consumed by the share exchange.
pub struct Coefficients<C: Curve> {
    index: ParticipantIndex,
    pub(crate) secret: Secret<C>,
}

impl<C: Curve> Participant<C> {
    /// Create a participant with a fresh random polynomial of degree t - 1
    pub fn create<R: RngCore + CryptoRng>(
        index: ParticipantIndex,
        params: &ThresholdParams,
        rng: &mut R,
    ) -> DkgResult<(Self, Coefficients<C>)> {
        if !params.contains(index) {
            return Err(DkgError::Configuration(format!(
                "participant index {} outside 1..={}",
                index,
                params.participants()
            )));
        }

        let (commitment, secret) = if params.threshold() == 1 {
            let signing_key = SigningKey::<C>::new(&mut *rng);
            let mut bytes = signing_key.serialize();
            let share = SigningShare::deserialize(&bytes);
            bytes.zeroize();
            let share = share.map_err(|e| DkgError::from_frost(e, index, params))?;

            (
                Commitment::Constant(VerifyingKey::from(&signing_key)),
                Secret::Constant(share),
            )
        } else {
            let (secret_package, package) = dkg::part1(
                identifier::<C>(index)?,
                params.participants(),
                params.threshold(),
                &mut *rng,
            )
            .map_err(|e| DkgError::from_frost(e, index, params))?;

            (
                Commitment::Polynomial(package),
                Secret::Polynomial(secret_package),
            )
        };

        trace!(index, degree = params.degree(), "Created participant");

        Ok((
            Self { index, commitment },
            Coefficients { index, secret },
        ))
    }

    /// Reassemble a participant from received public material
    pub fn from_parts(index: ParticipantIndex, commitment: Commitment<C>) -> Self {
        Self { index, commitment }
    }

    /// Participant index (1-indexed)
    pub fn index(&self) -> ParticipantIndex {
        self.index
    }

    /// Round-one commitment
    pub fn commitment(&self) -> &Commitment<C> {
        &self.commitment
    }

    /// Check the participant belongs to a round with these parameters
    ///
    /// Proofs of knowledge and commitment degrees are checked by
    /// `frost-core` during the exchange.
    pub fn verify(&self, params: &ThresholdParams) -> DkgResult<()> {
        if !params.contains(self.index) {
            return Err(DkgError::InvalidParticipants(format!(
                "participant index {} outside 1..={}",
                self.index,
                params.participants()
            )));
        }

        let constant = matches!(self.commitment, Commitment::Constant(_));
        if constant != (params.threshold() == 1) {
            return Err(DkgError::InvalidParticipants(format!(
                "participant {} committed to the wrong polynomial kind for threshold {}",
                self.index,
                params.threshold()
            )));
        }

        Ok(())
    }
}

impl<C: Curve> Coefficients<C> {
    /// Index of the participant owning these coefficients
    pub fn index(&self) -> ParticipantIndex {
        self.index
    }
}

impl<C: Curve> std::fmt::Debug for Coefficients<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coefficients")
            .field("index", &self.index)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// `frost` identifier of a participant index
pub(crate) fn identifier<C: Curve>(index: ParticipantIndex) -> DkgResult<Identifier<C>> {
    Identifier::try_from(index)
        .map_err(|e| DkgError::Configuration(format!("participant index {}: {}", index, e)))
}

/// Participant index behind a `frost` identifier
pub(crate) fn index_of<C: Curve>(
    id: &Identifier<C>,
    params: &ThresholdParams,
) -> Option<ParticipantIndex> {
    params
        .indices()
        .find(|&index| Identifier::<C>::try_from(index).map_or(false, |candidate| candidate == *id))
}
