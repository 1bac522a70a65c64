//! Attempt orchestration and the acceptance retry loop
//!
//! One attempt walks
//! `RoundStart → ParticipantsCreated → SharesExchanged → KeysDerived`
//! and ends accepted or rejected. A rejected attempt is dropped whole and
//! the next one starts from fresh randomness; nothing carries over.

use std::fmt;
use std::marker::PhantomData;

use frostgen_core::{Curve, ThresholdParams};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, info, instrument};
use zeroize::Zeroize;

use crate::acceptance::{AcceptancePolicy, LowerHalfX};
use crate::aggregate::{derive_key_pair, KeyPair};
use crate::error::{DkgError, DkgResult};
use crate::exchange::{exchange_shares, SecretShare};
use crate::group::FrostGroup;
use crate::participant::Participant;
use crate::transport::{InProcessTransport, ShareTransport};

/// Last phase an attempt completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    RoundStart,
    ParticipantsCreated,
    SharesExchanged,
    KeysDerived,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundPhase::RoundStart => "round start",
            RoundPhase::ParticipantsCreated => "participant creation",
            RoundPhase::SharesExchanged => "share exchange",
            RoundPhase::KeysDerived => "key derivation",
        };
        f.write_str(name)
    }
}

/// Why an attempt was discarded
#[derive(Debug, Error)]
pub enum Rejection {
    /// The group key failed the acceptance policy
    #[error("group key {group_key} outside the accepted range")]
    GroupKeyOutOfRange { group_key: String },

    /// A participant or share failed verification
    #[error("round failed after {phase}: {source}")]
    Verification { phase: RoundPhase, source: DkgError },
}

/// Keys of an accepted attempt
#[derive(Debug, Clone)]
pub struct GeneratedKeys<C: Curve> {
    pub params: ThresholdParams,
    /// One key pair per participant, ascending by index
    pub key_pairs: Vec<KeyPair<C>>,
    /// Compressed group public key
    pub group_public_key: Vec<u8>,
    pub group: FrostGroup,
    /// Attempts made, the accepted one included
    pub attempts: u64,
}

impl<C: Curve> GeneratedKeys<C> {
    /// Participant identifiers, ascending
    pub fn uuids(&self) -> Vec<String> {
        self.key_pairs.iter().map(|kp| kp.index.to_string()).collect()
    }

    /// Hex public key shares, ascending by participant
    pub fn public_key_shares_hex(&self) -> Vec<String> {
        self.key_pairs
            .iter()
            .map(|kp| hex::encode(kp.public_key_share_bytes()))
            .collect()
    }

    /// Hex of the compressed group public key
    pub fn group_public_key_hex(&self) -> String {
        hex::encode(&self.group_public_key)
    }
}

/// Outcome of [`attempt_once`]
#[derive(Debug)]
pub enum AttemptOutcome<C: Curve> {
    Accepted(GeneratedKeys<C>),
    Rejected(Rejection),
}

/// Run one complete attempt
///
/// Retryable failures come back as [`AttemptOutcome::Rejected`]; only
/// errors that no fresh attempt could fix are returned as `Err`.
pub fn attempt_once<C, T, P, R>(
    params: &ThresholdParams,
    transport: &mut T,
    policy: &mut P,
    rng: &mut R,
) -> DkgResult<AttemptOutcome<C>>
where
    C: Curve,
    T: ShareTransport<C>,
    P: AcceptancePolicy,
    R: RngCore + CryptoRng,
{
    let mut phase = RoundPhase::RoundStart;

    let (key_pairs, group_public_key) =
        match run_round::<C, T, R>(params, transport, rng, &mut phase) {
            Ok(round) => round,
            Err(source) if source.is_retryable() => {
                return Ok(AttemptOutcome::Rejected(Rejection::Verification {
                    phase,
                    source,
                }))
            }
            Err(e) => return Err(e),
        };

    if !policy.accepts(&group_public_key) {
        return Ok(AttemptOutcome::Rejected(Rejection::GroupKeyOutOfRange {
            group_key: hex::encode(&group_public_key),
        }));
    }

    let group = FrostGroup::from_group_key(&group_public_key)?;

    Ok(AttemptOutcome::Accepted(GeneratedKeys {
        params: *params,
        key_pairs,
        group_public_key,
        group,
        attempts: 1,
    }))
}

fn run_round<C, T, R>(
    params: &ThresholdParams,
    transport: &mut T,
    rng: &mut R,
    phase: &mut RoundPhase,
) -> DkgResult<(Vec<KeyPair<C>>, Vec<u8>)>
where
    C: Curve,
    T: ShareTransport<C>,
    R: RngCore + CryptoRng,
{
    let n = params.participants() as usize;

    let mut participants = Vec::with_capacity(n);
    let mut coefficients = Vec::with_capacity(n);
    for index in params.indices() {
        // Independent stream per participant
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        let mut participant_rng = ChaCha20Rng::from_seed(seed);
        seed.zeroize();

        let (participant, coeffs) = Participant::<C>::create(index, params, &mut participant_rng)?;
        participants.push(participant);
        coefficients.push(coeffs);
    }
    *phase = RoundPhase::ParticipantsCreated;

    let mut states = Vec::with_capacity(n);
    let mut inboxes: Vec<Vec<SecretShare<C>>> =
        (0..n).map(|_| Vec::with_capacity(n - 1)).collect();

    for (slot, (participant, coeffs)) in participants.iter().zip(coefficients).enumerate() {
        let others: Vec<&Participant<C>> = participants
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != slot)
            .map(|(_, p)| p)
            .collect();

        let exchange = exchange_shares(participant, coeffs, &others, params)?;
        states.push(exchange.state);

        for share in exchange.their_shares {
            let delivered = transport.deliver(share)?;
            if !params.contains(delivered.receiver()) {
                return Err(DkgError::InvalidShares(format!(
                    "share from {} delivered to unknown participant {}",
                    delivered.sender(),
                    delivered.receiver()
                )));
            }
            inboxes[delivered.receiver() as usize - 1].push(delivered);
        }
    }
    *phase = RoundPhase::SharesExchanged;

    let key_pairs = states
        .into_iter()
        .zip(participants.iter())
        .zip(inboxes.iter())
        .map(|((state, participant), shares)| derive_key_pair(state, participant, shares))
        .collect::<DkgResult<Vec<_>>>()?;
    *phase = RoundPhase::KeysDerived;

    let group_public_key = agreed_group_key(&key_pairs)?;
    Ok((key_pairs, group_public_key))
}

/// The group key every participant of a round derived
fn agreed_group_key<C: Curve>(key_pairs: &[KeyPair<C>]) -> DkgResult<Vec<u8>> {
    let (first, rest) = key_pairs
        .split_first()
        .ok_or_else(|| DkgError::InvalidShares("round produced no key pairs".to_string()))?;

    if let Some(other) = rest
        .iter()
        .find(|kp| kp.group_public_key != first.group_public_key)
    {
        return Err(DkgError::GroupKeyMismatch {
            first: first.index,
            other: other.index,
        });
    }

    Ok(first.group_public_key.clone())
}

/// Repeats attempts until one is accepted
pub struct KeyGenerator<C: Curve, T = InProcessTransport, P = LowerHalfX<C>> {
    params: ThresholdParams,
    transport: T,
    policy: P,
    _curve: PhantomData<C>,
}

impl<C: Curve> KeyGenerator<C> {
    /// Generator for `participants` keys with reconstruction threshold `threshold`
    ///
    /// Fails with [`DkgError::Configuration`] before any attempt is made if
    /// the pair is invalid.
    pub fn new(participants: u16, threshold: u16) -> DkgResult<Self> {
        let params = ThresholdParams::new(participants, threshold)
            .map_err(|e| DkgError::Configuration(e.to_string()))?;
        Ok(Self::from_params(params))
    }

    pub fn from_params(params: ThresholdParams) -> Self {
        Self {
            params,
            transport: InProcessTransport,
            policy: LowerHalfX::new(),
            _curve: PhantomData,
        }
    }
}

impl<C: Curve, T, P> KeyGenerator<C, T, P> {
    /// Replace the share transport
    pub fn with_transport<U>(self, transport: U) -> KeyGenerator<C, U, P> {
        KeyGenerator {
            params: self.params,
            transport,
            policy: self.policy,
            _curve: PhantomData,
        }
    }

    /// Replace the acceptance policy
    pub fn with_policy<Q>(self, policy: Q) -> KeyGenerator<C, T, Q> {
        KeyGenerator {
            params: self.params,
            transport: self.transport,
            policy,
            _curve: PhantomData,
        }
    }

    pub fn params(&self) -> &ThresholdParams {
        &self.params
    }
}

impl<C, T, P> KeyGenerator<C, T, P>
where
    C: Curve,
    T: ShareTransport<C>,
    P: AcceptancePolicy,
{
    /// Run attempts until the policy accepts a group key
    ///
    /// There is no attempt cap. Every attempt draws fresh randomness from
    /// `rng`.
    #[instrument(
        skip_all,
        fields(
            curve = C::NAME,
            participants = self.params.participants(),
            threshold = self.params.threshold()
        )
    )]
    pub fn generate<R: RngCore + CryptoRng>(&mut self, rng: &mut R) -> DkgResult<GeneratedKeys<C>> {
        let mut attempts: u64 = 0;
        loop {
            attempts += 1;
            match attempt_once::<C, T, P, R>(&self.params, &mut self.transport, &mut self.policy, rng)? {
                AttemptOutcome::Accepted(mut keys) => {
                    keys.attempts = attempts;
                    info!(
                        attempts,
                        group_key = %keys.group_public_key_hex(),
                        "Accepted group key"
                    );
                    return Ok(keys);
                }
                AttemptOutcome::Rejected(rejection) => {
                    debug!(attempt = attempts, %rejection, "Discarded round");
                }
            }
        }
    }
}

impl<C: Curve, T, P> fmt::Debug for KeyGenerator<C, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyGenerator")
            .field("curve", &C::NAME)
            .field("params", &self.params)
            .finish()
    }
}
