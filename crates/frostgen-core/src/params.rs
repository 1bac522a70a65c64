//! Threshold parameters for a key generation round

use crate::error::{CoreError, Result};

/// Participant identifier (1-indexed)
pub type ParticipantIndex = u16;

/// Validated (n, t) pair
///
/// The only way to obtain one is [`ThresholdParams::new`], so anything
/// holding a `ThresholdParams` can rely on `1 <= t <= n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdParams {
    participants: u16,
    threshold: u16,
}

impl ThresholdParams {
    /// Validate and build a parameter set
    pub fn new(participants: u16, threshold: u16) -> Result<Self> {
        if participants < 1 || threshold < 1 || threshold > participants {
            return Err(CoreError::InvalidParameters {
                threshold,
                participants,
            });
        }
        Ok(Self {
            participants,
            threshold,
        })
    }

    /// Total number of participants (n)
    pub fn participants(&self) -> u16 {
        self.participants
    }

    /// Minimum number of shares needed to use the group key (t)
    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    /// Polynomial degree each participant samples (t - 1)
    pub fn degree(&self) -> usize {
        self.threshold as usize - 1
    }

    /// Whether `index` names a participant of this round
    pub fn contains(&self, index: ParticipantIndex) -> bool {
        (1..=self.participants).contains(&index)
    }

    /// All participant indices in ascending order
    pub fn indices(&self) -> impl Iterator<Item = ParticipantIndex> {
        1..=self.participants
    }
}
