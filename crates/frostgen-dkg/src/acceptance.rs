//! Group key acceptance
//!
//! A round is kept only when the x-coordinate of its compressed group key,
//! read as a big-endian unsigned integer, is at most half the scalar order.
//! This pins one canonical representative out of each `{Y, -Y}` pair for
//! consumers that drop the parity bit.

use std::marker::PhantomData;

use frostgen_core::Curve;

/// Decides whether a generated group key may be kept
pub trait AcceptancePolicy {
    /// `group_key` is the compressed encoding of the group public key
    fn accepts(&mut self, group_key: &[u8]) -> bool;
}

/// Accept keys whose x-coordinate is at most `C::HALF_ORDER`
#[derive(Debug, Clone, Copy)]
pub struct LowerHalfX<C: Curve>(PhantomData<C>);

impl<C: Curve> LowerHalfX<C> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<C: Curve> Default for LowerHalfX<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Curve> AcceptancePolicy for LowerHalfX<C> {
    fn accepts(&mut self, group_key: &[u8]) -> bool {
        group_key_in_lower_half::<C>(group_key)
    }
}

impl<F> AcceptancePolicy for F
where
    F: FnMut(&[u8]) -> bool,
{
    fn accepts(&mut self, group_key: &[u8]) -> bool {
        self(group_key)
    }
}

/// Whether the x-coordinate of a compressed point is `<= C::HALF_ORDER`
///
/// Malformed encodings are never accepted.
pub fn group_key_in_lower_half<C: Curve>(group_key: &[u8]) -> bool {
    if group_key.len() != C::POINT_SIZE {
        return false;
    }
    let x = &group_key[1..];
    // Equal widths make lexicographic order the numeric order
    x.len() == C::HALF_ORDER.len() && x <= C::HALF_ORDER
}

#[cfg(test)]
mod tests {
    use super::*;
    use frostgen_core::secp256k1::HALF_Q;
    use frostgen_core::Secp256k1;

    fn key_with_x(x: [u8; 32]) -> Vec<u8> {
        let mut key = vec![0x02];
        key.extend_from_slice(&x);
        key
    }

    #[test]
    fn test_boundary_is_inclusive() {
        assert!(group_key_in_lower_half::<Secp256k1>(&key_with_x(HALF_Q)));

        let mut above = HALF_Q;
        above[31] += 1;
        assert!(!group_key_in_lower_half::<Secp256k1>(&key_with_x(above)));

        let mut below = HALF_Q;
        below[31] -= 1;
        assert!(group_key_in_lower_half::<Secp256k1>(&key_with_x(below)));
    }

    #[test]
    fn test_extremes() {
        assert!(group_key_in_lower_half::<Secp256k1>(&key_with_x([0u8; 32])));
        assert!(!group_key_in_lower_half::<Secp256k1>(&key_with_x([0xff; 32])));
    }

    #[test]
    fn test_parity_byte_is_ignored() {
        let mut key = key_with_x(HALF_Q);
        key[0] = 0x03;
        assert!(LowerHalfX::<Secp256k1>::new().accepts(&key));
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        assert!(!group_key_in_lower_half::<Secp256k1>(&[0x02; 32]));
        assert!(!group_key_in_lower_half::<Secp256k1>(&[]));
    }

    #[test]
    fn test_closure_policy() {
        let mut calls = 0;
        let mut policy = |_: &[u8]| {
            calls += 1;
            calls > 2
        };
        assert!(!policy.accepts(&[]));
        assert!(!policy.accepts(&[]));
        assert!(policy.accepts(&[]));
    }
}
