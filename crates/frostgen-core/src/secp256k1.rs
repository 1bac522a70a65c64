//! secp256k1 backend over `frost-secp256k1`

use frost_core::keys::SigningShare;
use frost_core::VerifyingKey;
use k256::{elliptic_curve::PrimeField, FieldBytes, Scalar};
use zeroize::Zeroize;

pub use frost_secp256k1::Secp256K1Sha256;

use crate::curve::Curve;
use crate::error::{CoreError, Result};

/// FROST(secp256k1, SHA-256)
pub type Secp256k1 = Secp256K1Sha256;

/// `(q + 1) / 2` for the secp256k1 group order q, fixed protocol constant
pub const HALF_Q: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa1,
];

const TAG_COMPRESSED_EVEN: u8 = 0x02;
const TAG_COMPRESSED_ODD: u8 = 0x03;

impl Curve for Secp256K1Sha256 {
    const NAME: &'static str = "secp256k1";
    const POINT_SIZE: usize = 33; // SEC1 compressed
    const HALF_ORDER: &'static [u8] = &HALF_Q;

    fn decode_point(bytes: &[u8]) -> Result<VerifyingKey<Self>> {
        if bytes.len() != Self::POINT_SIZE {
            return Err(CoreError::InvalidEncoding(format!(
                "expected {} byte compressed point, got {}",
                Self::POINT_SIZE,
                bytes.len()
            )));
        }

        // SEC1 also gives 33 bytes to the compact form (0x05)
        if bytes[0] != TAG_COMPRESSED_EVEN && bytes[0] != TAG_COMPRESSED_ODD {
            return Err(CoreError::InvalidEncoding(format!(
                "expected compressed point tag, got {:#04x}",
                bytes[0]
            )));
        }

        VerifyingKey::deserialize(bytes).map_err(|e| CoreError::InvalidEncoding(e.to_string()))
    }

    fn add_signing_shares(
        a: &SigningShare<Self>,
        b: &SigningShare<Self>,
    ) -> Result<SigningShare<Self>> {
        let sum = share_scalar(a)? + share_scalar(b)?;

        let mut bytes = sum.to_repr().to_vec();
        let share = SigningShare::deserialize(&bytes);
        bytes.zeroize();

        share.map_err(|e| CoreError::InvalidEncoding(e.to_string()))
    }
}

fn share_scalar(share: &SigningShare<Secp256K1Sha256>) -> Result<Scalar> {
    let mut bytes = share.serialize();
    if bytes.len() != 32 {
        let len = bytes.len();
        bytes.zeroize();
        return Err(CoreError::InvalidEncoding(format!(
            "expected 32 byte signing share, got {}",
            len
        )));
    }

    let scalar: Option<Scalar> = Scalar::from_repr(FieldBytes::clone_from_slice(&bytes)).into();
    bytes.zeroize();
    scalar.ok_or_else(|| CoreError::InvalidEncoding("share not below group order".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_core::SigningKey;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const GENERATOR_X: &str = "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    fn share(value: u64) -> SigningShare<Secp256k1> {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        SigningShare::deserialize(&bytes).unwrap()
    }

    fn with_tag(tag: u8) -> Vec<u8> {
        let mut bytes = vec![tag];
        bytes.extend_from_slice(&hex::decode(GENERATOR_X).unwrap());
        bytes
    }

    #[test]
    fn test_half_q_is_half_order_rounded_up() {
        // 2 · (q + 1) / 2 = q + 1 ≡ 1
        let half: Option<Scalar> = Scalar::from_repr(FieldBytes::clone_from_slice(&HALF_Q)).into();
        let half = half.unwrap();
        assert_eq!(half + half, Scalar::ONE);
    }

    #[test]
    fn test_group_key_roundtrip() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let signing_key = SigningKey::<Secp256k1>::new(&mut rng);
        let key = VerifyingKey::from(&signing_key);

        let bytes = key.serialize().unwrap();
        assert_eq!(bytes.len(), 33);
        assert!(bytes[0] == 0x02 || bytes[0] == 0x03);

        assert_eq!(Secp256k1::decode_point(&bytes).unwrap(), key);
    }

    #[test]
    fn test_decode_point_accepts_generator() {
        assert!(Secp256k1::decode_point(&with_tag(0x02)).is_ok());
    }

    #[test]
    fn test_decode_point_rejects_non_compressed_tags() {
        // Compact form of G: a valid SEC1 encoding of the same length
        assert!(matches!(
            Secp256k1::decode_point(&with_tag(0x05)),
            Err(CoreError::InvalidEncoding(_))
        ));
        assert!(Secp256k1::decode_point(&with_tag(0x04)).is_err());
        assert!(Secp256k1::decode_point(&with_tag(0x00)).is_err());
        assert!(Secp256k1::decode_point(&[0x02; 32]).is_err());
    }

    #[test]
    fn test_add_signing_shares() {
        let sum = Secp256k1::add_signing_shares(&share(5), &share(7)).unwrap();
        assert_eq!(sum.serialize(), share(12).serialize());
    }

    #[test]
    fn test_add_signing_shares_wraps_at_order() {
        let half = SigningShare::<Secp256k1>::deserialize(&HALF_Q).unwrap();
        let sum = Secp256k1::add_signing_shares(&half, &half).unwrap();
        assert_eq!(sum.serialize(), share(1).serialize());
    }
}
