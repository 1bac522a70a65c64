//! Property-based tests for frostgen-dkg using proptest
//!
//! Every case runs a full ceremony, so case counts are kept small.

use frost_core::keys::{reconstruct, VerifyingShare};
use frost_core::VerifyingKey;
use frostgen_core::secp256k1::HALF_Q;
use frostgen_core::{Curve, Secp256k1};
use frostgen_dkg::{GeneratedKeys, KeyGenerator};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

// ============================================
// Strategies
// ============================================

/// (n, t, signer subset of size >= t, seed)
fn arb_round() -> impl Strategy<Value = (u16, u16, Vec<u16>, u64)> {
    (1u16..=5)
        .prop_flat_map(|n| (Just(n), 1u16..=n))
        .prop_flat_map(|(n, t)| {
            let indices: Vec<u16> = (1..=n).collect();
            (
                Just(n),
                Just(t),
                prop::sample::subsequence(indices, t as usize..=n as usize),
                any::<u64>(),
            )
        })
}

fn generate<C: Curve>(n: u16, t: u16, seed: u64) -> GeneratedKeys<C> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    KeyGenerator::<C>::new(n, t)
        .unwrap()
        .generate(&mut rng)
        .unwrap()
}

/// Group key recovered from the shares of `subset`, if the subset is large enough
fn recovered_key<C: Curve>(keys: &GeneratedKeys<C>, subset: &[u16]) -> Option<Vec<u8>> {
    let packages: Vec<_> = subset
        .iter()
        .map(|&i| keys.key_pairs[i as usize - 1].key_package.clone())
        .collect();
    let secret = reconstruct(&packages).ok()?;
    VerifyingKey::from(&secret).serialize().ok()
}

fn gkx_bytes(gkx: &str) -> [u8; 32] {
    let digits = hex::decode(gkx.trim_start_matches("0x")).unwrap();
    let mut padded = [0u8; 32];
    padded[32 - digits.len()..].copy_from_slice(&digits);
    padded
}

// ============================================
// Property Tests
// ============================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn threshold_subsets_reconstruct_group_key((n, t, subset, seed) in arb_round()) {
        let keys = generate::<Secp256k1>(n, t, seed);
        prop_assert_eq!(keys.key_pairs.len(), n as usize);

        let group_key = &keys.key_pairs[0].group_public_key;
        let recovered = recovered_key(&keys, &subset);
        prop_assert_eq!(recovered.as_ref(), Some(group_key));

        if t > 1 {
            // Either refused outright or interpolated to some other point
            let short = recovered_key(&keys, &subset[..t as usize - 1]);
            prop_assert_ne!(short.as_ref(), Some(group_key));
        }
    }

    #[test]
    fn accepted_gkx_never_exceeds_half_order(seed in any::<u64>()) {
        let keys = generate::<Secp256k1>(3, 2, seed);

        let gkx = gkx_bytes(&keys.group.gkx);
        prop_assert!(gkx <= HALF_Q);
        prop_assert_eq!(&keys.group_public_key[1..], gkx.as_slice());
        prop_assert_eq!(keys.group.gkyp, keys.group_public_key[0] & 1);
    }

    #[test]
    fn key_pairs_are_consistent((n, t, _subset, seed) in arb_round()) {
        let keys = generate::<Secp256k1>(n, t, seed);

        let expected: Vec<u16> = (1..=n).collect();
        let indices: Vec<u16> = keys.key_pairs.iter().map(|kp| kp.index).collect();
        prop_assert_eq!(indices, expected);

        for kp in &keys.key_pairs {
            prop_assert_eq!(&kp.group_public_key, &keys.key_pairs[0].group_public_key);
            let image = VerifyingShare::from(kp.secret_key_share().clone())
                .serialize()
                .unwrap();
            prop_assert_eq!(&kp.public_key_share, &image);
        }

        // With t = 1 every participant ends up holding the group secret
        if t > 1 {
            let mut shares = keys.public_key_shares_hex();
            shares.sort();
            shares.dedup();
            prop_assert_eq!(shares.len(), n as usize);
        }
    }
}
