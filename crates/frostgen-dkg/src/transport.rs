//! Delivery of secret shares between participants
//!
//! In a centrally simulated ceremony every share stays in one process, but
//! it still crosses the same wire encoding a networked deployment would
//! use. Tests plug in their own transport to drop or corrupt shares.

use frostgen_core::Curve;
use zeroize::Zeroize;

use crate::error::DkgResult;
use crate::exchange::SecretShare;
use crate::package::SecretSharePackage;

/// Moves one share from its sender to its receiver
pub trait ShareTransport<C: Curve> {
    /// Deliver `share`, returning what arrives at the receiver
    fn deliver(&mut self, share: SecretShare<C>) -> DkgResult<SecretShare<C>>;
}

/// In-process transport that round-trips every share through its
/// [`SecretSharePackage`] encoding
#[derive(Debug, Clone, Copy, Default)]
pub struct InProcessTransport;

impl<C: Curve> ShareTransport<C> for InProcessTransport {
    fn deliver(&mut self, share: SecretShare<C>) -> DkgResult<SecretShare<C>> {
        let mut bytes = SecretSharePackage::from_share(&share).to_bytes();
        let decoded = SecretSharePackage::from_bytes(&bytes);
        bytes.zeroize();
        decoded?.into_share()
    }
}

impl<C, F> ShareTransport<C> for F
where
    C: Curve,
    F: FnMut(SecretShare<C>) -> DkgResult<SecretShare<C>>,
{
    fn deliver(&mut self, share: SecretShare<C>) -> DkgResult<SecretShare<C>> {
        self(share)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_core::keys::SigningShare;
    use frostgen_core::Secp256k1;

    fn share(sender: u16, receiver: u16, value: u8) -> SecretShare<Secp256k1> {
        let mut bytes = [0u8; 32];
        bytes[31] = value;
        SecretShare::from_signing_share(sender, receiver, SigningShare::deserialize(&bytes).unwrap())
    }

    #[test]
    fn test_in_process_delivery_is_lossless() {
        let mut transport = InProcessTransport;
        let sent = share(2, 5, 123);

        let delivered = ShareTransport::<Secp256k1>::deliver(&mut transport, sent.clone()).unwrap();
        assert_eq!(delivered.sender(), 2);
        assert_eq!(delivered.receiver(), 5);
        assert_eq!(
            delivered.signing_share().serialize(),
            sent.signing_share().serialize()
        );
    }

    #[test]
    fn test_closure_transport() {
        let mut corrupt = |sent: SecretShare<Secp256k1>| -> DkgResult<SecretShare<Secp256k1>> {
            let one = share(0, 0, 1);
            let value = Secp256k1::add_signing_shares(sent.signing_share(), one.signing_share())?;
            Ok(SecretShare::from_signing_share(sent.sender(), sent.receiver(), value))
        };

        let delivered = corrupt.deliver(share(1, 2, 9)).unwrap();
        assert_eq!(
            delivered.signing_share().serialize(),
            share(1, 2, 10).signing_share().serialize()
        );
    }
}
