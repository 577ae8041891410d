// Copyright 2024 RISC Zero, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use alloy_primitives::{Address, B256};
use k256::{
    ecdsa::{RecoveryId, Signature as K256Signature, SigningKey, VerifyingKey as K256VerifyingKey},
    PublicKey as K256PublicKey,
};
use serde::{Deserialize, Serialize};

use crate::{error::Error, keys::public_key_to_address, keys::PrivateKey};

/// Length of an encoded signature: `r(32) ‖ s(32) ‖ v(1)`.
pub const SIGNATURE_LEN: usize = 65;

/// A recoverable ECDSA signature in the Ethereum layout, `v ∈ {27, 28}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub r: B256,
    pub s: B256,
    pub v: u8,
}

impl Signature {
    /// Encodes the signature as `r ‖ s ‖ v`.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut out = [0u8; SIGNATURE_LEN];
        out[..32].copy_from_slice(self.r.as_slice());
        out[32..64].copy_from_slice(self.s.as_slice());
        out[64] = self.v;
        out
    }

    /// Decodes `r ‖ s ‖ v`. `v` is only checked on recovery.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != SIGNATURE_LEN {
            return Err(Error::MalformedMessage(format!(
                "signature must be {SIGNATURE_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self {
            r: B256::from_slice(&bytes[..32]),
            s: B256::from_slice(&bytes[32..64]),
            v: bytes[64],
        })
    }

    /// Recovers the address that produced this signature over `hash`.
    pub fn recover_address(&self, hash: &B256) -> Result<Address, Error> {
        let is_y_odd = match self.v {
            27 => false,
            28 => true,
            _ => return Err(Error::InvalidSignature),
        };
        let signature =
            K256Signature::from_scalars(self.r.0, self.s.0).map_err(|_| Error::InvalidSignature)?;
        let verify_key = K256VerifyingKey::recover_from_prehash(
            hash.as_slice(),
            &signature,
            RecoveryId::new(is_y_odd, false),
        )
        .map_err(|_| Error::InvalidSignature)?;

        Ok(public_key_to_address(&K256PublicKey::from(&verify_key)))
    }
}

/// Signs a 32-byte hash, producing a low-`s` signature with `v` in `{27, 28}`.
pub fn sign(hash: &B256, key: &PrivateKey) -> Result<Signature, Error> {
    let signing_key = SigningKey::from(key.secret_key());
    let (signature, recovery_id) = signing_key
        .sign_prehash_recoverable(hash.as_slice())
        .map_err(|_| Error::InvalidKey)?;
    // an x-reduced R cannot be expressed with v = 27/28
    if recovery_id.is_x_reduced() {
        return Err(Error::InvalidSignature);
    }
    let bytes = signature.to_bytes();

    Ok(Signature {
        r: B256::from_slice(&bytes[..32]),
        s: B256::from_slice(&bytes[32..]),
        v: 27 + recovery_id.is_y_odd() as u8,
    })
}

/// Recovers the signer address of `hash` from `signature`.
pub fn recover_address(hash: &B256, signature: &Signature) -> Result<Address, Error> {
    signature.recover_address(hash)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, b256};
    use rand::{rngs::OsRng, RngCore};

    use super::*;
    use crate::{keccak::keccak, keys::generate_private_key};

    #[test]
    fn recovers_signer() {
        for _ in 0..100 {
            let key = generate_private_key();
            let mut hash = B256::ZERO;
            OsRng.fill_bytes(hash.as_mut_slice());

            let signature = sign(&hash, &key).unwrap();
            assert!(signature.v == 27 || signature.v == 28);
            assert_eq!(recover_address(&hash, &signature).unwrap(), key.address());
        }
    }

    #[test]
    fn deterministic_signature() {
        // RFC 6979 nonces: the same key and hash always yield the same bytes
        let key: PrivateKey = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318"
            .parse()
            .unwrap();
        let hash = keccak(b"referral");
        assert_eq!(sign(&hash, &key).unwrap(), sign(&hash, &key).unwrap());
        assert_eq!(
            recover_address(&hash, &sign(&hash, &key).unwrap()).unwrap(),
            address!("2c7536e3605d9c16a7a3d7b1898e529396a65c23")
        );
    }

    #[test]
    fn layout() {
        let signature = Signature {
            r: b256!("88ff6cf0fefd94db46111149ae4bfc179e9b94721fffd821d38d16464b3f71d0"),
            s: b256!("45e0aff800961cfce805daef7016b9b675c137a6a41a548f7b60a3484c06a33a"),
            v: 28,
        };
        let bytes = signature.to_bytes();
        assert_eq!(&bytes[..32], signature.r.as_slice());
        assert_eq!(&bytes[32..64], signature.s.as_slice());
        assert_eq!(bytes[64], 28);
        assert_eq!(Signature::from_bytes(&bytes).unwrap(), signature);
        assert!(matches!(
            Signature::from_bytes(&bytes[..64]),
            Err(Error::MalformedMessage(_))
        ));
    }

    #[test]
    fn rejects_bad_v() {
        let key = generate_private_key();
        let hash = keccak(key.address());
        let mut signature = sign(&hash, &key).unwrap();
        for v in [0, 1, 26, 29, 255] {
            signature.v = v;
            assert_eq!(signature.recover_address(&hash), Err(Error::InvalidSignature));
        }
    }

    #[test]
    fn rejects_zero_scalars() {
        let signature = Signature { r: B256::ZERO, s: B256::ZERO, v: 27 };
        assert_eq!(
            recover_address(&keccak(b"x"), &signature),
            Err(Error::InvalidSignature)
        );
    }
}
