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

use std::{fmt, str::FromStr};

use alloy_primitives::{Address, B256};
use k256::{
    elliptic_curve::{sec1::ToEncodedPoint, zeroize::Zeroize},
    FieldBytes, PublicKey as K256PublicKey, SecretKey,
};
use rand::{rngs::OsRng, RngCore};

use crate::{decode_hex, error::Error, keccak::keccak};

/// A one-time secp256k1 private key.
///
/// Always holds a valid scalar (`0 < k < n`); the key material is zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(SecretKey);

impl PrivateKey {
    /// Draws a fresh key from the operating system RNG.
    pub fn random() -> Self {
        let mut bytes = FieldBytes::default();
        loop {
            OsRng.fill_bytes(&mut bytes);
            // zero and values >= n are astronomically unlikely, but still not keys
            let secret = SecretKey::from_bytes(&bytes);
            bytes.zeroize();
            if let Ok(secret) = secret {
                return Self(secret);
            }
        }
    }

    /// Parses a 32-byte big-endian scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != 32 {
            return Err(Error::InvalidKey);
        }
        let mut field = FieldBytes::clone_from_slice(bytes);
        let secret = SecretKey::from_bytes(&field);
        field.zeroize();
        secret.map(Self).map_err(|_| Error::InvalidKey)
    }

    /// Returns the raw scalar.
    pub fn to_bytes(&self) -> B256 {
        B256::from_slice(&self.0.to_bytes())
    }

    /// Returns the hex encoded scalar without `0x` prefix, the form used in links.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.to_bytes())
    }

    /// Returns the address of the public key `k·G`.
    pub fn address(&self) -> Address {
        public_key_to_address(&self.0.public_key())
    }

    pub(crate) fn secret_key(&self) -> &SecretKey {
        &self.0
    }
}

impl FromStr for PrivateKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_hex(s).map_err(|_| Error::InvalidKey)?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PrivateKey")
            .field(&format_args!("{}", self.address()))
            .finish()
    }
}

/// Generates a one-time private key.
pub fn generate_private_key() -> PrivateKey {
    PrivateKey::random()
}

/// Derives the address of a raw 32-byte private key.
pub fn address_from_private_key(secret: &[u8]) -> Result<Address, Error> {
    PrivateKey::from_bytes(secret).map(|key| key.address())
}

/// Converts a public key into an address by hashing its uncompressed encoding with
/// keccak256 and keeping the low 20 bytes.
pub fn public_key_to_address(public_key: &K256PublicKey) -> Address {
    let public_key = public_key.to_encoded_point(false);
    let public_key = public_key.as_bytes();
    debug_assert_eq!(public_key[0], 0x04);
    let hash = keccak(&public_key[1..]);
    Address::from_slice(&hash[12..])
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, b256};

    use super::*;

    #[test]
    fn generator_address() {
        let key: PrivateKey = "0x0000000000000000000000000000000000000000000000000000000000000001"
            .parse()
            .unwrap();
        assert_eq!(key.address(), address!("7e5f4552091a69125d5dfcb7b8c2659029395bdf"));
    }

    #[test]
    fn known_key() {
        let secret = b256!("4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318");
        assert_eq!(
            address_from_private_key(secret.as_slice()).unwrap(),
            address!("2c7536e3605d9c16a7a3d7b1898e529396a65c23")
        );
    }

    #[test]
    fn out_of_range() {
        assert_eq!(PrivateKey::from_bytes(&[0u8; 32]), Err(Error::InvalidKey));
        // the curve order itself
        let n = b256!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");
        assert_eq!(PrivateKey::from_bytes(n.as_slice()), Err(Error::InvalidKey));
        assert_eq!(PrivateKey::from_bytes(&[1u8; 31]), Err(Error::InvalidKey));
        assert_eq!("0xzz".parse::<PrivateKey>(), Err(Error::InvalidKey));
    }

    #[test]
    fn random_keys_are_valid_and_distinct() {
        let keys: Vec<_> = (0..8).map(|_| PrivateKey::random()).collect();
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(PrivateKey::from_bytes(key.to_bytes().as_slice()).as_ref(), Ok(key));
            assert!(keys[i + 1..].iter().all(|other| other != key));
        }
        assert_eq!(PrivateKey::from_bytes(&[1u8; 33]), Err(Error::InvalidKey));
    }

    #[test]
    fn hex_round_trip() {
        let key = generate_private_key();
        let parsed: PrivateKey = key.to_hex().parse().unwrap();
        assert_eq!(parsed, key);
        assert_eq!(parsed.to_bytes(), key.to_bytes());
        assert_ne!(key.address(), Address::ZERO);
    }

    #[test]
    fn debug_is_redacted() {
        let key = generate_private_key();
        assert!(!format!("{key:?}").contains(&key.to_hex()));
    }
}
