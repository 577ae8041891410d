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

//! One-time link keys.
//!
//! A link key is either random, or derived from a signature of the participant's wallet
//! so it can be recovered later without storing it anywhere.

use alloy_primitives::{eip191_hash_message, Address};
use refchain_primitives::{keccak, sign, Error, PrivateKey, Signature, ADDRESS_LEN};
use serde::{Serialize, Serializer};
use tracing::debug;

/// Domain tag of link key derivation messages.
const DERIVATION_TAG: [u8; 4] = [0xde, 0xad, 0xbe, 0xef];
/// Index of the derived key; bumping it yields an unrelated key.
const KEY_INDEX: u8 = 1;

/// A wallet that signs personal messages (EIP-191).
pub trait MessageSigner {
    /// The wallet's identity address.
    fn address(&self) -> Address;

    /// Signs `keccak256("\x19Ethereum Signed Message:\n" ‖ len ‖ message)`.
    fn sign_message(&self, message: &[u8]) -> Result<Signature, Error>;
}

impl MessageSigner for PrivateKey {
    fn address(&self) -> Address {
        PrivateKey::address(self)
    }

    fn sign_message(&self, message: &[u8]) -> Result<Signature, Error> {
        sign(&eip191_hash_message(message), self)
    }
}

/// A one-time keypair ready to be put into a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkKeypair {
    #[serde(serialize_with = "serialize_secret")]
    pub private_key: PrivateKey,
    pub public_address: Address,
}

impl From<PrivateKey> for LinkKeypair {
    fn from(private_key: PrivateKey) -> Self {
        let public_address = private_key.address();
        Self { private_key, public_address }
    }
}

fn serialize_secret<S: Serializer>(key: &PrivateKey, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&key.to_hex())
}

/// Generates a random link keypair.
pub fn generate_link_keypair() -> LinkKeypair {
    PrivateKey::random().into()
}

/// Derives the link keypair of `signer` for `campaign`.
///
/// The same wallet and campaign always give the same key, provided the wallet signs
/// deterministically (RFC 6979).
pub fn derive_link_keypair(
    signer: &impl MessageSigner,
    campaign: Address,
) -> Result<LinkKeypair, Error> {
    let mut seed = Vec::with_capacity(DERIVATION_TAG.len() + 2 * ADDRESS_LEN + 1);
    seed.extend_from_slice(&DERIVATION_TAG);
    seed.extend_from_slice(campaign.as_slice());
    seed.extend_from_slice(signer.address().as_slice());
    seed.push(KEY_INDEX);

    let signature = signer.sign_message(keccak(&seed).as_slice())?;
    let private_key = PrivateKey::from_bytes(keccak(signature.to_bytes()).as_slice())?;
    debug!(
        "derived link key {} for {} in campaign {campaign}",
        private_key.address(),
        signer.address()
    );

    Ok(private_key.into())
}
