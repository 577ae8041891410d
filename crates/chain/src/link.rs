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

use alloy_primitives::Address;
use refchain_primitives::{keccak, sign, BountyCut, Error, PrivateKey, ADDRESS_LEN};
use tracing::debug;

use crate::message::{endorsement_hash, ChainMessage, PriorMessage};

/// A shareable referral link.
///
/// Holds what the previous hop hands to the next party: its identity address, the
/// one-time secret that authorizes the next hop, and the message accumulated so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    /// Identity address of the party that issued the link.
    pub address: Address,
    /// One-time secret of that party; whoever holds it can extend the chain.
    pub secret: PrivateKey,
    pub prior: PriorMessage,
}

impl Link {
    pub fn new(address: Address, secret: PrivateKey, prior: PriorMessage) -> Self {
        Self { address, secret, prior }
    }

    /// A link handed out directly by the root party.
    pub fn root(address: Address, secret: PrivateKey) -> Self {
        Self::new(address, secret, PriorMessage::Root)
    }

    /// The one-time public address of [Link::secret].
    pub fn public_address(&self) -> Address {
        self.secret.address()
    }

    /// Everything before the new signature: the prior message followed by this link's
    /// address and public address, or just the root address.
    fn body(&self) -> Vec<u8> {
        match self.prior.chain() {
            None => self.address.to_vec(),
            Some(message) => {
                let mut body = Vec::with_capacity(message.len() + 2 * ADDRESS_LEN);
                body.extend_from_slice(message.as_bytes());
                body.extend_from_slice(self.address.as_slice());
                body.extend_from_slice(self.public_address().as_slice());
                body
            }
        }
    }

    /// Claims the link for `my_address` without making it extensible.
    ///
    /// Only the claimer's address is signed. Returns `0x`-prefixed hex.
    pub fn take(&self, my_address: Address) -> Result<String, Error> {
        let signature = sign(&keccak(my_address), &self.secret)?;
        debug!("{} takes link of {}", my_address, self.address);

        let mut message = self.body();
        message.extend_from_slice(&signature.to_bytes());
        Ok(ChainMessage::from(message).to_prefixed_hex())
    }

    /// Endorses `my_address` with its one-time `my_public_address` and `cut`.
    ///
    /// Returns bare hex without `0x`, the message a new link is published with.
    pub fn join(
        &self,
        my_address: Address,
        my_public_address: Address,
        cut: Option<u8>,
    ) -> Result<String, Error> {
        self.join_message(my_address, my_public_address, cut)
            .map(|message| message.to_hex())
    }

    /// Like [Link::join], followed by `my_address ‖ my_public_address`, so the result can
    /// both be submitted as a claim and extended later. Returns `0x`-prefixed hex.
    pub fn join_take(
        &self,
        my_address: Address,
        my_public_address: Address,
        cut: Option<u8>,
    ) -> Result<String, Error> {
        let message = self.join_message(my_address, my_public_address, cut)?;
        let mut bytes = Vec::from(message.as_bytes());
        bytes.extend_from_slice(my_address.as_slice());
        bytes.extend_from_slice(my_public_address.as_slice());
        Ok(ChainMessage::from(bytes).to_prefixed_hex())
    }

    /// Joins with a freshly generated one-time key and returns the link `my_address`
    /// hands out next.
    pub fn extend(&self, my_address: Address, cut: Option<u8>) -> Result<Link, Error> {
        let secret = PrivateKey::random();
        let message = self.join_message(my_address, secret.address(), cut)?;
        Ok(Link::new(my_address, secret, PriorMessage::Chain(message)))
    }

    fn join_message(
        &self,
        my_address: Address,
        my_public_address: Address,
        cut: Option<u8>,
    ) -> Result<ChainMessage, Error> {
        let cut = BountyCut::encode(cut);
        let hash = endorsement_hash(cut, my_public_address, my_address);
        let signature = sign(&hash, &self.secret)?;

        // replay what the contract will do before anything leaves this function
        let signer = self.public_address();
        if signature.recover_address(&hash).ok() != Some(signer) {
            return Err(Error::ChainVerificationFailed);
        }
        debug!("{} joins link of {} with cut {cut}", my_address, self.address);

        let mut message = self.body();
        message.extend_from_slice(&signature.to_bytes());
        message.push(cut);
        Ok(ChainMessage::from(message))
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;
    use refchain_primitives::{signature::SIGNATURE_LEN, Signature};

    use super::*;
    use crate::message::ENDORSEMENT_LEN;

    const ROOT: Address = address!("00000000000000000000000000000000000000a1");
    const ALICE: Address = address!("00000000000000000000000000000000000000b2");
    const BOB: Address = address!("00000000000000000000000000000000000000c3");

    fn root_link() -> Link {
        Link::root(ROOT, PrivateKey::random())
    }

    #[test]
    fn take_from_root() {
        let link = root_link();
        let out = link.take(ALICE).unwrap();
        assert!(out.starts_with("0x"));

        let bytes = hex::decode(&out[2..]).unwrap();
        assert_eq!(bytes.len(), ADDRESS_LEN + SIGNATURE_LEN);
        assert_eq!(&bytes[..ADDRESS_LEN], ROOT.as_slice());
        let signature = Signature::from_bytes(&bytes[ADDRESS_LEN..]).unwrap();
        assert_eq!(
            signature.recover_address(&keccak(ALICE)).unwrap(),
            link.public_address()
        );
    }

    #[test]
    fn empty_prior_message_joins_like_root() {
        let secret = PrivateKey::random();
        let root = Link::root(ROOT, secret.clone());
        let empty = Link::new(ROOT, secret.clone(), PriorMessage::Chain(ChainMessage::default()));
        let public = PrivateKey::random().address();

        let joined = empty.join(ALICE, public, Some(31)).unwrap();
        let bytes = hex::decode(&joined).unwrap();
        assert_eq!(bytes.len(), ADDRESS_LEN + SIGNATURE_LEN + 1);
        assert_eq!(&bytes[..ADDRESS_LEN], ROOT.as_slice());
        // deterministic nonces: same key, same hash, same bytes
        assert_eq!(joined, root.join(ALICE, public, Some(31)).unwrap());

        let taken = empty.take(BOB).unwrap();
        assert_eq!(hex::decode(&taken[2..]).unwrap().len(), ADDRESS_LEN + SIGNATURE_LEN);
        assert_eq!(empty.validate(secret.address()), Ok(vec![]));
    }

    #[test]
    fn join_from_root() {
        let link = root_link();
        let public = PrivateKey::random().address();
        let out = link.join(ALICE, public, Some(21)).unwrap();
        assert!(!out.starts_with("0x"));

        let bytes = hex::decode(&out).unwrap();
        assert_eq!(bytes.len(), ADDRESS_LEN + SIGNATURE_LEN + 1);
        assert_eq!(&bytes[..ADDRESS_LEN], ROOT.as_slice());
        assert_eq!(bytes[ADDRESS_LEN + SIGNATURE_LEN], 21);
        let signature = Signature::from_bytes(&bytes[ADDRESS_LEN..][..SIGNATURE_LEN]).unwrap();
        assert_eq!(
            signature.recover_address(&endorsement_hash(21, public, ALICE)).unwrap(),
            link.public_address()
        );
    }

    #[test]
    fn join_defaults_to_equal_split() {
        let out = root_link().join(ALICE, Address::ZERO, None).unwrap();
        assert!(out.ends_with("ff"));
    }

    #[test]
    fn join_after_prior_message() {
        let root = root_link();
        let alice = root.extend(ALICE, Some(1)).unwrap();
        let PriorMessage::Chain(prior) = &alice.prior else {
            panic!("extend must produce a chain message");
        };

        let public = PrivateKey::random().address();
        let out = hex::decode(alice.join(BOB, public, None).unwrap()).unwrap();
        assert_eq!(out.len(), prior.len() + ENDORSEMENT_LEN);
        assert_eq!(&out[..prior.len()], prior.as_bytes());
        assert_eq!(&out[prior.len()..][..ADDRESS_LEN], ALICE.as_slice());
        assert_eq!(
            &out[prior.len() + ADDRESS_LEN..][..ADDRESS_LEN],
            alice.public_address().as_slice()
        );
    }

    #[test]
    fn join_take_appends_claimer() {
        let link = root_link();
        let public = PrivateKey::random().address();
        let joined = link.join(ALICE, public, Some(5)).unwrap();
        let taken = link.join_take(ALICE, public, Some(5)).unwrap();
        assert_eq!(
            taken,
            format!("0x{joined}{}{}", hex::encode(ALICE), hex::encode(public))
        );
    }
}
