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
use refchain_primitives::{
    decode_hex, keccak, signature::SIGNATURE_LEN, BountyCut, Error, Signature, ADDRESS_LEN,
};
use tracing::debug;

/// Length of one encoded endorsement: signature, cut, address and public address.
pub const ENDORSEMENT_LEN: usize = SIGNATURE_LEN + 1 + 2 * ADDRESS_LEN;

/// The accumulated bytes of a signature chain, oldest hop first.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ChainMessage(Vec<u8>);

impl ChainMessage {
    /// Parses a hex message, with or without `0x`.
    pub fn from_hex(data: &str) -> Result<Self, Error> {
        decode_hex(data).map(Self)
    }

    /// Bare hex, as produced by `join`.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// `0x`-prefixed hex, as produced by `take` and `join_take`.
    pub fn to_prefixed_hex(&self) -> String {
        format!("0x{}", self.to_hex())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the root party's address, the first 20 bytes.
    pub fn root_address(&self) -> Option<Address> {
        self.0.get(..ADDRESS_LEN).map(Address::from_slice)
    }
}

impl From<Vec<u8>> for ChainMessage {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for ChainMessage {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for ChainMessage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for ChainMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainMessage({})", self.to_prefixed_hex())
    }
}

/// What came before the hop being built or checked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PriorMessage {
    /// The link was handed out directly by the root party.
    #[default]
    Root,
    /// The link carries the message accumulated by earlier influencers.
    Chain(ChainMessage),
}

impl PriorMessage {
    /// The accumulated message, or `None` for a root link. An empty message counts as
    /// no message at all.
    pub fn chain(&self) -> Option<&ChainMessage> {
        match self {
            PriorMessage::Chain(message) if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

impl From<Option<ChainMessage>> for PriorMessage {
    fn from(message: Option<ChainMessage>) -> Self {
        message.map_or(PriorMessage::Root, PriorMessage::from)
    }
}

impl From<ChainMessage> for PriorMessage {
    fn from(message: ChainMessage) -> Self {
        if message.is_empty() {
            PriorMessage::Root
        } else {
            PriorMessage::Chain(message)
        }
    }
}

/// One full hop of a chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endorsement {
    pub signature: Signature,
    /// Raw cut byte, not yet checked.
    pub cut: u8,
    /// Identity address of the party this hop introduces.
    pub address: Address,
    /// One-time public address that party extends the chain with.
    pub public_address: Address,
}

impl Endorsement {
    /// Decodes exactly [ENDORSEMENT_LEN] bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != ENDORSEMENT_LEN {
            return Err(Error::MalformedMessage(format!(
                "endorsement must be {ENDORSEMENT_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let (signature, rest) = bytes.split_at(SIGNATURE_LEN);
        let (address, public_address) = rest[1..].split_at(ADDRESS_LEN);

        Ok(Self {
            signature: Signature::from_bytes(signature)?,
            cut: rest[0],
            address: Address::from_slice(address),
            public_address: Address::from_slice(public_address),
        })
    }

    /// The hash the previous hop's one-time key signs.
    pub fn signing_hash(&self) -> B256 {
        endorsement_hash(self.cut, self.public_address, self.address)
    }

    /// Checks the cut byte, then that the signature recovers to `signer`.
    ///
    /// A signature that does not recover at all counts as a mismatch.
    pub fn verify(&self, signer: Address) -> Result<BountyCut, Error> {
        let cut = BountyCut::decode(self.cut)?;
        match self.signature.recover_address(&self.signing_hash()) {
            Ok(recovered) if recovered == signer => Ok(cut),
            Ok(recovered) => {
                debug!("endorsement of {} signed by {recovered}, expected {signer}", self.address);
                Err(Error::ChainVerificationFailed)
            }
            Err(err) => {
                debug!("endorsement of {} does not recover: {err}", self.address);
                Err(Error::ChainVerificationFailed)
            }
        }
    }
}

/// `keccak256(cut ‖ public_address ‖ address)`, the payload of a `join` hop.
pub fn endorsement_hash(cut: u8, public_address: Address, address: Address) -> B256 {
    let mut payload = Vec::with_capacity(1 + 2 * ADDRESS_LEN);
    payload.push(cut);
    payload.extend_from_slice(public_address.as_slice());
    payload.extend_from_slice(address.as_slice());
    keccak(payload)
}
