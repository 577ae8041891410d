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

//! Building blocks of referral signature chains: one-time secp256k1 keys,
//! recoverable 65-byte signatures and the single-byte bounty cut.

pub mod bounty;
pub mod error;
pub mod keccak;
pub mod keys;
pub mod signature;

pub use alloy_primitives::{address, b256, Address, B256};

pub use crate::{
    bounty::BountyCut,
    error::Error,
    keccak::keccak,
    keys::{address_from_private_key, generate_private_key, public_key_to_address, PrivateKey},
    signature::{recover_address, sign, Signature},
};

/// Length of an address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Decodes a hex string, with or without a leading `0x`.
pub fn decode_hex(data: &str) -> Result<Vec<u8>, Error> {
    Ok(hex::decode(data.strip_prefix("0x").unwrap_or(data))?)
}
