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

//! Referral attribution chains.
//!
//! A chain starts at a root party and grows one hop at a time. Every hop is an
//! endorsement signed with the previous hop's one-time key, naming the next party and
//! the one-time public address that party will sign with. Only the terminal holder
//! submits anything on chain; the contract (or [`validate_chain`] / [`verify_claim`]
//! off chain) replays the signatures to recover the path and the bounty cuts.
//!
//! ```text
//! root(20) ‖ [ sig(65) ‖ cut(1) ‖ address(20) ‖ public_address(20) ]* ‖ tail
//! ```

pub mod claim;
pub mod derive;
pub mod link;
pub mod message;
pub mod validate;

pub use refchain_primitives::{
    self as primitives, Address, BountyCut, Error, PrivateKey, Signature, B256,
};

pub use crate::{
    claim::{verify_claim, Claim, ClaimKind, EndorsedParty},
    derive::{derive_link_keypair, generate_link_keypair, LinkKeypair, MessageSigner},
    link::Link,
    message::{ChainMessage, Endorsement, PriorMessage},
    validate::validate_chain,
};
