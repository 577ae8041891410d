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
use refchain_primitives::{
    keccak, signature::SIGNATURE_LEN, BountyCut, Error, Signature, ADDRESS_LEN,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::message::{ChainMessage, Endorsement, ENDORSEMENT_LEN};

/// How the terminal hop of a claim was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimKind {
    /// Signed over the claimer's address only; the chain ends here.
    Take,
    /// A full endorsement of the claimer; the claimer may extend the chain later.
    JoinTake,
}

/// One verified endorsement of a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndorsedParty {
    pub address: Address,
    pub public_address: Address,
    pub cut: BountyCut,
}

/// The path recovered from a message submitted by its terminal holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub root: Address,
    /// Every endorsed party, oldest first. Includes the claimer for [ClaimKind::JoinTake].
    pub endorsements: Vec<EndorsedParty>,
    pub claimer: Address,
    pub kind: ClaimKind,
}

impl Claim {
    /// Bounty cuts along the path, oldest first.
    pub fn cuts(&self) -> Vec<BountyCut> {
        self.endorsements.iter().map(|party| party.cut).collect()
    }
}

/// Verifies a `take` or `join_take` message submitted by `claimer`.
///
/// This is the check the campaign contract performs on submission: all full hops are
/// verified like [crate::validate_chain] does, then the tail must either be a `take`
/// signature over `claimer` or the last full hop must name `claimer`.
pub fn verify_claim(
    root_public_address: Address,
    claimer: Address,
    message: &ChainMessage,
) -> Result<Claim, Error> {
    let root = message
        .root_address()
        .ok_or_else(|| Error::MalformedMessage("message shorter than an address".into()))?;

    let mut chunks = message.as_bytes()[ADDRESS_LEN..].chunks_exact(ENDORSEMENT_LEN);
    let (signer, endorsements) = chunks.by_ref().try_fold(
        (root_public_address, Vec::new()),
        |(signer, mut endorsements), chunk| {
            let endorsement = Endorsement::decode(chunk)?;
            let cut = endorsement.verify(signer)?;
            endorsements.push(EndorsedParty {
                address: endorsement.address,
                public_address: endorsement.public_address,
                cut,
            });
            Ok::<_, Error>((endorsement.public_address, endorsements))
        },
    )?;

    let kind = match chunks.remainder() {
        [] => match endorsements.last() {
            Some(last) if last.address == claimer => ClaimKind::JoinTake,
            Some(last) => {
                debug!("last hop names {}, claimed by {claimer}", last.address);
                return Err(Error::ChainVerificationFailed);
            }
            None => return Err(Error::MalformedMessage("message has no hops".into())),
        },
        tail if tail.len() == SIGNATURE_LEN => {
            let signature = Signature::from_bytes(tail)?;
            if signature.recover_address(&keccak(claimer)).ok() != Some(signer) {
                debug!("take signature does not recover to {signer}");
                return Err(Error::ChainVerificationFailed);
            }
            ClaimKind::Take
        }
        tail => {
            return Err(Error::MalformedMessage(format!(
                "{} trailing bytes after the last hop",
                tail.len()
            )))
        }
    };
    debug!("verified {kind:?} claim by {claimer} over {} endorsements", endorsements.len());

    Ok(Claim { root, endorsements, claimer, kind })
}
