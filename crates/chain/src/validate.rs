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
use refchain_primitives::{BountyCut, Error, PrivateKey, ADDRESS_LEN};
use tracing::{debug, trace};

use crate::{
    link::Link,
    message::{Endorsement, PriorMessage, ENDORSEMENT_LEN},
};

/// Validates a link produced by `join` and returns the bounty cuts along its path,
/// oldest hop first.
///
/// `root_public_address` is the one-time public address of the root party, usually read
/// from the campaign contract. A chain terminated by `take` is not a link and fails with
/// [Error::MalformedMessage]; use [crate::verify_claim] for those.
pub fn validate_chain(
    root_public_address: Address,
    first_hop_address: Address,
    first_hop_secret: &PrivateKey,
    message: &PriorMessage,
) -> Result<Vec<BountyCut>, Error> {
    let last_public_address = first_hop_secret.address();

    let message = match message.chain() {
        None if root_public_address == last_public_address => return Ok(vec![]),
        None => {
            debug!("root link key {last_public_address} does not match {root_public_address}");
            return Err(Error::ChainVerificationFailed);
        }
        Some(message) => message,
    };

    // the last hop's address and public address are implied by the link itself
    let mut body = Vec::with_capacity(message.len() + 2 * ADDRESS_LEN);
    body.extend_from_slice(message.as_bytes());
    body.extend_from_slice(first_hop_address.as_slice());
    body.extend_from_slice(last_public_address.as_slice());
    trace!("validating {} byte chain", body.len());

    let steps = body
        .get(ADDRESS_LEN..)
        .ok_or_else(|| Error::MalformedMessage("message shorter than an address".into()))?;
    let mut chunks = steps.chunks_exact(ENDORSEMENT_LEN);
    let (_, cuts) = chunks.by_ref().try_fold(
        (root_public_address, Vec::new()),
        |(signer, mut cuts), chunk| {
            let endorsement = Endorsement::decode(chunk)?;
            cuts.push(endorsement.verify(signer)?);
            Ok::<_, Error>((endorsement.public_address, cuts))
        },
    )?;
    if !chunks.remainder().is_empty() {
        return Err(Error::MalformedMessage(format!(
            "{} trailing bytes after the last hop",
            chunks.remainder().len()
        )));
    }
    debug!("validated chain with {} hops", cuts.len());

    Ok(cuts)
}

impl Link {
    /// Validates this link against the root party's public address.
    pub fn validate(&self, root_public_address: Address) -> Result<Vec<BountyCut>, Error> {
        validate_chain(root_public_address, self.address, &self.secret, &self.prior)
    }
}
