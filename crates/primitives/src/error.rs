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

use thiserror::Error as ThisError;

/// Failures raised while building or checking a signature chain.
///
/// Every check is a hard precondition: an operation that returns one of these
/// has produced no output at all.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// The private key is zero, not smaller than the curve order, or not 32 bytes.
    #[error("private key is not a valid secp256k1 scalar")]
    InvalidKey,
    /// Bad hex, wrong field length or bytes left over after the last step.
    #[error("malformed message: {0}")]
    MalformedMessage(String),
    /// A hop carries the reserved cut byte `0`.
    #[error("bounty cut 0 is reserved, use 255 for equal parts")]
    InvalidBountyCut,
    /// A signature did not recover to the expected one-time public address.
    #[error("signature chain verification failed")]
    ChainVerificationFailed,
    /// `v` is not 27 or 28, or public key recovery failed.
    #[error("invalid signature")]
    InvalidSignature,
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::MalformedMessage(err.to_string())
    }
}
