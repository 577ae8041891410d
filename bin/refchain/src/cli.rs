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

use refchain::{Address, ChainMessage, Link, PriorMessage, PrivateKey};

#[derive(clap::Parser, Debug, Clone)]
#[command(name = "refchain")]
#[command(bin_name = "refchain")]
#[command(author, version, about, long_about = None)]
pub enum Cli {
    /// Generate a random one-time link keypair
    Keygen,
    /// Print the address of a private key
    Address(AddressArgs),
    /// Claim a link without making it extensible
    Take(TakeArgs),
    /// Endorse yourself on a link and get the message for your own link
    Join(JoinArgs),
    /// Endorse yourself on a link and get a message that is also a claim
    JoinTake(JoinArgs),
    /// Validate a link and print the bounty cuts along its path
    Validate(ValidateArgs),
    /// Verify a message submitted by its terminal holder
    VerifyClaim(VerifyClaimArgs),
    /// Derive the deterministic link keypair of a wallet for a campaign
    DeriveKey(DeriveKeyArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct AddressArgs {
    #[clap(long, require_equals = true)]
    /// Hex encoded private key, optionally 0x-prefixed
    pub secret: PrivateKey,
}

#[derive(clap::Args, Debug, Clone)]
pub struct LinkArgs {
    #[clap(long, require_equals = true)]
    /// Address of the party that issued the link
    pub link_address: Address,

    #[clap(long, require_equals = true)]
    /// One-time secret carried by the link
    pub link_secret: PrivateKey,

    #[clap(long, require_equals = true)]
    /// Message carried by the link; omit for links issued by the root party
    pub message: Option<ChainMessage>,
}

impl LinkArgs {
    pub fn link(&self) -> Link {
        Link::new(
            self.link_address,
            self.link_secret.clone(),
            PriorMessage::from(self.message.clone()),
        )
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct TakeArgs {
    #[clap(flatten)]
    pub link_args: LinkArgs,

    #[clap(long, require_equals = true)]
    /// Your own address
    pub my_address: Address,
}

#[derive(clap::Args, Debug, Clone)]
pub struct JoinArgs {
    #[clap(flatten)]
    pub link_args: LinkArgs,

    #[clap(long, require_equals = true)]
    /// Your own address
    pub my_address: Address,

    #[clap(long, require_equals = true)]
    /// Public address of the one-time key you will put into your own link
    pub my_public_address: Address,

    #[clap(long, require_equals = true)]
    /// Bounty cut byte: 1..=101 is a percentage plus one, anything else is an equal split
    ///
    /// [default: 255]
    pub cut: Option<u8>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    #[clap(flatten)]
    pub link_args: LinkArgs,

    #[clap(long, require_equals = true)]
    /// One-time public address of the root party
    pub root_public_address: Address,
}

#[derive(clap::Args, Debug, Clone)]
pub struct VerifyClaimArgs {
    #[clap(long, require_equals = true)]
    /// One-time public address of the root party
    pub root_public_address: Address,

    #[clap(long, require_equals = true)]
    /// Address submitting the claim
    pub claimer: Address,

    #[clap(long, require_equals = true)]
    /// Output of take or join-take
    pub message: ChainMessage,
}

#[derive(clap::Args, Debug, Clone)]
pub struct DeriveKeyArgs {
    #[clap(long, require_equals = true)]
    /// Private key of the wallet signing the derivation message
    pub wallet_secret: PrivateKey,

    #[clap(long, require_equals = true)]
    /// Address of the campaign contract
    pub campaign: Address,
}
