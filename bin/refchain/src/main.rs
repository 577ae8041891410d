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

use anyhow::Context;
use clap::Parser;
use refchain::{derive_link_keypair, generate_link_keypair, verify_claim};
use serde::Serialize;
use tracing::info;

use crate::cli::Cli;

mod cli;

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli {
        Cli::Keygen => print_json(&generate_link_keypair())?,
        Cli::Address(args) => println!("{}", args.secret.address()),
        Cli::Take(args) => {
            let message = args
                .link_args
                .link()
                .take(args.my_address)
                .context("take failed")?;
            println!("{message}");
        }
        Cli::Join(args) => {
            let message = args
                .link_args
                .link()
                .join(args.my_address, args.my_public_address, args.cut)
                .context("join failed")?;
            println!("{message}");
        }
        Cli::JoinTake(args) => {
            let message = args
                .link_args
                .link()
                .join_take(args.my_address, args.my_public_address, args.cut)
                .context("join-take failed")?;
            println!("{message}");
        }
        Cli::Validate(args) => {
            let cuts = args
                .link_args
                .link()
                .validate(args.root_public_address)
                .context("link is not valid")?;
            info!("link has {} hops", cuts.len());
            print_json(&cuts)?;
        }
        Cli::VerifyClaim(args) => {
            let claim = verify_claim(args.root_public_address, args.claimer, &args.message)
                .context("claim is not valid")?;
            info!("{:?} claim by {} over {} endorsements", claim.kind, claim.claimer, claim.endorsements.len());
            print_json(&claim)?;
        }
        Cli::DeriveKey(args) => {
            let keypair = derive_link_keypair(&args.wallet_secret, args.campaign)
                .context("key derivation failed")?;
            print_json(&keypair)?;
        }
    }

    Ok(())
}
