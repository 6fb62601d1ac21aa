//! Keypair Generation Tool
//!
//! Generates a new ed25519 keypair, prints its public address and secret seed
//! and, on the test network, optionally funds the account through friendbot.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example create_key
//! cargo run --example create_key -- --fund
//! ```
use clap::Parser;
use color_eyre::{eyre::WrapErr, Result};
use galactic_horizon::{
    config::ClientConfig, logging::setup_logging, models::Keypair, services::ExchangeService,
};

#[derive(Parser, Debug)]
#[command(name = "create-key")]
#[command(about = "Generate a keypair and optionally fund it on the test network")]
struct Args {
    /// Ask friendbot to create and fund the account (test network only)
    #[arg(long)]
    fund: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    setup_logging()?;
    let args = Args::parse();

    let keypair = Keypair::random();
    let seed = keypair.secret_seed()?;
    println!("Public address: {}", keypair.address());
    println!("Secret seed:    {}", seed.as_str());

    if args.fund {
        let config = ClientConfig::from_env()?;
        let service = ExchangeService::from_config(config)?;
        service
            .fund_test_account(keypair.account_id())
            .await
            .wrap_err("friendbot funding failed")?;
        println!("Account funded");
    }
    Ok(())
}
