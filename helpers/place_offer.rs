//! Offer Placement Tool
//!
//! Places, updates or cancels a sell offer and prints the outcome. A missing
//! trust line for a credit asset is opened automatically.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example place_offer -- \
//!   --secret-key "S..." \
//!   --selling native \
//!   --buying "USD:G..." \
//!   --amount 100.5 \
//!   --price 0.2129193
//! ```
use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use galactic_horizon::{
    config::ClientConfig,
    logging::setup_logging,
    models::{Amount, Asset, Keypair, Price},
    services::{ExchangeService, OfferRequest},
};

#[derive(Parser, Debug)]
#[command(name = "place-offer")]
#[command(about = "Place, update or cancel a sell offer")]
struct Args {
    /// Secret seed of the offering account (S... format)
    #[arg(short, long)]
    secret_key: String,

    /// Asset to sell: "native" or "CODE:ISSUER"
    #[arg(long)]
    selling: String,

    /// Asset to buy: "native" or "CODE:ISSUER"
    #[arg(long)]
    buying: String,

    /// Amount of the selling asset, up to 7 decimals
    #[arg(long, default_value = "0")]
    amount: String,

    /// Units of the buying asset per unit of the selling asset
    #[arg(long)]
    price: f64,

    /// Existing offer to update
    #[arg(long)]
    offer_id: Option<u64>,

    /// Cancel the offer given by --offer-id
    #[arg(long)]
    cancel: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    setup_logging()?;
    let args = Args::parse();

    let signer = Keypair::from_secret_seed(&args.secret_key)?;
    let selling: Asset = args.selling.parse()?;
    let buying: Asset = args.buying.parse()?;
    let amount: Amount = args.amount.parse()?;
    let price = Price::from_f64(args.price)?;

    let mut request = OfferRequest::new(selling, amount, buying, price);
    request = match (args.offer_id, args.cancel) {
        (Some(offer_id), true) => request.cancel(offer_id),
        (Some(offer_id), false) => request.update(offer_id),
        (None, true) => return Err(eyre!("--cancel requires --offer-id")),
        (None, false) => request,
    };

    let service = ExchangeService::from_config(ClientConfig::from_env()?)?;
    match service.submit_offer(&signer, &request).await? {
        Some(trade) => println!("{}", trade),
        None => println!("Transaction accepted without an offer result"),
    }
    Ok(())
}
