//! Trade Stream Tool
//!
//! Follows the trades of one account and prints each as it arrives. Stops on
//! Ctrl-C and prints the cursor to resume from.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example stream_trades -- --account G... --cursor now
//! ```
use clap::Parser;
use color_eyre::Result;
use galactic_horizon::{
    config::ClientConfig, constants::STREAM_CURSOR_NOW, logging::setup_logging,
    models::AccountId, services::ExchangeService,
};
use tokio::sync::watch;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stream-trades")]
#[command(about = "Print the live trades of an account")]
struct Args {
    /// Account address (G... format)
    #[arg(short, long)]
    account: String,

    /// Paging token to resume after, or "now"
    #[arg(short, long, default_value = STREAM_CURSOR_NOW)]
    cursor: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    setup_logging()?;
    let args = Args::parse();

    let account = AccountId::from_address(&args.account)?;
    let service = ExchangeService::from_config(ClientConfig::from_env()?)?;

    let (stop, shutdown) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            let _ = stop.send(true);
        }
    });

    let cursor = service
        .stream_trades(&account, &args.cursor, shutdown, |cursor, trade| {
            println!(
                "[{}] {} {} for {} {} at {}",
                cursor,
                trade.base_amount,
                trade.base_asset,
                trade.counter_amount,
                trade.counter_asset,
                trade.price
            );
        })
        .await;

    println!("Resume with --cursor {}", cursor);
    Ok(())
}
