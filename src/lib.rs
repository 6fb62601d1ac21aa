//! Client library for a Stellar-style ledger network.
//!
//! Builds, signs and encodes transactions in the network's XDR wire format,
//! submits them through Horizon (opening missing trust lines once when an
//! offer needs them), reads order books, trades and aggregations, and follows
//! account trade and offer streams.

pub mod config;
pub mod constants;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;
pub mod xdr;
