//! Network and client configuration.
//!
//! Values are built explicitly ([`NetworkConfig::public`],
//! [`NetworkConfig::testnet`]) or read from the environment with
//! [`ClientConfig::from_env`].

use thiserror::Error;

mod network_config;
pub use network_config::*;

mod client_config;
pub use client_config::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: &'static str, message: String },
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
