use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::constants::{
    STELLAR_DEFAULT_TRANSACTION_FEE, STELLAR_FRIENDBOT_URL, STELLAR_HORIZON_MAINNET_URL,
    STELLAR_HORIZON_TESTNET_URL, STELLAR_MAINNET_PASSPHRASE, STELLAR_TESTNET_PASSPHRASE,
};

/// Which ledger network a client talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    pub horizon_url: String,
    /// Mixed into every transaction hash; signatures are only valid on the
    /// network with the same passphrase.
    pub passphrase: String,
    /// Fee per operation, in stroops.
    pub base_fee: u32,
    /// Faucet for funding new accounts; test networks only.
    pub friendbot_url: Option<String>,
}

impl NetworkConfig {
    pub fn public() -> Self {
        Self {
            name: "public".to_string(),
            horizon_url: STELLAR_HORIZON_MAINNET_URL.to_string(),
            passphrase: STELLAR_MAINNET_PASSPHRASE.to_string(),
            base_fee: STELLAR_DEFAULT_TRANSACTION_FEE,
            friendbot_url: None,
        }
    }

    pub fn testnet() -> Self {
        Self {
            name: "testnet".to_string(),
            horizon_url: STELLAR_HORIZON_TESTNET_URL.to_string(),
            passphrase: STELLAR_TESTNET_PASSPHRASE.to_string(),
            base_fee: STELLAR_DEFAULT_TRANSACTION_FEE,
            friendbot_url: Some(STELLAR_FRIENDBOT_URL.to_string()),
        }
    }

    pub fn is_testnet(&self) -> bool {
        self.friendbot_url.is_some()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon_url.trim().is_empty() {
            return Err(ConfigError::MissingField("horizon_url"));
        }
        if !self.horizon_url.starts_with("http://") && !self.horizon_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                name: "horizon_url",
                message: format!("'{}' is not an http(s) URL", self.horizon_url),
            });
        }
        if self.passphrase.is_empty() {
            return Err(ConfigError::MissingField("passphrase"));
        }
        if self.base_fee == 0 {
            return Err(ConfigError::InvalidValue {
                name: "base_fee",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

impl FromStr for NetworkConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" | "mainnet" => Ok(Self::public()),
            "testnet" | "test" => Ok(Self::testnet()),
            other => Err(ConfigError::UnknownNetwork(other.to_string())),
        }
    }
}
