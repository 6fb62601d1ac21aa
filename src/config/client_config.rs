use std::{env, str::FromStr, time::Duration};

use super::{ConfigError, NetworkConfig};
use crate::{
    constants::{
        DEFAULT_HTTP_CLIENT_TIMEOUT_SECONDS, DEFAULT_STREAM_RETRY_MS, STELLAR_DEFAULT_TRUST_LIMIT,
    },
    models::{Amount, ReservePolicy},
};

/// Everything a client needs besides its signing keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub network: NetworkConfig,
    pub http_timeout: Duration,
    /// Reconnect delay of event streams until the server sends `retry:`.
    pub stream_retry: Duration,
    /// Limit of trust lines opened automatically on submission.
    pub trust_line_limit: Amount,
    pub reserve: ReservePolicy,
}

impl ClientConfig {
    pub fn new(network: NetworkConfig) -> Self {
        Self {
            network,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_CLIENT_TIMEOUT_SECONDS),
            stream_retry: Duration::from_millis(DEFAULT_STREAM_RETRY_MS),
            trust_line_limit: Amount::from_stroops(STELLAR_DEFAULT_TRUST_LIMIT),
            reserve: ReservePolicy::default(),
        }
    }

    /// Reads the configuration from the environment.
    ///
    /// - STELLAR_NETWORK: "public" or "testnet" (default "testnet")
    /// - HORIZON_URL, NETWORK_PASSPHRASE, BASE_FEE: override the network defaults
    /// - HTTP_TIMEOUT_SECONDS, STREAM_RETRY_MS: transport timings
    pub fn from_env() -> Result<Self, ConfigError> {
        let network_name = env::var("STELLAR_NETWORK").unwrap_or_else(|_| "testnet".to_string());
        let mut network = NetworkConfig::from_str(&network_name)?;

        if let Ok(url) = env::var("HORIZON_URL") {
            network.horizon_url = url;
        }
        if let Ok(passphrase) = env::var("NETWORK_PASSPHRASE") {
            network.passphrase = passphrase;
        }
        if let Some(base_fee) = parse_env::<u32>("BASE_FEE")? {
            network.base_fee = base_fee;
        }
        network.validate()?;

        let mut config = Self::new(network);
        if let Some(seconds) = parse_env::<u64>("HTTP_TIMEOUT_SECONDS")? {
            config.http_timeout = Duration::from_secs(seconds);
        }
        if let Some(ms) = parse_env::<u64>("STREAM_RETRY_MS")? {
            config.stream_retry = Duration::from_millis(ms);
        }
        Ok(config)
    }

    pub fn with_trust_line_limit(mut self, limit: Amount) -> Self {
        self.trust_line_limit = limit;
        self
    }

    pub fn with_stream_retry(mut self, retry: Duration) -> Self {
        self.stream_retry = retry;
        self
    }

    pub fn with_reserve(mut self, reserve: ReservePolicy) -> Self {
        self.reserve = reserve;
        self
    }
}

fn parse_env<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                name,
                message: format!("'{}': {}", value, e),
            }),
        Err(_) => Ok(None),
    }
}
