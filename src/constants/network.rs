//! Network identities: passphrases and public endpoints.

/// Passphrase of the public network, hashed into every signature payload.
pub const STELLAR_MAINNET_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";
/// Passphrase of the test network.
pub const STELLAR_TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Horizon API base URL for Stellar mainnet
pub const STELLAR_HORIZON_MAINNET_URL: &str = "https://horizon.stellar.org";
/// Horizon API base URL for Stellar testnet
pub const STELLAR_HORIZON_TESTNET_URL: &str = "https://horizon-testnet.stellar.org";

/// Test network faucet; the account address is appended as the `addr` parameter.
pub const STELLAR_FRIENDBOT_URL: &str = "https://friendbot.stellar.org/";
