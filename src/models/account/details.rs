//! Account state as reported by Horizon.

use std::collections::BTreeMap;

use crate::{
    models::{
        AccountId, AccountResponse, Amount, Asset, BalanceResponse, ReservePolicy, ValueError,
    },
    utils::base64_decode_to_text,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalance {
    pub asset: Asset,
    pub balance: Amount,
    /// Trust limit; absent for the native balance.
    pub limit: Option<Amount>,
    pub buying_liabilities: Amount,
    pub selling_liabilities: Amount,
    pub last_modified_ledger: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSigner {
    /// Signer key in its text form; not every signer is an account key.
    pub key: String,
    pub weight: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thresholds {
    pub low: u8,
    pub medium: u8,
    pub high: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDetails {
    pub account_id: AccountId,
    pub sequence: i64,
    pub subentry_count: u32,
    pub balances: Vec<AccountBalance>,
    pub signers: Vec<AccountSigner>,
    /// Data entries with values decoded from base64 where they hold text.
    pub data: BTreeMap<String, String>,
    pub thresholds: Option<Thresholds>,
}

impl AccountDetails {
    /// Sequence number the next transaction from this account must carry.
    pub fn next_sequence(&self) -> Option<i64> {
        self.sequence.checked_add(1)
    }

    pub fn balance(&self, asset: &Asset) -> Option<&AccountBalance> {
        self.balances.iter().find(|b| &b.asset == asset)
    }

    /// Balance held in `asset`, zero when there is no trust line.
    pub fn balance_of(&self, asset: &Asset) -> Amount {
        self.balance(asset).map(|b| b.balance).unwrap_or(Amount::ZERO)
    }

    pub fn native_balance(&self) -> Amount {
        self.balance_of(&Asset::Native)
    }

    pub fn has_trust_line(&self, asset: &Asset) -> bool {
        asset.is_native() || self.balance(asset).is_some()
    }

    /// Ledger entries that each raise the reserve: trust lines, signers
    /// beyond the master key and data entries.
    pub fn reserve_entries(&self) -> u32 {
        let trust_lines = self.balances.iter().filter(|b| !b.asset.is_native()).count();
        let extra_signers = self.signers.len().saturating_sub(1);
        (trust_lines + extra_signers + self.data.len()) as u32
    }

    pub fn minimum_balance(&self, policy: &ReservePolicy) -> Amount {
        policy.minimum_balance(self.reserve_entries())
    }

    /// Native balance above the minimum, never negative.
    pub fn spendable_native(&self, policy: &ReservePolicy) -> Amount {
        self.native_balance()
            .checked_sub(self.minimum_balance(policy))
            .filter(|a| !a.is_negative())
            .unwrap_or(Amount::ZERO)
    }
}

fn parse_amount(field: &str, value: Option<&str>) -> Result<Amount, ValueError> {
    match value {
        Some(text) => text
            .parse()
            .map_err(|e| ValueError::InvalidRecord(format!("{}: {}", field, e))),
        None => Ok(Amount::ZERO),
    }
}

impl TryFrom<&BalanceResponse> for AccountBalance {
    type Error = ValueError;

    fn try_from(raw: &BalanceResponse) -> Result<Self, Self::Error> {
        let asset = Asset::from_horizon(
            &raw.asset_type,
            raw.asset_code.as_deref(),
            raw.asset_issuer.as_deref(),
        )?;
        Ok(Self {
            asset,
            balance: parse_amount("balance", Some(&raw.balance))?,
            limit: raw
                .limit
                .as_deref()
                .map(|l| parse_amount("limit", Some(l)))
                .transpose()?,
            buying_liabilities: parse_amount("buying_liabilities", raw.buying_liabilities.as_deref())?,
            selling_liabilities: parse_amount(
                "selling_liabilities",
                raw.selling_liabilities.as_deref(),
            )?,
            last_modified_ledger: raw.last_modified_ledger,
        })
    }
}

impl TryFrom<AccountResponse> for AccountDetails {
    type Error = ValueError;

    fn try_from(raw: AccountResponse) -> Result<Self, Self::Error> {
        let account_id = AccountId::from_address(&raw.account_id)
            .map_err(|e| ValueError::InvalidRecord(format!("account_id: {}", e)))?;

        let balances = raw
            .balances
            .iter()
            // pool shares carry no asset triple and do not affect trading
            .filter(|b| b.asset_type != "liquidity_pool_shares")
            .map(AccountBalance::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let signers = raw
            .signers
            .into_iter()
            .map(|s| AccountSigner {
                key: s.key,
                weight: s.weight,
            })
            .collect();

        let data = raw
            .data
            .iter()
            .map(|(name, value)| (name.clone(), base64_decode_to_text(value)))
            .collect();

        Ok(Self {
            account_id,
            sequence: raw.sequence,
            subentry_count: raw.subentry_count,
            balances,
            signers,
            data,
            thresholds: raw.thresholds.map(|t| Thresholds {
                low: t.low_threshold,
                medium: t.med_threshold,
                high: t.high_threshold,
            }),
        })
    }
}
