use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        DEFAULT_BASE_RESERVE_STROOPS, DEFAULT_OFFER_HEADROOM, DEFAULT_RESERVE_BASE_ENTRIES,
        DEFAULT_RESERVE_FEE_BUFFER_STROOPS,
    },
    models::Amount,
};

/// Minimum-balance policy.
///
/// The account must hold `(base_entries + entries + offer_headroom) *
/// base_reserve` plus `fee_buffer`, where entries are trust lines, extra
/// signers and data entries. `base_entries` counts the account itself, its
/// native balance line and its master signer. `offer_headroom` covers offers
/// placed but not yet visible in the account record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservePolicy {
    pub base_reserve: Amount,
    pub base_entries: u32,
    pub offer_headroom: u32,
    pub fee_buffer: Amount,
}

impl Default for ReservePolicy {
    fn default() -> Self {
        Self {
            base_reserve: Amount::from_stroops(DEFAULT_BASE_RESERVE_STROOPS),
            base_entries: DEFAULT_RESERVE_BASE_ENTRIES,
            offer_headroom: DEFAULT_OFFER_HEADROOM,
            fee_buffer: Amount::from_stroops(DEFAULT_RESERVE_FEE_BUFFER_STROOPS),
        }
    }
}

impl ReservePolicy {
    pub fn minimum_balance(&self, entries: u32) -> Amount {
        let units =
            i64::from(self.base_entries) + i64::from(entries) + i64::from(self.offer_headroom);
        let stroops = units
            .saturating_mul(self.base_reserve.stroops())
            .saturating_add(self.fee_buffer.stroops());
        Amount::from_stroops(stroops)
    }
}
