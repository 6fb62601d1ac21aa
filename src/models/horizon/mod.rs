//! Horizon JSON records and their conversion into ledger domain types.
//!
//! Raw response structs mirror Horizon's field names; each converts into a
//! domain type with parsed amounts, prices, assets and account ids.

mod page;
pub use page::*;

mod asset;
pub use asset::*;

mod account;
pub use account::*;

mod trade;
pub use trade::*;

mod offer;
pub use offer::*;

mod order_book;
pub use order_book::*;

mod trade_aggregation;
pub use trade_aggregation::*;

mod submit;
pub use submit::*;
