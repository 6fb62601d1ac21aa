//! Ledger domain types, wire records and Horizon responses.

mod error;
pub use error::*;

mod value;
pub use value::*;

mod account;
pub use account::*;

mod operation;
pub use operation::*;

mod transaction;
pub use transaction::*;

mod result;
pub use result::*;

mod horizon;
pub use horizon::*;

mod offer_trade;
pub use offer_trade::*;
