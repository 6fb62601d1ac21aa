mod account_id;
pub use account_id::*;

mod keypair;
pub use keypair::*;

mod reserve;
pub use reserve::*;

mod details;
pub use details::*;
