mod amount;
pub use amount::*;

mod price;
pub use price::*;

mod asset;
pub use asset::*;
