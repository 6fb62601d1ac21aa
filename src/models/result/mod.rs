mod codes;
pub use codes::*;

mod manage_offer;
pub use manage_offer::*;

mod operation_result;
pub use operation_result::*;

mod transaction_result;
pub use transaction_result::*;
