mod xdr;
pub use xdr::*;

mod value;
pub use value::*;

mod keypair;
pub use keypair::*;

mod transaction;
pub use transaction::*;

mod submission;
pub use submission::*;
