mod serde;
pub use serde::*;

mod base64;
pub use base64::*;

mod strkey;
pub use strkey::*;

mod time;
pub use time::*;

mod url;
pub use url::*;
